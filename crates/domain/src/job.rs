use crate::shared::entity::ID;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

/// Opaque identifier handed out by the job scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobHandle(String);

impl JobHandle {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn inner(self) -> String {
        self.0
    }
}

impl From<&str> for JobHandle {
    fn from(handle: &str) -> Self {
        Self(handle.to_string())
    }
}

impl From<String> for JobHandle {
    fn from(handle: String) -> Self {
        Self(handle)
    }
}

impl Display for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle of a scheduled job as reported by the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    /// Waiting for its run time. Unknown handles also report this state.
    Pending,
    /// Picked up by a worker and currently executing
    Running,
    Succeeded,
    Failed,
    /// Cancelled before it started
    Revoked,
}

impl JobState {
    /// The job ran to completion, whatever the outcome
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
            Self::Revoked => "revoked",
        }
    }
}

impl FromStr for JobState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "succeeded" => Ok(Self::Succeeded),
            "failed" => Ok(Self::Failed),
            "revoked" => Ok(Self::Revoked),
            _ => Err(format!("Unknown job state: {}", s)),
        }
    }
}

/// The work a job performs when it fires: deliver one `Reminder`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendReminderJob {
    pub account_id: ID,
    pub reminder_id: ID,
}

/// A job claimed by a worker
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledJob {
    pub handle: JobHandle,
    pub job: SendReminderJob,
    pub run_at: DateTime<Utc>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn job_state_roundtrips_through_str() {
        for state in [
            JobState::Pending,
            JobState::Running,
            JobState::Succeeded,
            JobState::Failed,
            JobState::Revoked,
        ] {
            assert_eq!(state.as_str().parse::<JobState>().unwrap(), state);
        }
        assert!("started".parse::<JobState>().is_err());
    }

    #[test]
    fn completed_states() {
        assert!(JobState::Succeeded.is_completed());
        assert!(JobState::Failed.is_completed());
        assert!(!JobState::Running.is_completed());
        assert!(!JobState::Pending.is_completed());
        assert!(!JobState::Revoked.is_completed());
    }
}
