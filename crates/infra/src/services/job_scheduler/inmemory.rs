use super::{lease_expired_before, IJobScheduler};
use chrono::{DateTime, Utc};
use remindme_domain::{JobHandle, JobState, ScheduledJob, SendReminderJob};
use std::sync::Mutex;

struct JobEntry {
    scheduled: ScheduledJob,
    state: JobState,
    claimed_at: Option<DateTime<Utc>>,
}

impl JobEntry {
    fn is_claimable(&self, now: DateTime<Utc>) -> bool {
        match self.state {
            JobState::Pending => self.scheduled.run_at <= now,
            JobState::Running => self
                .claimed_at
                .map(|claimed_at| claimed_at <= lease_expired_before(now))
                .unwrap_or(true),
            _ => false,
        }
    }
}

/// Keeps the job queue in process memory. Jobs are lost on restart.
pub struct InMemoryJobScheduler {
    jobs: Mutex<Vec<JobEntry>>,
}

impl InMemoryJobScheduler {
    pub fn new() -> Self {
        Self {
            jobs: Mutex::new(Vec::new()),
        }
    }
}

impl Default for InMemoryJobScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IJobScheduler for InMemoryJobScheduler {
    async fn schedule(
        &self,
        job: SendReminderJob,
        run_at: DateTime<Utc>,
    ) -> anyhow::Result<JobHandle> {
        let handle = JobHandle::generate();
        let mut jobs = self.jobs.lock().unwrap();
        jobs.push(JobEntry {
            scheduled: ScheduledJob {
                handle: handle.clone(),
                job,
                run_at,
            },
            state: JobState::Pending,
            claimed_at: None,
        });
        Ok(handle)
    }

    async fn query_state(&self, handle: &JobHandle) -> anyhow::Result<JobState> {
        let jobs = self.jobs.lock().unwrap();
        Ok(jobs
            .iter()
            .find(|entry| entry.scheduled.handle == *handle)
            .map(|entry| entry.state)
            .unwrap_or(JobState::Pending))
    }

    async fn request_cancel(&self, handle: &JobHandle) -> anyhow::Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        if let Some(entry) = jobs
            .iter_mut()
            .find(|entry| entry.scheduled.handle == *handle && entry.state == JobState::Pending)
        {
            entry.state = JobState::Revoked;
        }
        Ok(())
    }

    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> anyhow::Result<Vec<ScheduledJob>> {
        let mut jobs = self.jobs.lock().unwrap();
        let mut due = jobs
            .iter_mut()
            .filter(|entry| entry.is_claimable(now))
            .collect::<Vec<_>>();
        due.sort_by_key(|entry| entry.scheduled.run_at);

        Ok(due
            .into_iter()
            .take(limit)
            .map(|entry| {
                entry.state = JobState::Running;
                entry.claimed_at = Some(now);
                entry.scheduled.clone()
            })
            .collect())
    }

    async fn finish(&self, handle: &JobHandle, outcome: JobState) -> anyhow::Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        match jobs
            .iter_mut()
            .find(|entry| entry.scheduled.handle == *handle)
        {
            Some(entry) => {
                entry.state = outcome;
                Ok(())
            }
            None => Err(anyhow::anyhow!("Unknown job: {}", handle)),
        }
    }
}
