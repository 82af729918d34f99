use crate::job::JobHandle;
use crate::shared::{
    entity::{Entity, ID},
    record::{OwnerScope, Record, RecordMeta, SortKey},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

pub const MAX_MESSAGE_LENGTH: usize = 255;

/// Textual format accepted for reminder times, e.g. `2024-05-01 09:30:00.000000 +0000`
pub const REMINDER_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f %z";

/// A `Reminder` is a message that should be delivered to the owning `Account`
/// at `reminder_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct Reminder {
    pub id: ID,
    /// The `Account` this `Reminder` belongs to. Never changes after creation.
    pub account_id: ID,
    pub message: String,
    /// The timestamp at which the notification should be dispatched
    pub reminder_time: DateTime<Utc>,
    pub is_sent: bool,
    /// Handle of the job that will dispatch this `Reminder`. It is `None` until
    /// the job has been scheduled.
    pub notification_job: Option<JobHandle>,
    pub meta: RecordMeta,
}

/// Status derived from the stored columns, it is never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderStatus {
    Created,
    Sent,
    Deleted,
}

impl ReminderStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Created)
    }
}

impl Display for ReminderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = match self {
            Self::Created => "created",
            Self::Sent => "sent",
            Self::Deleted => "deleted",
        };
        write!(f, "{}", status)
    }
}

impl Reminder {
    /// Deletion dominates the sent flag
    pub fn status(&self) -> ReminderStatus {
        if self.meta.is_deleted() {
            ReminderStatus::Deleted
        } else if self.is_sent {
            ReminderStatus::Sent
        } else {
            ReminderStatus::Created
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidReminderError {
    #[error("The reminder message cannot be empty")]
    EmptyMessage,
    #[error("The reminder message cannot be longer than {max} characters, got {len}")]
    MessageTooLong { len: usize, max: usize },
    #[error("The reminder message cannot contain NUL characters")]
    NulCharacter,
    #[error("Malformed reminder time: `{0}`. Expected format: `YYYY-MM-DD HH:MM:SS.ffffff +HHMM`")]
    MalformedTime(String),
}

pub fn parse_reminder_time(raw: &str) -> Result<DateTime<Utc>, InvalidReminderError> {
    DateTime::parse_from_str(raw.trim(), REMINDER_TIME_FORMAT)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| InvalidReminderError::MalformedTime(raw.to_string()))
}

#[derive(Debug, Clone)]
pub struct NewReminder {
    pub message: String,
    pub reminder_time: DateTime<Utc>,
}

impl NewReminder {
    pub fn new(message: String, reminder_time: DateTime<Utc>) -> Result<Self, InvalidReminderError> {
        if message.trim().is_empty() {
            return Err(InvalidReminderError::EmptyMessage);
        }
        if message.contains('\0') {
            return Err(InvalidReminderError::NulCharacter);
        }
        let len = message.chars().count();
        if len > MAX_MESSAGE_LENGTH {
            return Err(InvalidReminderError::MessageTooLong {
                len,
                max: MAX_MESSAGE_LENGTH,
            });
        }
        Ok(Self {
            message,
            reminder_time,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReminderChanges {
    pub is_sent: Option<bool>,
    pub notification_job: Option<JobHandle>,
}

impl ReminderChanges {
    pub fn sent() -> Self {
        Self {
            is_sent: Some(true),
            ..Default::default()
        }
    }

    pub fn notification_job(handle: JobHandle) -> Self {
        Self {
            notification_job: Some(handle),
            ..Default::default()
        }
    }
}

impl Entity for Reminder {
    fn id(&self) -> &ID {
        &self.id
    }
}

impl Record for Reminder {
    type Fields = NewReminder;
    type Changes = ReminderChanges;

    const TABLE: &'static str = "reminders";
    const OWNER_SCOPE: OwnerScope = OwnerScope::Account;
    const SORTABLE_FIELDS: &'static [&'static str] = &[
        "id",
        "message",
        "reminder_time",
        "is_sent",
        "created_on",
        "updated_on",
        "deleted_on",
    ];

    fn build(id: ID, owner_id: ID, fields: Self::Fields, meta: RecordMeta) -> Self {
        Self {
            id,
            account_id: owner_id,
            message: fields.message,
            reminder_time: fields.reminder_time,
            is_sent: false,
            notification_job: None,
            meta,
        }
    }

    fn apply(&mut self, changes: Self::Changes) {
        if let Some(is_sent) = changes.is_sent {
            self.is_sent = is_sent;
        }
        if let Some(handle) = changes.notification_job {
            self.notification_job = Some(handle);
        }
    }

    fn owner_id(&self) -> &ID {
        &self.account_id
    }

    fn meta(&self) -> &RecordMeta {
        &self.meta
    }

    fn meta_mut(&mut self) -> &mut RecordMeta {
        &mut self.meta
    }

    fn sort_key(&self, field: &str) -> SortKey {
        match field {
            "id" => SortKey::Int(self.id.inner()),
            "message" => SortKey::Text(self.message.clone()),
            "reminder_time" => SortKey::Time(self.reminder_time),
            "is_sent" => SortKey::Bool(self.is_sent),
            "created_on" => SortKey::Time(self.meta.created_on),
            "updated_on" => SortKey::Time(self.meta.updated_on),
            "deleted_on" => self.meta.deleted_on.into(),
            _ => SortKey::Null,
        }
    }
}
