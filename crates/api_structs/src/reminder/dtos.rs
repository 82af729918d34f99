use chrono::{DateTime, Utc};
use remindme_domain::{Reminder, ReminderStatus, ID};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderDTO {
    pub id: ID,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
    pub message: String,
    pub reminder_time: DateTime<Utc>,
    pub status: ReminderStatus,
}

impl ReminderDTO {
    pub fn new(reminder: Reminder) -> Self {
        Self {
            id: reminder.id,
            status: reminder.status(),
            created_on: reminder.meta.created_on,
            updated_on: reminder.meta.updated_on,
            message: reminder.message,
            reminder_time: reminder.reminder_time,
        }
    }
}
