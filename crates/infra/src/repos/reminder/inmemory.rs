use super::IReminderRepo;
use crate::repos::shared::{
    inmemory_repo::{update_active, InMemoryRecordRepo},
    repo::StoreError,
};
use chrono::{DateTime, Utc};
use remindme_domain::{Account, Record, Reminder, ID};
use std::sync::Arc;

pub type InMemoryReminderRepo = InMemoryRecordRepo<Reminder>;

impl InMemoryReminderRepo {
    pub fn create(accounts: Arc<InMemoryRecordRepo<Account>>) -> Self {
        Self::new(Some(accounts))
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn cancel_unsent(
        &self,
        id: &ID,
        owner_id: &ID,
        timestamp: DateTime<Utc>,
    ) -> Result<Reminder, StoreError> {
        update_active(self.table(), id, owner_id, |reminder| {
            if reminder.is_sent {
                return Err(StoreError::Conflict);
            }
            reminder.meta_mut().mark_deleted(timestamp);
            Ok(())
        })
    }
}
