mod account;
mod reminder;
mod shared;

use account::{InMemoryAccountRepo, PostgresAccountRepo};
use reminder::{InMemoryReminderRepo, PostgresReminderRepo};
use chrono::{DateTime, Utc};
use remindme_domain::Account;
use sqlx::PgPool;
use std::sync::Arc;

pub use reminder::IReminderRepo;
pub use shared::repo::{IRecordRepo, StoreError};

#[derive(Clone)]
pub struct Repos {
    pub accounts: Arc<dyn IRecordRepo<Account>>,
    pub reminders: Arc<dyn IReminderRepo>,
}

impl Repos {
    pub fn create_postgres(pool: PgPool) -> Self {
        Self {
            accounts: Arc::new(PostgresAccountRepo::new(pool.clone())),
            reminders: Arc::new(PostgresReminderRepo::new(pool)),
        }
    }

    pub fn create_inmemory(timestamp: DateTime<Utc>) -> Self {
        let accounts = Arc::new(InMemoryAccountRepo::create_with_default_account(timestamp));
        Self {
            reminders: Arc::new(InMemoryReminderRepo::create(accounts.clone())),
            accounts,
        }
    }
}
