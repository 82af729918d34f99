use crate::repos::shared::inmemory_repo::InMemoryRecordRepo;
use chrono::{DateTime, Utc};
use remindme_domain::{Account, NewAccount, ID};

pub type InMemoryAccountRepo = InMemoryRecordRepo<Account>;

impl InMemoryAccountRepo {
    pub fn create() -> Self {
        Self::new(None)
    }

    /// Seeds account `1` which requests fall back to when they do not name an account
    pub fn create_with_default_account(timestamp: DateTime<Utc>) -> Self {
        let repo = Self::create();
        repo.push(
            &ID::from(1),
            NewAccount {
                full_name: "Default account".into(),
            },
            timestamp,
        );
        repo
    }
}
