use chrono::{DateTime, Utc};
use remindme_domain::{PageQuery, Record, ID};
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// No active record matched the id and owner, or the owner itself is missing
    #[error("No active record was found")]
    NotFound,
    /// The record exists but its state does not permit the requested change
    #[error("The record is in a state that does not permit this change")]
    Conflict,
    #[error("Storage failure: {0}")]
    Persistence(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        error!("DB returned error: {:?}", e);
        Self::Persistence(anyhow::Error::new(e))
    }
}

/// Soft deleting persistence for a `Record` type.
///
/// Every query is scoped to an owner account id. For the account table the
/// owner is the account itself.
#[async_trait::async_trait]
pub trait IRecordRepo<T: Record>: Send + Sync {
    /// All active records of the owner, in storage order
    async fn find_active(&self, owner_id: &ID) -> Result<Vec<T>, StoreError>;
    /// One page of the owner's records, soft deleted ones included.
    /// A page past the end is empty.
    async fn find_page(&self, owner_id: &ID, query: &PageQuery) -> Result<Vec<T>, StoreError>;
    /// The active record with the given id
    async fn find_by_id(&self, owner_id: &ID, id: &ID) -> Result<Option<T>, StoreError>;
    /// Stamps `created_on` and `updated_on` with `timestamp` and returns the new id.
    /// Fails with `NotFound` when the owner account is not active.
    async fn insert(
        &self,
        owner_id: &ID,
        fields: T::Fields,
        timestamp: DateTime<Utc>,
    ) -> Result<ID, StoreError>;
    async fn update(
        &self,
        id: &ID,
        owner_id: &ID,
        changes: T::Changes,
        timestamp: DateTime<Utc>,
    ) -> Result<T, StoreError>;
    async fn soft_delete(
        &self,
        id: &ID,
        owner_id: &ID,
        timestamp: DateTime<Utc>,
    ) -> Result<T, StoreError>;
}
