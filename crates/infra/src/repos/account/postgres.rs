use crate::repos::shared::repo::{IRecordRepo, StoreError};
use chrono::{DateTime, Utc};
use remindme_domain::{Account, AccountChanges, NewAccount, PageQuery, RecordMeta, ID};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresAccountRepo {
    pool: PgPool,
}

impl PostgresAccountRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct AccountRaw {
    id: i64,
    full_name: String,
    created_on: DateTime<Utc>,
    updated_on: DateTime<Utc>,
    deleted_on: Option<DateTime<Utc>>,
}

impl From<AccountRaw> for Account {
    fn from(e: AccountRaw) -> Self {
        Self {
            id: e.id.into(),
            full_name: e.full_name,
            meta: RecordMeta {
                created_on: e.created_on,
                updated_on: e.updated_on,
                deleted_on: e.deleted_on,
            },
        }
    }
}

#[async_trait::async_trait]
impl IRecordRepo<Account> for PostgresAccountRepo {
    async fn find_active(&self, owner_id: &ID) -> Result<Vec<Account>, StoreError> {
        let accounts: Vec<AccountRaw> = sqlx::query_as::<_, AccountRaw>(
            r#"
            SELECT * FROM accounts
            WHERE id = $1 AND deleted_on IS NULL
            "#,
        )
        .bind(owner_id.inner())
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts.into_iter().map(|a| a.into()).collect())
    }

    /// The account table ignores paging and always answers with the owner row
    async fn find_page(&self, owner_id: &ID, _query: &PageQuery) -> Result<Vec<Account>, StoreError> {
        let accounts: Vec<AccountRaw> = sqlx::query_as::<_, AccountRaw>(
            r#"
            SELECT * FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(owner_id.inner())
        .fetch_all(&self.pool)
        .await?;
        Ok(accounts.into_iter().map(|a| a.into()).collect())
    }

    async fn find_by_id(&self, owner_id: &ID, id: &ID) -> Result<Option<Account>, StoreError> {
        let account: Option<AccountRaw> = sqlx::query_as::<_, AccountRaw>(
            r#"
            SELECT * FROM accounts
            WHERE id = $1 AND id = $2 AND deleted_on IS NULL
            "#,
        )
        .bind(id.inner())
        .bind(owner_id.inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Find account with id: {:?} failed. DB returned error: {:?}",
                id, e
            );
            e
        })?;
        Ok(account.map(|a| a.into()))
    }

    async fn insert(
        &self,
        _owner_id: &ID,
        fields: NewAccount,
        timestamp: DateTime<Utc>,
    ) -> Result<ID, StoreError> {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO accounts(full_name, created_on, updated_on)
            VALUES($1, $2, $2)
            RETURNING id
            "#,
        )
        .bind(&fields.full_name)
        .bind(timestamp)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert account: {:?}. DB returned error: {:?}",
                fields, e
            );
            e
        })?;
        Ok(id.into())
    }

    async fn update(
        &self,
        id: &ID,
        owner_id: &ID,
        changes: AccountChanges,
        timestamp: DateTime<Utc>,
    ) -> Result<Account, StoreError> {
        let account: Option<AccountRaw> = sqlx::query_as::<_, AccountRaw>(
            r#"
            UPDATE accounts
            SET full_name = COALESCE($3, full_name),
            updated_on = $4
            WHERE id = $1 AND id = $2 AND deleted_on IS NULL
            RETURNING *
            "#,
        )
        .bind(id.inner())
        .bind(owner_id.inner())
        .bind(changes.full_name)
        .bind(timestamp)
        .fetch_optional(&self.pool)
        .await?;
        account.map(|a| a.into()).ok_or(StoreError::NotFound)
    }

    async fn soft_delete(
        &self,
        id: &ID,
        owner_id: &ID,
        timestamp: DateTime<Utc>,
    ) -> Result<Account, StoreError> {
        let account: Option<AccountRaw> = sqlx::query_as::<_, AccountRaw>(
            r#"
            UPDATE accounts
            SET deleted_on = $3,
            updated_on = $3
            WHERE id = $1 AND id = $2 AND deleted_on IS NULL
            RETURNING *
            "#,
        )
        .bind(id.inner())
        .bind(owner_id.inner())
        .bind(timestamp)
        .fetch_optional(&self.pool)
        .await?;
        account.map(|a| a.into()).ok_or(StoreError::NotFound)
    }
}
