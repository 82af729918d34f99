use super::IReminderRepo;
use crate::repos::shared::repo::{IRecordRepo, StoreError};
use chrono::{DateTime, Utc};
use remindme_domain::{
    JobHandle, NewReminder, PageQuery, RecordMeta, Reminder, ReminderChanges, ID,
};
use sqlx::{FromRow, PgPool};
use tracing::error;

pub struct PostgresReminderRepo {
    pool: PgPool,
}

impl PostgresReminderRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct ReminderRaw {
    id: i64,
    account_id: i64,
    message: String,
    reminder_time: DateTime<Utc>,
    is_sent: bool,
    notification_job_id: Option<String>,
    created_on: DateTime<Utc>,
    updated_on: DateTime<Utc>,
    deleted_on: Option<DateTime<Utc>>,
}

impl From<ReminderRaw> for Reminder {
    fn from(e: ReminderRaw) -> Self {
        Self {
            id: e.id.into(),
            account_id: e.account_id.into(),
            message: e.message,
            reminder_time: e.reminder_time,
            is_sent: e.is_sent,
            notification_job: e.notification_job_id.map(JobHandle::from),
            meta: RecordMeta {
                created_on: e.created_on,
                updated_on: e.updated_on,
                deleted_on: e.deleted_on,
            },
        }
    }
}

#[async_trait::async_trait]
impl IRecordRepo<Reminder> for PostgresReminderRepo {
    async fn find_active(&self, owner_id: &ID) -> Result<Vec<Reminder>, StoreError> {
        let reminders: Vec<ReminderRaw> = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE account_id = $1 AND deleted_on IS NULL
            "#,
        )
        .bind(owner_id.inner())
        .fetch_all(&self.pool)
        .await?;
        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn find_page(&self, owner_id: &ID, query: &PageQuery) -> Result<Vec<Reminder>, StoreError> {
        // The field is one of `Reminder::SORTABLE_FIELDS`, checked by `PageQuery`
        let direction = if query.order_by.descending {
            "DESC"
        } else {
            "ASC"
        };
        let sql = format!(
            r#"
            SELECT * FROM reminders
            WHERE account_id = $1
            ORDER BY {} {}, id ASC
            LIMIT $2
            OFFSET $3
            "#,
            query.order_by.field, direction
        );
        let reminders: Vec<ReminderRaw> = sqlx::query_as::<_, ReminderRaw>(&sql)
            .bind(owner_id.inner())
            .bind(query.per_page)
            .bind(query.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(
                    "Find reminders page with query: {:?} failed. DB returned error: {:?}",
                    query, e
                );
                e
            })?;
        Ok(reminders.into_iter().map(|r| r.into()).collect())
    }

    async fn find_by_id(&self, owner_id: &ID, id: &ID) -> Result<Option<Reminder>, StoreError> {
        let reminder: Option<ReminderRaw> = sqlx::query_as::<_, ReminderRaw>(
            r#"
            SELECT * FROM reminders
            WHERE id = $1 AND account_id = $2 AND deleted_on IS NULL
            "#,
        )
        .bind(id.inner())
        .bind(owner_id.inner())
        .fetch_optional(&self.pool)
        .await?;
        Ok(reminder.map(|r| r.into()))
    }

    async fn insert(
        &self,
        owner_id: &ID,
        fields: NewReminder,
        timestamp: DateTime<Utc>,
    ) -> Result<ID, StoreError> {
        let mut tx = self.pool.begin().await?;

        // Lock the owner row so it cannot be soft deleted before the insert commits
        let owner: Option<(i64,)> = sqlx::query_as(
            r#"
            SELECT id FROM accounts
            WHERE id = $1 AND deleted_on IS NULL
            FOR SHARE
            "#,
        )
        .bind(owner_id.inner())
        .fetch_optional(&mut *tx)
        .await?;
        if owner.is_none() {
            tx.rollback().await?;
            return Err(StoreError::NotFound);
        }

        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO reminders(account_id, message, reminder_time, is_sent, created_on, updated_on)
            VALUES($1, $2, $3, FALSE, $4, $4)
            RETURNING id
            "#,
        )
        .bind(owner_id.inner())
        .bind(&fields.message)
        .bind(fields.reminder_time)
        .bind(timestamp)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                "Unable to insert reminder: {:?}. DB returned error: {:?}",
                fields, e
            );
            e
        })?;

        tx.commit().await?;
        Ok(id.into())
    }

    async fn update(
        &self,
        id: &ID,
        owner_id: &ID,
        changes: ReminderChanges,
        timestamp: DateTime<Utc>,
    ) -> Result<Reminder, StoreError> {
        let reminder: Option<ReminderRaw> = sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders
            SET is_sent = COALESCE($3, is_sent),
            notification_job_id = COALESCE($4, notification_job_id),
            updated_on = $5
            WHERE id = $1 AND account_id = $2 AND deleted_on IS NULL
            RETURNING *
            "#,
        )
        .bind(id.inner())
        .bind(owner_id.inner())
        .bind(changes.is_sent)
        .bind(changes.notification_job.map(|handle| handle.inner()))
        .bind(timestamp)
        .fetch_optional(&self.pool)
        .await?;
        reminder.map(|r| r.into()).ok_or(StoreError::NotFound)
    }

    async fn soft_delete(
        &self,
        id: &ID,
        owner_id: &ID,
        timestamp: DateTime<Utc>,
    ) -> Result<Reminder, StoreError> {
        let reminder: Option<ReminderRaw> = sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders
            SET deleted_on = $3,
            updated_on = $3
            WHERE id = $1 AND account_id = $2 AND deleted_on IS NULL
            RETURNING *
            "#,
        )
        .bind(id.inner())
        .bind(owner_id.inner())
        .bind(timestamp)
        .fetch_optional(&self.pool)
        .await?;
        reminder.map(|r| r.into()).ok_or(StoreError::NotFound)
    }
}

#[async_trait::async_trait]
impl IReminderRepo for PostgresReminderRepo {
    async fn cancel_unsent(
        &self,
        id: &ID,
        owner_id: &ID,
        timestamp: DateTime<Utc>,
    ) -> Result<Reminder, StoreError> {
        let reminder: Option<ReminderRaw> = sqlx::query_as::<_, ReminderRaw>(
            r#"
            UPDATE reminders
            SET deleted_on = $3,
            updated_on = $3
            WHERE id = $1 AND account_id = $2 AND deleted_on IS NULL AND is_sent = FALSE
            RETURNING *
            "#,
        )
        .bind(id.inner())
        .bind(owner_id.inner())
        .bind(timestamp)
        .fetch_optional(&self.pool)
        .await?;

        match reminder {
            Some(reminder) => Ok(reminder.into()),
            // Either gone or already sent, tell the caller which one
            None => match self.find_by_id(owner_id, id).await? {
                Some(_) => Err(StoreError::Conflict),
                None => Err(StoreError::NotFound),
            },
        }
    }
}
