use super::{lease_expired_before, IJobScheduler};
use chrono::{DateTime, Utc};
use remindme_domain::{JobHandle, JobState, ScheduledJob, SendReminderJob};
use sqlx::{FromRow, PgPool};
use tracing::error;

/// Durable job queue stored in the `reminder_jobs` table. Several workers may
/// poll the same table, a claim is never handed out twice while its lease holds.
pub struct PostgresJobScheduler {
    pool: PgPool,
}

impl PostgresJobScheduler {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct JobRaw {
    job_id: String,
    account_id: i64,
    reminder_id: i64,
    run_at: DateTime<Utc>,
}

impl From<JobRaw> for ScheduledJob {
    fn from(e: JobRaw) -> Self {
        Self {
            handle: e.job_id.into(),
            job: SendReminderJob {
                account_id: e.account_id.into(),
                reminder_id: e.reminder_id.into(),
            },
            run_at: e.run_at,
        }
    }
}

#[async_trait::async_trait]
impl IJobScheduler for PostgresJobScheduler {
    async fn schedule(
        &self,
        job: SendReminderJob,
        run_at: DateTime<Utc>,
    ) -> anyhow::Result<JobHandle> {
        let handle = JobHandle::generate();
        sqlx::query(
            r#"
            INSERT INTO reminder_jobs(job_id, account_id, reminder_id, run_at, state, created_on, updated_on)
            VALUES($1, $2, $3, $4, $5, NOW(), NOW())
            "#,
        )
        .bind(handle.as_str())
        .bind(job.account_id.inner())
        .bind(job.reminder_id.inner())
        .bind(run_at)
        .bind(JobState::Pending.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Unable to schedule job: {:?}. DB returned error: {:?}",
                job, e
            );
            e
        })?;
        Ok(handle)
    }

    async fn query_state(&self, handle: &JobHandle) -> anyhow::Result<JobState> {
        let state: Option<(String,)> = sqlx::query_as(
            r#"
            SELECT state FROM reminder_jobs
            WHERE job_id = $1
            "#,
        )
        .bind(handle.as_str())
        .fetch_optional(&self.pool)
        .await?;
        match state {
            Some((state,)) => state.parse::<JobState>().map_err(anyhow::Error::msg),
            None => Ok(JobState::Pending),
        }
    }

    async fn request_cancel(&self, handle: &JobHandle) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            UPDATE reminder_jobs
            SET state = $2,
            updated_on = NOW()
            WHERE job_id = $1 AND state = $3
            "#,
        )
        .bind(handle.as_str())
        .bind(JobState::Revoked.as_str())
        .bind(JobState::Pending.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn claim_due(
        &self,
        now: DateTime<Utc>,
        limit: usize,
    ) -> anyhow::Result<Vec<ScheduledJob>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let mut jobs: Vec<JobRaw> = sqlx::query_as::<_, JobRaw>(
            r#"
            UPDATE reminder_jobs
            SET state = $3,
            claimed_at = $1,
            updated_on = NOW()
            WHERE job_id IN (
                SELECT job_id FROM reminder_jobs
                WHERE (state = $4 AND run_at <= $1)
                OR (state = $3 AND claimed_at <= $5)
                ORDER BY run_at
                LIMIT $2
                FOR UPDATE SKIP LOCKED
            )
            RETURNING job_id, account_id, reminder_id, run_at
            "#,
        )
        .bind(now)
        .bind(limit)
        .bind(JobState::Running.as_str())
        .bind(JobState::Pending.as_str())
        .bind(lease_expired_before(now))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Unable to claim due jobs. DB returned error: {:?}", e);
            e
        })?;
        // RETURNING does not keep the order of the subquery
        jobs.sort_by_key(|job| job.run_at);
        Ok(jobs.into_iter().map(|job| job.into()).collect())
    }

    async fn finish(&self, handle: &JobHandle, outcome: JobState) -> anyhow::Result<()> {
        let res = sqlx::query(
            r#"
            UPDATE reminder_jobs
            SET state = $2,
            updated_on = NOW()
            WHERE job_id = $1
            "#,
        )
        .bind(handle.as_str())
        .bind(outcome.as_str())
        .execute(&self.pool)
        .await?;
        if res.rows_affected() == 0 {
            return Err(anyhow::anyhow!("Unknown job: {}", handle));
        }
        Ok(())
    }
}
