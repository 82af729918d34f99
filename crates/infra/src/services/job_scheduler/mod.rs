mod inmemory;
mod postgres;

use chrono::{DateTime, Duration, Utc};
pub use inmemory::InMemoryJobScheduler;
pub use postgres::PostgresJobScheduler;
use remindme_domain::{JobHandle, JobState, ScheduledJob, SendReminderJob};

/// How long a claim is held. A job still `Running` after this is assumed to
/// belong to a dead worker and can be claimed again.
pub const CLAIM_LEASE_SECS: i64 = 300;

/// Claims made at or before the returned point in time have expired
pub(crate) fn lease_expired_before(now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::seconds(CLAIM_LEASE_SECS)
}

/// Runs a `SendReminderJob` at a later point in time.
///
/// The scheduling side (`schedule`, `query_state`, `request_cancel`) is used by the
/// reminder lifecycle, the worker side (`claim_due`, `finish`) by the job runner.
#[async_trait::async_trait]
pub trait IJobScheduler: Send + Sync {
    async fn schedule(
        &self,
        job: SendReminderJob,
        run_at: DateTime<Utc>,
    ) -> anyhow::Result<JobHandle>;
    /// Point in time state of the job. Unknown handles are reported as `Pending`.
    async fn query_state(&self, handle: &JobHandle) -> anyhow::Result<JobState>;
    /// Revokes the job if it has not started yet, otherwise does nothing
    async fn request_cancel(&self, handle: &JobHandle) -> anyhow::Result<()>;
    /// Atomically moves up to `limit` jobs into `Running`: pending jobs due at `now`
    /// and running jobs whose claim has expired
    async fn claim_due(&self, now: DateTime<Utc>, limit: usize)
        -> anyhow::Result<Vec<ScheduledJob>>;
    /// Records the outcome of a claimed job
    async fn finish(&self, handle: &JobHandle, outcome: JobState) -> anyhow::Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use remindme_domain::ID;
    use std::sync::Arc;

    async fn create_schedulers() -> Vec<Arc<dyn IJobScheduler>> {
        let mut schedulers: Vec<Arc<dyn IJobScheduler>> = vec![Arc::new(InMemoryJobScheduler::new())];
        if let Some(ctx) = crate::tests::postgres_context().await {
            schedulers.push(ctx.job_scheduler);
        }
        schedulers
    }

    fn job(reminder_id: i64) -> SendReminderJob {
        SendReminderJob {
            account_id: ID::from(1),
            reminder_id: ID::from(reminder_id),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 19, 10, 0, 0).unwrap()
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn job_lifecycle() {
        for scheduler in create_schedulers().await {
            let run_at = now() + Duration::minutes(5);
            let handle = scheduler.schedule(job(1), run_at).await.unwrap();
            assert_eq!(scheduler.query_state(&handle).await.unwrap(), JobState::Pending);

            // Not due yet
            let claimed = scheduler.claim_due(now(), 10).await.unwrap();
            assert!(claimed.iter().all(|j| j.handle != handle));

            let claimed = scheduler.claim_due(run_at, 10).await.unwrap();
            let claimed = claimed
                .into_iter()
                .find(|j| j.handle == handle)
                .expect("Job to be claimed");
            assert_eq!(claimed.job, job(1));
            assert_eq!(scheduler.query_state(&handle).await.unwrap(), JobState::Running);

            // A running job cannot be claimed twice or revoked
            let claimed_again = scheduler.claim_due(run_at, 10).await.unwrap();
            assert!(claimed_again.iter().all(|j| j.handle != handle));
            scheduler.request_cancel(&handle).await.unwrap();
            assert_eq!(scheduler.query_state(&handle).await.unwrap(), JobState::Running);

            scheduler.finish(&handle, JobState::Succeeded).await.unwrap();
            assert_eq!(
                scheduler.query_state(&handle).await.unwrap(),
                JobState::Succeeded
            );
        }
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn expired_claims_are_claimed_again() {
        for scheduler in create_schedulers().await {
            let run_at = now() + Duration::minutes(20);
            let handle = scheduler.schedule(job(5), run_at).await.unwrap();
            let claimed = scheduler.claim_due(run_at, 10).await.unwrap();
            assert!(claimed.iter().any(|j| j.handle == handle));

            let within_lease = run_at + Duration::seconds(CLAIM_LEASE_SECS - 1);
            let claimed = scheduler.claim_due(within_lease, 10).await.unwrap();
            assert!(claimed.iter().all(|j| j.handle != handle));

            let expired = run_at + Duration::seconds(CLAIM_LEASE_SECS);
            let claimed = scheduler.claim_due(expired, 10).await.unwrap();
            assert!(claimed.iter().any(|j| j.handle == handle));
            assert_eq!(scheduler.query_state(&handle).await.unwrap(), JobState::Running);

            // The new claim starts a new lease
            let claimed = scheduler
                .claim_due(expired + Duration::seconds(1), 10)
                .await
                .unwrap();
            assert!(claimed.iter().all(|j| j.handle != handle));

            // Finished jobs are never claimed again
            scheduler.finish(&handle, JobState::Succeeded).await.unwrap();
            let claimed = scheduler
                .claim_due(expired + Duration::days(1), 10)
                .await
                .unwrap();
            assert!(claimed.iter().all(|j| j.handle != handle));
        }
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn revoked_jobs_never_run() {
        for scheduler in create_schedulers().await {
            let handle = scheduler.schedule(job(2), now()).await.unwrap();
            scheduler.request_cancel(&handle).await.unwrap();
            assert_eq!(scheduler.query_state(&handle).await.unwrap(), JobState::Revoked);

            let claimed = scheduler.claim_due(now(), 10).await.unwrap();
            assert!(claimed.iter().all(|j| j.handle != handle));
        }
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn unknown_handles_are_pending() {
        for scheduler in create_schedulers().await {
            let handle = JobHandle::generate();
            assert_eq!(scheduler.query_state(&handle).await.unwrap(), JobState::Pending);
            assert!(scheduler.request_cancel(&handle).await.is_ok());
        }
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn claims_respect_limit_and_order() {
        let scheduler = InMemoryJobScheduler::new();
        let late = scheduler.schedule(job(3), now()).await.unwrap();
        let early = scheduler
            .schedule(job(4), now() - Duration::minutes(1))
            .await
            .unwrap();

        let claimed = scheduler.claim_due(now(), 1).await.unwrap();
        assert_eq!(claimed.len(), 1);
        assert_eq!(claimed[0].handle, early);

        let claimed = scheduler.claim_due(now(), 1).await.unwrap();
        assert_eq!(claimed[0].handle, late);
    }
}
