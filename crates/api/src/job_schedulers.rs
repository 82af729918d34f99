use crate::{reminder::send_reminder::SendReminderUseCase, shared::usecase::execute};
use actix_web::rt::time::interval;
use futures::future::join_all;
use remindme_domain::{JobState, ScheduledJob};
use remindme_infra::RemindmeContext;
use std::time::Duration;
use tracing::{error, info};

pub fn start_send_reminders_job(ctx: RemindmeContext) {
    actix_web::rt::spawn(async move {
        let mut interval = interval(Duration::from_millis(ctx.config.job_poll_interval_millis));
        loop {
            interval.tick().await;
            run_due_jobs(&ctx).await;
        }
    });
}

/// Claims the jobs that are due and runs them. Returns the number of jobs that were run.
pub async fn run_due_jobs(ctx: &RemindmeContext) -> usize {
    let now = ctx.sys.get_timestamp();
    let jobs = match ctx
        .job_scheduler
        .claim_due(now, ctx.config.job_batch_size.max(1))
        .await
    {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Unable to claim due jobs: {:?}", e);
            return 0;
        }
    };
    if jobs.is_empty() {
        return 0;
    }

    info!("Running {} due jobs", jobs.len());
    let count = jobs.len();
    join_all(jobs.into_iter().map(|job| run_job(job, ctx))).await;
    count
}

async fn run_job(job: ScheduledJob, ctx: &RemindmeContext) {
    let usecase = SendReminderUseCase {
        account_id: job.job.account_id,
        reminder_id: job.job.reminder_id,
    };
    let outcome = match execute(usecase, ctx).await {
        Ok(_) => JobState::Succeeded,
        Err(_) => JobState::Failed,
    };

    if let Err(e) = ctx.job_scheduler.finish(&job.handle, outcome).await {
        error!(
            "Unable to record outcome: {:?} of job: {}. Error: {:?}",
            outcome, job.handle, e
        );
    }
}
