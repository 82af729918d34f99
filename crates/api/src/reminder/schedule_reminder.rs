use super::attach_job_reference::{self, AttachJobReferenceUseCase};
use crate::error::RemindmeError;
use crate::shared::usecase::{execute, UseCase};
use remindme_domain::{Reminder, SendReminderJob, ID};
use remindme_infra::RemindmeContext;
use tracing::{error, warn};

/// Schedules the delivery of a stored `Reminder` at its reminder time and
/// records the handle of the scheduled job on it.
#[derive(Debug)]
pub struct ScheduleReminderUseCase {
    pub reminder: Reminder,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    SchedulerError,
    StorageError,
}

impl From<attach_job_reference::UseCaseError> for UseCaseError {
    fn from(e: attach_job_reference::UseCaseError) -> Self {
        match e {
            attach_job_reference::UseCaseError::NotFound(id) => Self::NotFound(id),
            attach_job_reference::UseCaseError::StorageError => Self::StorageError,
        }
    }
}

impl From<UseCaseError> for RemindmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::SchedulerError | UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleReminder";

    async fn execute(&mut self, ctx: &RemindmeContext) -> Result<Self::Response, Self::Error> {
        let job = SendReminderJob {
            account_id: self.reminder.account_id,
            reminder_id: self.reminder.id,
        };
        let handle = ctx
            .job_scheduler
            .schedule(job, self.reminder.reminder_time)
            .await
            .map_err(|e| {
                error!(
                    "Unable to schedule delivery of reminder: {}. Error: {:?}",
                    self.reminder.id, e
                );
                UseCaseError::SchedulerError
            })?;

        let attach_job_reference = AttachJobReferenceUseCase {
            reminder_id: self.reminder.id,
            account_id: self.reminder.account_id,
            handle: handle.clone(),
        };
        match execute(attach_job_reference, ctx).await {
            Ok(reminder) => Ok(reminder),
            Err(e) => {
                // Nobody can cancel the job without the stored handle
                if let Err(cancel_err) = ctx.job_scheduler.request_cancel(&handle).await {
                    warn!(
                        "Unable to revoke orphaned job: {}. Error: {:?}",
                        handle, cancel_err
                    );
                }
                Err(e.into())
            }
        }
    }
}
