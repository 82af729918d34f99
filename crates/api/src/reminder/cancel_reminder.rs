use crate::error::RemindmeError;
use crate::shared::usecase::{execute, Subscriber, UseCase};
use actix_web::{web, HttpResponse};
use remindme_api_structs::delete_reminder::*;
use remindme_domain::{JobState, Reminder, ID};
use remindme_infra::{RemindmeContext, StoreError};
use tracing::{error, warn};

pub async fn cancel_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindmeContext>,
) -> Result<HttpResponse, RemindmeError> {
    let usecase = CancelReminderUseCase {
        reminder_id: body.record_id,
        account_id: body.user_id,
    };

    execute(usecase, &ctx)
        .await
        .map(|_| HttpResponse::Ok().json(APIResponse::new()))
        .map_err(RemindmeError::from)
}

/// Cancels a `Reminder` that has not been delivered yet by soft deleting it
/// and revoking its delivery job.
#[derive(Debug)]
pub struct CancelReminderUseCase {
    pub reminder_id: ID,
    pub account_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    AlreadyCompleted(ID),
    InProgress(ID),
    SchedulerError,
    StorageError,
}

impl From<UseCaseError> for RemindmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::NotFound(reminder_id) => Self::NotFound(format!(
                "The reminder with id: {}, was not found.",
                reminder_id
            )),
            UseCaseError::AlreadyCompleted(reminder_id) => Self::ReminderComplete(format!(
                "The reminder with id: {}, has already been sent.",
                reminder_id
            )),
            UseCaseError::InProgress(reminder_id) => Self::ReminderInProgress(format!(
                "The reminder with id: {}, is being sent right now.",
                reminder_id
            )),
            UseCaseError::SchedulerError | UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CancelReminderUseCase {
    /// The cancelled `Reminder`
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CancelReminder";

    async fn execute(&mut self, ctx: &RemindmeContext) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find_by_id(&self.account_id, &self.reminder_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .ok_or(UseCaseError::NotFound(self.reminder_id))?;
        if reminder.is_sent {
            return Err(UseCaseError::AlreadyCompleted(reminder.id));
        }

        let job_state = match &reminder.notification_job {
            Some(handle) => ctx.job_scheduler.query_state(handle).await.map_err(|e| {
                error!("Unable to query job: {}. Error: {:?}", handle, e);
                UseCaseError::SchedulerError
            })?,
            // Not scheduled yet
            None => JobState::Pending,
        };
        if job_state.is_completed() {
            return Err(UseCaseError::AlreadyCompleted(reminder.id));
        }
        if job_state == JobState::Running {
            return Err(UseCaseError::InProgress(reminder.id));
        }

        ctx.repos
            .reminders
            .cancel_unsent(&reminder.id, &self.account_id, ctx.sys.get_timestamp())
            .await
            .map_err(|e| match e {
                StoreError::NotFound => UseCaseError::NotFound(self.reminder_id),
                // Delivered after the job state was read
                StoreError::Conflict => UseCaseError::AlreadyCompleted(self.reminder_id),
                StoreError::Persistence(_) => UseCaseError::StorageError,
            })
    }

    fn subscribers() -> Vec<Box<dyn Subscriber<Self>>> {
        vec![Box::new(RevokeJobOnReminderCancelled)]
    }
}

/// Best effort, the reminder is already cancelled and a delivery job that
/// still fires will skip it.
pub struct RevokeJobOnReminderCancelled;

#[async_trait::async_trait(?Send)]
impl Subscriber<CancelReminderUseCase> for RevokeJobOnReminderCancelled {
    async fn notify(&self, e: &Reminder, ctx: &RemindmeContext) {
        if let Some(handle) = &e.notification_job {
            if let Err(err) = ctx.job_scheduler.request_cancel(handle).await {
                warn!(
                    "Unable to revoke job: {} of cancelled reminder: {}. Error: {:?}",
                    handle, e.id, err
                );
            }
        }
    }
}
