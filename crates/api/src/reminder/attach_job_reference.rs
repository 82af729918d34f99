use crate::shared::usecase::UseCase;
use remindme_domain::{JobHandle, Reminder, ReminderChanges, ID};
use remindme_infra::{RemindmeContext, StoreError};

/// Stores the handle of the job that is going to deliver the `Reminder`
#[derive(Debug)]
pub struct AttachJobReferenceUseCase {
    pub reminder_id: ID,
    pub account_id: ID,
    pub handle: JobHandle,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotFound(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for AttachJobReferenceUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "AttachJobReference";

    async fn execute(&mut self, ctx: &RemindmeContext) -> Result<Self::Response, Self::Error> {
        ctx.repos
            .reminders
            .update(
                &self.reminder_id,
                &self.account_id,
                ReminderChanges::notification_job(self.handle.clone()),
                ctx.sys.get_timestamp(),
            )
            .await
            .map_err(|e| match e {
                StoreError::NotFound => UseCaseError::NotFound(self.reminder_id),
                _ => UseCaseError::StorageError,
            })
    }
}
