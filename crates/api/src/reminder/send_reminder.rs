use super::mark_reminder_sent::MarkReminderSentUseCase;
use crate::shared::usecase::{execute, UseCase};
use remindme_domain::{Reminder, ID};
use remindme_infra::{RemindmeContext};
use tracing::{error, info};

/// Runs when the delivery job of a `Reminder` fires. Cancelled reminders are skipped.
#[derive(Debug)]
pub struct SendReminderUseCase {
    pub account_id: ID,
    pub reminder_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    NotificationFailed(ID),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for SendReminderUseCase {
    /// The sent `Reminder`, `None` if there was nothing to send
    type Response = Option<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "SendReminder";

    async fn execute(&mut self, ctx: &RemindmeContext) -> Result<Self::Response, Self::Error> {
        let reminder = ctx
            .repos
            .reminders
            .find_by_id(&self.account_id, &self.reminder_id)
            .await
            .map_err(|_| UseCaseError::StorageError)?;
        let reminder = match reminder {
            Some(reminder) => reminder,
            None => {
                info!("Reminder: {} was cancelled, skipping it", self.reminder_id);
                return Ok(None);
            }
        };

        if !reminder.is_sent {
            ctx.notifier.notify(&reminder).await.map_err(|e| {
                error!("Unable to deliver reminder: {}. Error: {:?}", reminder.id, e);
                UseCaseError::NotificationFailed(reminder.id)
            })?;
        }

        let mark_reminder_sent = MarkReminderSentUseCase {
            reminder_id: reminder.id,
            account_id: reminder.account_id,
        };
        execute(mark_reminder_sent, ctx)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}
