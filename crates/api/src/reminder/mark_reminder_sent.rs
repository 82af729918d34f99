use crate::shared::usecase::UseCase;
use remindme_domain::{Reminder, ReminderChanges, ID};
use remindme_infra::{RemindmeContext, StoreError};
use tracing::info;

/// Flags the `Reminder` as sent. Returns `None` when it was cancelled in the meantime,
/// in which case nothing is changed.
#[derive(Debug)]
pub struct MarkReminderSentUseCase {
    pub reminder_id: ID,
    pub account_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for MarkReminderSentUseCase {
    type Response = Option<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "MarkReminderSent";

    async fn execute(&mut self, ctx: &RemindmeContext) -> Result<Self::Response, Self::Error> {
        let res = ctx
            .repos
            .reminders
            .update(
                &self.reminder_id,
                &self.account_id,
                ReminderChanges::sent(),
                ctx.sys.get_timestamp(),
            )
            .await;

        match res {
            Ok(reminder) => Ok(Some(reminder)),
            Err(StoreError::NotFound) => {
                info!(
                    "Reminder: {} was cancelled before it could be marked as sent",
                    self.reminder_id
                );
                Ok(None)
            }
            Err(_) => Err(UseCaseError::StorageError),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use crate::shared::test_utils::{default_account, setup_context, start_time};
    use crate::shared::usecase::execute;
    use remindme_domain::ReminderStatus;

    async fn create_reminder(ctx: &RemindmeContext) -> Reminder {
        execute(
            CreateReminderUseCase {
                account_id: default_account(),
                message: "Pay rent".into(),
                reminder_time: start_time(),
            },
            ctx,
        )
        .await
        .unwrap()
    }

    fn mark_sent(reminder: &Reminder) -> MarkReminderSentUseCase {
        MarkReminderSentUseCase {
            reminder_id: reminder.id,
            account_id: reminder.account_id,
        }
    }

    #[actix_web::main]
    #[test]
    async fn marking_sent_is_idempotent() {
        let ctx = setup_context();
        let reminder = create_reminder(&ctx).await;

        for _ in 0..2 {
            let sent = execute(mark_sent(&reminder), &ctx)
                .await
                .unwrap()
                .expect("Reminder to be marked");
            assert_eq!(sent.status(), ReminderStatus::Sent);
        }
    }

    #[actix_web::main]
    #[test]
    async fn cancelled_reminders_stay_deleted() {
        let ctx = setup_context();
        let reminder = create_reminder(&ctx).await;
        ctx.repos
            .reminders
            .soft_delete(&reminder.id, &default_account(), start_time())
            .await
            .unwrap();

        let res = execute(mark_sent(&reminder), &ctx).await.unwrap();
        assert!(res.is_none());

        let reminders = ctx.repos.reminders.find_active(&default_account()).await.unwrap();
        assert!(reminders.is_empty());
    }
}
