mod inmemory;
mod postgres;

use crate::repos::shared::repo::{IRecordRepo, StoreError};
use chrono::{DateTime, Utc};
pub use inmemory::InMemoryReminderRepo;
pub use postgres::PostgresReminderRepo;
use remindme_domain::{Reminder, ID};

#[async_trait::async_trait]
pub trait IReminderRepo: IRecordRepo<Reminder> {
    /// Soft deletes the active `Reminder` only if it has not been sent yet.
    /// Fails with `Conflict` if it was sent and `NotFound` if it is gone.
    async fn cancel_unsent(
        &self,
        id: &ID,
        owner_id: &ID,
        timestamp: DateTime<Utc>,
    ) -> Result<Reminder, StoreError>;
}

#[cfg(test)]
mod tests {
    use crate::repos::shared::repo::StoreError;
    use crate::RemindmeContext;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use remindme_domain::{
        JobHandle, NewAccount, NewReminder, PageQuery, Reminder, ReminderChanges,
        ReminderStatus, ID,
    };

    async fn create_contexts() -> Vec<RemindmeContext> {
        let mut contexts = vec![RemindmeContext::create_inmemory()];
        if let Some(ctx) = crate::tests::postgres_context().await {
            contexts.push(ctx);
        }
        contexts
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 4, 19, 10, 0, 0).unwrap()
    }

    async fn insert_account(ctx: &RemindmeContext) -> ID {
        ctx.repos
            .accounts
            .insert(
                &ID::from(1),
                NewAccount {
                    full_name: "Jane Doe".into(),
                },
                now(),
            )
            .await
            .expect("To insert account")
    }

    async fn insert_reminder(ctx: &RemindmeContext, account_id: &ID, message: &str) -> ID {
        let reminder = NewReminder::new(message.into(), now() + Duration::hours(1)).unwrap();
        ctx.repos
            .reminders
            .insert(account_id, reminder, now())
            .await
            .expect("To insert reminder")
    }

    #[tokio::test]
    async fn insert_requires_active_owner() {
        for ctx in create_contexts().await {
            let missing = ID::from(i64::MAX);
            let reminder = NewReminder::new("Pay rent".into(), now()).unwrap();
            let res = ctx.repos.reminders.insert(&missing, reminder, now()).await;
            assert!(matches!(res, Err(StoreError::NotFound)));
            assert!(ctx.repos.reminders.find_active(&missing).await.unwrap().is_empty());

            let account_id = insert_account(&ctx).await;
            ctx.repos
                .accounts
                .soft_delete(&account_id, &account_id, now())
                .await
                .unwrap();
            let reminder = NewReminder::new("Pay rent".into(), now()).unwrap();
            let res = ctx.repos.reminders.insert(&account_id, reminder, now()).await;
            assert!(matches!(res, Err(StoreError::NotFound)));
        }
    }

    #[tokio::test]
    async fn crud_with_soft_delete() {
        for ctx in create_contexts().await {
            let account_id = insert_account(&ctx).await;
            let id = insert_reminder(&ctx, &account_id, "Pay rent").await;

            let reminder = ctx
                .repos
                .reminders
                .find_by_id(&account_id, &id)
                .await
                .unwrap()
                .expect("To find reminder");
            assert_eq!(reminder.message, "Pay rent");
            assert_eq!(reminder.status(), ReminderStatus::Created);
            assert_eq!(reminder.notification_job, None);
            assert_eq!(reminder.meta.created_on, now());

            // Other owners cannot see it
            let other_account = insert_account(&ctx).await;
            assert!(ctx
                .repos
                .reminders
                .find_by_id(&other_account, &id)
                .await
                .unwrap()
                .is_none());

            let later = now() + Duration::minutes(1);
            let updated = ctx
                .repos
                .reminders
                .update(
                    &id,
                    &account_id,
                    ReminderChanges::notification_job(JobHandle::from("job-abc")),
                    later,
                )
                .await
                .unwrap();
            assert_eq!(updated.notification_job, Some(JobHandle::from("job-abc")));
            assert_eq!(updated.meta.updated_on, later);

            let deleted = ctx
                .repos
                .reminders
                .soft_delete(&id, &account_id, later)
                .await
                .unwrap();
            assert_eq!(deleted.meta.deleted_on, Some(later));
            assert_eq!(deleted.status(), ReminderStatus::Deleted);

            assert!(ctx
                .repos
                .reminders
                .find_by_id(&account_id, &id)
                .await
                .unwrap()
                .is_none());
            assert!(ctx
                .repos
                .reminders
                .find_active(&account_id)
                .await
                .unwrap()
                .is_empty());
            let res = ctx
                .repos
                .reminders
                .soft_delete(&id, &account_id, later + Duration::minutes(1))
                .await;
            assert!(matches!(res, Err(StoreError::NotFound)));
        }
    }

    #[tokio::test]
    async fn find_page_orders_and_pages() {
        for ctx in create_contexts().await {
            let account_id = insert_account(&ctx).await;
            let first = insert_reminder(&ctx, &account_id, "b").await;
            let second = insert_reminder(&ctx, &account_id, "c").await;
            let third = insert_reminder(&ctx, &account_id, "a").await;
            ctx.repos
                .reminders
                .soft_delete(&second, &account_id, now())
                .await
                .unwrap();

            let query = PageQuery::new::<Reminder>(100, 0, "id").unwrap();
            let page = ctx.repos.reminders.find_page(&account_id, &query).await.unwrap();
            // Deleted reminders are still listed
            assert_eq!(
                page.iter().map(|r| r.id).collect::<Vec<_>>(),
                vec![first, second, third]
            );

            let query = PageQuery::new::<Reminder>(2, 0, "-message").unwrap();
            let page = ctx.repos.reminders.find_page(&account_id, &query).await.unwrap();
            assert_eq!(
                page.iter().map(|r| r.id).collect::<Vec<_>>(),
                vec![second, first]
            );
            let query = PageQuery::new::<Reminder>(2, 1, "-message").unwrap();
            let page = ctx.repos.reminders.find_page(&account_id, &query).await.unwrap();
            assert_eq!(page.iter().map(|r| r.id).collect::<Vec<_>>(), vec![third]);

            let query = PageQuery::new::<Reminder>(2, 2, "-message").unwrap();
            assert!(ctx
                .repos
                .reminders
                .find_page(&account_id, &query)
                .await
                .unwrap()
                .is_empty());
        }
    }

    #[tokio::test]
    async fn cancel_unsent_does_not_delete_sent_reminders() {
        for ctx in create_contexts().await {
            let account_id = insert_account(&ctx).await;
            let id = insert_reminder(&ctx, &account_id, "Pay rent").await;
            ctx.repos
                .reminders
                .update(&id, &account_id, ReminderChanges::sent(), now())
                .await
                .unwrap();

            let res = ctx.repos.reminders.cancel_unsent(&id, &account_id, now()).await;
            assert!(matches!(res, Err(StoreError::Conflict)));
            let reminder = ctx
                .repos
                .reminders
                .find_by_id(&account_id, &id)
                .await
                .unwrap()
                .unwrap();
            assert_eq!(reminder.status(), ReminderStatus::Sent);
            assert!(reminder.meta.deleted_on.is_none());

            let id = insert_reminder(&ctx, &account_id, "Call mom").await;
            let cancelled = ctx
                .repos
                .reminders
                .cancel_unsent(&id, &account_id, now())
                .await
                .unwrap();
            assert_eq!(cancelled.status(), ReminderStatus::Deleted);
            let res = ctx.repos.reminders.cancel_unsent(&id, &account_id, now()).await;
            assert!(matches!(res, Err(StoreError::NotFound)));
        }
    }
}
