use crate::error::RemindmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use remindme_api_structs::list_reminders::*;
use remindme_domain::{PageQuery, Reminder, ID};
use remindme_infra::{RemindmeContext};

pub async fn list_reminders_controller(
    query: web::Query<QueryParams>,
    ctx: web::Data<RemindmeContext>,
) -> Result<HttpResponse, RemindmeError> {
    let query = query.0;
    let usecase = ListRemindersUseCase {
        account_id: query.user_id,
        per_page: query.per_page,
        page: query.page,
        sort_by: query.sort_by,
    };

    execute(usecase, &ctx)
        .await
        .map(|reminders| HttpResponse::Ok().json(APIResponse::new(reminders)))
        .map_err(RemindmeError::from)
}

/// Lists one page of the reminders of an `Account`, cancelled ones included
#[derive(Debug)]
pub struct ListRemindersUseCase {
    pub account_id: ID,
    pub per_page: i64,
    pub page: i64,
    /// Sortable field, prefixed with `-` for descending order
    pub sort_by: String,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidPageQuery(String),
    StorageError,
}

impl From<UseCaseError> for RemindmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidPageQuery(msg) => Self::BadClientData(msg),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for ListRemindersUseCase {
    type Response = Vec<Reminder>;

    type Error = UseCaseError;

    const NAME: &'static str = "ListReminders";

    async fn execute(&mut self, ctx: &RemindmeContext) -> Result<Self::Response, Self::Error> {
        let query = PageQuery::new::<Reminder>(self.per_page, self.page, &self.sort_by)
            .map_err(|e| UseCaseError::InvalidPageQuery(e.to_string()))?;

        ctx.repos
            .reminders
            .find_page(&self.account_id, &query)
            .await
            .map_err(|_| UseCaseError::StorageError)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::reminder::create_reminder::CreateReminderUseCase;
    use crate::shared::test_utils::{default_account, setup_context, start_time};
    use chrono::Duration;
    use remindme_domain::ReminderStatus;

    async fn create_reminder(ctx: &RemindmeContext, message: &str) -> Reminder {
        let usecase = CreateReminderUseCase {
            account_id: default_account(),
            message: message.into(),
            reminder_time: start_time() + Duration::hours(1),
        };
        execute(usecase, ctx).await.unwrap()
    }

    fn list(per_page: i64, page: i64, sort_by: &str) -> ListRemindersUseCase {
        ListRemindersUseCase {
            account_id: default_account(),
            per_page,
            page,
            sort_by: sort_by.into(),
        }
    }

    #[actix_web::main]
    #[test]
    async fn lists_reminders_with_status() {
        let ctx = setup_context();
        let first = create_reminder(&ctx, "Pay rent").await;
        let second = create_reminder(&ctx, "Call mom").await;
        ctx.repos
            .reminders
            .soft_delete(&second.id, &default_account(), start_time())
            .await
            .unwrap();

        let reminders = execute(list(100, 0, "id"), &ctx).await.unwrap();
        assert_eq!(reminders.len(), 2);
        assert_eq!(reminders[0].id, first.id);
        assert_eq!(reminders[0].status(), ReminderStatus::Created);
        assert_eq!(reminders[1].id, second.id);
        assert_eq!(reminders[1].status(), ReminderStatus::Deleted);
    }

    #[actix_web::main]
    #[test]
    async fn page_past_the_end_is_empty() {
        let ctx = setup_context();
        create_reminder(&ctx, "Pay rent").await;

        let reminders = execute(list(10, 3, "-reminder_time"), &ctx).await.unwrap();
        assert!(reminders.is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn other_accounts_see_nothing() {
        let ctx = setup_context();
        create_reminder(&ctx, "Pay rent").await;

        let mut usecase = list(100, 0, "id");
        usecase.account_id = ID::from(2);
        assert!(execute(usecase, &ctx).await.unwrap().is_empty());
    }

    #[actix_web::main]
    #[test]
    async fn rejects_invalid_page_queries() {
        let ctx = setup_context();
        for usecase in [list(0, 0, "id"), list(10, -1, "id"), list(10, 0, "password")] {
            let res = execute(usecase, &ctx).await;
            assert!(matches!(res, Err(UseCaseError::InvalidPageQuery(_))));
        }
    }
}
