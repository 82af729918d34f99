use super::schedule_reminder::ScheduleReminderUseCase;
use crate::error::RemindmeError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::{DateTime, Utc};
use remindme_api_structs::create_reminder::*;
use remindme_domain::{parse_reminder_time, NewReminder, Record, RecordMeta, Reminder, ID};
use remindme_infra::{RemindmeContext, StoreError};

pub async fn create_reminder_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<RemindmeContext>,
) -> Result<HttpResponse, RemindmeError> {
    let body = body.0;
    let reminder_time = parse_reminder_time(&body.reminder_time)
        .map_err(|e| RemindmeError::BadClientData(e.to_string()))?;

    let usecase = CreateReminderUseCase {
        account_id: body.user_id,
        message: body.message,
        reminder_time,
    };
    let reminder = execute(usecase, &ctx).await.map_err(RemindmeError::from)?;

    let usecase = ScheduleReminderUseCase { reminder };
    execute(usecase, &ctx)
        .await
        .map(|reminder| HttpResponse::Created().json(APIResponse::new(reminder)))
        .map_err(RemindmeError::from)
}

/// Stores a new unsent `Reminder`. Scheduling its delivery is done by `ScheduleReminderUseCase`.
#[derive(Debug)]
pub struct CreateReminderUseCase {
    pub account_id: ID,
    pub message: String,
    pub reminder_time: DateTime<Utc>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseError {
    InvalidReminder(String),
    AccountNotFound(ID),
    StorageError,
}

impl From<UseCaseError> for RemindmeError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::InvalidReminder(msg) => Self::BadClientData(msg),
            UseCaseError::AccountNotFound(account_id) => Self::NotFound(format!(
                "The account with id: {}, was not found.",
                account_id
            )),
            UseCaseError::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateReminderUseCase {
    type Response = Reminder;

    type Error = UseCaseError;

    const NAME: &'static str = "CreateReminder";

    async fn execute(&mut self, ctx: &RemindmeContext) -> Result<Self::Response, Self::Error> {
        let fields = NewReminder::new(self.message.clone(), self.reminder_time)
            .map_err(|e| UseCaseError::InvalidReminder(e.to_string()))?;
        let now = ctx.sys.get_timestamp();

        let id = ctx
            .repos
            .reminders
            .insert(&self.account_id, fields.clone(), now)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => UseCaseError::AccountNotFound(self.account_id),
                _ => UseCaseError::StorageError,
            })?;

        Ok(Reminder::build(
            id,
            self.account_id,
            fields,
            RecordMeta::new(now),
        ))
    }
}
