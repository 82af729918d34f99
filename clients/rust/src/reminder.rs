use crate::{APIResponse, BaseClient, ID};
use chrono::{DateTime, Utc};
use remindme_api_structs::*;
use remindme_domain::REMINDER_TIME_FORMAT;
use reqwest::StatusCode;
use std::sync::Arc;

#[derive(Clone)]
pub struct ReminderClient {
    base: Arc<BaseClient>,
}

pub struct CreateReminderInput {
    pub user_id: ID,
    pub message: String,
    pub reminder_time: DateTime<Utc>,
}

pub struct DeleteReminderInput {
    pub user_id: ID,
    pub reminder_id: ID,
}

/// Paging arguments that are not set fall back to the server defaults
#[derive(Default)]
pub struct ListRemindersInput {
    pub user_id: Option<ID>,
    pub per_page: Option<i64>,
    pub page: Option<i64>,
    pub sort_by: Option<String>,
}

impl ReminderClient {
    pub(crate) fn new(base: Arc<BaseClient>) -> Self {
        Self { base }
    }

    pub async fn list(
        &self,
        input: ListRemindersInput,
    ) -> APIResponse<list_reminders::APIResponse> {
        let defaults = list_reminders::QueryParams::default();
        let query = list_reminders::QueryParams {
            user_id: input.user_id.unwrap_or(defaults.user_id),
            per_page: input.per_page.unwrap_or(defaults.per_page),
            page: input.page.unwrap_or(defaults.page),
            sort_by: input.sort_by.unwrap_or(defaults.sort_by),
        };
        self.base
            .get_with_query("reminders", &query, StatusCode::OK)
            .await
    }

    pub async fn create(
        &self,
        input: CreateReminderInput,
    ) -> APIResponse<create_reminder::APIResponse> {
        let body = create_reminder::RequestBody {
            user_id: input.user_id,
            message: input.message,
            reminder_time: input.reminder_time.format(REMINDER_TIME_FORMAT).to_string(),
        };
        self.base
            .post(body, "reminders/create", StatusCode::CREATED)
            .await
    }

    pub async fn delete(
        &self,
        input: DeleteReminderInput,
    ) -> APIResponse<delete_reminder::APIResponse> {
        let body = delete_reminder::RequestBody {
            user_id: input.user_id,
            record_id: input.reminder_id,
        };
        self.base
            .post(body, "reminders/delete", StatusCode::OK)
            .await
    }
}
