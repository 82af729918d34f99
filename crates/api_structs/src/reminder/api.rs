use crate::dtos::ReminderDTO;
use crate::shared::api::STATUS_OK;
use remindme_domain::{Reminder, ID};
use serde::{Deserialize, Serialize};

/// Account used when a request does not name one
fn default_user_id() -> ID {
    ID::from(1)
}

pub mod list_reminders {
    use super::*;

    fn default_per_page() -> i64 {
        100
    }

    fn default_sort_by() -> String {
        "id".into()
    }

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct QueryParams {
        #[serde(default = "default_user_id")]
        pub user_id: ID,
        #[serde(default = "default_per_page")]
        pub per_page: i64,
        #[serde(default)]
        pub page: i64,
        #[serde(default = "default_sort_by")]
        pub sort_by: String,
    }

    impl Default for QueryParams {
        fn default() -> Self {
            Self {
                user_id: default_user_id(),
                per_page: default_per_page(),
                page: 0,
                sort_by: default_sort_by(),
            }
        }
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub status: String,
        pub data: Vec<ReminderDTO>,
    }

    impl APIResponse {
        pub fn new(reminders: Vec<Reminder>) -> Self {
            Self {
                status: STATUS_OK.into(),
                data: reminders.into_iter().map(ReminderDTO::new).collect(),
            }
        }
    }
}

pub mod create_reminder {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default = "default_user_id", alias = "user_id")]
        pub user_id: ID,
        pub message: String,
        /// Formatted as `remindme_domain::REMINDER_TIME_FORMAT`
        pub reminder_time: String,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub status: String,
        pub message: String,
        pub reminder_id: ID,
    }

    impl APIResponse {
        pub fn new(reminder: Reminder) -> Self {
            Self {
                status: STATUS_OK.into(),
                message: "Reminder created successfully!".into(),
                reminder_id: reminder.id,
            }
        }
    }
}

pub mod delete_reminder {
    use super::*;

    #[derive(Serialize, Deserialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        #[serde(default = "default_user_id", alias = "user_id")]
        pub user_id: ID,
        #[serde(alias = "record_id")]
        pub record_id: ID,
    }

    #[derive(Deserialize, Serialize, Debug)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub status: String,
        pub message: String,
    }

    impl APIResponse {
        pub fn new() -> Self {
            Self {
                status: STATUS_OK.into(),
                message: "Reminder deleted successfully!".into(),
            }
        }
    }

    impl Default for APIResponse {
        fn default() -> Self {
            Self::new()
        }
    }
}
