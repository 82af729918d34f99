mod base;
mod reminder;
mod status;

pub(crate) use base::BaseClient;
pub use base::{APIError, APIResponse};
use reminder::ReminderClient;
pub use reminder::{CreateReminderInput, DeleteReminderInput, ListRemindersInput};
pub use remindme_api_structs::APIErrorResponse;
pub use remindme_domain::{ReminderStatus, ID};
use status::StatusClient;
use std::sync::Arc;

// Domain
pub use remindme_api_structs::dtos::ReminderDTO as Reminder;

/// Remindme SDK
///
/// The SDK contains methods for interacting with the Remindme server
/// API.
#[derive(Clone)]
pub struct RemindmeSDK {
    pub reminder: ReminderClient,
    pub status: StatusClient,
}

impl RemindmeSDK {
    pub fn new(address: String) -> Self {
        let base = Arc::new(BaseClient::new(address));
        let reminder = ReminderClient::new(base.clone());
        let status = StatusClient::new(base);

        Self { reminder, status }
    }
}
