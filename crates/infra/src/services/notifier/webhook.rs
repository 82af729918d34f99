use super::INotifier;
use chrono::{DateTime, Utc};
use remindme_domain::{Reminder, ID};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReminderWebhookPayload<'a> {
    reminder_id: ID,
    account_id: ID,
    message: &'a str,
    reminder_time: DateTime<Utc>,
}

/// Posts due reminders as JSON to a fixed url
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
        }
    }
}

#[async_trait::async_trait]
impl INotifier for WebhookNotifier {
    async fn notify(&self, reminder: &Reminder) -> anyhow::Result<()> {
        let payload = ReminderWebhookPayload {
            reminder_id: reminder.id,
            account_id: reminder.account_id,
            message: &reminder.message,
            reminder_time: reminder.reminder_time,
        };
        self.client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .and_then(|res| res.error_for_status())
            .map_err(|e| {
                error!(
                    "Error informing webhook: {} of reminder: {}. Error: {:?}",
                    self.url, reminder.id, e
                );
                e
            })?;
        Ok(())
    }
}
