mod webhook;

use remindme_domain::Reminder;
use tracing::info;
pub use webhook::WebhookNotifier;

/// Delivers a due `Reminder` to its owner
#[async_trait::async_trait]
pub trait INotifier: Send + Sync {
    async fn notify(&self, reminder: &Reminder) -> anyhow::Result<()>;
}

/// Used when no delivery channel is configured. The reminder only shows up in the logs.
pub struct LogNotifier {}

#[async_trait::async_trait]
impl INotifier for LogNotifier {
    async fn notify(&self, reminder: &Reminder) -> anyhow::Result<()> {
        info!(
            reminder_id = %reminder.id,
            account_id = %reminder.account_id,
            "Reminder due: {}",
            reminder.message
        );
        Ok(())
    }
}
