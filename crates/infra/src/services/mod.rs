mod job_scheduler;
mod notifier;

pub use job_scheduler::{
    IJobScheduler, InMemoryJobScheduler, PostgresJobScheduler, CLAIM_LEASE_SECS,
};
pub use notifier::{INotifier, LogNotifier, WebhookNotifier};
