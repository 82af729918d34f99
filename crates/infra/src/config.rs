use std::str::FromStr;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// How often the job runner polls for due jobs
    pub job_poll_interval_millis: u64,
    /// Maximum number of due jobs claimed per poll
    pub job_batch_size: usize,
    /// Url that due reminders are posted to. Reminders are only logged when this is missing.
    pub notification_webhook_url: Option<String>,
}

fn parse_env_or_default<T: FromStr>(key: &str, default: T) -> T
where
    T: std::fmt::Display,
{
    let value = match std::env::var(key) {
        Ok(value) => value,
        Err(_) => return default,
    };
    match value.parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            warn!(
                "The given {}: {} is not valid, falling back to the default value: {}.",
                key, value, default
            );
            default
        }
    }
}

/// Like `parse_env_or_default`, but 0 also falls back to the default
fn parse_non_zero_env_or_default<T>(key: &str, default: T) -> T
where
    T: FromStr + std::fmt::Display + PartialEq + Default + Copy,
{
    let value = parse_env_or_default(key, default);
    if value == T::default() {
        warn!(
            "{} can not be {}, falling back to the default value: {}.",
            key, value, default
        );
        return default;
    }
    value
}

impl Config {
    pub fn new() -> Self {
        let port = parse_env_or_default("PORT", 5000);
        let job_poll_interval_millis =
            parse_non_zero_env_or_default("JOB_POLL_INTERVAL_MILLIS", 1000);
        let job_batch_size = parse_non_zero_env_or_default("JOB_BATCH_SIZE", 50);
        let notification_webhook_url = match std::env::var("NOTIFICATION_WEBHOOK_URL") {
            Ok(url) if !url.trim().is_empty() => Some(url),
            _ => {
                info!("Did not find NOTIFICATION_WEBHOOK_URL environment variable. Due reminders will only be logged.");
                None
            }
        };

        Self {
            port,
            job_poll_interval_millis,
            job_batch_size,
            notification_webhook_url,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
