mod config;
mod repos;
mod services;
mod system;

pub use config::Config;
pub use repos::{IRecordRepo, IReminderRepo, Repos, StoreError};
pub use services::*;
use sqlx::migrate::MigrateError;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
pub use system::ISys;
use system::RealSys;
use tracing::{info, warn};

#[derive(Clone)]
pub struct RemindmeContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub job_scheduler: Arc<dyn IJobScheduler>,
    pub notifier: Arc<dyn INotifier>,
}

impl RemindmeContext {
    fn create_postgres(pool: PgPool) -> Self {
        let config = Config::new();
        Self {
            repos: Repos::create_postgres(pool.clone()),
            job_scheduler: Arc::new(PostgresJobScheduler::new(pool)),
            notifier: create_notifier(&config),
            config,
            sys: Arc::new(RealSys {}),
        }
    }

    /// Context without any external storage. Everything is lost on restart.
    pub fn create_inmemory() -> Self {
        let sys = RealSys {};
        let config = Config::new();
        Self {
            repos: Repos::create_inmemory(sys.get_timestamp()),
            job_scheduler: Arc::new(InMemoryJobScheduler::new()),
            notifier: create_notifier(&config),
            config,
            sys: Arc::new(sys),
        }
    }
}

fn create_notifier(config: &Config) -> Arc<dyn INotifier> {
    match &config.notification_webhook_url {
        Some(url) => Arc::new(WebhookNotifier::new(url.clone())),
        None => Arc::new(LogNotifier {}),
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context() -> anyhow::Result<RemindmeContext> {
    match get_psql_connection_string() {
        Some(connection_string) => {
            info!("DATABASE_URL is set, using postgres for storage");
            let pool = connect_and_migrate(&connection_string).await?;
            Ok(RemindmeContext::create_postgres(pool))
        }
        None => {
            warn!("DATABASE_URL env var is not set, falling back to inmemory storage. Nothing will be persisted.");
            Ok(RemindmeContext::create_inmemory())
        }
    }
}

fn get_psql_connection_string() -> Option<String> {
    const PSQL_CONNECTION_STRING: &str = "DATABASE_URL";

    std::env::var(PSQL_CONNECTION_STRING).ok()
}

async fn connect_and_migrate(connection_string: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(connection_string)
        .await?;
    run_migration(&pool).await?;
    Ok(pool)
}

pub async fn run_migration(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!().run(pool).await
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Postgres backed context, only available when `DATABASE_URL` is set
    pub async fn postgres_context() -> Option<RemindmeContext> {
        let connection_string = get_psql_connection_string()?;
        let pool = connect_and_migrate(&connection_string)
            .await
            .expect("To connect to postgres and run migrations");
        Some(RemindmeContext::create_postgres(pool))
    }
}
