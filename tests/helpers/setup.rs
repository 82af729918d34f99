use remindme_api::Application;
use remindme_infra::{Config, RemindmeContext};
use remindme_sdk::RemindmeSDK;

pub struct TestApp {
    pub config: Config,
}

// Launch the application as a background task
pub async fn spawn_app() -> (TestApp, RemindmeSDK, String) {
    let mut ctx = RemindmeContext::create_inmemory();
    ctx.config.port = 0; // Random port
    ctx.config.job_poll_interval_millis = 50;

    let config = ctx.config.clone();
    let application = Application::new(ctx)
        .await
        .expect("Failed to build application.");

    let address = format!("http://localhost:{}", application.port());
    let _ = actix_web::rt::spawn(async move {
        application
            .start()
            .await
            .expect("Expected application to start");
    });

    let app = TestApp { config };
    let sdk = RemindmeSDK::new(address.clone());
    (app, sdk, address)
}
