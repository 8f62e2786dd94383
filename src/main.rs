use frontend::AppContext;
use frontend::api::diagnostics;
use frontend::config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env().expect("Failed to load configuration");
    config.log_server_info();

    let context = AppContext::bootstrap(config)
        .await
        .expect("Failed to initialise client");

    let info = context.config.environment_info();
    tracing::info!(
        base_url = %info.base_url,
        is_development = info.is_development,
        is_production = info.is_production,
        "API environment"
    );
    match context.client.auth().claims().await {
        Some(claims) => tracing::info!(
            subject = ?claims.sub,
            expires_at = ?claims.expires_at(),
            expired = claims.is_expired(chrono::Utc::now()),
            "Stored session"
        ),
        None if context.client.auth().is_signed_in().await => {
            tracing::info!("Stored session with opaque token")
        }
        None => tracing::info!("No stored session"),
    }

    let results = diagnostics::run_all(&context.client).await;
    let passed = results.iter().filter(|result| result.success).count();
    for result in &results {
        match &result.error {
            None => tracing::info!(
                endpoint = %result.endpoint,
                elapsed_ms = result.response_time.as_millis() as u64,
                "Probe passed"
            ),
            Some(error) => tracing::warn!(
                endpoint = %result.endpoint,
                elapsed_ms = result.response_time.as_millis() as u64,
                "Probe failed: {}",
                error
            ),
        }
    }
    tracing::info!("{}/{} probes passed", passed, results.len());

    if passed < results.len() {
        std::process::exit(1);
    }
}
