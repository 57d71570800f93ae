use std::sync::Arc;

use tracing_subscriber::EnvFilter;

mod config;
mod error;
mod middleware;
mod routes;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        charts = config.charts.len(),
        concurrency = config.fetch.concurrency,
        timeout_secs = config.fetch_timeout.as_secs(),
        layout = %config.layout,
        "configuration loaded"
    );

    let http = briefhub_fetch::client::build_client(config.fetch_timeout)?;

    let state = AppState {
        http,
        config: Arc::new(config),
    };

    lambda_http::run(routes::router(state))
        .await
        .map_err(|e| eyre::eyre!(e))
}
