use anyhow::Context;
use dotenv::dotenv;
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use shared_lib::env_utils::AppConfig;
use web_service::{get_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::debug!("initializing app state ...");

    let config = AppConfig::from_env().context("failed to load configuration")?;
    let state = AppState::from_config(&config);

    let addr = format!("[::]:{}", config.port)
        .parse::<std::net::SocketAddr>()
        .context("unable to parse address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("unable to bind {addr}"))?;

    tracing::info!("Server running at http://localhost:{}", config.port);

    axum::serve(listener, get_app(state, &config.allowed_origins))
        .await
        .context("error while starting API server")?;

    Ok(())
}
