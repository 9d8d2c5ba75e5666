use anyhow::Context;

use mockrest_api::app::{build_app, services};
use mockrest_api::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::from_env(std::env::args().skip(1)).context("invalid configuration")?;
    mockrest_observability::init(config.log_format);

    let services = services::build_services(&config)
        .with_context(|| format!("failed to open datastore {}", config.db_path.display()))?;
    let app = build_app(services);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        service = %config.service,
        addr = %listener.local_addr()?,
        db = %config.db_path.display(),
        "JSON server is running"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
