use anyhow::Context;

use barstock_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    barstock_observability::init_with(config.log.format, &config.log.filter);

    let app = barstock_api::app::build_app(&config).await?;

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let local_addr = listener.local_addr()?;
    tracing::info!(
        backend = ?config.storage.backend,
        primary_location = %config.locations.primary,
        "listening on {local_addr}"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
