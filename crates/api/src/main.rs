use anyhow::Context;

use chirpy_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    chirpy_observability::init();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    tracing::info!(?config, "starting chirpy");

    let app = chirpy_api::app::build_app(&config).context("failed to open document store")?;

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
