use anyhow::Context;

use spendbook_api::config::ApiConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env().context("invalid configuration")?;
    spendbook_observability::init(config.log_format);

    let app = spendbook_api::app::build_app(&config);

    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        frontend = ?config.frontend_origin,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
