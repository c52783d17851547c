use anyhow::Context;
use royalty_engine::{api, config::Config};
use std::net::SocketAddr;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("configuration error")?;

    tracing::info!(
        rounding = ?config.rounding_mode,
        ownership_policy = ?config.ownership_policy,
        max_batch_size = config.max_batch_size,
        "royalty engine configured"
    );

    let addr = SocketAddr::from((config.bind_addr, config.port));
    let app = api::create_router(api::AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
