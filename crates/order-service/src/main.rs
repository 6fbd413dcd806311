use anyhow::Context;

use microshop_order_service::{app, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    microshop_observability::init();

    let config = Config::from_env()?;
    let services = app::services::build_services(&config).await?;
    let router = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        inventory = %config.inventory_url,
        topic = %config.topic,
        "order-service listening on {}",
        listener.local_addr()?
    );

    axum::serve(listener, router).await?;
    Ok(())
}
