//! Workhub Server - management gateway entry point.

use std::net::SocketAddr;
use std::sync::Arc;

use workhub_core::{
    api::{self, AppState},
    config::Config,
    middleware::AdminCredential,
    observability,
    server::{shutdown_signal, Server},
    store::RedisJobStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config: {}. Using defaults.", e);
        Config::default()
    });

    observability::init(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting workhub gateway"
    );

    if config.auth.username.is_empty() || config.auth.password.is_empty() {
        tracing::warn!(
            "Admin credential is incomplete; set WORKHUB__AUTH__USERNAME and WORKHUB__AUTH__PASSWORD"
        );
    }

    // Create Redis client
    let redis_client = redis::Client::open(config.redis.url.as_str())
        .map_err(|e| anyhow::anyhow!("Failed to create Redis client: {}", e))?;
    tracing::info!(
        url = %config.redis.url,
        namespace = %config.redis.namespace,
        "Redis client created"
    );

    let store = Arc::new(RedisJobStore::new(redis_client, config.redis.namespace.clone()));
    let state = AppState::new(store);

    let mut credential = AdminCredential::new(&config.auth.username, &config.auth.password);
    if config.auth.strict {
        credential = credential.strict();
    }

    // Build router and start serving
    let app = api::build_router(state, credential);
    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let server = Server::start(addr, app).await?;

    shutdown_signal().await;
    server.stop().await?;
    tracing::info!("Gateway shutdown complete");

    Ok(())
}
