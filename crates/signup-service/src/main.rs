//! Signup service - Entry point.

use account_store::{AccountStore, Store};
use anyhow::Context;
use signup_service::{
    api::{create_router, AppState},
    auth::{PasswordHasher, SignupService, TokenIssuer},
    config::Config,
};
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().context("Failed to load configuration")?;

    // Initialize logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.level));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting signup service");

    // Initialize storage
    let store: Arc<dyn AccountStore> = Arc::new(
        Store::open(config.store.persist, config.store.path.clone())
            .await
            .context("Failed to open account store")?,
    );
    info!("Account store ready with {} accounts", store.count().await);

    // Signing secret and hash cost are fixed for the life of the process
    let hasher = PasswordHasher::new(config.auth.bcrypt_cost)
        .context("Invalid bcrypt configuration")?;
    let tokens = TokenIssuer::new(&config.auth.jwt_secret, config.auth.token_expiry())
        .context("Invalid token configuration")?;
    info!(
        bcrypt_cost = hasher.cost(),
        token_lifetime = ?tokens.expiry().duration(),
        "Auth configured"
    );

    let signup = SignupService::new(store.clone(), hasher, tokens);
    let app = create_router(AppState::new(signup, store));

    let addr = SocketAddr::new(
        config
            .server
            .listen_addr
            .parse::<IpAddr>()
            .context("Invalid listen address")?,
        config.server.port,
    );

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
