//! # checkout-server
//!
//! Hosted checkout backend for a static storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export STRIPE_SECRET_KEY=sk_test_...
//! export DOMAIN=https://USERNAME.github.io/REPO
//! export FRONTEND_ORIGIN=https://USERNAME.github.io
//!
//! # Run the server
//! checkout-server
//! ```

use cart_api::{routes, state::AppConfig, state::AppState};
use tracing::{error, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    // Refuse to start without credentials or a redirect domain
    let config = AppConfig::from_env().map_err(|e| {
        error!("{:#}", e);
        e
    })?;

    let addr = config.socket_addr()?;

    info!("Redirect domain: {}", config.domain);
    info!(
        "Pricing: {:?}, currency: {}, shipping countries: {:?}",
        config.policy.pricing, config.policy.currency, config.policy.allowed_countries
    );
    if config.frontend_origins.is_empty() {
        info!("CORS: any origin");
    } else {
        info!("CORS: {:?}", config.frontend_origins);
    }
    if config.stripe.is_test_mode() {
        info!("Stripe test mode");
    }

    let state = AppState::new(config)?;
    let app = routes::create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("API listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::builder()
        .with_default_directive(Level::INFO.into())
        .from_env_lossy();

    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer())
            .with(filter)
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
