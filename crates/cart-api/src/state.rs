//! # Application State
//!
//! Configuration is read once at startup into `AppConfig` and handed to the
//! handlers through `AppState`, together with the payment provider.

use anyhow::{anyhow, Context};
use axum::http::HeaderValue;
use cart_core::{BoxedCheckoutProvider, CheckoutPolicy, RedirectUrls};
use cart_stripe::{StripeCheckoutProvider, StripeConfig};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Storefront base URL used for success/cancel redirects
    pub domain: String,
    /// Origins allowed by CORS; empty allows any origin
    pub frontend_origins: Vec<String>,
    /// Directory served for unmatched paths
    pub static_dir: Option<PathBuf>,
    /// Stripe credentials
    pub stripe: StripeConfig,
    /// Pricing, currency and shipping policy
    pub policy: CheckoutPolicy,
}

impl AppConfig {
    /// Load from `.env`, the process environment and `config/checkout.toml`.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let policy = load_checkout_policy(std::env::var("CHECKOUT_CONFIG").ok())?;
        Self::from_lookup(|key| std::env::var(key).ok(), policy)
    }

    /// Build from a variable lookup on top of a base policy.
    ///
    /// Fails if `STRIPE_SECRET_KEY` or `DOMAIN` is missing.
    pub fn from_lookup<F>(lookup: F, policy: CheckoutPolicy) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let stripe = StripeConfig::from_lookup(&lookup)?;

        let domain = lookup("DOMAIN")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                anyhow!("Missing DOMAIN (storefront base URL, e.g. https://USERNAME.github.io/REPO)")
            })?;

        let frontend_origins = parse_origins(&lookup("FRONTEND_ORIGIN").unwrap_or_default())?;

        let policy = policy.with_overrides(&lookup)?;

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.trim().parse().ok())
                .unwrap_or(4242),
            domain,
            frontend_origins,
            static_dir: lookup("STATIC_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            stripe,
            policy,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("Invalid socket address {}:{}", self.host, self.port))
    }
}

/// Split a comma separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> anyhow::Result<Vec<String>> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map(|_| origin.to_string())
                .map_err(|_| anyhow!("Invalid FRONTEND_ORIGIN entry: {}", origin))
        })
        .collect()
}

/// Load the checkout policy from an explicit path or `config/checkout.toml`
fn load_checkout_policy(explicit: Option<String>) -> anyhow::Result<CheckoutPolicy> {
    if let Some(path) = explicit.filter(|p| !p.trim().is_empty()) {
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read checkout policy {}", path))?;
        let policy = CheckoutPolicy::from_toml(&content)?;
        tracing::info!("Loaded checkout policy from {}", path);
        return Ok(policy);
    }

    let config_paths = [
        "config/checkout.toml",
        "../config/checkout.toml",
        "../../config/checkout.toml",
    ];

    for path in config_paths {
        if let Ok(content) = std::fs::read_to_string(path) {
            let policy = CheckoutPolicy::from_toml(&content)
                .map_err(|e| anyhow!("Failed to parse {}: {}", path, e))?;
            tracing::info!("Loaded checkout policy from {}", path);
            return Ok(policy);
        }
    }

    tracing::debug!("No checkout policy file found, using defaults");
    Ok(CheckoutPolicy::default())
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Payment provider
    pub provider: BoxedCheckoutProvider,
    /// Success/cancel redirect targets
    pub urls: RedirectUrls,
    /// Application config
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Create state backed by the Stripe provider
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let stripe = StripeCheckoutProvider::new(config.stripe.clone())
            .map_err(|e| anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self::with_provider(config, Arc::new(stripe)))
    }

    /// Create state with an explicit provider
    pub fn with_provider(config: AppConfig, provider: BoxedCheckoutProvider) -> Self {
        Self {
            provider,
            urls: RedirectUrls::new(&config.domain),
            config: Arc::new(config),
        }
    }

    pub fn policy(&self) -> &CheckoutPolicy {
        &self.config.policy
    }
}
