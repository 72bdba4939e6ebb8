//! # Checkout Sessions
//!
//! Provider-neutral types for creating and polling hosted checkout sessions.

use crate::error::{CheckoutError, CheckoutResult};
use crate::line_item::LineItem;
use crate::policy::CheckoutPolicy;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Prefix of every checkout session identifier
pub const SESSION_ID_PREFIX: &str = "cs_";

/// Placeholder the provider replaces with the real session id on redirect
pub const SESSION_ID_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Reject session ids that cannot belong to a checkout session.
pub fn validate_session_id(session_id: &str) -> CheckoutResult<&str> {
    if session_id.starts_with(SESSION_ID_PREFIX) {
        Ok(session_id)
    } else {
        Err(CheckoutError::validation("Invalid session_id"))
    }
}

/// Redirect targets on the storefront
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectUrls {
    /// Storefront base URL (e.g., "https://shop.github.io/store")
    pub domain: String,
}

impl RedirectUrls {
    pub fn new(domain: impl Into<String>) -> Self {
        let domain: String = domain.into();
        Self {
            domain: domain.trim_end_matches('/').to_string(),
        }
    }

    /// Success page, with the session id filled in by the provider
    pub fn success_url(&self) -> String {
        format!(
            "{}/success.html?session_id={}",
            self.domain, SESSION_ID_PLACEHOLDER
        )
    }

    pub fn cancel_url(&self) -> String {
        format!("{}/cancel.html", self.domain)
    }
}

/// Everything the provider needs to open a hosted checkout page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutSessionRequest {
    pub line_items: Vec<LineItem>,

    /// Shipping countries; empty means no address collection
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_countries: Vec<String>,

    pub success_url: String,
    pub cancel_url: String,

    /// Fresh per create call; Stripe answers a resend of this same call with the original session
    pub idempotency_key: String,
}

impl CheckoutSessionRequest {
    /// Build a one-time payment session request from normalized items
    pub fn new(line_items: Vec<LineItem>, policy: &CheckoutPolicy, urls: &RedirectUrls) -> Self {
        Self {
            line_items,
            allowed_countries: policy.allowed_countries.clone(),
            success_url: urls.success_url(),
            cancel_url: urls.cancel_url(),
            idempotency_key: Uuid::new_v4().to_string(),
        }
    }

    /// Always one-time payments
    pub fn mode(&self) -> &'static str {
        "payment"
    }

    /// Total item count across all lines
    pub fn item_count(&self) -> u32 {
        self.line_items.iter().map(LineItem::quantity).sum()
    }
}

/// A session the provider has just created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedSession {
    /// Provider's session ID (`cs_...`)
    pub session_id: String,

    /// Hosted checkout page to redirect the customer to
    pub url: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

/// Status of a checkout session as reported by the provider.
///
/// Every field is passed through as-is; `None` serializes as `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    pub status: Option<String>,
    pub payment_status: Option<String>,
    pub customer_email: Option<String>,
    pub amount_total: Option<i64>,
    pub currency: Option<String>,
}
