//! # Checkout Provider Trait
//!
//! Seam between the HTTP layer and the payment provider that hosts the
//! checkout page. The HTTP layer only ever talks to `dyn CheckoutProvider`,
//! so tests can swap in a fake.
//!
//! ```text
//! ┌───────────────────────────────────────────────┐
//! │            CheckoutProvider (trait)           │
//! │  ├── create_checkout_session()                │
//! │  ├── retrieve_checkout_session()              │
//! │  └── provider_name()                          │
//! └───────────────────────────────────────────────┘
//!                        ▲
//!            ┌───────────┴───────────┐
//!  ┌─────────┴─────────┐   ┌─────────┴─────────┐
//!  │ StripeCheckout    │   │  test fakes       │
//!  │   Provider        │   │                   │
//!  └───────────────────┘   └───────────────────┘
//! ```

use crate::error::CheckoutResult;
use crate::session::{CheckoutSessionRequest, CreatedSession, SessionStatus};
use async_trait::async_trait;
use std::sync::Arc;

/// A payment provider that hosts checkout pages.
#[async_trait]
pub trait CheckoutProvider: Send + Sync {
    /// Create a hosted checkout session.
    ///
    /// Any failure, including transport errors, is returned as-is; the
    /// caller does not retry.
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> CheckoutResult<CreatedSession>;

    /// Look up an existing session. The id has already been checked for the `cs_` prefix.
    async fn retrieve_checkout_session(&self, session_id: &str) -> CheckoutResult<SessionStatus>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared provider (dynamic dispatch)
pub type BoxedCheckoutProvider = Arc<dyn CheckoutProvider>;
