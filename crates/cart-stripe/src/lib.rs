//! # cart-stripe
//!
//! Stripe provider for the storefront checkout service.
//!
//! `StripeCheckoutProvider` talks to the Checkout Sessions REST API:
//! - creates hosted checkout sessions from normalized line items
//!   (reference `price_...` items or inline `price_data`)
//! - retrieves a session's status, payment status, email and total
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_stripe::{StripeCheckoutProvider, StripeConfig};
//! use cart_core::CheckoutProvider;
//!
//! let config = StripeConfig::from_lookup(|key| std::env::var(key).ok())?;
//! let stripe = StripeCheckoutProvider::new(config)?;
//!
//! let session = stripe.create_checkout_session(&request).await?;
//! // Redirect the customer to session.url
//!
//! let status = stripe.retrieve_checkout_session(&session.session_id).await?;
//! ```

pub mod checkout;
pub mod config;

// Re-exports
pub use checkout::{session_form, StripeCheckoutProvider};
pub use config::StripeConfig;
