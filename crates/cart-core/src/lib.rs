//! # cart-core
//!
//! Core types and traits for the storefront checkout service.
//!
//! This crate provides:
//! - `normalize` to turn a posted cart into provider line items
//! - `LineItem` in reference (`price_...`) and inline-priced forms
//! - `CheckoutPolicy` for per-deployment pricing, currency and shipping choices
//! - `CheckoutProvider` trait for the payment provider
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{normalize, CheckoutPolicy, CheckoutSessionRequest, RedirectUrls};
//!
//! let policy = CheckoutPolicy::default();
//! let items = normalize(&body["items"], &policy)?;
//!
//! let request = CheckoutSessionRequest::new(items, &policy, &RedirectUrls::new(domain));
//! let session = provider.create_checkout_session(&request).await?;
//!
//! // Redirect the customer to session.url
//! ```

pub mod error;
pub mod line_item;
pub mod normalize;
pub mod policy;
pub mod provider;
pub mod session;

// Re-exports for convenience
pub use error::{CheckoutError, CheckoutResult};
pub use line_item::{Currency, LineItem, PriceData, ProductData};
pub use normalize::{clamp_quantity, normalize, normalize_item};
pub use policy::{CheckoutPolicy, PricingMode};
pub use provider::{BoxedCheckoutProvider, CheckoutProvider};
pub use session::{
    validate_session_id, CheckoutSessionRequest, CreatedSession, RedirectUrls, SessionStatus,
};
