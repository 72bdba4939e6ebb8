//! # cart-api
//!
//! HTTP API layer for the storefront checkout service.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Checkout session creation and status polling endpoints
//! - CORS restricted to the storefront origins
//! - Optional static file hosting
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | POST | `/create-checkout-session` | Create checkout session |
//! | GET | `/session-status?session_id=cs_...` | Session status |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
