//! # Request Handlers
//!
//! Axum request handlers for the checkout API.
//! Validation failures map to 400, provider failures to 500; both carry
//! `{ "error": message }`.

use crate::state::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cart_core::{
    normalize, validate_session_id, CheckoutError, CheckoutSessionRequest, SessionStatus,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Create checkout response
#[derive(Debug, Serialize)]
pub struct CreateCheckoutResponse {
    /// Hosted checkout page (redirect the customer here)
    pub url: String,
}

/// Query string of `GET /session-status`
#[derive(Debug, Deserialize)]
pub struct SessionStatusQuery {
    #[serde(default)]
    pub session_id: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn checkout_error_to_response(err: CheckoutError) -> ApiError {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ErrorResponse::new(err.to_string())))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "ok": true }))
}

/// Create a hosted checkout session for the posted cart
#[instrument(skip(state, payload))]
pub async fn create_checkout_session(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<CreateCheckoutResponse>, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        warn!("Rejected checkout body: {}", rejection.body_text());
        checkout_error_to_response(CheckoutError::validation(rejection.body_text()))
    })?;

    let line_items = normalize(body.get("items").unwrap_or(&Value::Null), state.policy())
        .map_err(|e| {
            warn!("Rejected cart: {}", e);
            checkout_error_to_response(e)
        })?;

    let request = CheckoutSessionRequest::new(line_items, state.policy(), &state.urls);

    info!(
        "Creating checkout: provider={}, {} lines, {} units",
        state.provider.provider_name(),
        request.line_items.len(),
        request.item_count()
    );

    let session = state
        .provider
        .create_checkout_session(&request)
        .await
        .map_err(|e| {
            error!("Failed to create checkout: {}", e);
            checkout_error_to_response(e)
        })?;

    info!("Created checkout session: {}", session.session_id);

    Ok(Json(CreateCheckoutResponse { url: session.url }))
}

/// Report the status of a checkout session
#[instrument(skip(state, query))]
pub async fn session_status(
    State(state): State<AppState>,
    query: Result<Query<SessionStatusQuery>, QueryRejection>,
) -> Result<Json<SessionStatus>, ApiError> {
    let Query(query) = query.map_err(|rejection| {
        checkout_error_to_response(CheckoutError::validation(rejection.body_text()))
    })?;

    let session_id = validate_session_id(&query.session_id).map_err(|e| {
        warn!("Rejected session id: {:?}", query.session_id);
        checkout_error_to_response(e)
    })?;

    let status = state
        .provider
        .retrieve_checkout_session(session_id)
        .await
        .map_err(|e| {
            if e.is_validation() {
                warn!("Provider rejected session id {}: {}", session_id, e);
            } else {
                error!("Failed to retrieve session {}: {}", session_id, e);
            }
            checkout_error_to_response(e)
        })?;

    Ok(Json(status))
}
