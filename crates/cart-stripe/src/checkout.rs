//! # Stripe Checkout Sessions
//!
//! Implementation of the Stripe Checkout Sessions API: create a hosted
//! checkout page for a cart and read a session's status back.

use crate::config::StripeConfig;
use async_trait::async_trait;
use cart_core::{
    CheckoutError, CheckoutProvider, CheckoutResult, CheckoutSessionRequest, CreatedSession,
    LineItem, SessionStatus,
};
use chrono::DateTime;
use reqwest::{Client, RequestBuilder};
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "stripe";

/// Stripe Checkout Session provider
///
/// Uses Stripe's hosted checkout page, so card data never touches this service.
pub struct StripeCheckoutProvider {
    config: StripeConfig,
    client: Client,
}

impl StripeCheckoutProvider {
    /// Create a new Stripe checkout provider
    pub fn new(config: StripeConfig) -> CheckoutResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CheckoutError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: RequestBuilder) -> CheckoutResult<String> {
        let response = request
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(CheckoutError::Provider {
                    provider: PROVIDER.to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(CheckoutError::Provider {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        Ok(body)
    }
}

/// Flatten a session request into Stripe's bracketed form encoding.
pub fn session_form(request: &CheckoutSessionRequest) -> Vec<(String, String)> {
    let mut form_params: Vec<(String, String)> = vec![
        ("mode".to_string(), request.mode().to_string()),
        ("success_url".to_string(), request.success_url.clone()),
        ("cancel_url".to_string(), request.cancel_url.clone()),
    ];

    for (i, item) in request.line_items.iter().enumerate() {
        match item {
            LineItem::Reference { price, .. } => {
                form_params.push((format!("line_items[{}][price]", i), price.clone()));
            }
            LineItem::Inline { price_data, .. } => {
                form_params.push((
                    format!("line_items[{}][price_data][currency]", i),
                    price_data.currency.as_str().to_string(),
                ));
                form_params.push((
                    format!("line_items[{}][price_data][unit_amount]", i),
                    price_data.unit_amount.to_string(),
                ));
                form_params.push((
                    format!("line_items[{}][price_data][product_data][name]", i),
                    price_data.product_data.name.clone(),
                ));
                // Stripe rejects an empty description
                if !price_data.product_data.description.is_empty() {
                    form_params.push((
                        format!("line_items[{}][price_data][product_data][description]", i),
                        price_data.product_data.description.clone(),
                    ));
                }
            }
        }
        form_params.push((
            format!("line_items[{}][quantity]", i),
            item.quantity().to_string(),
        ));
    }

    for (i, country) in request.allowed_countries.iter().enumerate() {
        form_params.push((
            format!("shipping_address_collection[allowed_countries][{}]", i),
            country.clone(),
        ));
    }

    form_params
}

fn is_safe_path_segment(session_id: &str) -> bool {
    !session_id.is_empty()
        && session_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[async_trait]
impl CheckoutProvider for StripeCheckoutProvider {
    #[instrument(skip(self, request), fields(items = request.line_items.len()))]
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> CheckoutResult<CreatedSession> {
        let form_params = session_form(request);

        debug!(
            "Creating Stripe checkout session: {} lines, {} units",
            request.line_items.len(),
            request.item_count()
        );

        let body = self
            .send(
                self.client
                    .post(self.config.sessions_url())
                    .header("Idempotency-Key", &request.idempotency_key)
                    .form(&form_params),
            )
            .await?;

        let session: StripeCheckoutSession = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        let url = session.url.ok_or_else(|| CheckoutError::Provider {
            provider: PROVIDER.to_string(),
            message: format!("Checkout session {} has no url", session.id),
        })?;

        info!("Created Stripe checkout session: id={}", session.id);

        Ok(CreatedSession {
            session_id: session.id,
            url,
            expires_at: session
                .expires_at
                .and_then(|ts| DateTime::from_timestamp(ts, 0)),
        })
    }

    #[instrument(skip(self))]
    async fn retrieve_checkout_session(&self, session_id: &str) -> CheckoutResult<SessionStatus> {
        // The id becomes a path segment of an authenticated request
        if !is_safe_path_segment(session_id) {
            return Err(CheckoutError::validation("Invalid session_id"));
        }

        let url = format!("{}/{}", self.config.sessions_url(), session_id);
        let body = self.send(self.client.get(&url)).await?;

        let session: StripeCheckoutSession = serde_json::from_str(&body).map_err(|e| {
            CheckoutError::Serialization(format!("Failed to parse Stripe response: {}", e))
        })?;

        debug!(
            "Retrieved Stripe checkout session: id={}, status={:?}",
            session.id, session.status
        );

        Ok(SessionStatus {
            status: session.status,
            payment_status: session.payment_status,
            customer_email: session
                .customer_details
                .and_then(|cd| cd.email)
                .filter(|email| !email.is_empty()),
            amount_total: session.amount_total,
            currency: session.currency,
        })
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeCheckoutSession {
    id: String,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    expires_at: Option<i64>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    payment_status: Option<String>,
    #[serde(default)]
    customer_details: Option<StripeCustomerDetails>,
    #[serde(default)]
    amount_total: Option<i64>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeCustomerDetails {
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}
