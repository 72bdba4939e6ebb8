//! End-to-end tests for the checkout router, with a fake provider standing in
//! for Stripe.

use async_trait::async_trait;
use axum::http::{header, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use cart_api::{create_router, AppConfig, AppState};
use cart_core::{
    CheckoutError, CheckoutPolicy, CheckoutProvider, CheckoutResult, CheckoutSessionRequest,
    CreatedSession, Currency, LineItem, PricingMode, SessionStatus,
};
use cart_stripe::StripeConfig;
use serde_json::{json, Value};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct RecordingProvider {
    created: Mutex<Vec<CheckoutSessionRequest>>,
    retrieved: Mutex<Vec<String>>,
    failure: Option<String>,
}

impl RecordingProvider {
    fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    fn created(&self) -> Vec<CheckoutSessionRequest> {
        self.created.lock().unwrap().clone()
    }

    fn retrieved(&self) -> Vec<String> {
        self.retrieved.lock().unwrap().clone()
    }

    fn check_failure(&self) -> CheckoutResult<()> {
        match &self.failure {
            Some(message) => Err(CheckoutError::Provider {
                provider: "fake".to_string(),
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl CheckoutProvider for RecordingProvider {
    async fn create_checkout_session(
        &self,
        request: &CheckoutSessionRequest,
    ) -> CheckoutResult<CreatedSession> {
        self.created.lock().unwrap().push(request.clone());
        self.check_failure()?;
        Ok(CreatedSession {
            session_id: "cs_test_fake".to_string(),
            url: "https://checkout.stripe.com/c/pay/cs_test_fake".to_string(),
            expires_at: None,
        })
    }

    async fn retrieve_checkout_session(&self, session_id: &str) -> CheckoutResult<SessionStatus> {
        self.retrieved.lock().unwrap().push(session_id.to_string());
        self.check_failure()?;
        Ok(SessionStatus {
            status: Some("complete".to_string()),
            payment_status: Some("paid".to_string()),
            customer_email: None,
            amount_total: Some(2400),
            currency: Some("gbp".to_string()),
        })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

fn config(policy: CheckoutPolicy) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        domain: "https://shop.github.io/store".to_string(),
        frontend_origins: vec!["https://shop.github.io".to_string()],
        static_dir: None,
        stripe: StripeConfig::new("sk_test_fake"),
        policy,
    }
}

fn server_with(config: AppConfig, provider: Arc<RecordingProvider>) -> TestServer {
    let state = AppState::with_provider(config, provider);
    TestServer::new(create_router(state)).unwrap()
}

fn server(provider: Arc<RecordingProvider>) -> TestServer {
    server_with(config(CheckoutPolicy::default()), provider)
}

#[tokio::test]
async fn health_reports_ok() {
    let server = server(Arc::new(RecordingProvider::default()));

    let response = server.get("/health").await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.json::<Value>(), json!({ "ok": true }));
}

#[tokio::test]
async fn zero_quantity_reaches_provider_as_one() {
    let provider = Arc::new(RecordingProvider::default());
    let server = server(provider.clone());

    let response = server
        .post("/create-checkout-session")
        .json(&json!({ "items": [{ "priceId": "price_abc", "quantity": 0 }] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "url": "https://checkout.stripe.com/c/pay/cs_test_fake" })
    );

    let created = provider.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].line_items, vec![LineItem::reference("price_abc", 1)]);
    assert_eq!(created[0].mode(), "payment");
    assert_eq!(created[0].allowed_countries, vec!["GB", "IE"]);
    assert_eq!(
        created[0].success_url,
        "https://shop.github.io/store/success.html?session_id={CHECKOUT_SESSION_ID}"
    );
    assert_eq!(created[0].cancel_url, "https://shop.github.io/store/cancel.html");
}

#[tokio::test]
async fn oversized_quantity_clamped_and_order_kept() {
    let provider = Arc::new(RecordingProvider::default());
    let server = server(provider.clone());

    server
        .post("/create-checkout-session")
        .json(&json!({ "items": [
            { "priceId": "price_b", "quantity": 500 },
            { "priceId": "price_a" },
            { "priceId": "price_c", "quantity": "3" }
        ] }))
        .await
        .assert_status_ok();

    assert_eq!(
        provider.created()[0].line_items,
        vec![
            LineItem::reference("price_b", 99),
            LineItem::reference("price_a", 1),
            LineItem::reference("price_c", 3),
        ]
    );
}

#[tokio::test]
async fn missing_or_empty_items_rejected_without_provider_call() {
    let provider = Arc::new(RecordingProvider::default());
    let server = server(provider.clone());

    for body in [json!({}), json!({ "items": [] }), json!({ "items": "price_abc" }), json!([])] {
        let response = server.post("/create-checkout-session").json(&body).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST, "{}", body);
        assert_eq!(response.json::<Value>(), json!({ "error": "Missing items[]" }));
    }

    assert!(provider.created().is_empty());
}

#[tokio::test]
async fn bad_price_id_rejected() {
    let provider = Arc::new(RecordingProvider::default());
    let server = server(provider.clone());

    let response = server
        .post("/create-checkout-session")
        .json(&json!({ "items": [{ "priceId": "price_ok" }, { "priceId": "abc123" }] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Invalid priceId" }));
    assert!(provider.created().is_empty());
}

#[tokio::test]
async fn malformed_body_rejected() {
    let provider = Arc::new(RecordingProvider::default());
    let server = server(provider.clone());

    let response = server
        .post("/create-checkout-session")
        .text("{ not json")
        .content_type("application/json")
        .await;

    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
    assert!(provider.created().is_empty());
}

#[tokio::test]
async fn provider_failure_is_internal_error_with_message() {
    let provider = Arc::new(RecordingProvider::failing("No such price: 'price_gone'"));
    let server = server(provider.clone());

    let response = server
        .post("/create-checkout-session")
        .json(&json!({ "items": [{ "priceId": "price_gone" }] }))
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "No such price: 'price_gone'" })
    );
}

#[tokio::test]
async fn inline_pricing_deployment() {
    let provider = Arc::new(RecordingProvider::default());
    let policy = CheckoutPolicy::default()
        .with_pricing(PricingMode::Inline)
        .with_currency(Currency::EUR)
        .with_allowed_countries(["IE"]);
    let server = server_with(config(policy), provider.clone());

    let response = server
        .post("/create-checkout-session")
        .json(&json!({ "items": [{ "name": "Print", "unit_amount": 49 }] }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Invalid unit_amount" }));

    server
        .post("/create-checkout-session")
        .json(&json!({ "items": [{
            "name": "x".repeat(130),
            "description": "Signed",
            "unit_amount": 50,
            "quantity": 2
        }] }))
        .await
        .assert_status_ok();

    let created = provider.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].allowed_countries, vec!["IE"]);
    assert_eq!(
        created[0].line_items,
        vec![LineItem::inline(Currency::EUR, 50, "x".repeat(100), "Signed", 2)]
    );
}

#[tokio::test]
async fn session_status_rejects_bad_id_without_provider_call() {
    let provider = Arc::new(RecordingProvider::default());
    let server = server(provider.clone());

    let response = server
        .get("/session-status")
        .add_query_param("session_id", "xyz")
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>(), json!({ "error": "Invalid session_id" }));

    let response = server.get("/session-status").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert!(provider.retrieved().is_empty());
}

#[tokio::test]
async fn session_status_passes_provider_fields_through() {
    let provider = Arc::new(RecordingProvider::default());
    let server = server(provider.clone());

    let response = server
        .get("/session-status")
        .add_query_param("session_id", "cs_test_fake")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({
            "status": "complete",
            "payment_status": "paid",
            "customer_email": null,
            "amount_total": 2400,
            "currency": "gbp"
        })
    );
    assert_eq!(provider.retrieved(), vec!["cs_test_fake"]);
}

#[tokio::test]
async fn session_status_provider_failure() {
    let provider = Arc::new(RecordingProvider::failing("No such checkout.session"));
    let server = server(provider);

    let response = server
        .get("/session-status")
        .add_query_param("session_id", "cs_test_missing")
        .await;

    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "No such checkout.session" })
    );
}

#[tokio::test]
async fn cors_allows_only_configured_origin() {
    let server = server(Arc::new(RecordingProvider::default()));

    let allowed = server
        .method(Method::OPTIONS, "/create-checkout-session")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://shop.github.io"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;
    assert_eq!(
        allowed.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("https://shop.github.io"))
    );

    let denied = server
        .method(Method::OPTIONS, "/create-checkout-session")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://evil.example"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;
    assert!(denied
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}

#[tokio::test]
async fn cors_allows_any_origin_when_unconfigured() {
    let mut config = config(CheckoutPolicy::default());
    config.frontend_origins.clear();
    let server = server_with(config, Arc::new(RecordingProvider::default()));

    let response = server
        .get("/health")
        .add_header(header::ORIGIN, HeaderValue::from_static("https://anywhere.example"))
        .await;

    assert_eq!(
        response.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN),
        Some(&HeaderValue::from_static("*"))
    );
}

#[tokio::test]
async fn static_dir_serves_unmatched_paths() {
    let dir: PathBuf = std::env::temp_dir().join(format!("cart-api-static-{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("success.html"), "<h1>Thanks!</h1>").unwrap();

    let mut config = config(CheckoutPolicy::default());
    config.static_dir = Some(dir.clone());
    let server = server_with(config, Arc::new(RecordingProvider::default()));

    let page = server.get("/success.html").await;
    assert_eq!(page.status_code(), StatusCode::OK);
    assert_eq!(page.text(), "<h1>Thanks!</h1>");

    let missing = server.get("/nope.html").await;
    assert_eq!(missing.status_code(), StatusCode::NOT_FOUND);

    server.get("/health").await.assert_status_ok();

    std::fs::remove_dir_all(dir).ok();
}
