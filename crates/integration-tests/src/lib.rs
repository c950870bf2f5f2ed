//! Integration tests for the Tringl storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p tringl-integration-tests
//! ```
//!
//! The storefront router is driven in-process with `tower::ServiceExt::oneshot`,
//! so no server or port is needed. [`TestContext`] plays a single browser:
//! it keeps the session cookie between requests.
//!
//! Order outcomes are fixed per context and the processing delay is the
//! default 2 seconds. Tests run on a paused tokio clock and sleep past
//! [`PROCESSING_DELAY`] to let a submission settle.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;
use tringl_core::{Catalog, FixedOutcome, OrderOutcome, OutcomePolicy};
use tringl_storefront::config::StorefrontConfig;
use tringl_storefront::middleware::SESSION_COOKIE_NAME;
use tringl_storefront::state::AppState;

/// Simulated order backend latency used by every context.
pub const PROCESSING_DELAY: Duration = Duration::from_secs(2);

/// A simulated browser talking to an in-process storefront.
pub struct TestContext {
    router: Router,
    cookie: Option<String>,
}

/// A collected response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// Parse the body as JSON.
    ///
    /// # Panics
    ///
    /// Panics if the body is not valid JSON.
    #[must_use]
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body)
            .unwrap_or_else(|e| panic!("response is not JSON ({e}): {}", self.body))
    }
}

impl TestContext {
    /// Storefront whose orders always end with `outcome`.
    #[must_use]
    pub fn new(outcome: OrderOutcome) -> Self {
        Self::with_policy(Arc::new(FixedOutcome(outcome)))
    }

    /// Storefront with a custom outcome policy.
    #[must_use]
    pub fn with_policy(policy: Arc<dyn OutcomePolicy>) -> Self {
        let mut config = StorefrontConfig::default();
        config.orders.processing_delay = PROCESSING_DELAY;
        let state = AppState::with_policy(config, Catalog::builtin(), policy);
        Self {
            router: tringl_storefront::app(state),
            cookie: None,
        }
    }

    /// A second browser on the same storefront, without a session cookie.
    #[must_use]
    pub fn new_browser(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty());
        self.send(request).await
    }

    /// POST a form-urlencoded body.
    pub async fn post_form(&mut self, uri: &str, form: &str) -> TestResponse {
        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form.to_owned()));
        self.send(request).await
    }

    /// Add one unit of a product to the cart.
    pub async fn add_to_cart(&mut self, product_id: i32) -> TestResponse {
        self.post_form("/cart/add", &format!("product_id={product_id}"))
            .await
    }

    /// Fill every shipping field with a plausible value.
    pub async fn fill_shipping(&mut self) {
        for (field, value) in [
            ("name", "Erika Mustermann"),
            ("email", "erika%40example.com"),
            ("address", "Hauptstrasse+1"),
            ("city", "Berlin"),
            ("zip", "10115"),
        ] {
            let response = self
                .post_form("/checkout/field", &format!("field={field}&value={value}"))
                .await;
            assert_eq!(response.status, StatusCode::OK, "{}", response.body);
        }
    }

    /// Wait until a submission made now has settled.
    pub async fn wait_for_outcome() {
        tokio::time::sleep(PROCESSING_DELAY + Duration::from_millis(100)).await;
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Result<Request<Body>, axum::http::Error>) -> TestResponse {
        let request = request.unwrap_or_else(|e| panic!("invalid request: {e}"));
        let Ok(response) = self.router.clone().oneshot(request).await;

        if let Some(cookie) = session_cookie(response.headers()) {
            self.cookie = Some(cookie);
        }

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .unwrap_or_else(|e| panic!("failed to read body: {e}"))
            .to_bytes();

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// Extract `name=value` of the session cookie from `set-cookie` headers.
fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(str::to_owned)
}
