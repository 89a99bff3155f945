//! Black-box API tests for ChickenDirect.
//!
//! Each test builds the full router over a fresh in-memory database and
//! drives it in-process with `tower::ServiceExt::oneshot`, so the suite
//! needs no running server and no external services.
//!
//! ```bash
//! cargo test -p chicken-direct-integration-tests
//! ```

#![allow(clippy::missing_panics_doc)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chicken_direct_server::config::ServerConfig;
use chicken_direct_server::{AppState, db, routes};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

/// The application router over a fresh in-memory database.
pub struct TestApp {
    router: Router,
}

impl TestApp {
    /// Build the router with an empty, fully migrated database.
    pub async fn spawn() -> Self {
        let config = ServerConfig {
            database_url: SecretString::from("sqlite::memory:"),
            host: "127.0.0.1".parse().expect("valid loopback address"),
            port: 0,
        };
        let pool = db::memory_pool().await.expect("in-memory pool");
        let state = AppState::new(config, pool);

        Self {
            router: routes::app(state),
        }
    }

    /// Send a request and return status plus parsed JSON body.
    ///
    /// An empty body (204 responses) parses as `Value::Null`.
    pub async fn request(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                builder
                    .body(Body::from(json.to_string()))
                    .expect("valid request")
            }
            None => builder.body(Body::empty()).expect("valid request"),
        };

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router never fails");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("body collects")
            .to_bytes();
        // Non-JSON bodies (the liveness text) come back as a plain string.
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, value)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.request("GET", uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("POST", uri, Some(body)).await
    }

    pub async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.request("PUT", uri, Some(body)).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.request("DELETE", uri, None).await
    }
}

/// Create a customer and return its id.
pub async fn create_customer(app: &TestApp, name: &str, email: &str) -> i64 {
    let (status, body) = app
        .post(
            "/api/customers",
            serde_json::json!({
                "name": name,
                "phone": "12345678",
                "email": email,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create customer: {body}");

    body["id"].as_i64().expect("customer id")
}

/// Create an address under a customer and return its id.
pub async fn create_address(app: &TestApp, customer_id: i64, city: &str) -> i64 {
    let (status, body) = app
        .post(
            &format!("/api/customers/{customer_id}/addresses"),
            serde_json::json!({
                "street": "Main 1",
                "city": city,
                "postalCode": "0150",
                "country": "Norway",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create address: {body}");

    body["id"].as_i64().expect("address id")
}

/// Create a product and return its id.
pub async fn create_product(app: &TestApp, name: &str, price: &str) -> i64 {
    let (status, body) = app
        .post(
            "/api/products",
            serde_json::json!({
                "name": name,
                "description": "Free range",
                "price": price,
                "status": "IN_STOCK",
                "quantityOnHand": 40,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create product: {body}");

    body["id"].as_i64().expect("product id")
}

/// Create an order for a customer and shipping address, return its id.
pub async fn create_order(app: &TestApp, customer_id: i64, address_id: i64) -> i64 {
    let (status, body) = app
        .post(
            "/api/orders",
            serde_json::json!({
                "customerId": customer_id,
                "shippingAddressId": address_id,
                "totalPrice": "100.00",
                "shippingCharge": "10.00",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create order: {body}");

    body["id"].as_i64().expect("order id")
}
