//! HTTP route handlers for the ChickenDirect API.
//!
//! # Route Structure
//!
//! ```text
//! # Customers
//! POST   /api/customers                                        - Create customer
//! GET    /api/customers                                        - List customers
//! GET    /api/customers/{customer_id}                          - Customer detail
//! PUT    /api/customers/{customer_id}                          - Full-replace update
//! DELETE /api/customers/{customer_id}                          - Delete (cascades addresses, detaches orders)
//!
//! # Addresses (always scoped to a customer)
//! POST   /api/customers/{customer_id}/addresses                - Create address
//! GET    /api/customers/{customer_id}/addresses                - List addresses
//! PUT    /api/customers/{customer_id}/addresses/{address_id}   - Full-replace update (ownership-checked)
//! DELETE /api/customers/{customer_id}/addresses/{address_id}   - Delete (ownership-checked)
//!
//! # Products
//! POST   /api/products                                         - Create product
//! GET    /api/products                                         - List products
//! GET    /api/products/{product_id}                            - Product detail
//! PUT    /api/products/{product_id}                            - Partial-merge update
//! DELETE /api/products/{product_id}                            - Delete
//!
//! # Orders
//! POST   /api/orders                                           - Create (snapshots customer + address)
//! GET    /api/orders                                           - List orders
//! GET    /api/orders/{order_id}                                - Order detail with items
//! PUT    /api/orders/{order_id}                                - Partial-merge update
//! DELETE /api/orders/{order_id}                                - Delete (cascades items)
//!
//! # Order items
//! POST   /api/order-items                                      - Create line item
//! GET    /api/order-items                                      - List line items
//! GET    /api/order-items/{order_item_id}                      - Line item detail
//! DELETE /api/order-items/{order_item_id}                      - Delete line item
//! ```
//!
//! All bodies are JSON with camelCase field names. Creations respond 201,
//! deletions 204 with an empty body.

pub mod addresses;
pub mod customers;
pub mod order_items;
pub mod orders;
pub mod products;

use std::collections::BTreeMap;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Create the customer routes router, including nested addresses.
pub fn customer_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(customers::create).get(customers::list))
        .route(
            "/{customer_id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete),
        )
        .route(
            "/{customer_id}/addresses",
            post(addresses::create).get(addresses::list),
        )
        .route(
            "/{customer_id}/addresses/{address_id}",
            put(addresses::update).delete(addresses::delete),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(products::create).get(products::list))
        .route(
            "/{product_id}",
            get(products::get)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(orders::create).get(orders::list))
        .route(
            "/{order_id}",
            get(orders::get).put(orders::update).delete(orders::delete),
        )
}

/// Create the order item routes router.
pub fn order_item_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(order_items::create).get(order_items::list))
        .route(
            "/{order_item_id}",
            get(order_items::get).delete(order_items::delete),
        )
}

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .nest("/customers", customer_routes())
        .nest("/products", product_routes())
        .nest("/orders", order_routes())
        .nest("/order-items", order_item_routes());

    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// Record a non-blank string field, or the matching validation message.
///
/// A missing field and a blank field produce the same message, matching
/// the request contracts.
fn require_text(
    errors: &mut BTreeMap<String, String>,
    field: &str,
    value: Option<String>,
) -> Option<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Some(v),
        _ => {
            errors.insert(field.to_owned(), "must not be blank".to_owned());
            None
        }
    }
}

/// Record a required field of any type, or "must not be null".
fn require<T>(errors: &mut BTreeMap<String, String>, field: &str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.insert(field.to_owned(), "must not be null".to_owned());
    }
    value
}
