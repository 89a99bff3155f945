//! Address API tests, including the ownership check.

use axum::http::StatusCode;
use chicken_direct_integration_tests::{TestApp, create_address, create_customer};
use serde_json::json;

#[tokio::test]
async fn test_created_address_shows_up_under_its_customer() {
    let app = TestApp::spawn().await;
    let customer_id = create_customer(&app, "Bob", "bob@x.com").await;
    create_address(&app, customer_id, "Oslo").await;

    let (status, body) = app.get(&format!("/api/customers/{customer_id}")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["addresses"][0]["city"], "Oslo");
    assert_eq!(body["addresses"][0]["postalCode"], "0150");
}

#[tokio::test]
async fn test_create_under_missing_customer_is_not_found() {
    let app = TestApp::spawn().await;

    let (status, body) = app
        .post(
            "/api/customers/500/addresses",
            json!({
                "street": "Main 1",
                "city": "Oslo",
                "postalCode": "0150",
                "country": "Norway",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Customer not found");
}

#[tokio::test]
async fn test_update_under_wrong_customer_is_not_found() {
    let app = TestApp::spawn().await;
    let alice = create_customer(&app, "Alice", "alice@x.com").await;
    let bob = create_customer(&app, "Bob", "bob@x.com").await;
    let address_id = create_address(&app, alice, "Oslo").await;

    let (status, body) = app
        .put(
            &format!("/api/customers/{bob}/addresses/{address_id}"),
            json!({
                "street": "Hacked 1",
                "city": "Nowhere",
                "postalCode": "0000",
                "country": "Norway",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Address not found");
    assert_eq!(
        body["message"],
        format!("Address with id {address_id} not found")
    );

    // Untouched under the real owner.
    let (_, owner) = app.get(&format!("/api/customers/{alice}")).await;
    assert_eq!(owner["addresses"][0]["city"], "Oslo");
}

#[tokio::test]
async fn test_delete_under_wrong_customer_leaves_address_intact() {
    let app = TestApp::spawn().await;
    let alice = create_customer(&app, "Alice", "alice@x.com").await;
    let bob = create_customer(&app, "Bob", "bob@x.com").await;
    let address_id = create_address(&app, alice, "Oslo").await;

    let (status, _) = app
        .delete(&format!("/api/customers/{bob}/addresses/{address_id}"))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, addresses) = app
        .get(&format!("/api/customers/{alice}/addresses"))
        .await;
    assert_eq!(addresses.as_array().expect("array").len(), 1);
}

#[tokio::test]
async fn test_update_under_owner_replaces_fields() {
    let app = TestApp::spawn().await;
    let alice = create_customer(&app, "Alice", "alice@x.com").await;
    let address_id = create_address(&app, alice, "Oslo").await;

    let (status, body) = app
        .put(
            &format!("/api/customers/{alice}/addresses/{address_id}"),
            json!({
                "street": "Side 2",
                "city": "Bergen",
                "postalCode": "5003",
                "country": "Norway",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Bergen");
    assert_eq!(body["postalCode"], "5003");
}

#[tokio::test]
async fn test_delete_under_owner_removes_address() {
    let app = TestApp::spawn().await;
    let alice = create_customer(&app, "Alice", "alice@x.com").await;
    let address_id = create_address(&app, alice, "Oslo").await;

    let (status, _) = app
        .delete(&format!("/api/customers/{alice}/addresses/{address_id}"))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, addresses) = app
        .get(&format!("/api/customers/{alice}/addresses"))
        .await;
    assert_eq!(addresses.as_array().expect("array").len(), 0);
}

#[tokio::test]
async fn test_blank_fields_are_reported_with_camel_case_names() {
    let app = TestApp::spawn().await;
    let alice = create_customer(&app, "Alice", "alice@x.com").await;

    let (status, body) = app
        .post(
            &format!("/api/customers/{alice}/addresses"),
            json!({"street": "Main 1", "city": "Oslo"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fieldErrors"]["postalCode"], "must not be blank");
    assert_eq!(body["fieldErrors"]["country"], "must not be blank");
}
