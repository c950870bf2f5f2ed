//! Integration tests for the shopping cart endpoints.

#![allow(clippy::unwrap_used)]

use axum::http::StatusCode;
use tringl_core::OrderOutcome;
use tringl_integration_tests::TestContext;

#[tokio::test]
async fn test_new_session_has_empty_cart() {
    let mut ctx = TestContext::new(OrderOutcome::Succeeded);
    let cart = ctx.get("/cart").await.json();
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
    assert_eq!(cart["total"], "$0.00");
    assert_eq!(ctx.get("/cart/count").await.json()["count"], 0);
}

#[tokio::test]
async fn test_add_merges_lines_and_totals() {
    let mut ctx = TestContext::new(OrderOutcome::Succeeded);
    ctx.add_to_cart(1).await;
    ctx.add_to_cart(1).await;
    let response = ctx.add_to_cart(2).await;
    assert_eq!(response.status, StatusCode::OK);

    let cart = response.json();
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["product_id"], 1);
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["line_price"], "$49.98");
    assert_eq!(items[1]["product_id"], 2);
    assert_eq!(cart["total"], "$57.97");
    assert_eq!(cart["item_count"], 2);
    assert_eq!(cart["unit_count"], 3);

    assert_eq!(ctx.get("/cart/count").await.json()["count"], 2);
}

#[tokio::test]
async fn test_add_unknown_product_is_not_found() {
    let mut ctx = TestContext::new(OrderOutcome::Succeeded);
    assert_eq!(ctx.add_to_cart(42).await.status, StatusCode::NOT_FOUND);
    assert_eq!(ctx.get("/cart/count").await.json()["count"], 0);
}

#[tokio::test]
async fn test_update_quantity_and_remove() {
    let mut ctx = TestContext::new(OrderOutcome::Succeeded);
    ctx.add_to_cart(4).await;
    ctx.add_to_cart(5).await;

    let cart = ctx
        .post_form("/cart/update", "product_id=4&quantity=3")
        .await
        .json();
    assert_eq!(cart["items"][0]["quantity"], 3);
    assert_eq!(cart["total"], "$42.96");

    let cart = ctx
        .post_form("/cart/update", "product_id=4&quantity=0")
        .await
        .json();
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["product_id"], 5);

    let cart = ctx
        .post_form("/cart/update", "product_id=5&quantity=-2")
        .await
        .json();
    assert_eq!(cart["items"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_update_unknown_line_is_ignored() {
    let mut ctx = TestContext::new(OrderOutcome::Succeeded);
    ctx.add_to_cart(1).await;

    let response = ctx.post_form("/cart/update", "product_id=6&quantity=5").await;
    assert_eq!(response.status, StatusCode::OK);
    let cart = response.json();
    assert_eq!(cart["items"].as_array().unwrap().len(), 1);
    assert_eq!(cart["total"], "$24.99");
}

#[tokio::test]
async fn test_malformed_form_is_rejected() {
    let mut ctx = TestContext::new(OrderOutcome::Succeeded);
    let response = ctx.post_form("/cart/add", "product_id=abc").await;
    assert!(response.status.is_client_error());
}

#[tokio::test]
async fn test_carts_are_per_browser() {
    let mut alice = TestContext::new(OrderOutcome::Succeeded);
    alice.add_to_cart(1).await;

    let mut bob = alice.new_browser();
    assert_eq!(bob.get("/cart/count").await.json()["count"], 0);
    bob.add_to_cart(2).await;
    bob.add_to_cart(3).await;

    assert_eq!(alice.get("/cart/count").await.json()["count"], 1);
    assert_eq!(bob.get("/cart/count").await.json()["count"], 2);
}
