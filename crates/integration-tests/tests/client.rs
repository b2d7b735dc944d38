//! `QkartClient` against the in-process backend.

#![allow(clippy::unwrap_used)]

use qkart_core::{CartEntry, Cost, ProductId};
use qkart_integration_tests::{
    BackendState, FAILING_SEARCH, FakeBackend, SEARCH_ERROR_MESSAGE, TOKEN, sample_catalog,
};
use qkart_storefront::qkart::{ApiError, CommerceApi, QkartClient};
use reqwest::StatusCode;
use secrecy::SecretString;

fn token() -> SecretString {
    SecretString::from(TOKEN)
}

#[tokio::test]
async fn test_get_products_decodes_catalog() {
    let backend = FakeBackend::with_cart(&[]).await;
    let client = QkartClient::new(&backend.endpoint());

    let products = client.get_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].id, ProductId::new("A"));
    assert_eq!(products[0].name, "Ball");
    assert_eq!(products[1].cost, Cost::from(20));
}

#[tokio::test]
async fn test_search_sends_value_query() {
    let backend = FakeBackend::with_cart(&[]).await;
    let client = QkartClient::new(&backend.endpoint());

    let products = client.search_products("bat & ball").await;
    assert!(matches!(products, Err(ref e) if e.is_not_found()));

    let products = client.search_products("bat").await.unwrap();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].name, "Bat");

    assert_eq!(
        backend.requests(),
        vec![
            "GET /products/search?value=bat & ball",
            "GET /products/search?value=bat"
        ]
    );
}

#[tokio::test]
async fn test_search_server_error_carries_message() {
    let backend = FakeBackend::with_cart(&[]).await;
    let client = QkartClient::new(&backend.endpoint());

    let err = client.search_products(FAILING_SEARCH).await.unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(err.server_message(), Some(SEARCH_ERROR_MESSAGE));
}

#[tokio::test]
async fn test_unstructured_error_is_status_only() {
    let backend = FakeBackend::spawn(BackendState {
        products: sample_catalog(),
        products_status: Some(StatusCode::BAD_GATEWAY),
        ..BackendState::default()
    })
    .await;
    let client = QkartClient::new(&backend.endpoint());

    let err = client.get_products().await.unwrap_err();

    assert!(matches!(err, ApiError::Status(StatusCode::BAD_GATEWAY)));
    assert_eq!(err.server_message(), None);
}

#[tokio::test]
async fn test_cart_requires_bearer_token() {
    let backend = FakeBackend::with_cart(&[("A", 2)]).await;
    let client = QkartClient::new(&backend.endpoint());

    let err = client
        .get_cart(&SecretString::from("wrong"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNAUTHORIZED));
    assert!(err.server_message().is_some());

    let cart = client.get_cart(&token()).await.unwrap();
    assert_eq!(cart, vec![CartEntry::new("A", 2)]);
}

#[tokio::test]
async fn test_add_to_cart_returns_full_cart() {
    let backend = FakeBackend::with_cart(&[("A", 2)]).await;
    let client = QkartClient::new(&backend.endpoint());

    let cart = client
        .add_to_cart(&token(), &ProductId::new("B"), 1)
        .await
        .unwrap();

    assert_eq!(cart, vec![CartEntry::new("A", 2), CartEntry::new("B", 1)]);
    assert_eq!(
        backend.requests().last().map(String::as_str),
        Some("POST /cart B 1")
    );
}

#[tokio::test]
async fn test_add_unknown_product_is_structured_error() {
    let backend = FakeBackend::with_cart(&[]).await;
    let client = QkartClient::new(&backend.endpoint());

    let err = client
        .add_to_cart(&token(), &ProductId::new("ghost"), 1)
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    assert_eq!(err.server_message(), Some("Product doesn't exist"));
}

#[tokio::test]
async fn test_unreachable_backend_is_http_error() {
    // Nothing listens on a port we just released
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let endpoint = url::Url::parse(&format!("http://{addr}/api/v1")).unwrap();

    let client = QkartClient::new(&endpoint);
    let err = client.get_products().await.unwrap_err();

    assert!(matches!(err, ApiError::Http(_)));
    assert_eq!(err.status(), None);
}
