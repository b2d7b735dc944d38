//! Integration tests for the QKART storefront.
//!
//! Tests run the real HTTP client and catalog controller against
//! [`FakeBackend`], an in-process axum server that speaks the QKART REST
//! API on an ephemeral port. No external services are needed:
//!
//! ```bash
//! cargo test -p qkart-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use qkart_storefront::catalog::CatalogController;
use qkart_storefront::notify::ToastQueue;
use qkart_storefront::qkart::QkartClient;
use qkart_storefront::session::{Session, SessionStore};
use serde::Deserialize;
use serde_json::{Value, json};
use tokio::task::JoinHandle;
use url::Url;

/// Token the fake backend accepts.
pub const TOKEN: &str = "test-token";

/// Search text that makes the fake backend fail with a 500.
pub const FAILING_SEARCH: &str = "explode";

/// Message returned with a failing search.
pub const SEARCH_ERROR_MESSAGE: &str = "Search index unavailable";

/// The two-product catalog used across the end-to-end tests.
#[must_use]
pub fn sample_catalog() -> Vec<Value> {
    vec![
        json!({"_id": "A", "name": "Ball", "category": "Sports", "cost": 10, "rating": 4, "image": "https://example.com/ball.png"}),
        json!({"_id": "B", "name": "Bat", "category": "Sports", "cost": 20, "rating": 5, "image": "https://example.com/bat.png"}),
    ]
}

/// What the fake backend serves and records.
#[derive(Debug, Default)]
pub struct BackendState {
    pub products: Vec<Value>,
    /// Cart as `(productId, qty)` in insertion order.
    pub cart: Mutex<Vec<(String, u32)>>,
    /// When set, `GET /products` fails with this status and no payload.
    pub products_status: Option<StatusCode>,
    /// Paths of every request received, e.g. `GET /products/search?value=ba`.
    pub requests: Mutex<Vec<String>>,
}

impl BackendState {
    fn record(&self, line: String) {
        self.requests.lock().unwrap().push(line);
    }
}

/// An in-process QKART backend bound to `127.0.0.1:0`.
pub struct FakeBackend {
    addr: SocketAddr,
    state: Arc<BackendState>,
    handle: JoinHandle<()>,
}

impl FakeBackend {
    /// Start a backend serving `state`.
    pub async fn spawn(state: BackendState) -> Self {
        let state = Arc::new(state);
        let app = Router::new()
            .route("/api/v1/products", get(list_products))
            .route("/api/v1/products/search", get(search_products))
            .route("/api/v1/cart", get(get_cart).post(update_cart))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            state,
            handle,
        }
    }

    /// Start a backend with [`sample_catalog`] and `cart`.
    pub async fn with_cart(cart: &[(&str, u32)]) -> Self {
        Self::spawn(BackendState {
            products: sample_catalog(),
            cart: Mutex::new(
                cart.iter()
                    .map(|(id, qty)| ((*id).to_string(), *qty))
                    .collect(),
            ),
            ..BackendState::default()
        })
        .await
    }

    /// API base URL, as `QKART_API_ENDPOINT` would hold it.
    #[must_use]
    pub fn endpoint(&self) -> Url {
        Url::parse(&format!("http://{}/api/v1", self.addr)).unwrap()
    }

    /// Requests received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<String> {
        self.state.requests.lock().unwrap().clone()
    }

    /// Current server-side cart.
    #[must_use]
    pub fn cart(&self) -> Vec<(String, u32)> {
        self.state.cart.lock().unwrap().clone()
    }
}

impl Drop for FakeBackend {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// A controller wired to a [`FakeBackend`] through the real HTTP client.
pub struct Storefront {
    pub controller: CatalogController,
    pub store: SessionStore,
    pub toasts: Arc<ToastQueue>,
}

impl Storefront {
    /// Quiet period used by the integration tests.
    pub const DEBOUNCE: Duration = Duration::from_millis(20);

    #[must_use]
    pub fn new(backend: &FakeBackend, session: Session) -> Self {
        let store = SessionStore::in_memory(session);
        let toasts = Arc::new(ToastQueue::new());
        let controller = CatalogController::new(
            Arc::new(QkartClient::new(&backend.endpoint())),
            toasts.clone(),
            store.subscribe(),
            Self::DEBOUNCE,
        );
        Self {
            controller,
            store,
            toasts,
        }
    }

    /// Messages of the notifications shown so far.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.toasts.drain().into_iter().map(|n| n.message).collect()
    }
}

fn error_payload(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({"success": false, "message": message}))).into_response()
}

fn cart_json(cart: &[(String, u32)]) -> Value {
    Value::Array(
        cart.iter()
            .map(|(id, qty)| json!({"productId": id, "qty": qty}))
            .collect(),
    )
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {TOKEN}"))
}

async fn list_products(State(state): State<Arc<BackendState>>) -> Response {
    state.record("GET /products".to_string());
    match state.products_status {
        Some(status) => (status, "upstream unavailable").into_response(),
        None => Json(state.products.clone()).into_response(),
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    value: String,
}

async fn search_products(
    State(state): State<Arc<BackendState>>,
    Query(query): Query<SearchQuery>,
) -> Response {
    state.record(format!("GET /products/search?value={}", query.value));

    if query.value == FAILING_SEARCH {
        return error_payload(StatusCode::INTERNAL_SERVER_ERROR, SEARCH_ERROR_MESSAGE);
    }

    let needle = query.value.to_lowercase();
    let matches: Vec<Value> = state
        .products
        .iter()
        .filter(|p| {
            ["name", "category"].iter().any(|field| {
                p[field]
                    .as_str()
                    .is_some_and(|s| s.to_lowercase().contains(&needle))
            })
        })
        .cloned()
        .collect();

    if matches.is_empty() {
        return (StatusCode::NOT_FOUND, Json(json!([]))).into_response();
    }
    Json(matches).into_response()
}

async fn get_cart(State(state): State<Arc<BackendState>>, headers: HeaderMap) -> Response {
    state.record("GET /cart".to_string());
    if !authorized(&headers) {
        return error_payload(
            StatusCode::UNAUTHORIZED,
            "Protected route, Oauth2 Bearer token not found",
        );
    }
    Json(cart_json(&state.cart.lock().unwrap())).into_response()
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CartUpdate {
    product_id: String,
    qty: u32,
}

async fn update_cart(
    State(state): State<Arc<BackendState>>,
    headers: HeaderMap,
    Json(update): Json<CartUpdate>,
) -> Response {
    state.record(format!("POST /cart {} {}", update.product_id, update.qty));
    if !authorized(&headers) {
        return error_payload(
            StatusCode::UNAUTHORIZED,
            "Protected route, Oauth2 Bearer token not found",
        );
    }
    if !state
        .products
        .iter()
        .any(|p| p["_id"].as_str() == Some(update.product_id.as_str()))
    {
        return error_payload(StatusCode::BAD_REQUEST, "Product doesn't exist");
    }

    let mut cart = state.cart.lock().unwrap();
    if update.qty == 0 {
        cart.retain(|(id, _)| *id != update.product_id);
    } else if let Some(line) = cart.iter_mut().find(|(id, _)| *id == update.product_id) {
        line.1 = update.qty;
    } else {
        cart.push((update.product_id, update.qty));
    }
    Json(cart_json(&cart)).into_response()
}
