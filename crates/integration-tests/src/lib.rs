//! Integration test helpers for the ELMIS console.
//!
//! Tests drive the real router in-process with `tower::ServiceExt::oneshot`
//! and point the backend client at a fake backend bound to an ephemeral
//! port. No external services are needed.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p elmis-integration-tests
//! ```

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query},
    http::{Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{delete, get, put},
};
use serde_json::{Value, json};
use tower::ServiceExt;
use url::Url;

use elmis_admin::config::AdminConfig;
use elmis_admin::routes;
use elmis_admin::services::UserDirectory;
use elmis_admin::session::SessionStore;
use elmis_admin::state::{AppState, load_directory};
use elmis_admin::storage::{MemoryStorage, Storage};

/// Largest response body the helpers will read.
const BODY_LIMIT: usize = 1024 * 1024;

/// Bearer token the fake backend accepts when started with one.
pub const FAKE_TOKEN: &str = "test-backend-token";

/// Console wired to in-memory storage.
pub struct TestApp {
    pub state: AppState,
    pub storage: Arc<MemoryStorage>,
    router: Router,
}

impl TestApp {
    /// Console whose backend is unreachable.
    #[must_use]
    pub fn new() -> Self {
        Self::with_storage(Arc::new(MemoryStorage::new()), "http://127.0.0.1:9")
    }

    /// Console over `storage`, talking to `backend_url`.
    #[must_use]
    pub fn with_storage(storage: Arc<MemoryStorage>, backend_url: &str) -> Self {
        let vars = HashMap::from([("ELMIS_BACKEND_URL".to_string(), backend_url.to_string())]);
        let config = AdminConfig::from_vars(|key| vars.get(key).cloned()).unwrap();
        Self::from_parts(config, storage)
    }

    /// Console over `storage` with an explicit configuration.
    #[must_use]
    pub fn from_parts(config: AdminConfig, storage: Arc<MemoryStorage>) -> Self {
        let directory: UserDirectory = load_directory(&config).unwrap();
        let shared: Arc<dyn Storage> = storage.clone();
        let state = AppState::new(config, SessionStore::open(shared), directory);
        Self {
            router: routes::app(state.clone()),
            state,
            storage,
        }
    }

    /// Simulate a restart: a fresh console over the same storage.
    #[must_use]
    pub fn restart(&self) -> Self {
        Self::from_parts(self.state.config().clone(), self.storage.clone())
    }

    /// Send a request through the router.
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// GET `path`.
    pub async fn get(&self, path: &str) -> Response {
        self.send(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// POST an urlencoded form to `path`.
    pub async fn post_form(&self, path: &str, form: &str) -> Response {
        self.send(
            Request::post(path)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
    }

    /// Sign in through the login form.
    pub async fn login(&self, email: &str, password: &str) -> Response {
        self.post_form("/login", &format!("email={email}&password={password}"))
            .await
    }

    /// Stored value for `key`.
    #[must_use]
    pub fn stored(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).unwrap()
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// `Location` header of a redirect.
#[must_use]
pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
}

/// Read a response body as text.
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Read a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}

// =============================================================================
// Fake backend
// =============================================================================

/// A request the fake backend received.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: String,
    /// Path and query string.
    pub uri: String,
    /// JSON body, when there was one.
    pub body: Option<Value>,
}

/// Requests recorded by the fake backend, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Calls(Arc<Mutex<Vec<Call>>>);

impl Calls {
    /// Everything received so far.
    #[must_use]
    pub fn all(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    /// Received calls other than GET.
    #[must_use]
    pub fn writes(&self) -> Vec<Call> {
        self.all()
            .into_iter()
            .filter(|call| call.method != "GET")
            .collect()
    }

    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }
}

fn page(content: Vec<Value>) -> Value {
    let total = content.len();
    json!({
        "content": content,
        "totalElements": total,
        "totalPages": 1,
        "number": 0,
        "size": 50,
    })
}

fn books() -> Vec<Value> {
    vec![
        json!({"id": 1, "title": "Dune", "author": "Frank Herbert", "isbn": "9780441013593",
               "publicationYear": 1965, "quantity": 4, "availableQuantity": 1, "avgRating": 4.6,
               "totalReviews": 12, "category": {"id": 1, "name": "Sci-Fi"}}),
        json!({"id": 2, "title": "Emma", "author": "Jane Austen", "quantity": 2,
               "availableQuantity": 2}),
    ]
}

fn rentals() -> Vec<Value> {
    vec![
        json!({"id": 10, "bookId": 1, "userId": 7, "rentalDate": "2024-03-01T10:00:00",
               "dueDate": "2024-03-15T10:00:00", "returnDate": null, "status": "OVERDUE"}),
        json!({"id": 11, "bookId": 2, "userId": 8, "rentalDate": "2024-03-05T10:00:00",
               "dueDate": "2024-03-19T10:00:00", "returnDate": "2024-03-10T09:00:00",
               "status": "RETURNED"}),
    ]
}

fn reviews() -> Value {
    page(vec![json!({"id": 5, "bookId": 1, "userId": 7, "rating": 5, "comment": "A classic",
                     "createdAt": "2024-02-01T12:00:00"})])
}

fn announcement() -> Value {
    json!({"id": 3, "title": "Closed on Monday", "content": "Inventory day.",
           "createdAt": "2024-03-20T08:00:00"})
}

fn employee() -> Value {
    json!({"id": 1, "firstName": "Grace", "lastName": "Hopper", "email": "grace@library.com",
           "phoneNumber": "555-0101"})
}

fn summary() -> Value {
    json!({"totalBooks": 120, "rentedBooks": 30, "overdueBooks": 4})
}

/// `body` when `id` is the one record the fake knows, otherwise 404.
fn known(id: i64, existing: i64, body: impl FnOnce() -> Value) -> Response {
    if id == existing {
        Json(body()).into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// `existing` with the fields of `patch` laid over it.
fn merged(mut existing: Value, patch: &Value) -> Value {
    if let (Some(target), Some(fields)) = (existing.as_object_mut(), patch.as_object()) {
        for (key, value) in fields {
            target.insert(key.clone(), value.clone());
        }
    }
    existing
}

/// Case-insensitive substring filter on `title` and `author`.
async fn list_books(Query(query): Query<HashMap<String, String>>) -> Json<Value> {
    let matches = |book: &Value, field: &str| {
        query.get(field).is_none_or(|needle| {
            book[field]
                .as_str()
                .unwrap_or_default()
                .to_lowercase()
                .contains(&needle.to_lowercase())
        })
    };
    let found = books()
        .into_iter()
        .filter(|book| matches(book, "title") && matches(book, "author"))
        .collect();
    Json(page(found))
}

async fn set_rental_status(id: i64, status: &str) -> Response {
    let Some(rental) = rentals().into_iter().find(|r| r["id"] == id) else {
        return StatusCode::NOT_FOUND.into_response();
    };
    let returned = (status == "RETURNED").then_some("2024-03-21T09:00:00");
    Json(merged(rental, &json!({"status": status, "returnDate": returned}))).into_response()
}

async fn delete_rental(Path(id): Path<i64>) -> StatusCode {
    if rentals().iter().any(|r| r["id"] == id) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

async fn create_announcement(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let created = merged(json!({"id": 4, "createdAt": "2024-03-21T08:00:00"}), &body);
    (StatusCode::CREATED, Json(created))
}

async fn update_announcement(Path(id): Path<i64>, Json(body): Json<Value>) -> Response {
    known(id, 3, || merged(announcement(), &body))
}

async fn create_employee(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let created = merged(json!({"id": 2, "createdAt": "2024-03-21T08:00:00"}), &body);
    (StatusCode::CREATED, Json(created))
}

async fn update_employee(Path(id): Path<i64>, Json(body): Json<Value>) -> Response {
    known(id, 1, || merged(employee(), &body))
}

async fn delete_by_id(existing: i64, id: i64) -> StatusCode {
    if id == existing {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::NOT_FOUND
    }
}

/// Reject requests without the expected bearer token.
async fn require_token(token: &'static str, request: Request<Body>, next: Next) -> Response {
    let expected = format!("Bearer {token}");
    let given = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if given != Some(expected.as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    next.run(request).await
}

async fn record(calls: Calls, request: Request<Body>, next: Next) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = axum::body::to_bytes(body, BODY_LIMIT).await.unwrap();
    calls.push(Call {
        method: parts.method.to_string(),
        uri: parts.uri.to_string(),
        body: serde_json::from_slice(&bytes).ok(),
    });
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Canned backend routes. With `token`, requests without the matching
/// bearer token get 401.
///
/// Announcement 3, employee 1 and rentals 10 and 11 exist; any other ID
/// answers 404.
#[must_use]
pub fn fake_backend_router(token: Option<&'static str>) -> Router {
    let router = Router::new()
        .route("/api/books", get(list_books))
        .route("/api/rentals", get(|| async { Json(page(rentals())) }))
        .route(
            "/api/rentals/return/{id}",
            put(|Path(id): Path<i64>| set_rental_status(id, "RETURNED")),
        )
        .route(
            "/api/rentals/overdue/{id}",
            put(|Path(id): Path<i64>| set_rental_status(id, "OVERDUE")),
        )
        .route("/api/rentals/{id}", delete(delete_rental))
        .route("/api/reviews", get(|| async { Json(reviews()) }))
        .route(
            "/api/announcements",
            get(|| async { Json(page(vec![announcement()])) }).post(create_announcement),
        )
        .route(
            "/api/announcements/{id}",
            get(|Path(id): Path<i64>| async move { known(id, 3, announcement) })
                .put(update_announcement)
                .delete(|Path(id): Path<i64>| delete_by_id(3, id)),
        )
        .route(
            "/api/employees",
            get(|| async { Json(json!([employee()])) }).post(create_employee),
        )
        .route(
            "/api/employees/{id}",
            get(|Path(id): Path<i64>| async move { known(id, 1, employee) })
                .put(update_employee)
                .delete(|Path(id): Path<i64>| delete_by_id(1, id)),
        )
        .route("/api/reports/rental-summary", get(|| async { Json(summary()) }));

    match token {
        Some(token) => router.layer(middleware::from_fn(
            move |request: Request<Body>, next: Next| require_token(token, request, next),
        )),
        None => router,
    }
}

/// Serve `router` on an ephemeral local port and return its base URL.
pub async fn spawn_backend(router: Router) -> Url {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    Url::parse(&format!("http://{addr}")).unwrap()
}

/// Start the canned backend and return its base URL.
pub async fn spawn_fake_backend() -> Url {
    spawn_backend(fake_backend_router(None)).await
}

/// Start the canned backend, recording every request it receives.
pub async fn spawn_recording_backend() -> (Url, Calls) {
    let calls = Calls::default();
    let recorder = calls.clone();
    let router = fake_backend_router(None).layer(middleware::from_fn(
        move |request: Request<Body>, next: Next| record(recorder.clone(), request, next),
    ));
    (spawn_backend(router).await, calls)
}
