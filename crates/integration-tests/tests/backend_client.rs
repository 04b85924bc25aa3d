//! Backend client against a fake REST backend, and pages rendered from it.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::sync::Arc;

use axum::{Router, http::StatusCode, routing::get};
use url::Url;

use elmis_admin::backend::types::{AnnouncementInput, BookSearch, EmployeeInput};
use elmis_admin::backend::{BackendClient, BackendError};
use elmis_admin::config::AdminConfig;
use elmis_admin::storage::MemoryStorage;
use elmis_core::{AnnouncementId, EmployeeId, RentalId, RentalStatus};
use elmis_integration_tests::{
    FAKE_TOKEN, TestApp, body_json, body_text, fake_backend_router, spawn_backend, spawn_fake_backend,
    spawn_recording_backend,
};

fn config(base_url: &Url, token: Option<&str>) -> AdminConfig {
    let mut vars = HashMap::from([("ELMIS_BACKEND_URL".to_string(), base_url.to_string())]);
    if let Some(token) = token {
        vars.insert("ELMIS_BACKEND_TOKEN".to_string(), token.to_string());
    }
    AdminConfig::from_vars(|key| vars.get(key).cloned()).unwrap()
}

fn client(base_url: &Url, token: Option<&str>) -> BackendClient {
    BackendClient::new(&config(base_url, token).backend)
}

#[tokio::test]
async fn test_decodes_pages() {
    let base = spawn_fake_backend().await;
    let backend = client(&base, None);

    let books = backend.books(0, &BookSearch::default()).await.unwrap();
    assert_eq!(books.total_elements, 2);
    assert_eq!(books.content[0].title, "Dune");
    assert_eq!(books.content[0].category.as_ref().unwrap().name, "Sci-Fi");
    assert_eq!(books.content[1].avg_rating, None);

    let rentals = backend.rentals(0).await.unwrap();
    assert_eq!(rentals.content[0].status, RentalStatus::Overdue);
    assert!(rentals.content[1].return_date.is_some());

    let reviews = backend.reviews(0).await.unwrap();
    assert_eq!(reviews.content[0].rating, 5);

    let announcements = backend.announcements(0).await.unwrap();
    assert_eq!(announcements.content[0].title, "Closed on Monday");

    let employees = backend.employees().await.unwrap();
    assert_eq!(employees[0].full_name(), "Grace Hopper");

    let summary = backend.rental_summary().await.unwrap();
    assert_eq!(summary.total_books, 120);
    assert_eq!(summary.overdue_books, 4);
}

#[tokio::test]
async fn test_forwards_bearer_token() {
    let base = spawn_backend(fake_backend_router(Some(FAKE_TOKEN))).await;

    let authorized = client(&base, Some(FAKE_TOKEN));
    assert_eq!(authorized.books(0, &BookSearch::default()).await.unwrap().content.len(), 2);

    let anonymous = client(&base, None);
    let err = anonymous.books(0, &BookSearch::default()).await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 401, .. }));
}

#[tokio::test]
async fn test_book_search_sends_filters() {
    let (base, calls) = spawn_recording_backend().await;
    let backend = client(&base, None);

    let found = backend
        .books(0, &BookSearch::new(" dune ", ""))
        .await
        .unwrap();
    assert_eq!(found.content.len(), 1);
    assert_eq!(found.content[0].author, "Frank Herbert");

    let found = backend
        .books(0, &BookSearch::new("", "austen"))
        .await
        .unwrap();
    assert_eq!(found.content[0].title, "Emma");

    let uris: Vec<String> = calls.all().into_iter().map(|call| call.uri).collect();
    assert_eq!(uris[0], "/api/books?page=0&size=50&title=dune");
    assert_eq!(uris[1], "/api/books?page=0&size=50&author=austen");
}

#[tokio::test]
async fn test_write_calls() {
    let (base, calls) = spawn_recording_backend().await;
    let backend = client(&base, None);

    let returned = backend.return_rental(RentalId::new(10)).await.unwrap();
    assert_eq!(returned.status, RentalStatus::Returned);
    assert!(returned.return_date.is_some());
    let overdue = backend.mark_rental_overdue(RentalId::new(10)).await.unwrap();
    assert_eq!(overdue.status, RentalStatus::Overdue);
    backend.delete_rental(RentalId::new(11)).await.unwrap();

    let input = AnnouncementInput {
        title: "Late opening".to_string(),
        content: "Doors open at noon.".to_string(),
    };
    let created = backend.create_announcement(&input).await.unwrap();
    assert_eq!(created.title, "Late opening");
    let updated = backend
        .update_announcement(AnnouncementId::new(3), &input)
        .await
        .unwrap();
    assert_eq!(updated.content, "Doors open at noon.");
    backend
        .delete_announcement(AnnouncementId::new(3))
        .await
        .unwrap();

    let employee = EmployeeInput {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@library.com".to_string(),
        phone_number: None,
    };
    let created = backend.create_employee(&employee).await.unwrap();
    assert_eq!(created.full_name(), "Ada Lovelace");
    backend
        .update_employee(EmployeeId::new(1), &employee)
        .await
        .unwrap();
    backend.delete_employee(EmployeeId::new(1)).await.unwrap();

    let writes: Vec<(String, String)> = calls
        .writes()
        .into_iter()
        .map(|call| (call.method, call.uri))
        .collect();
    let expected = [
        ("PUT", "/api/rentals/return/10"),
        ("PUT", "/api/rentals/overdue/10"),
        ("DELETE", "/api/rentals/11"),
        ("POST", "/api/announcements"),
        ("PUT", "/api/announcements/3"),
        ("DELETE", "/api/announcements/3"),
        ("POST", "/api/employees"),
        ("PUT", "/api/employees/1"),
        ("DELETE", "/api/employees/1"),
    ];
    assert_eq!(writes.len(), expected.len());
    for ((method, uri), (want_method, want_uri)) in writes.iter().zip(expected) {
        assert_eq!((method.as_str(), uri.as_str()), (want_method, want_uri));
    }

    let posted = &calls.writes()[6];
    assert_eq!(posted.body.as_ref().unwrap()["firstName"], "Ada");
    assert!(posted.body.as_ref().unwrap().get("phoneNumber").is_none());
}

#[tokio::test]
async fn test_missing_record_is_404() {
    let backend = client(&spawn_fake_backend().await, None);

    let err = backend
        .announcement(AnnouncementId::new(99))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 404, .. }));

    let err = backend.return_rental(RentalId::new(99)).await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 404, .. }));

    assert_eq!(
        backend.employee(EmployeeId::new(1)).await.unwrap().email,
        "grace@library.com"
    );
}

#[tokio::test]
async fn test_error_status() {
    let base = spawn_backend(Router::new().route(
        "/api/books",
        get(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;

    let err = client(&base, None).books(0, &BookSearch::default()).await.unwrap_err();
    match err {
        BackendError::Status { status, path } => {
            assert_eq!(status, 500);
            assert_eq!(path, "/api/books");
        }
        other => panic!("unexpected error: {other}"),
    }

    // Routes the fake does not serve are plain 404s
    let err = client(&base, None).employees().await.unwrap_err();
    assert!(matches!(err, BackendError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_malformed_body() {
    let base = spawn_backend(
        Router::new().route("/api/reports/rental-summary", get(|| async { "<html>" })),
    )
    .await;

    let err = client(&base, None).rental_summary().await.unwrap_err();
    assert!(matches!(err, BackendError::Decode(_)));
}

#[tokio::test]
async fn test_unreachable_backend() {
    let base = Url::parse("http://127.0.0.1:9").unwrap();
    let err = client(&base, None).books(0, &BookSearch::default()).await.unwrap_err();
    assert!(matches!(err, BackendError::Request(_)));
}

#[tokio::test]
async fn test_pages_render_backend_data() {
    let base = spawn_fake_backend().await;
    let app = TestApp::with_storage(Arc::new(MemoryStorage::new()), base.as_str());
    app.login("admin@library.com", "password").await;

    let books = body_text(app.get("/books").await).await;
    assert!(books.contains("Dune"));
    assert!(books.contains("Frank Herbert"));
    assert!(books.contains("1 / 4"));

    let dashboard = body_text(app.get("/dashboard").await).await;
    assert!(dashboard.contains("Welcome back, Admin User"));
    assert!(dashboard.contains("Dune"));
    assert!(!dashboard.contains("role=\"alert\""));

    let employees = body_text(app.get("/employees").await).await;
    assert!(employees.contains("Grace Hopper"));

    let reports = body_text(app.get("/reports").await).await;
    assert!(reports.contains("25%"));

    let reviews = body_text(app.get("/reviews").await).await;
    assert!(reviews.contains("A classic"));

    let announcements = body_text(app.get("/announcements").await).await;
    assert!(announcements.contains("Closed on Monday"));
}

#[tokio::test]
async fn test_pages_render_banner_when_backend_down() {
    let app = TestApp::new();
    app.login("admin@library.com", "password").await;

    for (path, message) in [
        ("/books", "Books could not be loaded"),
        ("/employees", "Employees could not be loaded"),
        ("/reports", "The report could not be loaded"),
        ("/dashboard", "Some figures could not be loaded"),
    ] {
        let response = app.get(path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        assert!(body_text(response).await.contains(message), "{path}");
    }
}

#[tokio::test]
async fn test_summary_api() {
    let base = spawn_fake_backend().await;
    let app = TestApp::with_storage(Arc::new(MemoryStorage::new()), base.as_str());

    app.login("john.doe@library.com", "password").await;
    let response = app.get("/api/reports/rental-summary").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    app.login("admin@library.com", "password").await;
    let body = body_json(app.get("/api/reports/rental-summary").await).await;
    assert_eq!(body["totalBooks"], 120);
    assert_eq!(body["rentedBooks"], 30);
}

#[tokio::test]
async fn test_summary_api_backend_down() {
    let app = TestApp::new();
    app.login("admin@library.com", "password").await;

    let response = app.get("/api/reports/rental-summary").await;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_text(response).await, "Library backend unavailable");
}
