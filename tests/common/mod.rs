#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chrono::NaiveDate;
use sales_web::{config::AppConfig, db, seeding, AppState};
use serde_json::Value;
use tower::ServiceExt;

/// Helper harness for spinning up the application over an in-memory SQLite
/// store, migrated and seeded with the sample data.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Fresh store with the sample data.
    pub async fn new() -> Self {
        Self::build(true).await
    }

    /// Fresh store with the schema only.
    pub async fn empty() -> Self {
        Self::build(false).await
    }

    async fn build(seed: bool) -> Self {
        // A single connection keeps every query on the same in-memory database.
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            18_080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        if seed {
            seeding::seed(&pool).await.expect("failed to seed test data");
        }

        let state = AppState::new(Arc::new(pool), cfg);
        let router = sales_web::app_router(state.clone());
        Self { router, state }
    }

    pub async fn get(&self, uri: &str) -> Response {
        self.send(Request::builder().method(Method::GET).uri(uri).body(Body::empty()))
            .await
    }

    /// Posts an `application/x-www-form-urlencoded` body.
    pub async fn post_form(&self, uri: &str, fields: &[(&str, &str)]) -> Response {
        let body: String = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();
        self.send(
            Request::builder()
                .method(Method::POST)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body)),
        )
        .await
    }

    async fn send(&self, request: Result<Request<Body>, axum::http::Error>) -> Response {
        let request = request.expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }
}

pub async fn json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    serde_json::from_slice(&bytes).expect("body is not json")
}

pub fn location(response: &Response) -> String {
    response
        .headers()
        .get(header::LOCATION)
        .expect("missing location header")
        .to_str()
        .expect("location is not ascii")
        .to_string()
}

pub fn assert_redirect(response: &Response, to: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(response), to);
}

pub fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}
