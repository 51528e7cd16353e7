//! Sales Web Library
//!
//! Sellers, departments and sales-record search over SeaORM, served by axum.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod middleware_helpers;
pub mod openapi;
pub mod seeding;
pub mod services;
pub mod tracing;

use axum::{
    http::HeaderValue,
    response::Json,
    routing::get,
    Router,
};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone());
        Self {
            db,
            config,
            services,
        }
    }

    pub fn department_service(&self) -> Arc<services::DepartmentService> {
        self.services.departments.clone()
    }

    pub fn seller_service(&self) -> Arc<services::SellerService> {
        self.services.sellers.clone()
    }

    pub fn sales_record_service(&self) -> Arc<services::SalesRecordService> {
        self.services.sales_records.clone()
    }
}

// Common response wrappers
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

impl ResponseMeta {
    fn capture() -> Self {
        Self {
            request_id: crate::tracing::current_request_id().map(|rid| rid.as_str().to_string()),
            timestamp: Utc::now().to_rfc3339(),
        }
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    /// A view re-rendered because its input failed validation.
    pub fn invalid(data: T, errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: Some(data),
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }
}

#[cfg(test)]
mod response_tests {
    use super::*;
    use chrono::DateTime;

    #[tokio::test]
    async fn success_response_includes_request_metadata() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-123"), async {
                ApiResponse::success("ok")
            })
            .await;

        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-123"));
        DateTime::parse_from_rfc3339(&meta.timestamp).expect("timestamp should parse");
    }

    #[tokio::test]
    async fn invalid_response_keeps_data_and_errors() {
        let response =
            crate::tracing::scope_request_id(crate::tracing::RequestId::new("meta-invalid"), async {
                ApiResponse::invalid(7, vec!["name: Name is required".into()])
            })
            .await;

        assert!(!response.success);
        assert_eq!(response.data, Some(7));
        assert_eq!(response.errors.map(|e| e.len()), Some(1));
        let meta = response.meta.expect("metadata expected");
        assert_eq!(meta.request_id.as_deref(), Some("meta-invalid"));
    }
}

/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

/// Seller, sales-record, department and error-page routes.
pub fn sales_web_routes() -> Router<AppState> {
    let sellers = Router::new()
        .route("/", get(handlers::sellers::list_sellers))
        .route(
            "/create",
            get(handlers::sellers::create_form).post(handlers::sellers::create_seller),
        )
        .route("/:id", get(handlers::sellers::seller_details))
        .route(
            "/:id/edit",
            get(handlers::sellers::edit_form).post(handlers::sellers::edit_seller),
        )
        .route(
            "/:id/delete",
            get(handlers::sellers::delete_confirm).post(handlers::sellers::delete_seller),
        );

    let sales_records = Router::new()
        .route("/", get(handlers::sales_records::search_index))
        .route("/simple-search", get(handlers::sales_records::simple_search))
        .route(
            "/grouping-search",
            get(handlers::sales_records::grouping_search),
        );

    Router::new()
        .nest("/sellers", sellers)
        .nest("/sales-records", sales_records)
        .route("/departments", get(handlers::departments::list_departments))
        .route("/error", get(handlers::error_page::error_page))
}

/// CORS from config: explicit origins when configured, otherwise permissive.
pub fn cors_layer(cfg: &config::AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::permissive()
    } else {
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any)
    }
}

/// Full application: routes, health, Swagger UI and the middleware stack.
pub fn app_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    Router::<AppState>::new()
        .route("/", get(|| async { "sales-web up" }))
        .merge(sales_web_routes())
        .nest("/health", health::health_routes())
        .merge(openapi::swagger_ui())
        // HTTP tracing layer for consistent request/response telemetry
        .layer(crate::tracing::configure_http_tracing())
        .layer(cors)
        // Ensure every request carries a request id for traceability
        .layer(axum::middleware::from_fn(
            middleware_helpers::request_id::request_id_middleware,
        ))
        .with_state(state)
}
