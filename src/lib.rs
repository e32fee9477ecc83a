//! FarmTrace API Library
//!
//! Resolves batch codes scanned from product labels into provenance records.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

// Core modules
pub mod aggregation;
pub mod config;
pub mod db;
pub mod dto;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod health;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{middleware, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use utoipa::ToSchema;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub provenance: Arc<services::ProvenanceService>,
}

impl AppState {
    /// Builds the state with database-backed aggregation strategies.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let provenance = Arc::new(services::ProvenanceService::from_config(
            db.clone(),
            &config,
        ));
        Self {
            db,
            config,
            provenance,
        }
    }
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
}

#[derive(Serialize, ToSchema)]
pub struct ResponseMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
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
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    Router::new().route("/trace/:code", get(handlers::trace::get_trace))
}

/// Full application router: versioned API, health and the OpenAPI document,
/// wrapped in request-id propagation and HTTP tracing.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", api_v1_routes())
        .nest("/health", health::health_routes())
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
        .layer(CorsLayer::permissive())
        .layer(crate::tracing::http_trace_layer())
        .layer(middleware::from_fn(crate::tracing::request_id_middleware))
        .with_state(state)
}
