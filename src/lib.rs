//! Maintenance API Library
//!
//! Employees, equipment, inspection checklists and service orders for a
//! maintenance team, with a dashboard and printable service orders.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod auth;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod middleware_helpers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod services;
pub mod tracing;

use axum::{extract::State, response::Json, routing::get, Router};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub event_sender: Arc<events::EventSender>,
    pub services: handlers::AppServices,
}

// Common response wrappers
#[derive(Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub errors: Option<Vec<String>>,
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

#[derive(Serialize, ToSchema)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
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

    /// Success carrying a user-facing confirmation
    pub fn success_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::success(data)
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message),
            errors: None,
            meta: Some(ResponseMeta::capture()),
        }
    }

    pub fn validation_errors(errors: Vec<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some("Validation failed".to_string()),
            errors: Some(errors),
            meta: Some(ResponseMeta::capture()),
        }
    }
}


/// Standard API result type for JSON responses
pub type ApiResult<T> = Result<Json<ApiResponse<T>>, errors::ServiceError>;

pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .route("/status", get(api_status))
        .route("/health", get(health_check))
        .nest("/employees", handlers::employees::employee_routes())
        .nest("/equipment", handlers::equipment::equipment_routes())
        .nest(
            "/equipment-categories",
            handlers::equipment::equipment_category_routes(),
        )
        .nest(
            "/inspection-categories",
            handlers::inspection_categories::inspection_category_routes(),
        )
        .nest("/checklists", handlers::checklists::checklist_routes())
        .nest(
            "/checklist-templates",
            handlers::checklists::checklist_template_routes(),
        )
        .nest(
            "/service-orders",
            handlers::service_orders::service_order_routes(),
        )
        .nest("/dashboard", handlers::dashboard::dashboard_routes())
        .nest("/company", handlers::company::company_routes())
}

#[utoipa::path(
    get,
    path = "/api/v1/status",
    summary = "Service status",
    responses((status = 200, description = "Build and environment information", body = ApiResponse<serde_json::Value>)),
    tag = "Health"
)]
pub async fn api_status(State(state): State<AppState>) -> ApiResult<Value> {
    let status_data = json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "git": option_env!("GIT_HASH").unwrap_or("unknown"),
        "service": "maintenance-api",
        "timestamp": Utc::now().to_rfc3339(),
        "environment": state.config.environment,
        "company_backend": state.services.company.is_configured(),
    });

    Ok(Json(ApiResponse::success(status_data)))
}

#[utoipa::path(
    get,
    path = "/api/v1/health",
    summary = "Health check",
    responses((status = 200, description = "Database connectivity", body = ApiResponse<serde_json::Value>)),
    tag = "Health"
)]
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Value> {
    let db_status = match db::check_connection(&state.db).await {
        Ok(()) => "healthy",
        Err(e) => {
            ::tracing::warn!(error = %e, "database health check failed");
            "unhealthy"
        }
    };

    let health_data = json!({
        "status": db_status,
        "checks": {
            "database": db_status,
            "events": if state.event_sender.is_closed() { "stopped" } else { "running" },
        },
        "timestamp": Utc::now().to_rfc3339(),
    });

    Ok(Json(ApiResponse::success(health_data)))
}

pub mod prelude {
    pub use crate::errors::*;
    pub use crate::events::{Event, EventSender};
    pub use crate::models::*;
    pub use crate::openapi::ApiDocV1;
    pub use crate::{ApiResponse, ApiResult, AppState, PaginatedResponse};
}
