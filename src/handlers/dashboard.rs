use crate::{errors::ServiceError, services::dashboard::DashboardSummary, ApiResponse, AppState};
use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::Deserialize;
use utoipa::IntoParams;

pub fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/", get(get_dashboard))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DashboardParams {
    /// Year of the monthly series (default: current year)
    pub year: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/v1/dashboard",
    summary = "Dashboard summary",
    description = "Order counts by status, entity totals, equipment per category and orders per month split into preventive and routine.",
    params(DashboardParams),
    responses((status = 200, description = "Summary computed", body = ApiResponse<DashboardSummary>)),
    tag = "Dashboard"
)]
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(params): Query<DashboardParams>,
) -> Result<Json<ApiResponse<DashboardSummary>>, ServiceError> {
    let year = params.year.unwrap_or_else(|| Utc::now().year());
    let summary = state.services.dashboard.summary(year).await?;
    Ok(Json(ApiResponse::success(summary)))
}
