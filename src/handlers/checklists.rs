use super::common::{no_content_response, paginate, MAX_LIMIT};
use crate::{
    catalog::{self, ChecklistTemplate},
    errors::ServiceError,
    models::{Checklist, ChecklistInput},
    ApiResponse, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

pub fn checklist_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_checklists).post(create_checklist))
        .route(
            "/:id",
            get(get_checklist)
                .put(update_checklist)
                .delete(delete_checklist),
        )
}

pub fn checklist_template_routes() -> Router<AppState> {
    Router::new().route("/", get(list_checklist_templates))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ChecklistListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Matches the checklist name or its inspection category name
    pub search: Option<String>,
    pub category_id: Option<String>,
}

/// Template catalog, keyed by inspection category name
#[utoipa::path(
    get,
    path = "/api/v1/checklist-templates",
    summary = "List checklist templates",
    responses(
        (status = 200, description = "Templates in catalog order", body = ApiResponse<Vec<ChecklistTemplate>>),
    ),
    tag = "Checklists"
)]
pub async fn list_checklist_templates() -> Json<ApiResponse<Vec<ChecklistTemplate>>> {
    Json(ApiResponse::success(catalog::templates()))
}

#[utoipa::path(
    get,
    path = "/api/v1/checklists",
    summary = "List checklists",
    params(ChecklistListParams),
    responses(
        (status = 200, description = "Checklists retrieved", body = ApiResponse<PaginatedResponse<Checklist>>),
    ),
    tag = "Checklists"
)]
pub async fn list_checklists(
    State(state): State<AppState>,
    Query(params): Query<ChecklistListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Checklist>>>, ServiceError> {
    let checklists = state
        .services
        .checklists
        .list(params.search.as_deref(), params.category_id.as_deref())
        .await?;
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, MAX_LIMIT);
    Ok(Json(ApiResponse::success(paginate(checklists, page, limit))))
}

/// Create a checklist from the template of its inspection category
#[utoipa::path(
    post,
    path = "/api/v1/checklists",
    summary = "Create checklist",
    description = "Items are copied from the template catalog entry named after the inspection category. Unknown names give an empty checklist.",
    request_body = ChecklistInput,
    responses(
        (status = 201, description = "Checklist created", body = ApiResponse<Checklist>),
        (status = 400, description = "Missing category or name, or unknown category", body = crate::errors::ErrorResponse),
    ),
    tag = "Checklists"
)]
pub async fn create_checklist(
    State(state): State<AppState>,
    Json(input): Json<ChecklistInput>,
) -> Result<Response, ServiceError> {
    let checklist = state.services.checklists.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(checklist))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/checklists/{id}",
    summary = "Get checklist",
    params(("id" = String, Path, description = "Checklist ID")),
    responses(
        (status = 200, description = "Checklist retrieved", body = ApiResponse<Checklist>),
        (status = 404, description = "Checklist not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Checklists"
)]
pub async fn get_checklist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Checklist>>, ServiceError> {
    let checklist = state.services.checklists.get(&id).await?;
    Ok(Json(ApiResponse::success(checklist)))
}

#[utoipa::path(
    put,
    path = "/api/v1/checklists/{id}",
    summary = "Update checklist",
    description = "Changing the name or category re-instantiates the items from the catalog.",
    params(("id" = String, Path, description = "Checklist ID")),
    request_body = ChecklistInput,
    responses(
        (status = 200, description = "Checklist updated", body = ApiResponse<Checklist>),
        (status = 400, description = "Missing category or name, or unknown category", body = crate::errors::ErrorResponse),
        (status = 404, description = "Checklist not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Checklists"
)]
pub async fn update_checklist(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ChecklistInput>,
) -> Result<Json<ApiResponse<Checklist>>, ServiceError> {
    let checklist = state.services.checklists.update(&id, input).await?;
    Ok(Json(ApiResponse::success(checklist)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/checklists/{id}",
    summary = "Delete checklist",
    params(("id" = String, Path, description = "Checklist ID")),
    responses((status = 204, description = "Checklist deleted")),
    tag = "Checklists"
)]
pub async fn delete_checklist(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    state.services.checklists.delete(&id).await?;
    Ok(no_content_response())
}
