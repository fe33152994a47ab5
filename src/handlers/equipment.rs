use super::common::{no_content_response, paginate, MAX_LIMIT};
use crate::{
    errors::ServiceError,
    models::{equipment::EquipmentCategoryView, Equipment, EquipmentInput},
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

pub fn equipment_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_equipment).post(create_equipment))
        .route(
            "/:id",
            get(get_equipment)
                .put(update_equipment)
                .delete(delete_equipment),
        )
}

pub fn equipment_category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_equipment_categories))
        .route("/:id", get(get_equipment_category))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EquipmentListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Matches TAG, name or installation location
    pub search: Option<String>,
    /// Equipment category id, e.g. `generator`
    pub category: Option<String>,
}

/// List the fixed equipment categories
#[utoipa::path(
    get,
    path = "/api/v1/equipment-categories",
    summary = "List equipment categories",
    responses(
        (status = 200, description = "Categories retrieved", body = ApiResponse<Vec<EquipmentCategoryView>>),
    ),
    tag = "Equipment"
)]
pub async fn list_equipment_categories(
    State(state): State<AppState>,
) -> Json<ApiResponse<Vec<EquipmentCategoryView>>> {
    Json(ApiResponse::success(state.services.equipment.categories()))
}

/// Get an equipment category
#[utoipa::path(
    get,
    path = "/api/v1/equipment-categories/{id}",
    summary = "Get equipment category",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category retrieved", body = ApiResponse<EquipmentCategoryView>),
        (status = 404, description = "Unknown category", body = crate::errors::ErrorResponse),
    ),
    tag = "Equipment"
)]
pub async fn get_equipment_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<EquipmentCategoryView>>, ServiceError> {
    let category = state.services.equipment.category(&id)?;
    Ok(Json(ApiResponse::success(category)))
}

/// List equipment
#[utoipa::path(
    get,
    path = "/api/v1/equipment",
    summary = "List equipment",
    params(EquipmentListParams),
    responses(
        (status = 200, description = "Equipment retrieved", body = ApiResponse<PaginatedResponse<Equipment>>),
        (status = 400, description = "Unknown category filter", body = crate::errors::ErrorResponse),
    ),
    tag = "Equipment"
)]
pub async fn list_equipment(
    State(state): State<AppState>,
    Query(params): Query<EquipmentListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Equipment>>>, ServiceError> {
    let equipment = state
        .services
        .equipment
        .list(params.search.as_deref(), params.category.as_deref())
        .await?;
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, MAX_LIMIT);
    Ok(Json(ApiResponse::success(paginate(equipment, page, limit))))
}

/// Register equipment
#[utoipa::path(
    post,
    path = "/api/v1/equipment",
    summary = "Create equipment",
    description = "Validates TAG format, installation location and the fields required by the category, in that order.",
    request_body = EquipmentInput,
    responses(
        (status = 201, description = "Equipment created", body = ApiResponse<Equipment>),
        (status = 400, description = "First failing validation rule", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent modification", body = crate::errors::ErrorResponse),
    ),
    tag = "Equipment"
)]
pub async fn create_equipment(
    State(state): State<AppState>,
    Json(input): Json<EquipmentInput>,
) -> Result<Response, ServiceError> {
    let equipment = state.services.equipment.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(equipment))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/equipment/{id}",
    summary = "Get equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses(
        (status = 200, description = "Equipment retrieved", body = ApiResponse<Equipment>),
        (status = 404, description = "Equipment not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Equipment"
)]
pub async fn get_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Equipment>>, ServiceError> {
    let equipment = state.services.equipment.get(&id).await?;
    Ok(Json(ApiResponse::success(equipment)))
}

#[utoipa::path(
    put,
    path = "/api/v1/equipment/{id}",
    summary = "Update equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    request_body = EquipmentInput,
    responses(
        (status = 200, description = "Equipment updated", body = ApiResponse<Equipment>),
        (status = 400, description = "First failing validation rule", body = crate::errors::ErrorResponse),
        (status = 404, description = "Equipment not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Equipment"
)]
pub async fn update_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<EquipmentInput>,
) -> Result<Json<ApiResponse<Equipment>>, ServiceError> {
    let equipment = state.services.equipment.update(&id, input).await?;
    Ok(Json(ApiResponse::success(equipment)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/equipment/{id}",
    summary = "Delete equipment",
    params(("id" = String, Path, description = "Equipment ID")),
    responses((status = 204, description = "Equipment deleted")),
    tag = "Equipment"
)]
pub async fn delete_equipment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    state.services.equipment.delete(&id).await?;
    Ok(no_content_response())
}
