use super::common::{no_content_response, paginate, ListParams};
use crate::{
    errors::ServiceError,
    models::{InspectionCategory, InspectionCategoryInput},
    ApiResponse, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

pub fn inspection_category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_inspection_categories).post(create_inspection_category))
        .route(
            "/:id",
            get(get_inspection_category)
                .put(update_inspection_category)
                .delete(delete_inspection_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/v1/inspection-categories",
    summary = "List inspection categories",
    params(ListParams),
    responses(
        (status = 200, description = "Categories retrieved", body = ApiResponse<PaginatedResponse<InspectionCategory>>),
    ),
    tag = "Inspection Categories"
)]
pub async fn list_inspection_categories(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<InspectionCategory>>>, ServiceError> {
    let categories = state
        .services
        .inspection_categories
        .list(params.search())
        .await?;
    Ok(Json(ApiResponse::success(paginate(
        categories,
        params.page(),
        params.limit(),
    ))))
}

#[utoipa::path(
    post,
    path = "/api/v1/inspection-categories",
    summary = "Create inspection category",
    request_body = InspectionCategoryInput,
    responses(
        (status = 201, description = "Category created", body = ApiResponse<InspectionCategory>),
        (status = 400, description = "Name is required", body = crate::errors::ErrorResponse),
    ),
    tag = "Inspection Categories"
)]
pub async fn create_inspection_category(
    State(state): State<AppState>,
    Json(input): Json<InspectionCategoryInput>,
) -> Result<Response, ServiceError> {
    let category = state.services.inspection_categories.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(category))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/inspection-categories/{id}",
    summary = "Get inspection category",
    params(("id" = String, Path, description = "Category ID")),
    responses(
        (status = 200, description = "Category retrieved", body = ApiResponse<InspectionCategory>),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Inspection Categories"
)]
pub async fn get_inspection_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<InspectionCategory>>, ServiceError> {
    let category = state.services.inspection_categories.get(&id).await?;
    Ok(Json(ApiResponse::success(category)))
}

#[utoipa::path(
    put,
    path = "/api/v1/inspection-categories/{id}",
    summary = "Rename inspection category",
    description = "Existing checklists keep the items they were created with.",
    params(("id" = String, Path, description = "Category ID")),
    request_body = InspectionCategoryInput,
    responses(
        (status = 200, description = "Category updated", body = ApiResponse<InspectionCategory>),
        (status = 400, description = "Name is required", body = crate::errors::ErrorResponse),
        (status = 404, description = "Category not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Inspection Categories"
)]
pub async fn update_inspection_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<InspectionCategoryInput>,
) -> Result<Json<ApiResponse<InspectionCategory>>, ServiceError> {
    let category = state.services.inspection_categories.update(&id, input).await?;
    Ok(Json(ApiResponse::success(category)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/inspection-categories/{id}",
    summary = "Delete inspection category",
    params(("id" = String, Path, description = "Category ID")),
    responses((status = 204, description = "Category deleted")),
    tag = "Inspection Categories"
)]
pub async fn delete_inspection_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    state.services.inspection_categories.delete(&id).await?;
    Ok(no_content_response())
}
