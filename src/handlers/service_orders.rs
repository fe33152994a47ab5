use super::common::{no_content_response, paginate, MAX_LIMIT};
use crate::{
    auth::SessionToken,
    errors::ServiceError,
    models::{ServiceOrder, ServiceOrderInput, ServiceOrderStatus},
    services::{
        documents,
        service_orders::{ChecklistSelection, ServiceOrderDetail},
    },
    ApiResponse, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use chrono::{Datelike, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::{IntoParams, ToSchema};

pub fn service_order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_service_orders).post(create_service_order))
        .route("/next-number", get(next_number))
        .route("/checklist-options", get(checklist_options))
        .route(
            "/:id",
            get(get_service_order)
                .put(update_service_order)
                .delete(delete_service_order),
        )
        .route("/:id/status", put(update_service_order_status))
        .route("/:id/pdf", get(service_order_pdf))
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ServiceOrderListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    /// Matches number, employee, category names and observations
    pub search: Option<String>,
    pub status: Option<ServiceOrderStatus>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NextNumberParams {
    /// Year suffix of the generated number (default: current year)
    pub year: Option<i32>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ChecklistOptionsParams {
    pub inspection_category_id: Option<String>,
    pub selected_checklist_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NextNumberResponse {
    #[schema(example = "00013/2025")]
    pub number: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StatusUpdate {
    pub status: ServiceOrderStatus,
}

#[utoipa::path(
    get,
    path = "/api/v1/service-orders",
    summary = "List service orders",
    description = "Orders joined with employee, categories and checklist. Missing references resolve to fallback labels.",
    params(ServiceOrderListParams),
    responses(
        (status = 200, description = "Orders retrieved", body = ApiResponse<PaginatedResponse<ServiceOrderDetail>>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
    ),
    tag = "Service Orders"
)]
pub async fn list_service_orders(
    State(state): State<AppState>,
    Query(params): Query<ServiceOrderListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<ServiceOrderDetail>>>, ServiceError> {
    let orders = state
        .services
        .service_orders
        .list(params.search.as_deref(), params.status)
        .await?;
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, MAX_LIMIT);
    Ok(Json(ApiResponse::success(paginate(orders, page, limit))))
}

#[utoipa::path(
    get,
    path = "/api/v1/service-orders/next-number",
    summary = "Suggest the next order number",
    description = "Largest numeric prefix across all orders plus one, as NNNNN/YYYY.",
    params(NextNumberParams),
    responses((status = 200, description = "Next number", body = ApiResponse<NextNumberResponse>)),
    tag = "Service Orders"
)]
pub async fn next_number(
    State(state): State<AppState>,
    Query(params): Query<NextNumberParams>,
) -> Result<Json<ApiResponse<NextNumberResponse>>, ServiceError> {
    let year = params.year.unwrap_or_else(|| Utc::now().year());
    let number = state.services.service_orders.generate_next_number(year).await?;
    Ok(Json(ApiResponse::success(NextNumberResponse { number })))
}

#[utoipa::path(
    get,
    path = "/api/v1/service-orders/checklist-options",
    summary = "Checklists selectable for an inspection category",
    description = "The selected checklist is kept only when it belongs to the category.",
    params(ChecklistOptionsParams),
    responses((status = 200, description = "Options and surviving selection", body = ApiResponse<ChecklistSelection>)),
    tag = "Service Orders"
)]
pub async fn checklist_options(
    State(state): State<AppState>,
    Query(params): Query<ChecklistOptionsParams>,
) -> Result<Json<ApiResponse<ChecklistSelection>>, ServiceError> {
    let selection = state
        .services
        .service_orders
        .checklist_options(
            params.inspection_category_id.as_deref(),
            params.selected_checklist_id.as_deref(),
        )
        .await?;
    Ok(Json(ApiResponse::success(selection)))
}

#[utoipa::path(
    post,
    path = "/api/v1/service-orders",
    summary = "Create service order",
    description = "Required fields are checked in form order and the first missing one is reported. New orders start pending.",
    request_body = ServiceOrderInput,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<ServiceOrder>),
        (status = 400, description = "Missing field, unknown reference or checklist outside the inspection category", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate number (when enforced) or concurrent modification", body = crate::errors::ErrorResponse),
    ),
    tag = "Service Orders"
)]
pub async fn create_service_order(
    State(state): State<AppState>,
    Json(input): Json<ServiceOrderInput>,
) -> Result<Response, ServiceError> {
    let order = state.services.service_orders.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(order))).into_response())
}

#[utoipa::path(
    get,
    path = "/api/v1/service-orders/{id}",
    summary = "Get service order detail",
    params(("id" = String, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "Order with its references", body = ApiResponse<ServiceOrderDetail>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Service Orders"
)]
pub async fn get_service_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ServiceOrderDetail>>, ServiceError> {
    let detail = state.services.service_orders.detail(&id).await?;
    Ok(Json(ApiResponse::success(detail)))
}

#[utoipa::path(
    put,
    path = "/api/v1/service-orders/{id}",
    summary = "Update service order",
    params(("id" = String, Path, description = "Service order ID")),
    request_body = ServiceOrderInput,
    responses(
        (status = 200, description = "Order updated", body = ApiResponse<ServiceOrder>),
        (status = 400, description = "Validation failed", body = crate::errors::ErrorResponse),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Duplicate number (when enforced) or concurrent modification", body = crate::errors::ErrorResponse),
    ),
    tag = "Service Orders"
)]
pub async fn update_service_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<ServiceOrderInput>,
) -> Result<Json<ApiResponse<ServiceOrder>>, ServiceError> {
    let order = state.services.service_orders.update(&id, input).await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    put,
    path = "/api/v1/service-orders/{id}/status",
    summary = "Change service order status",
    description = "Any status may follow any other.",
    params(("id" = String, Path, description = "Service order ID")),
    request_body = StatusUpdate,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<ServiceOrder>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Service Orders"
)]
pub async fn update_service_order_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<ApiResponse<ServiceOrder>>, ServiceError> {
    let order = state
        .services
        .service_orders
        .update_status(&id, update.status)
        .await?;
    Ok(Json(ApiResponse::success(order)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/service-orders/{id}",
    summary = "Delete service order",
    params(("id" = String, Path, description = "Service order ID")),
    responses((status = 204, description = "Order deleted")),
    tag = "Service Orders"
)]
pub async fn delete_service_order(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    state.services.service_orders.delete(&id).await?;
    Ok(no_content_response())
}

/// Printable order as a PDF attachment
#[utoipa::path(
    get,
    path = "/api/v1/service-orders/{id}/pdf",
    summary = "Download service order PDF",
    description = "Company header data is fetched with the caller's bearer session when the backend is configured.",
    params(("id" = String, Path, description = "Service order ID")),
    responses(
        (status = 200, description = "PDF document", content_type = "application/pdf", body = Vec<u8>),
        (status = 404, description = "Order not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Company backend failed", body = crate::errors::ErrorResponse),
    ),
    security((), ("Bearer" = [])),
    tag = "Service Orders"
)]
pub async fn service_order_pdf(
    State(state): State<AppState>,
    Path(id): Path<String>,
    session: SessionToken,
) -> Result<Response, ServiceError> {
    let detail = state.services.service_orders.detail(&id).await?;
    let company = state
        .services
        .company
        .profile_for_document(session.as_deref())
        .await?;

    let bytes =
        documents::render_service_order(&detail, company.as_ref(), Utc::now().date_naive())?;
    let filename = documents::filename(&detail.order.number);
    info!(order_id = %id, size = bytes.len(), "service order pdf rendered");

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
