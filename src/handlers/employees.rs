use super::common::{no_content_response, paginate, ListParams};
use crate::{
    errors::ServiceError,
    models::{Employee, EmployeeInput},
    ApiResponse, AppState, PaginatedResponse,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route(
            "/:id",
            get(get_employee).put(update_employee).delete(delete_employee),
        )
}

/// List employees
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    summary = "List employees",
    description = "Paginated employee list, searchable by name, DRT or role",
    params(ListParams),
    responses(
        (status = 200, description = "Employees retrieved", body = ApiResponse<PaginatedResponse<Employee>>,
            headers(("X-Request-Id" = String, description = "Unique request id"))
        ),
        (status = 500, description = "Internal server error", body = crate::errors::ErrorResponse),
    ),
    tag = "Employees"
)]
pub async fn list_employees(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ApiResponse<PaginatedResponse<Employee>>>, ServiceError> {
    let employees = state.services.employees.list(params.search()).await?;
    Ok(Json(ApiResponse::success(paginate(
        employees,
        params.page(),
        params.limit(),
    ))))
}

/// Create an employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    summary = "Create employee",
    description = "Registers an employee. Name, DRT and role are all required.",
    request_body = EmployeeInput,
    responses(
        (status = 201, description = "Employee created", body = ApiResponse<Employee>),
        (status = 400, description = "Missing or invalid fields", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent modification", body = crate::errors::ErrorResponse),
    ),
    tag = "Employees"
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Json(input): Json<EmployeeInput>,
) -> Result<Response, ServiceError> {
    let employee = state.services.employees.create(input).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(employee))).into_response())
}

/// Get an employee
#[utoipa::path(
    get,
    path = "/api/v1/employees/{id}",
    summary = "Get employee",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Employee retrieved", body = ApiResponse<Employee>),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
    ),
    tag = "Employees"
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Employee>>, ServiceError> {
    let employee = state.services.employees.get(&id).await?;
    Ok(Json(ApiResponse::success(employee)))
}

/// Update an employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{id}",
    summary = "Update employee",
    params(("id" = String, Path, description = "Employee ID")),
    request_body = EmployeeInput,
    responses(
        (status = 200, description = "Employee updated", body = ApiResponse<Employee>),
        (status = 400, description = "Missing or invalid fields", body = crate::errors::ErrorResponse),
        (status = 404, description = "Employee not found", body = crate::errors::ErrorResponse),
        (status = 409, description = "Concurrent modification", body = crate::errors::ErrorResponse),
    ),
    tag = "Employees"
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(input): Json<EmployeeInput>,
) -> Result<Json<ApiResponse<Employee>>, ServiceError> {
    let employee = state.services.employees.update(&id, input).await?;
    Ok(Json(ApiResponse::success(employee)))
}

/// Delete an employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{id}",
    summary = "Delete employee",
    description = "Idempotent. Service orders keep their reference to the removed employee.",
    params(("id" = String, Path, description = "Employee ID")),
    responses(
        (status = 204, description = "Employee deleted"),
        (status = 409, description = "Concurrent modification", body = crate::errors::ErrorResponse),
    ),
    tag = "Employees"
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Response, ServiceError> {
    state.services.employees.delete(&id).await?;
    Ok(no_content_response())
}
