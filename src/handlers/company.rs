use super::common::no_content_response;
use crate::{
    auth::SessionToken,
    backend::{LogoUpload, MAX_LOGO_BYTES},
    errors::ServiceError,
    models::{Company, CompanyInput, CompanyLogo, CompanyProfile, LogoPosition},
    ApiResponse, AppState,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

/// Headroom above the logo limit so oversize files reach the upload validation
const BODY_LIMIT_SLACK: usize = 64 * 1024;

pub fn company_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_company).put(save_company))
        .route(
            "/logos/:position",
            post(upload_company_logo)
                .delete(remove_company_logo)
                .layer(DefaultBodyLimit::max(MAX_LOGO_BYTES + BODY_LIMIT_SLACK)),
        )
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LogoUploadParams {
    /// Original file name, used for the stored extension
    pub filename: Option<String>,
}

#[utoipa::path(
    get,
    path = "/api/v1/company",
    summary = "Get the session user's company",
    description = "Company and logos linked to the caller's profile. The company is empty until it is saved for the first time.",
    responses(
        (status = 200, description = "Company profile", body = ApiResponse<CompanyProfile>),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse),
        (status = 404, description = "User profile not found", body = crate::errors::ErrorResponse),
        (status = 502, description = "Company backend unavailable or not configured", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Company"
)]
pub async fn get_company(
    State(state): State<AppState>,
    session: SessionToken,
) -> Result<Json<ApiResponse<CompanyProfile>>, ServiceError> {
    let profile = state.services.company.profile(session.as_deref()).await?;
    Ok(Json(ApiResponse::success(profile)))
}

#[utoipa::path(
    put,
    path = "/api/v1/company",
    summary = "Save the session user's company",
    description = "Creates the company and links it to the profile on first save, updates it afterwards.",
    request_body = CompanyInput,
    responses(
        (status = 200, description = "Company saved", body = ApiResponse<Company>),
        (status = 400, description = "Name is required", body = crate::errors::ErrorResponse),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse),
        (status = 502, description = "Company backend unavailable or not configured", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Company"
)]
pub async fn save_company(
    State(state): State<AppState>,
    session: SessionToken,
    Json(input): Json<CompanyInput>,
) -> Result<Json<ApiResponse<Company>>, ServiceError> {
    let company = state.services.company.save(session.as_deref(), input).await?;
    Ok(Json(ApiResponse::success_with_message(
        company,
        "Dados da empresa salvos com sucesso!",
    )))
}

/// Upload a logo as the raw request body
#[utoipa::path(
    post,
    path = "/api/v1/company/logos/{position}",
    summary = "Upload company logo",
    description = "Send the image bytes as the body with an image/* Content-Type. Replaces any logo already stored for the position.",
    params(
        ("position" = LogoPosition, Path, description = "left or right"),
        LogoUploadParams
    ),
    request_body(content = Vec<u8>, content_type = "image/*"),
    responses(
        (status = 201, description = "Logo stored", body = ApiResponse<CompanyLogo>),
        (status = 400, description = "Company not saved yet", body = crate::errors::ErrorResponse),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse),
        (status = 413, description = "Larger than 2MB", body = crate::errors::ErrorResponse),
        (status = 415, description = "Not an image", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Company"
)]
pub async fn upload_company_logo(
    State(state): State<AppState>,
    session: SessionToken,
    Path(position): Path<LogoPosition>,
    Query(params): Query<LogoUploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, ServiceError> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let upload = LogoUpload {
        content_type,
        filename: params.filename,
        bytes: body,
    };

    let logo = state
        .services
        .company
        .upload_logo(session.as_deref(), position, upload)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(logo))).into_response())
}

#[utoipa::path(
    delete,
    path = "/api/v1/company/logos/{position}",
    summary = "Remove company logo",
    params(("position" = LogoPosition, Path, description = "left or right")),
    responses(
        (status = 204, description = "Logo removed"),
        (status = 401, description = "No session", body = crate::errors::ErrorResponse),
    ),
    security(("Bearer" = [])),
    tag = "Company"
)]
pub async fn remove_company_logo(
    State(state): State<AppState>,
    session: SessionToken,
    Path(position): Path<LogoPosition>,
) -> Result<Response, ServiceError> {
    state
        .services
        .company
        .remove_logo(session.as_deref(), position)
        .await?;
    Ok(no_content_response())
}
