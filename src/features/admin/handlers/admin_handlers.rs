use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::auth::guards::RequireAdmin;
use crate::shared::types::ApiResponse;

/// Run an alert check for a stored favorite at a chosen AQI
#[utoipa::path(
    post,
    path = "/api/admin/alerts/simulate",
    request_body = SimulateAlertRequestDto,
    responses(
        (status = 200, description = "Alert check executed", body = ApiResponse<SimulateAlertResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "User or favorite city not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn simulate_alert(
    RequireAdmin(admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<SimulateAlertRequestDto>,
) -> Result<Json<ApiResponse<SimulateAlertResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    tracing::info!("Alert simulation requested by {}", admin.username);
    let result = service.simulate(dto).await?;
    Ok(Json(ApiResponse::success(Some(result), None, None)))
}

/// Send a sample alert email
#[utoipa::path(
    post,
    path = "/api/admin/email/test",
    request_body = TestEmailRequestDto,
    responses(
        (status = 200, description = "Test email sent"),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 502, description = "Email delivery failed")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn send_test_email(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
    AppJson(dto): AppJson<TestEmailRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.send_test_email(dto).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Email de test envoyé".to_string()),
        None,
    )))
}

/// Inspect the in-process caches
#[utoipa::path(
    get,
    path = "/api/admin/caches",
    responses(
        (status = 200, description = "Cache statistics", body = ApiResponse<Vec<CacheStatsDto>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_caches(
    RequireAdmin(_admin): RequireAdmin,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<Vec<CacheStatsDto>>>> {
    Ok(Json(ApiResponse::success(
        Some(service.cache_stats()),
        None,
        None,
    )))
}
