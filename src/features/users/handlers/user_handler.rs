use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::users::dtos::{NotificationPreferencesDto, UserDetailsResponseDto};
use crate::features::users::services::UserService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, Json};
use std::sync::Arc;
use validator::Validate;

#[utoipa::path(
    get,
    path = "/api/users/me",
    responses(
        (status = 200, description = "User details retrieved successfully", body = ApiResponse<UserDetailsResponseDto>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "User not found")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_me(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
) -> Result<Json<ApiResponse<UserDetailsResponseDto>>> {
    let details = service.get_details(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(details), None, None)))
}

#[utoipa::path(
    put,
    path = "/api/users/me/preferences",
    request_body = NotificationPreferencesDto,
    responses(
        (status = 200, description = "Preferences updated successfully", body = ApiResponse<UserDetailsResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "users",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_preferences(
    user: AuthenticatedUser,
    State(service): State<Arc<UserService>>,
    AppJson(dto): AppJson<NotificationPreferencesDto>,
) -> Result<Json<ApiResponse<UserDetailsResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let details = service.update_preferences(user.user_id, dto).await?;
    Ok(Json(ApiResponse::success(
        Some(details),
        Some("Préférences mises à jour".to_string()),
        None,
    )))
}
