use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::model::AuthenticatedUser;
use crate::features::favorites::dtos::{CreateFavoriteCityDto, FavoriteCityResponseDto};
use crate::features::favorites::services::FavoriteCityService;
use crate::shared::types::ApiResponse;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = CreateFavoriteCityDto,
    responses(
        (status = 201, description = "Favorite city added", body = ApiResponse<FavoriteCityResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "City already in favorites")
    ),
    tag = "favorites",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn add_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteCityService>>,
    AppJson(dto): AppJson<CreateFavoriteCityDto>,
) -> Result<(StatusCode, Json<ApiResponse<FavoriteCityResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let city = service.add(user.user_id, dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(city),
            Some("Ville ajoutée aux favoris".to_string()),
            None,
        )),
    ))
}

#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "Favorite cities retrieved", body = ApiResponse<Vec<FavoriteCityResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "favorites",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_favorites(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteCityService>>,
) -> Result<Json<ApiResponse<Vec<FavoriteCityResponseDto>>>> {
    let cities = service.list(user.user_id).await?;
    Ok(Json(ApiResponse::success(Some(cities), None, None)))
}

#[utoipa::path(
    delete,
    path = "/api/favorites/{id}",
    params(
        ("id" = Uuid, Path, description = "Favorite city ID")
    ),
    responses(
        (status = 200, description = "Favorite city removed"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Favorite city not found")
    ),
    tag = "favorites",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn remove_favorite(
    user: AuthenticatedUser,
    State(service): State<Arc<FavoriteCityService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    service.remove(user.user_id, id).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Ville retirée des favoris".to_string()),
        None,
    )))
}
