use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::features::auth::dtos::{
    AuthCheckResponseDto, LoginRequestDto, LoginResponseDto, RegisterRequestDto,
    RegisterResponseDto, ResendVerificationRequestDto, VerifyRequestDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::ApiResponse;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use validator::Validate;

/// Register a new user
///
/// The account stays unverified until the emailed code is submitted.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequestDto,
    responses(
        (status = 201, description = "User registered, verification code sent", body = ApiResponse<RegisterResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 409, description = "Username or email already registered"),
        (status = 502, description = "Verification email could not be sent")
    ),
    tag = "auth"
)]
pub async fn register(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<RegisterRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponseDto>>)> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.register(dto).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Inscription réussie. Un code de vérification a été envoyé".to_string()),
            None,
        )),
    ))
}

/// Login with username and password
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequestDto,
    responses(
        (status = 200, description = "Login successful", body = ApiResponse<LoginResponseDto>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Account not verified")
    ),
    tag = "auth"
)]
pub async fn login(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<LoginRequestDto>,
) -> Result<Json<ApiResponse<LoginResponseDto>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.login(dto).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Submit the emailed verification code
#[utoipa::path(
    post,
    path = "/api/auth/verify",
    request_body = VerifyRequestDto,
    responses(
        (status = 200, description = "Account verified"),
        (status = 400, description = "Wrong, expired or locked code"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Account already verified")
    ),
    tag = "auth"
)]
pub async fn verify(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<VerifyRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.verify(&dto.email, &dto.code).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Compte vérifié avec succès".to_string()),
        None,
    )))
}

/// Issue a fresh verification code
#[utoipa::path(
    post,
    path = "/api/auth/resend-verification",
    request_body = ResendVerificationRequestDto,
    responses(
        (status = 200, description = "New code sent"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Account already verified")
    ),
    tag = "auth"
)]
pub async fn resend_verification(
    State(service): State<Arc<AuthService>>,
    AppJson(dto): AppJson<ResendVerificationRequestDto>,
) -> Result<Json<ApiResponse<()>>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.resend_verification(&dto.email).await?;
    Ok(Json(ApiResponse::success(
        None,
        Some("Un nouveau code de vérification a été envoyé".to_string()),
        None,
    )))
}

/// Check the presented access token
#[utoipa::path(
    get,
    path = "/api/auth/check",
    responses(
        (status = 200, description = "Token is valid", body = ApiResponse<AuthCheckResponseDto>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "auth",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn check(user: AuthenticatedUser) -> Json<ApiResponse<AuthCheckResponseDto>> {
    Json(ApiResponse::success(
        Some(AuthCheckResponseDto {
            user_id: user.user_id,
            username: user.username,
            role: user.role,
        }),
        None,
        None,
    ))
}
