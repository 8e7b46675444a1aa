use std::sync::Arc;

use axum::{extract::State, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppQuery;
use crate::features::pollution::dtos::{CoordinatesQuery, HistoryQuery};
use crate::features::pollution::models::PollutionResponse;
use crate::features::pollution::services::PollutionService;
use crate::shared::types::ApiResponse;

/// Current air quality at a coordinate
#[utoipa::path(
    get,
    path = "/api/pollution/current",
    params(CoordinatesQuery),
    responses(
        (status = 200, description = "Current readings", body = ApiResponse<PollutionResponse>),
        (status = 400, description = "Invalid coordinates"),
        (status = 502, description = "Provider error")
    ),
    tag = "pollution"
)]
pub async fn get_current(
    State(service): State<Arc<PollutionService>>,
    AppQuery(query): AppQuery<CoordinatesQuery>,
) -> Result<Json<ApiResponse<PollutionResponse>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.current(query.lat, query.lon).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Air quality forecast at a coordinate
#[utoipa::path(
    get,
    path = "/api/pollution/forecast",
    params(CoordinatesQuery),
    responses(
        (status = 200, description = "Forecast readings", body = ApiResponse<PollutionResponse>),
        (status = 400, description = "Invalid coordinates"),
        (status = 502, description = "Provider error")
    ),
    tag = "pollution"
)]
pub async fn get_forecast(
    State(service): State<Arc<PollutionService>>,
    AppQuery(query): AppQuery<CoordinatesQuery>,
) -> Result<Json<ApiResponse<PollutionResponse>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service.forecast(query.lat, query.lon).await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}

/// Historical air quality at a coordinate
#[utoipa::path(
    get,
    path = "/api/pollution/history",
    params(HistoryQuery),
    responses(
        (status = 200, description = "Past readings", body = ApiResponse<PollutionResponse>),
        (status = 400, description = "Invalid coordinates or time range"),
        (status = 502, description = "Provider error")
    ),
    tag = "pollution"
)]
pub async fn get_history(
    State(service): State<Arc<PollutionService>>,
    AppQuery(query): AppQuery<HistoryQuery>,
) -> Result<Json<ApiResponse<PollutionResponse>>> {
    query
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let response = service
        .history(query.lat, query.lon, query.start, query.end)
        .await?;
    Ok(Json(ApiResponse::success(Some(response), None, None)))
}
