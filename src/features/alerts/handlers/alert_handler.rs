use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    extract::State,
    response::{sse::Event, IntoResponse, Response, Sse},
    Json,
};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::alerts::dtos::AlertHistoryResponseDto;
use crate::features::alerts::hub::AlertHub;
use crate::features::alerts::services::AlertService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::types::{ApiResponse, Meta, PaginationQuery};

/// State for alert handlers
#[derive(Clone)]
pub struct AlertsState {
    pub service: Arc<AlertService>,
    pub hub: Arc<AlertHub>,
}

/// List the caller's alerts, newest first
#[utoipa::path(
    get,
    path = "/api/alerts/history",
    params(PaginationQuery),
    responses(
        (status = 200, description = "Alert history retrieved", body = ApiResponse<Vec<AlertHistoryResponseDto>>),
        (status = 401, description = "Unauthorized")
    ),
    tag = "alerts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_history(
    user: AuthenticatedUser,
    State(state): State<AlertsState>,
    AppQuery(pagination): AppQuery<PaginationQuery>,
) -> Result<Json<ApiResponse<Vec<AlertHistoryResponseDto>>>> {
    let (alerts, total) = state.service.history(user.user_id, &pagination).await?;
    Ok(Json(ApiResponse::success(
        Some(alerts),
        None,
        Some(Meta { total }),
    )))
}

/// Subscribe to the caller's in-app alerts
#[utoipa::path(
    get,
    path = "/api/alerts/stream",
    responses(
        (status = 200, description = "SSE stream of `alert` events", content_type = "text/event-stream"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "alerts",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn stream_alerts(user: AuthenticatedUser, State(state): State<AlertsState>) -> Response {
    let rx = state.hub.subscribe(user.user_id).await;
    tracing::info!("In-app alert stream opened for user {}", user.user_id);

    let stream = BroadcastStream::new(rx).filter_map(move |item| match item {
        Ok(message) => match Event::default().event("alert").json_data(&message) {
            Ok(event) => Some(Ok::<_, Infallible>(event)),
            Err(e) => {
                tracing::error!("Failed to encode alert event: {}", e);
                None
            }
        },
        Err(e) => {
            tracing::warn!("In-app alert stream lagging: {}", e);
            None
        }
    });

    Sse::new(stream)
        .keep_alive(
            axum::response::sse::KeepAlive::new()
                .interval(std::time::Duration::from_secs(15))
                .text("ping"),
        )
        .into_response()
}
