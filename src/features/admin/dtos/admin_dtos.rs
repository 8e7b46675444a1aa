use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::alerts::dtos::AlertHistoryResponseDto;
use crate::shared::cache::CacheStats;

// =============================================================================
// ALERT SIMULATION
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SimulateAlertRequestDto {
    pub user_id: Uuid,
    pub city_id: Uuid,
    #[validate(range(min = 1, max = 5, message = "AQI must be between 1 and 5"))]
    pub aqi: i32,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SimulateAlertResponseDto {
    pub alerted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertHistoryResponseDto>,
}

// =============================================================================
// TEST EMAIL
// =============================================================================

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct TestEmailRequestDto {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
}

// =============================================================================
// CACHES
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CacheStatsDto {
    pub name: String,
    pub entries: usize,
    pub ttl_secs: u64,
}

impl From<CacheStats> for CacheStatsDto {
    fn from(s: CacheStats) -> Self {
        Self {
            name: s.name.to_string(),
            entries: s.entries,
            ttl_secs: s.ttl.as_secs(),
        }
    }
}
