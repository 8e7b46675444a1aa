use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use super::AlertPriority;
use crate::features::alerts::dtos::AlertHistoryResponseDto;

/// Database model for a dispatched alert
#[derive(Debug, Clone, FromRow)]
pub struct AlertHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub aqi: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: String,
    pub priority: AlertPriority,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewAlertHistory {
    pub user_id: Uuid,
    pub aqi: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: String,
    pub priority: AlertPriority,
    pub message: String,
}

impl From<AlertHistory> for AlertHistoryResponseDto {
    fn from(a: AlertHistory) -> Self {
        Self {
            id: a.id,
            aqi: a.aqi,
            latitude: a.latitude,
            longitude: a.longitude,
            city_name: a.city_name,
            priority: a.priority,
            priority_level: a.priority.level(),
            priority_label: a.priority.label().to_string(),
            priority_color: a.priority.color().to_string(),
            message: a.message,
            timestamp: a.timestamp,
        }
    }
}
