use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::alerts::models::{AlertHistory, AlertPriority};

/// Payload pushed on a user's in-app topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AlertMessage {
    pub alert_id: Uuid,
    pub city_name: String,
    pub aqi: i32,
    pub priority: AlertPriority,
    pub priority_label: String,
    pub priority_color: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&AlertHistory> for AlertMessage {
    fn from(a: &AlertHistory) -> Self {
        Self {
            alert_id: a.id,
            city_name: a.city_name.clone(),
            aqi: a.aqi,
            priority: a.priority,
            priority_label: a.priority.label().to_string(),
            priority_color: a.priority.color().to_string(),
            message: a.message.clone(),
            timestamp: a.timestamp,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AlertHistoryResponseDto {
    pub id: Uuid,
    pub aqi: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub city_name: String,
    pub priority: AlertPriority,
    pub priority_level: i16,
    pub priority_label: String,
    pub priority_color: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
