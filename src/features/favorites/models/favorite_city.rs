use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::features::favorites::dtos::FavoriteCityResponseDto;

/// Database model for a monitored location
#[derive(Debug, Clone, FromRow)]
pub struct FavoriteCity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub current_aqi: Option<i32>,
    pub last_checked: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewFavoriteCity {
    pub user_id: Uuid,
    pub city_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub current_aqi: Option<i32>,
}

impl From<FavoriteCity> for FavoriteCityResponseDto {
    fn from(c: FavoriteCity) -> Self {
        Self {
            id: c.id,
            city_name: c.city_name,
            latitude: c.latitude,
            longitude: c.longitude,
            current_aqi: c.current_aqi,
            last_checked: c.last_checked,
            created_at: c.created_at,
        }
    }
}
