mod openweather_client;

pub use openweather_client::OpenWeatherClient;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::pollution::models::PollutionResponse;

/// Source of air quality readings
#[async_trait]
pub trait AirQualityProvider: Send + Sync {
    async fn current(&self, lat: f64, lon: f64) -> Result<PollutionResponse>;

    async fn forecast(&self, lat: f64, lon: f64) -> Result<PollutionResponse>;

    /// `start` and `end` are unix seconds
    async fn history(&self, lat: f64, lon: f64, start: i64, end: i64)
        -> Result<PollutionResponse>;
}
