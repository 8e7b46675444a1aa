use async_trait::async_trait;
use reqwest::StatusCode;

use super::AirQualityProvider;
use crate::core::config::OpenWeatherConfig;
use crate::core::error::{AppError, Result};
use crate::features::pollution::models::PollutionResponse;

/// Client for the OpenWeatherMap Air Pollution API
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(config: &OpenWeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("PolluAlert/1.0")
            .timeout(config.timeout)
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn fetch(&self, path: &str, params: &[(&str, String)]) -> Result<PollutionResponse> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("OpenWeatherMap request: {} {:?}", path, params);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                tracing::error!("OpenWeatherMap request failed: {:?}", e);
                AppError::ExternalServiceError(format!("OpenWeatherMap request failed: {}", e))
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::error!("OpenWeatherMap rejected the API key");
            return Err(AppError::ExternalServiceError("Invalid API key".to_string()));
        }
        if !status.is_success() {
            tracing::warn!("OpenWeatherMap returned status: {}", status);
            return Err(AppError::ExternalServiceError(format!(
                "API error: {}",
                status.as_u16()
            )));
        }

        response.json::<PollutionResponse>().await.map_err(|e| {
            tracing::error!("Failed to parse OpenWeatherMap response: {:?}", e);
            AppError::ExternalServiceError(format!(
                "Failed to parse OpenWeatherMap response: {}",
                e
            ))
        })
    }
}

fn coordinates(lat: f64, lon: f64) -> Vec<(&'static str, String)> {
    vec![("lat", lat.to_string()), ("lon", lon.to_string())]
}

#[async_trait]
impl AirQualityProvider for OpenWeatherClient {
    async fn current(&self, lat: f64, lon: f64) -> Result<PollutionResponse> {
        self.fetch("/air_pollution", &coordinates(lat, lon)).await
    }

    async fn forecast(&self, lat: f64, lon: f64) -> Result<PollutionResponse> {
        self.fetch("/air_pollution/forecast", &coordinates(lat, lon))
            .await
    }

    async fn history(
        &self,
        lat: f64,
        lon: f64,
        start: i64,
        end: i64,
    ) -> Result<PollutionResponse> {
        let mut params = coordinates(lat, lon);
        params.push(("start", start.to_string()));
        params.push(("end", end.to_string()));
        self.fetch("/air_pollution/history", &params).await
    }
}
