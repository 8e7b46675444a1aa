use std::sync::Arc;
use std::time::Duration;

use crate::core::error::Result;
use crate::features::pollution::clients::AirQualityProvider;
use crate::features::pollution::models::PollutionResponse;
use crate::shared::cache::{CacheStats, TtlCache};

fn cache_key(kind: &str, lat: f64, lon: f64, range: Option<(i64, i64)>) -> String {
    match range {
        Some((start, end)) => format!("{}:{}_{}:{}_{}", kind, lat, lon, start, end),
        None => format!("{}:{}_{}", kind, lat, lon),
    }
}

/// Pollution lookups for the HTTP API, cached per coordinate
pub struct PollutionService {
    provider: Arc<dyn AirQualityProvider>,
    cache: TtlCache<String, PollutionResponse>,
}

impl PollutionService {
    pub fn new(provider: Arc<dyn AirQualityProvider>, ttl: Duration) -> Self {
        Self {
            provider,
            cache: TtlCache::new("pollution_responses", ttl),
        }
    }

    pub async fn current(&self, lat: f64, lon: f64) -> Result<PollutionResponse> {
        let key = cache_key("current", lat, lon, None);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let response = self.provider.current(lat, lon).await?;
        self.cache.insert(key, response.clone());
        Ok(response)
    }

    pub async fn forecast(&self, lat: f64, lon: f64) -> Result<PollutionResponse> {
        let key = cache_key("forecast", lat, lon, None);
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let response = self.provider.forecast(lat, lon).await?;
        self.cache.insert(key, response.clone());
        Ok(response)
    }

    pub async fn history(
        &self,
        lat: f64,
        lon: f64,
        start: i64,
        end: i64,
    ) -> Result<PollutionResponse> {
        let key = cache_key("history", lat, lon, Some((start, end)));
        if let Some(hit) = self.cache.get(&key) {
            return Ok(hit);
        }

        let response = self.provider.history(lat, lon, start, end).await?;
        self.cache.insert(key, response.clone());
        Ok(response)
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
