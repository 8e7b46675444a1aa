use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Air pollution payload as returned by OpenWeatherMap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PollutionResponse {
    pub coord: Coordinates,
    #[serde(default)]
    pub list: Vec<PollutionEntry>,
}

impl PollutionResponse {
    /// AQI of the first entry, the "current" reading
    pub fn current_aqi(&self) -> Option<i32> {
        self.list.first().map(|entry| entry.main.aqi)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Coordinates {
    pub lon: f64,
    pub lat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PollutionEntry {
    /// Unix timestamp, UTC
    pub dt: i64,
    pub main: AqiMain,
    #[serde(default)]
    pub components: Components,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AqiMain {
    /// 1 (good) to 5 (very poor)
    pub aqi: i32,
}

/// Pollutant concentrations in μg/m3
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct Components {
    pub co: f64,
    pub no: f64,
    pub no2: f64,
    pub o3: f64,
    pub so2: f64,
    pub pm2_5: f64,
    pub pm10: f64,
    pub nh3: f64,
}
