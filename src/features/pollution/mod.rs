//! Air quality readings from OpenWeatherMap.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/pollution/current` | Current readings for a coordinate |
//! | GET | `/api/pollution/forecast` | Hourly forecast for a coordinate |
//! | GET | `/api/pollution/history` | Past readings between two unix timestamps |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use clients::{AirQualityProvider, OpenWeatherClient};
pub use services::PollutionService;
