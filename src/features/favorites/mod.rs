//! Monitored locations and the periodic AQI poller.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/favorites` | Add a location for the caller |
//! | GET | `/api/favorites` | List the caller's locations |
//! | DELETE | `/api/favorites/{id}` | Remove one of the caller's locations |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod workers;

pub use repositories::{FavoriteCityRepository, PgFavoriteCityRepository};
pub use services::FavoriteCityService;
pub use workers::AqiPoller;
