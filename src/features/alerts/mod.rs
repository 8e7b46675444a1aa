//! Alert decision, dispatch and delivery.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/alerts/history` | Caller's past alerts, newest first |
//! | GET | `/api/alerts/stream` | Server-Sent Events feed of the caller's in-app topic |

pub mod dtos;
pub mod handlers;
pub mod hub;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use hub::{AlertHub, AlertPublisher};
pub use repositories::{AlertHistoryRepository, PgAlertHistoryRepository};
pub use services::{AlertService, DecisionCache};
