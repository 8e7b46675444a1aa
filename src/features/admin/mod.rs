//! Operator tooling, restricted to `ADMIN` accounts.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/admin/alerts/simulate` | Run an alert check for a stored favorite at a chosen AQI |
//! | POST | `/api/admin/email/test` | Send a sample alert email |
//! | GET | `/api/admin/caches` | Inspect the in-process caches |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
