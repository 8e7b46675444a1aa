mod alert_service;
mod decision_cache;

pub use alert_service::{alert_message, format_timestamp, should_alert, AlertService};
pub use decision_cache::DecisionCache;
