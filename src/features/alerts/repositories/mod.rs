mod alert_history_repository;

pub use alert_history_repository::{AlertHistoryRepository, PgAlertHistoryRepository};
