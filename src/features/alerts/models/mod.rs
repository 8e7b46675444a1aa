mod alert_history;
mod alert_priority;

pub use alert_history::{AlertHistory, NewAlertHistory};
pub use alert_priority::AlertPriority;
