mod aqi_poller;

pub use aqi_poller::{AqiPoller, PollSummary};
