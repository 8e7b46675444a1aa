//! Modules layer - Infrastructure components for external integrations
//!
//! Contains adapters for outbound services such as SMTP delivery.

pub mod mailer;
