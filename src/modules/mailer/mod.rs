//! Outbound email.
//!
//! [`Mailer`] is the delivery seam; [`SmtpMailer`] is the production
//! implementation and [`EmailTemplates`] renders the French message bodies.

mod smtp;
mod templates;

pub use smtp::SmtpMailer;
pub use templates::{AlertEmail, EmailTemplates};

use async_trait::async_trait;
use thiserror::Error;

use crate::core::error::AppError;

/// A rendered email ready for delivery
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: String,
    pub html_body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Invalid email address '{0}'")]
    InvalidAddress(String),

    #[error("Failed to build email: {0}")]
    Build(String),

    #[error("Failed to render email template: {0}")]
    Template(String),

    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

impl From<MailError> for AppError {
    fn from(err: MailError) -> Self {
        AppError::ExternalServiceError(err.to_string())
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), MailError>;
}
