use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating username fields
    /// Must start with letter or underscore and contain only alphanumeric characters and underscores
    /// - Valid: "john_doe", "user123", "_admin", "JohnDoe"
    /// - Invalid: "123user", "-user", "user-name", "user name"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[a-zA-Z_][a-zA-Z0-9_]*$").unwrap();

    /// Address shape an alert email is allowed to go to
    pub static ref ALERT_EMAIL_REGEX: Regex = Regex::new(r"^[A-Za-z0-9+_.-]+@(.+)$").unwrap();
}

/// Whether an alert email may be sent to this address
pub fn is_deliverable_email(email: &str) -> bool {
    ALERT_EMAIL_REGEX.is_match(email)
}
