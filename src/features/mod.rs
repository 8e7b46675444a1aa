pub mod admin;
pub mod alerts;
pub mod auth;
pub mod favorites;
pub mod pollution;
pub mod users;
