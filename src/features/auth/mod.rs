mod validator;

pub mod dtos;
pub mod guards;
pub mod handlers;
pub mod model;
pub mod password;
pub mod routes;
pub mod services;
pub mod verification;

pub use services::{AuthService, TokenService};
pub use validator::JwtValidator;
