pub mod auth_handler;

pub use auth_handler::{
    __path_check, __path_login, __path_register, __path_resend_verification, __path_verify, check,
    login, register, resend_verification, verify,
};
