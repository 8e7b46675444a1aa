pub mod pollution_handler;
