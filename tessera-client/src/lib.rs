pub mod app_config;
pub mod rest;

pub use app_config::Config;
pub use rest::{ClientError, RestGateway};
