//! Outbound adapters implementing the domain ports.

mod auth_api;
mod navigation;

pub use auth_api::{AuthApiHttpGateway, AuthApiSetupError, REGISTER_PATH};
pub use navigation::TracingNavigator;
