//! Authentication service outbound adapters.
//!
//! This module provides a thin HTTP implementation of the
//! `AuthenticationGateway` port.

mod dto;
mod http_gateway;

pub use http_gateway::{AuthApiHttpGateway, AuthApiSetupError, REGISTER_PATH};
