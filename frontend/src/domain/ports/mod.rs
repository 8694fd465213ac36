//! Domain ports consumed by the registration flow.
//!
//! Ports describe the collaborators the domain depends on without naming the
//! infrastructure behind them. Outbound adapters implement them; tests
//! substitute fixtures or `mockall` doubles.

mod authentication_gateway;
mod macros;
mod navigator;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use authentication_gateway::MockAuthenticationGateway;
pub use authentication_gateway::{
    AuthenticationGateway, DUPLICATE_EMAIL_MESSAGE, FixtureAuthenticationGateway,
    RegistrationGatewayError, RejectedFields,
};
#[cfg(test)]
pub use navigator::MockNavigator;
pub use navigator::Navigator;
