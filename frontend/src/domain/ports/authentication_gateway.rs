//! Driven port for the external authentication service.
//!
//! The registration service only needs to know whether a registration was
//! accepted. Adapters own transport concerns and translate every failure
//! into [`RegistrationGatewayError`].

use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use crate::domain::{RegistrationField, RegistrationPayload};

use super::define_port_error;

/// Server-reported messages keyed by the field they concern.
pub type RejectedFields = BTreeMap<RegistrationField, String>;

define_port_error! {
    /// Errors raised by authentication gateway adapters.
    pub enum RegistrationGatewayError {
        /// The service refused the registration, e.g. for a duplicate email.
        Rejected { message: String, fields: RejectedFields } =>
            "registration rejected: {message}",
        /// The service did not answer in time.
        Timeout { message: String } =>
            "registration request timed out: {message}",
        /// The request could not be delivered or the reply was unusable.
        Transport { message: String } =>
            "registration request failed: {message}",
    }
}

/// Port used to create accounts with the authentication service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthenticationGateway: Send + Sync {
    /// Submit one registration.
    async fn register(&self, payload: &RegistrationPayload)
    -> Result<(), RegistrationGatewayError>;
}

/// In-memory authentication service for offline runs and tests.
///
/// Accepts any registration whose email (compared case-insensitively) has not
/// been seen before, and rejects repeats with an `email` field error.
#[derive(Debug, Default)]
pub struct FixtureAuthenticationGateway {
    state: Mutex<FixtureState>,
}

#[derive(Debug, Default)]
struct FixtureState {
    emails: HashSet<String>,
    accepted: Vec<RegistrationPayload>,
}

/// Message returned for a repeated email.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "A user with this email already exists.";

impl FixtureAuthenticationGateway {
    /// Registrations accepted so far, in order.
    #[must_use]
    pub fn accepted(&self) -> Vec<RegistrationPayload> {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .accepted
            .clone()
    }
}

#[async_trait]
impl AuthenticationGateway for FixtureAuthenticationGateway {
    async fn register(
        &self,
        payload: &RegistrationPayload,
    ) -> Result<(), RegistrationGatewayError> {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if !state.emails.insert(payload.email().to_lowercase()) {
            let fields =
                RejectedFields::from([(RegistrationField::Email, DUPLICATE_EMAIL_MESSAGE.to_owned())]);
            return Err(RegistrationGatewayError::rejected(
                DUPLICATE_EMAIL_MESSAGE,
                fields,
            ));
        }
        state.accepted.push(payload.clone());
        Ok(())
    }
}
