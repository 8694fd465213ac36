//! Registration domain: schema, form state, service, and ports.
//!
//! Purpose: keep validation and submission sequencing free of transport
//! details. Adapters in `outbound` implement the ports declared here.
//!
//! Public surface:
//! - `RegistrationInput`, `validate`, `validate_field`: the schema and its
//!   evaluation.
//! - `RegistrationForm`: per-instance state object and state machine.
//! - `RegistrationService`: validation, dispatch, and navigation for one
//!   submit.
//! - `Route`: screens known to the router.
//! - `TraceId`: correlation identifier for one registration attempt.

pub mod ports;
mod registration;
mod registration_form;
mod registration_service;
mod route;
mod trace_id;

pub use self::registration::{
    CrossFieldRule, FieldRule, PASSWORD_MIN_CHARS, REGISTRATION_SCHEMA, RegistrationField,
    RegistrationInput, RegistrationPayload, RegistrationSchema, ValidRegistration,
    ValidationErrors, ValidationIssue, validate, validate_field,
};
pub use self::registration_form::{
    FormClosed, NotSubmitting, RegistrationForm, SubmissionState, SubmitRejection,
    TIMEOUT_BANNER, TRANSPORT_BANNER,
};
pub use self::registration_service::{RegistrationService, SubmissionOutcome};
pub use self::route::{Route, UnknownRouteError};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
