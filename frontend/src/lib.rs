//! Affitnity registration frontend core.
//!
//! Validation, per-form submission state and the registration use-case live
//! in [`domain`]. Adapters for the authentication API and the router live in
//! [`outbound`], and [`settings`] loads their configuration.

pub mod domain;
pub mod outbound;
pub mod settings;
