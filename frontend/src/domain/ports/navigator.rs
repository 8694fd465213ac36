//! Driven port for screen transitions.
//!
//! Navigation is imperative and synchronous: the caller names the next screen
//! and the adapter switches to it.

use crate::domain::Route;

/// Port used to move the user to another screen.
#[cfg_attr(test, mockall::automock)]
pub trait Navigator: Send + Sync {
    /// Transition to `route`.
    fn navigate(&self, route: Route);
}
