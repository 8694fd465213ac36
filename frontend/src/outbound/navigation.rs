//! Navigator that records the active screen and logs each transition.

use std::sync::{Mutex, PoisonError};

use tracing::info;

use crate::domain::Route;
use crate::domain::ports::Navigator;

/// Headless navigator used by the command-line driver and tests.
#[derive(Debug, Default)]
pub struct TracingNavigator {
    current: Mutex<Option<Route>>,
}

impl TracingNavigator {
    /// Screen most recently navigated to, if any.
    #[must_use]
    pub fn current(&self) -> Option<Route> {
        *self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Navigator for TracingNavigator {
    fn navigate(&self, route: Route) {
        let mut current = self.current.lock().unwrap_or_else(PoisonError::into_inner);
        let from = current.map_or("none", Route::path);
        info!(from, to = route.path(), "navigating");
        *current = Some(route);
    }
}
