//! Screens reachable through the frontend router.

use std::fmt;
use std::str::FromStr;

/// A registered screen and its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Marketing landing page.
    Home,
    /// Login screen.
    Login,
    /// Registration screen.
    Register,
    /// Personal plan overview.
    UserPlan,
}

impl Route {
    /// Every registered route.
    pub const ALL: [Self; 4] = [Self::Home, Self::Login, Self::Register, Self::UserPlan];

    /// Path registered in the routing table.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Login => "/loginTwo",
            Self::Register => "/registerTwo",
            Self::UserPlan => "/userPlan",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Error returned when a path is not in the routing table.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown route: {path}")]
pub struct UnknownRouteError {
    /// The rejected path.
    pub path: String,
}

impl FromStr for Route {
    type Err = UnknownRouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|route| route.path() == s)
            .ok_or_else(|| UnknownRouteError { path: s.to_owned() })
    }
}
