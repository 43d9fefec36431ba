//! Role-based routing.
//!
//! SYSTEM CONTEXT
//! ==============
//! The role claim only picks which area of the app a user lands on. It is not
//! a security boundary: the server enforces access on every request.

use std::fmt;
use std::sync::Mutex;

#[cfg(test)]
#[path = "router_test.rs"]
mod tests;

// =============================================================================
// ROLES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Role {
    Admin,
    SuperAdmin,
    Member,
    Unknown(String),
}

impl Role {
    /// Parse a role claim. Matching is exact; a missing claim is `Unknown("")`.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.unwrap_or_default() {
            "admin" => Self::Admin,
            "superadmin" => Self::SuperAdmin,
            "member" => Self::Member,
            other => Self::Unknown(other.to_owned()),
        }
    }

    /// Landing route for this role, or `None` when the role has no area.
    #[must_use]
    pub fn home(&self) -> Option<Route> {
        match self {
            Self::Admin | Self::SuperAdmin => Some(Route::Admin),
            Self::Member => Some(Route::Member),
            Self::Unknown(_) => None,
        }
    }
}

// =============================================================================
// ROUTES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Admin,
    Member,
    Login,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Admin => "/admin",
            Self::Member => "/member",
            Self::Login => "/auth/login",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

// =============================================================================
// NAVIGATION
// =============================================================================

/// Client-side router seam. Implementors move the user to `route`.
pub trait Navigator {
    fn push(&self, route: Route);
}

impl<N: Navigator + ?Sized> Navigator for &N {
    fn push(&self, route: Route) {
        (**self).push(route);
    }
}

/// Navigator that remembers every push, in order.
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    history: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn history(&self) -> Vec<Route> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn last(&self) -> Option<Route> {
        self.history().last().copied()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        if let Ok(mut history) = self.history.lock() {
            history.push(route);
        }
    }
}
