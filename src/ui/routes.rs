use std::sync::{Mutex, PoisonError};
use tracing::info;

/// Client routes. Unknown paths resolve to the lock screen.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Lock,
    Login,
    Register,
    Dashboard,
}

impl Route {
    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Route::Lock => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Dashboard => "/dashboard",
        }
    }

    #[must_use]
    pub fn resolve(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/dashboard" => Route::Dashboard,
            _ => Route::Lock,
        }
    }

    #[must_use]
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that remembers every route change, in order.
#[derive(Debug, Default)]
pub struct RouteHistory {
    visited: Mutex<Vec<Route>>,
}

impl RouteHistory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn current(&self) -> Option<Route> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
    }

    #[must_use]
    pub fn visited(&self) -> Vec<Route> {
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Navigator for RouteHistory {
    fn navigate(&self, route: Route) {
        info!("navigate {}", route.path());
        self.visited
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(route);
    }
}
