//! Current-route tracking shared by the shell and the HTTP layer.

use std::sync::{Arc, RwLock};

use super::{resolve, Navigation, Route};
use crate::services::session::SessionService;

/// Holds the route on screen. Cloning shares the same state.
#[derive(Clone)]
pub struct Navigator {
    session: SessionService,
    current: Arc<RwLock<Route>>,
}

impl Navigator {
    /// Start on the page the landing path resolves to for this session.
    pub fn new(session: SessionService) -> Self {
        let start = resolve(Route::Landing.path(), session.is_authenticated()).route();
        Self {
            session,
            current: Arc::new(RwLock::new(start)),
        }
    }

    pub fn current(&self) -> Route {
        self.current.read().map(|r| *r).unwrap_or(Route::Landing)
    }

    fn set(&self, route: Route) {
        if let Ok(mut current) = self.current.write() {
            *current = route;
        }
    }

    /// Navigate to `path`, applying the session gate.
    pub fn navigate(&self, path: &str) -> Navigation {
        let navigation = resolve(path, self.session.is_authenticated());
        if let Navigation::Redirect(target) = navigation {
            tracing::debug!(path, target = target.path(), "Redirected");
        }
        self.set(navigation.route());
        navigation
    }

    /// Go to the login page regardless of the current view.
    pub fn force_login(&self) {
        tracing::info!(from = self.current().path(), "Forcing navigation to login");
        self.set(Route::Login);
    }
}
