//! The page shell: which page is shown and the links in the navigation bar.
//!
//! Protected pages are only shown while the session holds a credential.
//! When the session expires, the shell switches to the log in page and
//! remembers to tell the user why.

use std::sync::{Arc, Mutex, PoisonError};

use crate::{endpoints, session::Session};

/// A page of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// The log in page.
    LogIn,
    /// The registration page.
    Register,
    /// The dashboard, the landing page for logged in users.
    Dashboard,
    /// The list of the user's transactions.
    Transactions,
    /// Shown for any path that is not a page.
    NotFound,
}

impl Route {
    /// Find the page for `path`.
    ///
    /// The root path is the dashboard. Query strings and trailing slashes are
    /// ignored.
    pub fn from_path(path: &str) -> Self {
        let path = path.split_once('?').map_or(path, |(path, _)| path);
        let path = match path.trim_end_matches('/') {
            "" => endpoints::ROOT,
            trimmed => trimmed,
        };

        match path {
            endpoints::ROOT | endpoints::DASHBOARD_VIEW => Self::Dashboard,
            endpoints::LOG_IN_VIEW => Self::LogIn,
            endpoints::REGISTER_VIEW => Self::Register,
            endpoints::TRANSACTIONS_VIEW => Self::Transactions,
            _ => Self::NotFound,
        }
    }

    /// The path of the page.
    pub fn path(self) -> &'static str {
        match self {
            Self::LogIn => endpoints::LOG_IN_VIEW,
            Self::Register => endpoints::REGISTER_VIEW,
            Self::Dashboard => endpoints::DASHBOARD_VIEW,
            Self::Transactions => endpoints::TRANSACTIONS_VIEW,
            Self::NotFound => endpoints::ROOT,
        }
    }

    /// Whether the page may only be shown to a logged in user.
    pub fn requires_credential(self) -> bool {
        matches!(self, Self::Dashboard | Self::Transactions)
    }

    /// The title of the page.
    pub fn title(self) -> &'static str {
        match self {
            Self::LogIn => "Log in",
            Self::Register => "Register",
            Self::Dashboard => "Dashboard",
            Self::Transactions => "Transactions",
            Self::NotFound => "Not found",
        }
    }
}

/// What the shell is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShellState {
    /// The page being shown.
    pub route: Route,
    /// Whether the user was sent to the log in page because their session
    /// expired.
    pub session_expired: bool,
}

/// Routes between pages and keeps logged out users away from protected pages.
///
/// The shell registers itself with the session when it is created, so a
/// session expiry triggered by any request moves the shell to the log in page.
#[derive(Debug, Clone)]
pub struct Shell {
    session: Session,
    state: Arc<Mutex<ShellState>>,
}

impl Shell {
    /// Create a shell on the log in or dashboard page, depending on whether
    /// `session` holds a credential.
    pub fn new(session: Session) -> Self {
        let route = if session.is_authenticated() {
            Route::Dashboard
        } else {
            Route::LogIn
        };

        let state = Arc::new(Mutex::new(ShellState {
            route,
            session_expired: false,
        }));

        // The session outlives the shell, so the observer must not keep the
        // shell's state alive.
        let weak_state = Arc::downgrade(&state);
        session.on_expired(move || {
            let Some(state) = weak_state.upgrade() else {
                return;
            };

            *state.lock().unwrap_or_else(PoisonError::into_inner) = ShellState {
                route: Route::LogIn,
                session_expired: true,
            };
            tracing::info!("Session expired, redirecting to log in.");
        });

        Self { session, state }
    }

    /// What the shell is showing.
    pub fn current(&self) -> ShellState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Go to the page at `path` and return the page that is shown.
    ///
    /// Protected pages redirect to the log in page when the session holds no
    /// credential.
    pub fn navigate(&self, path: &str) -> Route {
        let requested = Route::from_path(path);
        let route = if requested.requires_credential() && !self.session.is_authenticated() {
            tracing::debug!("No credential for {path}, redirecting to log in.");
            Route::LogIn
        } else {
            requested
        };

        self.set(route);
        route
    }

    /// Go to the dashboard after the user logged in.
    pub fn logged_in(&self) -> Route {
        self.navigate(endpoints::DASHBOARD_VIEW)
    }

    /// Forget the credential and go to the log in page. No request is sent.
    pub fn log_out(&self) {
        self.session.clear();
        self.set(Route::LogIn);
        tracing::info!("Logged out.");
    }

    fn set(&self, route: Route) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = ShellState {
            route,
            session_expired: false,
        };
    }
}

/// A link in the navigation bar.
///
/// Only one link should be set as current at any one time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    /// The page the link goes to.
    pub route: Route,
    /// The text of the link.
    pub title: &'static str,
    /// Whether the link is for the page being shown.
    pub is_current: bool,
}

/// The links in the navigation bar, with the link to `active` marked as current.
pub fn nav_links(active: Route) -> Vec<NavLink> {
    [Route::Dashboard, Route::Transactions]
        .into_iter()
        .map(|route| NavLink {
            route,
            title: route.title(),
            is_current: route == active,
        })
        .collect()
}
