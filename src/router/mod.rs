//! Navigation guard for the forum front end.
//!
//! Before each navigation the guard keeps anonymous users out of member
//! pages (redirecting to `login` with a `next` back-link), lazily loads the
//! profile for authenticated sessions, and keeps non-staff users out of
//! `/admin`. The guard is a UX convenience; the API enforces permissions.

mod routes;

pub use routes::{resolve, route_named, Route, RouteMatch, ROUTES};

use crate::session::SessionManager;
use std::sync::Arc;
use tracing::{debug, instrument};
use url::form_urlencoded;

pub const LOGIN_ROUTE: &str = "login";
pub const HOME_ROUTE: &str = "home";
pub const NEXT_PARAM: &str = "next";

const ADMIN_PREFIX: &str = "/admin";

/// A navigation target split into its parts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    path: String,
    query: Option<String>,
    fragment: Option<String>,
}

impl Location {
    /// Parse `/path?query#fragment`. A missing leading slash is added.
    #[must_use]
    pub fn parse(target: &str) -> Self {
        let target = target.trim();
        let (rest, fragment) = match target.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (target, None),
        };
        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (rest, None),
        };
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Self {
            path,
            query,
            fragment,
        }
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// Path with query and fragment, as used for the `next` back-link.
    #[must_use]
    pub fn full_path(&self) -> String {
        let mut full = self.path.clone();
        if let Some(query) = &self.query {
            full.push('?');
            full.push_str(query);
        }
        if let Some(fragment) = &self.fragment {
            full.push('#');
            full.push_str(fragment);
        }
        full
    }
}

/// Guard decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Navigation {
    Proceed,
    Redirect {
        route: &'static str,
        query: Vec<(String, String)>,
    },
}

impl Navigation {
    fn redirect(route: &'static str) -> Self {
        Self::Redirect {
            route,
            query: Vec::new(),
        }
    }

    fn login(next: String) -> Self {
        Self::Redirect {
            route: LOGIN_ROUTE,
            query: vec![(NEXT_PARAM.to_string(), next)],
        }
    }

    /// Concrete path of a redirect target, query included.
    #[must_use]
    pub fn to_path(&self) -> Option<String> {
        let Self::Redirect { route, query } = self else {
            return None;
        };
        let mut path = route_named(route)
            .and_then(|route| route.path_with(&Default::default()))
            .unwrap_or_else(|| "/".to_string());
        if !query.is_empty() {
            let encoded = form_urlencoded::Serializer::new(String::new())
                .extend_pairs(query.iter())
                .finish();
            path.push('?');
            path.push_str(&encoded);
        }
        Some(path)
    }
}

#[derive(Clone, Debug)]
pub struct Router {
    session: Arc<SessionManager>,
}

impl Router {
    #[must_use]
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Decide whether navigation to `target` may proceed.
    #[instrument(skip(self))]
    pub async fn before_each(&self, target: &str) -> Navigation {
        let location = Location::parse(target);
        let requires_auth = resolve(location.path()).is_some_and(|found| found.route.requires_auth);

        if requires_auth && !self.session.is_authenticated() {
            debug!("anonymous navigation to member page, redirecting to login");
            return Navigation::login(location.full_path());
        }

        if self.session.is_authenticated()
            && self.session.me().is_none()
            && !self.session.is_loading()
        {
            self.session.load_me().await;
        }

        if location.path().starts_with(ADMIN_PREFIX) {
            let is_staff = self.session.me().is_some_and(|me| me.is_staff);
            if !is_staff {
                debug!("non-staff navigation to admin page, redirecting home");
                return Navigation::redirect(HOME_ROUTE);
            }
        }

        Navigation::Proceed
    }
}
