use std::collections::BTreeMap;

/// One named page of the forum front end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Route {
    pub name: &'static str,
    pub pattern: &'static str,
    pub requires_auth: bool,
}

const fn public(name: &'static str, pattern: &'static str) -> Route {
    Route {
        name,
        pattern,
        requires_auth: false,
    }
}

const fn member(name: &'static str, pattern: &'static str) -> Route {
    Route {
        name,
        pattern,
        requires_auth: true,
    }
}

/// Forum routes in resolution order.
pub const ROUTES: &[Route] = &[
    public("home", "/"),
    public("hot", "/hot"),
    public("latest", "/latest"),
    public("boards", "/boards"),
    public("board-posts", "/b/:slug"),
    public("search", "/search"),
    public("topic-detail", "/topic/:name"),
    member("post-new", "/posts/new"),
    member("post-edit", "/posts/:id/edit"),
    public("post-detail", "/posts/:id"),
    member("notifications", "/notifications"),
    member("me", "/me"),
    public("user-profile", "/u/:pid"),
    public("login", "/login"),
    public("register", "/register"),
    member("admin", "/admin"),
    member("admin-moderation", "/admin/moderation"),
    member("admin-users", "/admin/users"),
    member("admin-audit", "/admin/audit"),
];

/// Look a route up by name.
#[must_use]
pub fn route_named(name: &str) -> Option<&'static Route> {
    ROUTES.iter().find(|route| route.name == name)
}

/// A resolved route with its captured `:param` segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteMatch {
    pub route: &'static Route,
    pub params: BTreeMap<String, String>,
}

impl Route {
    /// Match a path (no query or fragment). Static segments compare
    /// case-insensitively and a trailing slash is ignored.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let expected = segments(self.pattern);
        let actual = segments(path);
        if expected.len() != actual.len() {
            return None;
        }

        let mut params = BTreeMap::new();
        for (pattern, value) in expected.iter().zip(actual.iter()) {
            if let Some(name) = pattern.strip_prefix(':') {
                params.insert(name.to_string(), (*value).to_string());
            } else if !pattern.eq_ignore_ascii_case(value) {
                return None;
            }
        }
        Some(params)
    }

    /// Build a concrete path, filling `:param` segments from `params`.
    /// Returns `None` when a parameter is missing.
    #[must_use]
    pub fn path_with(&self, params: &BTreeMap<String, String>) -> Option<String> {
        let mut path = String::new();
        for segment in segments(self.pattern) {
            path.push('/');
            match segment.strip_prefix(':') {
                Some(name) => path.push_str(params.get(name)?),
                None => path.push_str(segment),
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Some(path)
    }
}

/// First route matching `path`, in declaration order.
#[must_use]
pub fn resolve(path: &str) -> Option<RouteMatch> {
    ROUTES.iter().find_map(|route| {
        route
            .matches(path)
            .map(|params| RouteMatch { route, params })
    })
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn resolves_in_declaration_order() {
        assert_eq!(resolve("/posts/new").unwrap().route.name, "post-new");
        assert_eq!(resolve("/posts/42").unwrap().route.name, "post-detail");

        let edit = resolve("/posts/42/edit").unwrap();
        assert_eq!(edit.route.name, "post-edit");
        assert_eq!(edit.params.get("id").map(String::as_str), Some("42"));
    }

    #[test]
    fn root_trailing_slash_and_case() {
        assert_eq!(resolve("/").unwrap().route.name, "home");
        assert_eq!(resolve("").unwrap().route.name, "home");
        assert_eq!(resolve("/Hot/").unwrap().route.name, "hot");
        assert!(resolve("/nowhere").is_none());
        assert!(resolve("/b").is_none());
    }

    #[test]
    fn auth_flags() {
        let members: Vec<&str> = ROUTES
            .iter()
            .filter(|route| route.requires_auth)
            .map(|route| route.name)
            .collect();
        assert_eq!(
            members,
            [
                "post-new",
                "post-edit",
                "notifications",
                "me",
                "admin",
                "admin-moderation",
                "admin-users",
                "admin-audit"
            ]
        );
    }

    #[test]
    fn builds_paths() {
        let mut params = BTreeMap::new();
        params.insert("slug".to_string(), "general".to_string());
        let board = route_named("board-posts").unwrap();
        assert_eq!(board.path_with(&params).as_deref(), Some("/b/general"));
        assert_eq!(
            route_named("home").unwrap().path_with(&BTreeMap::new()).as_deref(),
            Some("/")
        );
        assert!(route_named("user-profile")
            .unwrap()
            .path_with(&BTreeMap::new())
            .is_none());
    }
}
