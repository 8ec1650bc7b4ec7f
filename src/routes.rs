use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    VerifyOtp,
    Dashboard,
    Items,
    ItemDetail,
    Categories,
    Profile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    View(View),
    Redirect(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub target: Target,
    pub guarded: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render {
        view: View,
        params: HashMap<String, String>,
    },
    Redirect(String),
}

pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        RouteTable { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// First matching route wins. Guarded views redirect to the login page
    /// when `authenticated` is false. Unmatched paths yield `None`.
    pub fn resolve(&self, path: &str, authenticated: bool) -> Option<Navigation> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments = split_path(path);

        for route in &self.routes {
            let Some(params) = match_pattern(route.path, &segments) else {
                continue;
            };
            if route.guarded && !authenticated {
                return Some(Navigation::Redirect(LOGIN_PATH.to_string()));
            }
            return Some(match route.target {
                Target::View(view) => Navigation::Render { view, params },
                Target::Redirect(to) => Navigation::Redirect(to.to_string()),
            });
        }
        None
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        let view = |path, view, guarded| Route {
            path,
            target: Target::View(view),
            guarded,
        };
        let redirect = |path, to| Route {
            path,
            target: Target::Redirect(to),
            guarded: false,
        };

        RouteTable::new(vec![
            view("/login", View::Login, false),
            view("/login/verify", View::VerifyOtp, false),
            view("/dashboard", View::Dashboard, true),
            view("/items", View::Items, true),
            view("/items/:id", View::ItemDetail, true),
            view("/categories", View::Categories, true),
            view("/profile", View::Profile, true),
            redirect("", "/dashboard"),
            redirect("**", "/dashboard"),
        ])
    }
}

fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn match_pattern(pattern: &str, segments: &[&str]) -> Option<HashMap<String, String>> {
    if pattern == "**" {
        return Some(HashMap::new());
    }

    let expected = split_path(pattern);
    if expected.len() != segments.len() {
        return None;
    }

    let mut params = HashMap::new();
    for (want, got) in expected.iter().zip(segments) {
        if let Some(name) = want.strip_prefix(':') {
            params.insert(name.to_string(), got.to_string());
        } else if want != got {
            return None;
        }
    }
    Some(params)
}
