//! Typed navigation between screens
//!
//! Routes carry their own parameters, so a screen that needs a product id
//! cannot be reached without one. The [`Navigator`] keeps a stack of routes
//! and sends every request through the session gate: nothing but
//! [`Route::Loading`] before the session is ready, auth screens only while
//! signed out, everything else only while signed in.

use std::fmt;

use serde::Serialize;

use crate::services::SessionService;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "route", rename_all = "camelCase")]
pub enum Route {
    Loading,
    Login,
    Register,
    Dashboard,
    AddProduct,
    #[serde(rename_all = "camelCase")]
    EditProduct { product_id: String },
    #[serde(rename_all = "camelCase")]
    ProductDetail { product_id: String },
    Profile,
}

impl Route {
    /// Screens reachable only while signed out
    pub fn is_auth(&self) -> bool {
        matches!(self, Route::Login | Route::Register)
    }

    /// Screens reachable only while signed in
    pub fn is_protected(&self) -> bool {
        !self.is_auth() && *self != Route::Loading
    }

    pub fn name(&self) -> &'static str {
        match self {
            Route::Loading => "Loading",
            Route::Login => "Login",
            Route::Register => "Register",
            Route::Dashboard => "Dashboard",
            Route::AddProduct => "AddProduct",
            Route::EditProduct { .. } => "EditProduct",
            Route::ProductDetail { .. } => "ProductDetail",
            Route::Profile => "Profile",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::EditProduct { product_id } | Route::ProductDetail { product_id } => {
                write!(f, "{}({})", self.name(), product_id)
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// Where a request for `requested` actually lands given the session state
pub fn resolve(requested: Route, session: &SessionService) -> Route {
    if !session.is_ready() {
        return Route::Loading;
    }
    let signed_in = session.is_authenticated();
    match requested {
        Route::Loading => home(signed_in),
        route if route.is_protected() && !signed_in => Route::Login,
        route if route.is_auth() && signed_in => Route::Dashboard,
        route => route,
    }
}

fn home(signed_in: bool) -> Route {
    if signed_in {
        Route::Dashboard
    } else {
        Route::Login
    }
}

/// Route stack with session gating
#[derive(Debug, Clone)]
pub struct Navigator {
    stack: Vec<Route>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            stack: vec![Route::Loading],
        }
    }

    pub fn current(&self) -> &Route {
        // The stack is never empty
        self.stack.last().unwrap_or(&Route::Loading)
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Go to `route`, or wherever the gate sends it instead.
    ///
    /// Landing on a route from the other side of the gate starts a fresh
    /// stack, the way the signed-in and signed-out screen sets replace each
    /// other.
    pub fn navigate(&mut self, route: Route, session: &SessionService) -> &Route {
        let resolved = resolve(route, session);
        let crosses_gate = resolved == Route::Loading
            || resolved.is_auth() != self.current().is_auth()
            || *self.current() == Route::Loading;

        if crosses_gate {
            self.stack = vec![resolved];
        } else if *self.current() != resolved {
            self.stack.push(resolved);
        }
        self.current()
    }

    /// Pop the current route. The root stays put.
    pub fn back(&mut self) -> &Route {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
        self.current()
    }

    /// Start over from the home route for the current session state
    pub fn reset(&mut self, session: &SessionService) -> &Route {
        self.stack = vec![resolve(Route::Loading, session)];
        self.current()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::MemorySecureStore;
    use std::sync::Arc;

    fn session(ready: bool, signed_in: bool) -> SessionService {
        let mut session = SessionService::new(Arc::new(MemorySecureStore::new()));
        if ready {
            session.initialize();
        }
        if signed_in {
            assert!(session.login("test@example.com", "password123"));
        }
        session
    }

    #[test]
    fn test_not_ready_always_loading() {
        let session = session(false, false);
        assert_eq!(resolve(Route::Dashboard, &session), Route::Loading);
        assert_eq!(resolve(Route::Login, &session), Route::Loading);
    }

    #[test]
    fn test_gate_redirects() {
        let out = session(true, false);
        assert_eq!(resolve(Route::Profile, &out), Route::Login);
        assert_eq!(resolve(Route::Register, &out), Route::Register);
        assert_eq!(resolve(Route::Loading, &out), Route::Login);

        let signed_in = session(true, true);
        assert_eq!(resolve(Route::Login, &signed_in), Route::Dashboard);
        let detail = Route::ProductDetail {
            product_id: "3".to_string(),
        };
        assert_eq!(resolve(detail.clone(), &signed_in), detail);
    }

    #[test]
    fn test_navigate_and_back() {
        let session = session(true, true);
        let mut nav = Navigator::new();
        assert_eq!(nav.current(), &Route::Loading);

        nav.reset(&session);
        assert_eq!(nav.current(), &Route::Dashboard);

        nav.navigate(
            Route::EditProduct {
                product_id: "1".to_string(),
            },
            &session,
        );
        nav.navigate(Route::Profile, &session);
        assert_eq!(nav.depth(), 3);

        assert_eq!(nav.back().name(), "EditProduct");
        assert_eq!(nav.back(), &Route::Dashboard);
        assert_eq!(nav.back(), &Route::Dashboard);
    }

    #[test]
    fn test_auth_change_replaces_stack() {
        let mut session = session(true, false);
        let mut nav = Navigator::new();
        nav.navigate(Route::Register, &session);
        assert_eq!(nav.current(), &Route::Register);
        nav.navigate(Route::Login, &session);
        assert_eq!(nav.depth(), 2);

        session.login("admin@example.com", "admin123");
        nav.navigate(Route::Dashboard, &session);
        assert_eq!(nav.depth(), 1);

        session.logout();
        assert_eq!(nav.navigate(Route::Profile, &session), &Route::Login);
        assert_eq!(nav.depth(), 1);
    }

    #[test]
    fn test_display() {
        let route = Route::ProductDetail {
            product_id: "42".to_string(),
        };
        assert_eq!(route.to_string(), "ProductDetail(42)");
        assert_eq!(Route::Profile.to_string(), "Profile");
    }
}
