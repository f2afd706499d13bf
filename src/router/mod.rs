//! Role-gated routing.
//!
//! The session resolves to one of four states; every route request is
//! answered by a pure, exhaustive match. Views never inspect role strings
//! themselves; they ask the router and obey the resolution.

use std::fmt;

use crate::models::{Role, User};

/// The route surface of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    /// Seller dashboard.
    Vendedor,
    /// Manager dashboard; embeds user administration.
    Gerente,
    /// Record form: create when the id is absent, edit when present.
    Cliente(Option<i64>),
}

impl Route {
    /// Parses a path as the browser front end spelled them. The bare root
    /// redirects to the login route.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim_end_matches('/');
        match path {
            "" | "/login" => Some(Route::Login),
            "/vendedor" => Some(Route::Vendedor),
            "/gerente" => Some(Route::Gerente),
            "/cliente" => Some(Route::Cliente(None)),
            _ => {
                let id = path.strip_prefix("/cliente/")?;
                id.parse().ok().map(|id| Route::Cliente(Some(id)))
            }
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Vendedor => "/vendedor".to_string(),
            Route::Gerente => "/gerente".to_string(),
            Route::Cliente(None) => "/cliente".to_string(),
            Route::Cliente(Some(id)) => format!("/cliente/{id}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Where the session currently stands. `Loading` exists only between
/// process start and the end of bootstrap; nothing renders during it.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Loading,
    Unauthenticated,
    Vendedor(User),
    Gerente(User),
}

impl SessionState {
    /// Role dispatch comes purely from the identity's `tipo` field.
    pub fn from_user(user: User) -> SessionState {
        match user.tipo {
            Role::Vendedor => SessionState::Vendedor(user),
            Role::Gerente => SessionState::Gerente(user),
        }
    }

    pub fn user(&self) -> Option<&User> {
        match self {
            SessionState::Vendedor(user) | SessionState::Gerente(user) => Some(user),
            SessionState::Loading | SessionState::Unauthenticated => None,
        }
    }

    /// The dashboard this session lands on.
    pub fn home(&self) -> Option<Route> {
        match self {
            SessionState::Vendedor(_) => Some(Route::Vendedor),
            SessionState::Gerente(_) => Some(Route::Gerente),
            SessionState::Loading | SessionState::Unauthenticated => None,
        }
    }
}

/// Outcome of asking for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Render the requested route.
    Render(Route),
    /// Not authenticated; go to the login view.
    RedirectToLogin,
    /// Authenticated but not allowed here; go back home.
    RedirectHome(Route),
    /// Bootstrap has not settled yet.
    Pending,
}

/// The routing table, total over state x route.
pub fn resolve(state: &SessionState, route: Route) -> Resolution {
    match (state, route) {
        (SessionState::Loading, _) => Resolution::Pending,

        (SessionState::Unauthenticated, Route::Login) => Resolution::Render(Route::Login),
        (SessionState::Unauthenticated, _) => Resolution::RedirectToLogin,

        (SessionState::Vendedor(_), Route::Vendedor) => Resolution::Render(Route::Vendedor),
        (SessionState::Vendedor(_), Route::Cliente(id)) => Resolution::Render(Route::Cliente(id)),
        (SessionState::Vendedor(_), Route::Gerente | Route::Login) => {
            Resolution::RedirectHome(Route::Vendedor)
        }

        (SessionState::Gerente(_), Route::Gerente) => Resolution::Render(Route::Gerente),
        (SessionState::Gerente(_), Route::Cliente(id)) => Resolution::Render(Route::Cliente(id)),
        (SessionState::Gerente(_), Route::Vendedor | Route::Login) => {
            Resolution::RedirectHome(Route::Gerente)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    fn user(tipo: Role) -> User {
        User {
            id: 1,
            nome: "Ana".to_string(),
            email: "ana@agrocrm.com".to_string(),
            tipo,
            ativo: true,
            criado_em: None,
        }
    }

    #[test]
    fn test_route_parsing() {
        assert_eq!(Route::parse("/"), Some(Route::Login));
        assert_eq!(Route::parse("/login"), Some(Route::Login));
        assert_eq!(Route::parse("/vendedor"), Some(Route::Vendedor));
        assert_eq!(Route::parse("/cliente"), Some(Route::Cliente(None)));
        assert_eq!(Route::parse("/cliente/42"), Some(Route::Cliente(Some(42))));
        assert_eq!(Route::parse("/cliente/abc"), None);
        assert_eq!(Route::parse("/admin"), None);
    }

    #[test]
    fn test_unauthenticated_only_reaches_login() {
        let state = SessionState::Unauthenticated;
        assert_eq!(resolve(&state, Route::Login), Resolution::Render(Route::Login));
        for route in [Route::Vendedor, Route::Gerente, Route::Cliente(None)] {
            assert_eq!(resolve(&state, route), Resolution::RedirectToLogin);
        }
    }

    #[test]
    fn test_seller_never_reaches_user_administration() {
        let state = SessionState::from_user(user(Role::Vendedor));
        assert_eq!(
            resolve(&state, Route::Gerente),
            Resolution::RedirectHome(Route::Vendedor)
        );
        assert_eq!(resolve(&state, Route::Vendedor), Resolution::Render(Route::Vendedor));
        assert_eq!(
            resolve(&state, Route::Cliente(Some(3))),
            Resolution::Render(Route::Cliente(Some(3)))
        );
    }

    #[test]
    fn test_manager_reaches_user_administration() {
        let state = SessionState::from_user(user(Role::Gerente));
        assert_eq!(resolve(&state, Route::Gerente), Resolution::Render(Route::Gerente));
        assert_eq!(
            resolve(&state, Route::Vendedor),
            Resolution::RedirectHome(Route::Gerente)
        );
    }

    #[test]
    fn test_login_redirects_home_per_role() {
        let seller = SessionState::from_user(user(Role::Vendedor));
        let manager = SessionState::from_user(user(Role::Gerente));
        assert_eq!(resolve(&seller, Route::Login), Resolution::RedirectHome(Route::Vendedor));
        assert_eq!(resolve(&manager, Route::Login), Resolution::RedirectHome(Route::Gerente));
        assert_eq!(seller.home(), Some(Route::Vendedor));
        assert_eq!(manager.home(), Some(Route::Gerente));
    }

    #[test]
    fn test_loading_renders_nothing() {
        assert_eq!(resolve(&SessionState::Loading, Route::Vendedor), Resolution::Pending);
    }
}
