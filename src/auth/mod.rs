use axum::{middleware::from_fn_with_state, routing::post, Router};

use crate::{state::AppState, users::domain::Role};

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod jwt;
pub mod middleware;
pub mod password;

use self::middleware::{authenticate, require_active, require_roles, RoleAllowlist};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(handlers::register_employee))
        .route("/hr/auth/register", post(handlers::register_hr))
        .route("/auth/login", post(handlers::login))
}

/// Whether a route group also requires the caller's account to be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActiveCheck {
    Required,
    Skipped,
}

/// Wraps every route already on `routes` in the authorization gate.
pub fn protect(
    routes: Router<AppState>,
    state: &AppState,
    allowed: &'static [Role],
    active: ActiveCheck,
) -> Router<AppState> {
    // route_layer: the last layer added runs first
    let routes = match active {
        ActiveCheck::Required => {
            routes.route_layer(from_fn_with_state(state.clone(), require_active))
        }
        ActiveCheck::Skipped => routes,
    };
    routes
        .route_layer(from_fn_with_state(RoleAllowlist(allowed), require_roles))
        .route_layer(from_fn_with_state(state.clone(), authenticate))
}
