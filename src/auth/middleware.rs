//! Authorization gate: `authenticate` → `require_roles` → `require_active`.
//! Each stage short-circuits with an `AppError` response.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::{error, warn};

use super::{extractors::RequestContext, jwt::JwtKeys};
use crate::{error::AppError, state::AppState, users::domain::Role};

/// Roles admitted by a route group.
#[derive(Debug, Clone, Copy)]
pub struct RoleAllowlist(pub &'static [Role]);

impl RoleAllowlist {
    pub fn permits(&self, role: Role) -> bool {
        self.0.contains(&role)
    }
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    let header = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized("authorization header is required"))?;

    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::unauthorized("bearer token is required"))?;
    Ok(token)
}

/// Verifies the bearer token and binds a `RequestContext` to the request.
pub async fn authenticate(
    State(keys): State<JwtKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;
    let claims = keys.verify(token).map_err(|e| {
        warn!(uri = %req.uri(), "invalid token");
        e
    })?;

    req.extensions_mut().insert(RequestContext::from(claims));
    Ok(next.run(req).await)
}

pub async fn require_roles(
    State(allowed): State<RoleAllowlist>,
    ctx: RequestContext,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if !allowed.permits(ctx.role) {
        warn!(user_id = %ctx.user_id, role = %ctx.role, "role not permitted");
        return Err(AppError::forbidden("permission denied"));
    }
    Ok(next.run(req).await)
}

/// Re-reads the account's active flag on every request, so deactivation
/// applies to tokens that are still cryptographically valid.
pub async fn require_active(
    State(state): State<AppState>,
    ctx: RequestContext,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // any lookup failure is reported as not-found, like a vanished account
    let active = state.users.is_active(ctx.user_id).await.map_err(|e| {
        error!(error = %e, user_id = %ctx.user_id, "failed to get active status");
        AppError::UserNotFound
    })?;

    if !active {
        warn!(user_id = %ctx.user_id, "inactive account");
        return Err(AppError::forbidden("account is not active"));
    }
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn bearer_scheme_is_required() {
        let mut headers = HeaderMap::new();
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert!(bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def.ghi"));
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn allowlist_supports_several_roles() {
        let staff = RoleAllowlist(&[Role::Hr, Role::Admin]);
        assert!(staff.permits(Role::Hr));
        assert!(staff.permits(Role::Admin));
        assert!(!staff.permits(Role::Employee));
    }
}
