use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::{auth::jwt::Claims, error::AppError, users::domain::Role};

/// Identity and role bound to an in-flight request by `authenticate`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub user_id: Uuid,
    pub role: Role,
}

impl From<Claims> for RequestContext {
    fn from(c: Claims) -> Self {
        Self {
            user_id: c.id,
            role: c.role,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .copied()
            .ok_or_else(|| AppError::unauthorized("missing request identity"))
    }
}
