use axum::extract::FromRequest;
use uuid::Uuid;

use crate::error::AppError;

/// `Json` whose rejection is reported as `InvalidArgument` in the service's
/// error format instead of axum's plain-text 4xx.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// Parses a path id; malformed ids are `InvalidArgument`.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::invalid("invalid UUID"))
}
