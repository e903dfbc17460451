use axum::{
    extract::{Path, State},
    Json,
};
use tracing::instrument;

use super::{domain::User, dto::UserStatusUpdateRequest, services};
use crate::{
    auth::extractors::RequestContext,
    error::AppError,
    extract::{parse_id, AppJson},
    state::AppState,
};

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(services::list_users(state.users.as_ref(), ctx).await?))
}

#[instrument(skip(state, body))]
pub async fn update_user_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    AppJson(body): AppJson<UserStatusUpdateRequest>,
) -> Result<Json<User>, AppError> {
    let id = parse_id(&id)?;
    let user = services::set_user_status(state.users.as_ref(), ctx, id, body.status).await?;
    Ok(Json(user))
}
