use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::instrument;

use super::{
    domain::Form,
    dto::{FormCreateRequest, FormList, FormStatusUpdateRequest, FormView},
    services,
};
use crate::{
    auth::extractors::RequestContext,
    error::AppError,
    extract::{parse_id, AppJson},
    state::AppState,
};

#[instrument(skip(state, body))]
pub async fn create_form(
    State(state): State<AppState>,
    ctx: RequestContext,
    AppJson(body): AppJson<FormCreateRequest>,
) -> Result<(StatusCode, Json<Form>), AppError> {
    let form = services::create_form(state.forms.as_ref(), ctx, body).await?;
    Ok((StatusCode::CREATED, Json(form)))
}

/// Shared by `/forms` and `/hr/forms`; the result depends on the caller's role.
#[instrument(skip(state))]
pub async fn list_forms(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Json<FormList>, AppError> {
    Ok(Json(services::list_forms(state.forms.as_ref(), ctx).await?))
}

#[instrument(skip(state))]
pub async fn get_form(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
) -> Result<Json<FormView>, AppError> {
    let id = parse_id(&id)?;
    Ok(Json(services::get_form(state.forms.as_ref(), ctx, id).await?))
}

#[instrument(skip(state, body))]
pub async fn update_form_status(
    State(state): State<AppState>,
    ctx: RequestContext,
    Path(id): Path<String>,
    AppJson(body): AppJson<FormStatusUpdateRequest>,
) -> Result<Json<Form>, AppError> {
    let id = parse_id(&id)?;
    let status = body.parse()?;
    let form = services::update_form_status(state.forms.as_ref(), ctx, id, status).await?;
    Ok(Json(form))
}
