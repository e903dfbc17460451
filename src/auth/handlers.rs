use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, RegisterRequest},
        password::{hash_password_blocking, verify_password_blocking},
    },
    error::AppError,
    extract::AppJson,
    state::AppState,
    users::domain::{Role, User},
};

#[instrument(skip(state, payload))]
pub async fn register_employee(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    register(&state, Role::Employee, payload).await
}

#[instrument(skip(state, payload))]
pub async fn register_hr(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    register(&state, Role::Hr, payload).await
}

async fn register(
    state: &AppState,
    role: Role,
    payload: RegisterRequest,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let payload = payload.normalize().map_err(|e| {
        warn!(error = %e, "registration rejected");
        e
    })?;

    let hash = hash_password_blocking(payload.password).await.map_err(|e| {
        error!(error = %e, "hash_password failed");
        AppError::Internal(e)
    })?;

    let user = User::register(
        role,
        payload.first_name,
        payload.last_name,
        payload.position,
        payload.email,
        hash,
    )
    .ok_or_else(|| AppError::invalid("invalid role"))?;

    if let Err(e) = state.users.create(&user).await {
        if matches!(e, AppError::UserAlreadyExists) {
            warn!(email = %user.email, "email already registered");
        }
        return Err(e);
    }

    let token = state.jwt.issue(user.id, user.role)?;

    info!(user_id = %user.id, role = %user.role, active = user.is_active, "user registered");
    Ok((StatusCode::CREATED, Json(AuthResponse { token })))
}

/// Active status is not checked here: inactive accounts can log in and are
/// stopped by the gate on protected routes.
#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    let payload = payload.normalize()?;

    let user = match state.users.find_by_email(&payload.email).await {
        Ok(u) => u,
        Err(AppError::UserNotFound) => {
            warn!(email = %payload.email, "login unknown email");
            return Err(AppError::unauthorized("invalid email or password"));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(e);
        }
    };

    let ok = verify_password_blocking(payload.password, user.password_hash.clone())
        .await
        .map_err(|e| {
            error!(error = %e, "verify_password failed");
            AppError::Internal(e)
        })?;

    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized("invalid email or password"));
    }

    let token = state.jwt.issue(user.id, user.role)?;

    info!(user_id = %user.id, role = %user.role, "user logged in");
    Ok(Json(AuthResponse { token }))
}
