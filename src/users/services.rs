use tracing::{info, warn};
use uuid::Uuid;

use super::{
    domain::{visible_roles, Role, User},
    repo::UserRepository,
};
use crate::{auth::extractors::RequestContext, error::AppError};

/// Admins see HR and employee accounts, HR sees employees, anyone else is
/// refused. The admin account itself never appears.
pub async fn list_users(
    users: &dyn UserRepository,
    ctx: RequestContext,
) -> Result<Vec<User>, AppError> {
    let roles = visible_roles(ctx.role).ok_or_else(|| AppError::forbidden("role not authorized"))?;
    users.find_all_by_role(roles).await
}

/// Toggles activation for any reachable account; the caller's relation to
/// the target is not checked. The admin account stays active.
pub async fn set_user_status(
    users: &dyn UserRepository,
    ctx: RequestContext,
    target: Uuid,
    is_active: bool,
) -> Result<User, AppError> {
    let current = users.find_by_id(target).await?;
    if current.role == Role::Admin && !is_active {
        warn!(user_id = %current.id, by = %ctx.user_id, "refused to deactivate admin");
        return Err(AppError::forbidden("admin account cannot be deactivated"));
    }

    let user = users.set_active(current.id, is_active).await?;
    info!(user_id = %user.id, by = %ctx.user_id, active = is_active, "user status updated");
    Ok(user)
}
