//! First-boot administrator provisioning.

use anyhow::Context;
use tracing::info;

use crate::{
    auth::password::hash_password_blocking,
    config::AdminConfig,
    error::AppError,
    users::{domain::User, repo::UserRepository},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    AlreadyPresent,
    Created,
}

/// Makes sure an administrator exists. Does nothing when one is already
/// stored; otherwise both admin credentials must be configured or startup
/// fails. Safe to run on every boot.
pub async fn ensure_admin(
    users: &dyn UserRepository,
    admin: &AdminConfig,
) -> anyhow::Result<BootstrapOutcome> {
    match users.find_admin().await {
        Ok(existing) => {
            info!(user_id = %existing.id, "admin account present");
            return Ok(BootstrapOutcome::AlreadyPresent);
        }
        Err(AppError::UserNotFound) => {}
        Err(e) => return Err(e).context("failed to check admin"),
    }

    let (Some(email), Some(password)) = (admin.email.as_deref(), admin.password.as_deref()) else {
        anyhow::bail!("ADMIN_EMAIL and ADMIN_PASSWORD must be set in environment");
    };

    let hash = hash_password_blocking(password.to_string())
        .await
        .context("failed to hash admin password")?;

    let user = User::new_admin(email.trim().to_lowercase(), hash);
    users.create(&user).await.context("failed to create admin")?;

    info!(user_id = %user.id, email = %user.email, "admin user created");
    Ok(BootstrapOutcome::Created)
}
