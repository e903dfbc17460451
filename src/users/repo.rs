use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    domain::{Role, User},
    repo_types::UserRow,
};
use crate::{db::timed, error::AppError};

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new account; a taken email yields `UserAlreadyExists`.
    async fn create(&self, user: &User) -> Result<(), AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<User, AppError>;
    async fn find_by_email(&self, email: &str) -> Result<User, AppError>;
    async fn find_admin(&self) -> Result<User, AppError>;
    /// Accounts whose role is in `roles`; empty when nothing matches.
    async fn find_all_by_role(&self, roles: &[Role]) -> Result<Vec<User>, AppError>;
    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<User, AppError>;
    async fn is_active(&self, id: Uuid) -> Result<bool, AppError>;
}

const USER_COLUMNS: &str =
    "id, user_role, first_name, last_name, position, email, hashed_password, is_active";

#[derive(Clone)]
pub struct PgUserRepository {
    db: PgPool,
    timeout: Duration,
}

impl PgUserRepository {
    pub fn new(db: PgPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }

    async fn find_one(&self, sql: String, bind: FindBy<'_>) -> Result<User, AppError> {
        timed(self.timeout, async {
            let query = sqlx::query_as::<_, UserRow>(&sql);
            let query = match bind {
                FindBy::Id(id) => query.bind(id),
                FindBy::Email(email) => query.bind(email),
                FindBy::Role(role) => query.bind(role.as_str()),
            };
            let row = query
                .fetch_optional(&self.db)
                .await?
                .ok_or(AppError::UserNotFound)?;
            into_user(row)
        })
        .await
    }
}

enum FindBy<'a> {
    Id(Uuid),
    Email(&'a str),
    Role(Role),
}

fn into_user(row: UserRow) -> Result<User, AppError> {
    User::try_from(row)
        .context("decode users row")
        .map_err(AppError::from)
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: &User) -> Result<(), AppError> {
        timed(self.timeout, async {
            sqlx::query(
                r#"
                INSERT INTO users (id, user_role, first_name, last_name, position, email, hashed_password, is_active)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(user.id)
            .bind(user.role.as_str())
            .bind(&user.first_name)
            .bind(&user.last_name)
            .bind(&user.position)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.is_active)
            .execute(&self.db)
            .await
            .map_err(|e| {
                if e.as_database_error().is_some_and(|d| d.is_unique_violation()) {
                    AppError::UserAlreadyExists
                } else {
                    AppError::Database(e)
                }
            })?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<User, AppError> {
        self.find_one(
            format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"),
            FindBy::Id(id),
        )
        .await
    }

    async fn find_by_email(&self, email: &str) -> Result<User, AppError> {
        self.find_one(
            format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"),
            FindBy::Email(email),
        )
        .await
    }

    async fn find_admin(&self) -> Result<User, AppError> {
        self.find_one(
            format!("SELECT {USER_COLUMNS} FROM users WHERE user_role = $1 LIMIT 1"),
            FindBy::Role(Role::Admin),
        )
        .await
    }

    async fn find_all_by_role(&self, roles: &[Role]) -> Result<Vec<User>, AppError> {
        if roles.is_empty() {
            return Ok(Vec::new());
        }
        let roles: Vec<String> = roles.iter().map(|r| r.as_str().to_string()).collect();

        timed(self.timeout, async {
            let rows = sqlx::query_as::<_, UserRow>(&format!(
                "SELECT {USER_COLUMNS} FROM users WHERE user_role = ANY($1) ORDER BY last_name, first_name, id"
            ))
            .bind(roles)
            .fetch_all(&self.db)
            .await?;
            rows.into_iter().map(into_user).collect()
        })
        .await
    }

    async fn set_active(&self, id: Uuid, is_active: bool) -> Result<User, AppError> {
        timed(self.timeout, async {
            let row = sqlx::query_as::<_, UserRow>(&format!(
                "UPDATE users SET is_active = $1 WHERE id = $2 RETURNING {USER_COLUMNS}"
            ))
            .bind(is_active)
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::UserNotFound)?;
            into_user(row)
        })
        .await
    }

    async fn is_active(&self, id: Uuid) -> Result<bool, AppError> {
        timed(self.timeout, async {
            let active: Option<bool> =
                sqlx::query_scalar(r#"SELECT is_active FROM users WHERE id = $1"#)
                    .bind(id)
                    .fetch_optional(&self.db)
                    .await?;
            active.ok_or(AppError::UserNotFound)
        })
        .await
    }
}
