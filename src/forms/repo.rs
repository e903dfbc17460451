use std::time::Duration;

use anyhow::Context;
use axum::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{
    domain::{group_by_owner, Form, UserWithForm, UserWithForms},
    repo_types::{FormRow, FormWithOwnerRow},
};
use crate::{db::timed, error::AppError};

#[async_trait]
pub trait FormRepository: Send + Sync {
    async fn create(&self, form: &Form) -> Result<(), AppError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Form, AppError>;
    async fn find_by_id_with_user(&self, id: Uuid) -> Result<UserWithForm, AppError>;
    /// Forms owned by `user_id`, oldest first.
    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Form>, AppError>;
    /// Every form in the system grouped by owner.
    async fn find_all_with_users(&self) -> Result<Vec<UserWithForms>, AppError>;
    /// Persists `status` and `approved_at`. Last write wins.
    async fn update_status(&self, form: &Form) -> Result<(), AppError>;
}

const FORM_COLUMNS: &str =
    "f.id, f.user_id, f.title, f.description, f.start_date, f.end_date, f.created_at, f.approved_at, f.status";

const OWNER_COLUMNS: &str = "u.id AS owner_id, u.first_name AS owner_first_name, \
     u.last_name AS owner_last_name, u.position AS owner_position, u.email AS owner_email";

#[derive(Clone)]
pub struct PgFormRepository {
    db: PgPool,
    timeout: Duration,
}

impl PgFormRepository {
    pub fn new(db: PgPool, timeout: Duration) -> Self {
        Self { db, timeout }
    }
}

fn into_form(row: FormRow) -> Result<Form, AppError> {
    Form::try_from(row)
        .context("decode forms row")
        .map_err(AppError::from)
}

#[async_trait]
impl FormRepository for PgFormRepository {
    async fn create(&self, form: &Form) -> Result<(), AppError> {
        timed(self.timeout, async {
            sqlx::query(
                r#"
                INSERT INTO forms (id, user_id, title, description, start_date, end_date, created_at, approved_at, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(form.id)
            .bind(form.user_id)
            .bind(&form.title)
            .bind(&form.description) // Option<String> → NULL allowed
            .bind(form.start_date)
            .bind(form.end_date)
            .bind(form.created_at)
            .bind(form.approved_at)
            .bind(form.status.as_str())
            .execute(&self.db)
            .await?;
            Ok(())
        })
        .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Form, AppError> {
        timed(self.timeout, async {
            let row = sqlx::query_as::<_, FormRow>(&format!(
                "SELECT {FORM_COLUMNS} FROM forms f WHERE f.id = $1"
            ))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::FormNotFound)?;
            into_form(row)
        })
        .await
    }

    async fn find_by_id_with_user(&self, id: Uuid) -> Result<UserWithForm, AppError> {
        timed(self.timeout, async {
            let row = sqlx::query_as::<_, FormWithOwnerRow>(&format!(
                r#"
                SELECT {OWNER_COLUMNS}, {FORM_COLUMNS}
                FROM forms f
                JOIN users u ON u.id = f.user_id
                WHERE f.id = $1
                "#
            ))
            .bind(id)
            .fetch_optional(&self.db)
            .await?
            .ok_or(AppError::FormNotFound)?;

            let (user, form) = row.into_parts().context("decode forms row")?;
            Ok(UserWithForm { user, form })
        })
        .await
    }

    async fn find_by_user_id(&self, user_id: Uuid) -> Result<Vec<Form>, AppError> {
        timed(self.timeout, async {
            let rows = sqlx::query_as::<_, FormRow>(&format!(
                "SELECT {FORM_COLUMNS} FROM forms f WHERE f.user_id = $1 ORDER BY f.created_at ASC, f.id"
            ))
            .bind(user_id)
            .fetch_all(&self.db)
            .await?;
            rows.into_iter().map(into_form).collect()
        })
        .await
    }

    async fn find_all_with_users(&self) -> Result<Vec<UserWithForms>, AppError> {
        timed(self.timeout, async {
            // ordering by form age makes each owner appear at their earliest form
            let rows = sqlx::query_as::<_, FormWithOwnerRow>(&format!(
                r#"
                SELECT {OWNER_COLUMNS}, {FORM_COLUMNS}
                FROM forms f
                JOIN users u ON u.id = f.user_id
                ORDER BY f.created_at ASC, f.id
                "#
            ))
            .fetch_all(&self.db)
            .await?;

            let pairs = rows
                .into_iter()
                .map(FormWithOwnerRow::into_parts)
                .collect::<Result<Vec<_>, _>>()
                .context("decode forms row")?;
            Ok(group_by_owner(pairs))
        })
        .await
    }

    async fn update_status(&self, form: &Form) -> Result<(), AppError> {
        timed(self.timeout, async {
            let res = sqlx::query(r#"UPDATE forms SET status = $1, approved_at = $2 WHERE id = $3"#)
                .bind(form.status.as_str())
                .bind(form.approved_at)
                .bind(form.id)
                .execute(&self.db)
                .await?;
            if res.rows_affected() == 0 {
                return Err(AppError::FormNotFound);
            }
            Ok(())
        })
        .await
    }
}
