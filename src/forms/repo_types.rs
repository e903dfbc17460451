use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use super::domain::{Form, FormStatus, InvalidStatus, OwnerProfile};

#[derive(Debug, FromRow)]
pub struct FormRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub approved_at: Option<OffsetDateTime>,
    pub status: String,
}

impl TryFrom<FormRow> for Form {
    type Error = InvalidStatus;

    fn try_from(r: FormRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            description: r.description,
            start_date: r.start_date,
            end_date: r.end_date,
            created_at: r.created_at,
            approved_at: r.approved_at,
            status: r.status.parse::<FormStatus>()?,
        })
    }
}

/// A form joined with its owner's public columns.
#[derive(Debug, FromRow)]
pub struct FormWithOwnerRow {
    pub owner_id: Uuid,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_position: String,
    pub owner_email: String,
    #[sqlx(flatten)]
    pub form: FormRow,
}

impl FormWithOwnerRow {
    pub fn into_parts(self) -> Result<(OwnerProfile, Form), InvalidStatus> {
        let r = self;
        let owner = OwnerProfile {
            id: r.owner_id,
            first_name: r.owner_first_name,
            last_name: r.owner_last_name,
            position: r.owner_position,
            email: r.owner_email,
        };
        Ok((owner, Form::try_from(r.form)?))
    }
}
