use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::domain::User;

/// Form workflow state. There is no rejection state: a form is either
/// waiting on HR or approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormStatus {
    Pending,
    Approved,
}

impl FormStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FormStatus::Pending => "Pending",
            FormStatus::Approved => "Approved",
        }
    }
}

impl fmt::Display for FormStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("invalid status: must be 'Pending' or 'Approved'")]
pub struct InvalidStatus;

impl FromStr for FormStatus {
    type Err = InvalidStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(FormStatus::Pending),
            "Approved" => Ok(FormStatus::Approved),
            _ => Err(InvalidStatus),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub end_date: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option")]
    pub approved_at: Option<OffsetDateTime>,
    pub status: FormStatus,
}

impl Form {
    /// New forms always start `Pending`; id and creation time are assigned
    /// here, never taken from the client.
    pub fn new(
        user_id: Uuid,
        title: String,
        description: Option<String>,
        start_date: Option<OffsetDateTime>,
        end_date: Option<OffsetDateTime>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            description,
            start_date,
            end_date,
            created_at: OffsetDateTime::now_utc(),
            approved_at: None,
            status: FormStatus::Pending,
        }
    }

    /// Sets the status and stamps `approved_at` with the current time,
    /// whichever direction the transition goes (including back to `Pending`).
    pub fn update_status(&mut self, status: FormStatus) {
        self.status = status;
        self.approved_at = Some(OffsetDateTime::now_utc());
    }
}

/// Public part of a form owner, shown to HR and admins.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerProfile {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub email: String,
}

impl From<&User> for OwnerProfile {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            position: u.position.clone(),
            email: u.email.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithForm {
    pub user: OwnerProfile,
    pub form: Form,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserWithForms {
    pub user: OwnerProfile,
    pub forms: Vec<Form>,
}

/// Groups `(owner, form)` pairs by owner, keeping the order in which owners
/// first appear and the order of forms within each owner.
pub fn group_by_owner(pairs: impl IntoIterator<Item = (OwnerProfile, Form)>) -> Vec<UserWithForms> {
    let mut groups: Vec<UserWithForms> = Vec::new();
    let mut index: std::collections::HashMap<Uuid, usize> = std::collections::HashMap::new();

    for (owner, form) in pairs {
        match index.get(&owner.id) {
            Some(&i) => groups[i].forms.push(form),
            None => {
                index.insert(owner.id, groups.len());
                groups.push(UserWithForms {
                    user: owner,
                    forms: vec![form],
                });
            }
        }
    }
    groups
}
