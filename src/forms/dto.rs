use serde::{de, Deserialize, Deserializer, Serialize};
use time::{format_description::well_known::Rfc3339, macros::format_description, Date, OffsetDateTime};

use super::domain::{Form, FormStatus, UserWithForm, UserWithForms};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormCreateRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub start_date: Option<OffsetDateTime>,
    #[serde(default, deserialize_with = "flexible_date")]
    pub end_date: Option<OffsetDateTime>,
}

impl FormCreateRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.title.trim().chars().count() < 3 {
            return Err(AppError::invalid(
                "validation failed: title must be at least 3 characters",
            ));
        }
        Ok(())
    }
}

/// Accepts RFC 3339 timestamps or bare `YYYY-MM-DD` dates (taken as
/// midnight UTC).
fn flexible_date<'de, D>(deserializer: D) -> Result<Option<OffsetDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_date(&s).map_err(de::Error::custom))
        .transpose()
}

fn parse_date(s: &str) -> Result<OffsetDateTime, String> {
    if let Ok(ts) = OffsetDateTime::parse(s, &Rfc3339) {
        return Ok(ts);
    }
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map(|d| d.midnight().assume_utc())
        .map_err(|_| format!("invalid date `{s}`: expected RFC 3339 or YYYY-MM-DD"))
}

#[derive(Debug, Deserialize)]
pub struct FormStatusUpdateRequest {
    #[serde(default)]
    pub status: String,
}

impl FormStatusUpdateRequest {
    pub fn parse(&self) -> Result<FormStatus, AppError> {
        self.status
            .parse::<FormStatus>()
            .map_err(|e| AppError::invalid(e.to_string()))
    }
}

/// Single-form view; its shape depends on the caller's role.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FormView {
    WithOwner(UserWithForm),
    Own(Form),
}

/// Form listing; staff get forms grouped by owner, employees a flat list.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum FormList {
    Grouped(Vec<UserWithForms>),
    Own(Vec<Form>),
}
