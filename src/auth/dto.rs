use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Request body for employee and HR registration.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl RegisterRequest {
    /// Trims the profile fields, lowercases the email and checks presence
    /// and format.
    pub fn normalize(mut self) -> Result<Self, AppError> {
        self.first_name = self.first_name.trim().to_string();
        self.last_name = self.last_name.trim().to_string();
        self.position = self.position.trim().to_string();
        self.email = self.email.trim().to_lowercase();

        for (field, value) in [
            ("firstName", &self.first_name),
            ("lastName", &self.last_name),
            ("position", &self.position),
        ] {
            if value.chars().count() < 2 {
                return Err(AppError::invalid(format!(
                    "validation failed: {field} must be at least 2 characters"
                )));
            }
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::invalid("validation failed: invalid email"));
        }
        if self.password.is_empty() {
            return Err(AppError::invalid("validation failed: password is required"));
        }
        Ok(self)
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    pub fn normalize(mut self) -> Result<Self, AppError> {
        self.email = self.email.trim().to_lowercase();
        if !is_valid_email(&self.email) {
            return Err(AppError::invalid("validation failed: invalid email"));
        }
        if self.password.is_empty() {
            return Err(AppError::invalid("validation failed: password is required"));
        }
        Ok(self)
    }
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
}
