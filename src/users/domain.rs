use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role. Fixed at creation; never changes afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Employee,
    Hr,
    Admin,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Employee => "employee",
            Role::Hr => "hr",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "employee" => Ok(Role::Employee),
            "hr" => Ok(Role::Hr),
            "admin" => Ok(Role::Admin),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub role: Role,
    pub first_name: String,
    pub last_name: String,
    pub position: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String, // argon2 PHC string
    pub is_active: bool,
}

pub const ADMIN_FIRST_NAME: &str = "Super";
pub const ADMIN_LAST_NAME: &str = "Admin";
pub const ADMIN_POSITION: &str = "Administrator";

impl User {
    fn new(
        role: Role,
        first_name: String,
        last_name: String,
        position: String,
        email: String,
        password_hash: String,
        is_active: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            first_name,
            last_name,
            position,
            email,
            password_hash,
            is_active,
        }
    }

    /// Employees can use the system right after registering.
    pub fn new_employee(
        first_name: String,
        last_name: String,
        position: String,
        email: String,
        password_hash: String,
    ) -> Self {
        Self::new(Role::Employee, first_name, last_name, position, email, password_hash, true)
    }

    /// HR accounts wait for an administrator to activate them.
    pub fn new_hr(
        first_name: String,
        last_name: String,
        position: String,
        email: String,
        password_hash: String,
    ) -> Self {
        Self::new(Role::Hr, first_name, last_name, position, email, password_hash, false)
    }

    pub fn new_admin(email: String, password_hash: String) -> Self {
        Self::new(
            Role::Admin,
            ADMIN_FIRST_NAME.into(),
            ADMIN_LAST_NAME.into(),
            ADMIN_POSITION.into(),
            email,
            password_hash,
            true,
        )
    }

    /// Builds a freshly registered account for `role`. Admins are only
    /// created by bootstrap, so asking for one here yields `None`.
    pub fn register(
        role: Role,
        first_name: String,
        last_name: String,
        position: String,
        email: String,
        password_hash: String,
    ) -> Option<Self> {
        match role {
            Role::Employee => Some(Self::new_employee(
                first_name,
                last_name,
                position,
                email,
                password_hash,
            )),
            Role::Hr => Some(Self::new_hr(first_name, last_name, position, email, password_hash)),
            Role::Admin => None,
        }
    }
}

/// Which roles a caller may see in the user directory.
pub fn visible_roles(caller: Role) -> Option<&'static [Role]> {
    match caller {
        Role::Admin => Some(&[Role::Hr, Role::Employee]),
        Role::Hr => Some(&[Role::Employee]),
        Role::Employee => None,
    }
}
