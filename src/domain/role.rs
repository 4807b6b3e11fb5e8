//! User roles for role-based access control.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ApiError;

/// Role assigned to a user account.
///
/// `Admin` bypasses ownership checks everywhere and can only be granted
/// directly in the store, never through registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Publisher,
    Admin,
}

impl Role {
    /// Returns the wire representation of the role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Publisher => "publisher",
            Role::Admin => "admin",
        }
    }

    /// Roles a client may pick at registration time.
    pub fn assignable_at_registration(&self) -> bool {
        matches!(self, Role::User | Role::Publisher)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Role {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "publisher" => Ok(Role::Publisher),
            "admin" => Ok(Role::Admin),
            other => Err(ApiError::bad_request(format!("Unknown role: {}", other))),
        }
    }
}
