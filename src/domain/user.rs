//! User account entity.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{ApiError, Role, UserId, ValidationError};

/// Minimum plaintext password length accepted at registration and reset.
pub const MIN_PASSWORD_LEN: usize = 6;

/// A registered user account.
///
/// The password is stored only as a one-way hash and is never serialized.
/// The reset token is likewise stored only as a hash of the raw token that
/// was transmitted to the user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    name: String,
    email: String,
    #[serde(skip_serializing)]
    password_hash: String,
    role: Role,
    #[serde(skip_serializing)]
    reset_password_token: Option<String>,
    #[serde(skip_serializing)]
    reset_password_expire: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl User {
    /// Creates a new user with an already-hashed password.
    pub fn new(
        id: UserId,
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
    ) -> Result<Self, ApiError> {
        let name = name.into();
        let email = email.into();

        if name.trim().is_empty() {
            return Err(ValidationError::empty_field("name").into());
        }
        validate_email(&email)?;

        Ok(Self {
            id,
            name,
            email,
            password_hash: password_hash.into(),
            role,
            reset_password_token: None,
            reset_password_expire: None,
            created_at: Utc::now(),
        })
    }

    /// Rebuilds a user from stored state. No validation is applied.
    #[allow(clippy::too_many_arguments)]
    pub fn from_storage(
        id: UserId,
        name: String,
        email: String,
        password_hash: String,
        role: Role,
        reset_password_token: Option<String>,
        reset_password_expire: Option<DateTime<Utc>>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            password_hash,
            role,
            reset_password_token,
            reset_password_expire,
            created_at,
        }
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn reset_password_token(&self) -> Option<&str> {
        self.reset_password_token.as_deref()
    }

    pub fn reset_password_expire(&self) -> Option<DateTime<Utc>> {
        self.reset_password_expire
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Updates name and/or email.
    pub fn update_details(
        &mut self,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<(), ApiError> {
        if let Some(name) = name {
            if name.trim().is_empty() {
                return Err(ValidationError::empty_field("name").into());
            }
            self.name = name;
        }
        if let Some(email) = email {
            validate_email(&email)?;
            self.email = email;
        }
        Ok(())
    }

    /// Replaces the stored password hash.
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
    }

    /// Changes the user's role. Admin-only operation at the service layer.
    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Records a hashed reset token and its expiry.
    pub fn set_reset_token(&mut self, token_hash: String, expire: DateTime<Utc>) {
        self.reset_password_token = Some(token_hash);
        self.reset_password_expire = Some(expire);
    }

    /// Clears the reset token and expiry, e.g. after consumption.
    pub fn clear_reset_token(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expire = None;
    }

    /// Whether the stored reset token is still usable at `now`.
    pub fn reset_token_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (&self.reset_password_token, self.reset_password_expire) {
            (Some(_), Some(expire)) => expire > now,
            _ => false,
        }
    }
}

/// Validates a plaintext password before it is hashed.
pub fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::invalid_format(
            "password",
            format!("must be at least {} characters", MIN_PASSWORD_LEN),
        )
        .into());
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.trim().is_empty() {
        return Err(ValidationError::empty_field("email").into());
    }
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(ValidationError::invalid_format("email", "not a valid email address").into());
    }
    Ok(())
}
