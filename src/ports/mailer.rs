//! Outbound email port. Transport is an external collaborator; the core
//! only depends on this boundary.

use async_trait::async_trait;

use crate::domain::ApiError;

/// Sends a single plain-text email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> Result<(), ApiError>;
}
