//! Photo storage port. Storage mechanics are an external collaborator.

use async_trait::async_trait;

use crate::domain::ApiError;

/// Stores uploaded photo bytes under a caller-chosen filename.
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<(), ApiError>;
}
