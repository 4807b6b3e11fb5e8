//! Photo storage on the local filesystem.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use crate::domain::ApiError;
use crate::ports::PhotoStorage;

/// Writes uploads under a configured directory, creating it on demand.
pub struct LocalPhotoStorage {
    root: PathBuf,
}

impl LocalPhotoStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl PhotoStorage for LocalPhotoStorage {
    async fn store(&self, filename: &str, bytes: &[u8]) -> Result<(), ApiError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|err| ApiError::internal(format!("upload directory unavailable: {}", err)))?;

        let path = self.root.join(filename);
        fs::write(&path, bytes)
            .await
            .map_err(|err| ApiError::internal(format!("photo write failed: {}", err)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn stores_bytes_under_the_root() {
        let dir = std::env::temp_dir().join(format!("photos-{}", uuid::Uuid::new_v4()));
        let storage = LocalPhotoStorage::new(&dir);

        storage.store("photo_x.png", b"png-bytes").await.unwrap();

        let written = fs::read(dir.join("photo_x.png")).await.unwrap();
        assert_eq!(written, b"png-bytes");

        fs::remove_dir_all(&dir).await.unwrap();
    }
}
