//! File upload configuration

use serde::Deserialize;

use super::error::ValidationError;

/// File upload configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UploadConfig {
    /// Directory photo uploads are written to
    #[serde(default = "default_upload_dir")]
    pub dir: String,

    /// Maximum accepted upload size in bytes
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl UploadConfig {
    /// Validate upload configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.dir.is_empty() {
            return Err(ValidationError::MissingRequired("UPLOADS_DIR"));
        }
        if self.max_file_size == 0 {
            return Err(ValidationError::InvalidUploadLimit);
        }
        Ok(())
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: default_upload_dir(),
            max_file_size: default_max_file_size(),
        }
    }
}

fn default_upload_dir() -> String {
    "./public/uploads".to_string()
}

fn default_max_file_size() -> u64 {
    1_000_000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_config_defaults() {
        let config = UploadConfig::default();
        assert_eq!(config.max_file_size, 1_000_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_zero_limit() {
        let config = UploadConfig {
            max_file_size: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
