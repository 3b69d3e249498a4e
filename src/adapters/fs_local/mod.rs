// Local filesystem adapter - File system operations through tokio::fs

use std::io::ErrorKind;
use std::path::Path;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

/// Local filesystem adapter
#[derive(Debug, Default)]
pub struct FsLocalAdapter;

impl FsLocalAdapter {
    /// Create new local filesystem adapter
    pub fn new() -> Result<Self, DomainError> {
        Ok(Self)
    }
}

#[async_trait]
impl FsPort for FsLocalAdapter {
    async fn file_exists(&self, file_path: &Path) -> Result<bool, DomainError> {
        match tokio::fs::metadata(file_path).await {
            Ok(metadata) => Ok(metadata.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(DomainError::FsFail(format!(
                "Failed to inspect {}: {}",
                file_path.display(),
                e
            ))),
        }
    }

    async fn create_parent_directories(&self, file_path: &Path) -> Result<(), DomainError> {
        let Some(parent) = file_path.parent() else {
            return Ok(());
        };
        if parent.as_os_str().is_empty() {
            return Ok(());
        }

        tokio::fs::create_dir_all(parent).await.map_err(|e| {
            DomainError::FsFail(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
        debug!("Ensured output directory {}", parent.display());
        Ok(())
    }

    async fn get_file_size(&self, file_path: &Path) -> Result<u64, DomainError> {
        let metadata = tokio::fs::metadata(file_path)
            .await
            .map_err(|e| DomainError::FsFail(format!("Failed to get file size: {}", e)))?;
        Ok(metadata.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_file_exists() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("clip.mp4");
        std::fs::write(&file, b"data").unwrap();

        let fs = FsLocalAdapter::new().unwrap();
        assert!(fs.file_exists(&file).await.unwrap());
        assert!(!fs.file_exists(&temp_dir.path().join("missing.mp4")).await.unwrap());
        // Directories are not clips
        assert!(!fs.file_exists(temp_dir.path()).await.unwrap());
    }

    #[tokio::test]
    async fn test_create_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("a").join("b").join("out.mp4");

        let fs = FsLocalAdapter::new().unwrap();
        fs.create_parent_directories(&output).await.unwrap();
        assert!(temp_dir.path().join("a").join("b").is_dir());

        // Idempotent, and a bare file name has nothing to create
        fs.create_parent_directories(&output).await.unwrap();
        fs.create_parent_directories(Path::new("out.mp4")).await.unwrap();
    }

    #[tokio::test]
    async fn test_get_file_size() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("clip.mp4");
        std::fs::write(&file, vec![0u8; 1234]).unwrap();

        let fs = FsLocalAdapter::new().unwrap();
        assert_eq!(fs.get_file_size(&file).await.unwrap(), 1234);
        assert!(fs.get_file_size(&temp_dir.path().join("missing")).await.is_err());
    }
}
