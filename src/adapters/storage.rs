use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::PathBuf;

/// 以 base_path 為根目錄的本機檔案儲存
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
}

impl LocalStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    /// Where `path` lands on disk.
    pub fn resolve(&self, path: &str) -> PathBuf {
        self.base_path.join(path)
    }
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = self.resolve(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::EtlError;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("out"));

        storage
            .write_file("nested/relationship_installs.jsonl", b"{}\n")
            .await
            .unwrap();

        let data = fs::read(storage.resolve("nested/relationship_installs.jsonl")).unwrap();
        assert_eq!(data, b"{}\n");
        assert!(dir.path().join("out/nested").is_dir());
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path());

        storage.write_file("manifest.json", b"old").await.unwrap();
        storage.write_file("manifest.json", b"new").await.unwrap();

        assert_eq!(fs::read(dir.path().join("manifest.json")).unwrap(), b"new");
    }

    #[tokio::test]
    async fn test_write_under_a_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("blocked"), b"x").unwrap();
        let storage = LocalStorage::new(dir.path().join("blocked"));

        let err = storage.write_file("manifest.json", b"{}").await.unwrap_err();
        assert!(matches!(err, EtlError::IoError(_)));
    }
}
