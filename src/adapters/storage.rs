use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }
}

impl Storage for LocalStorage {
    /// Creates missing parent directories and truncates any existing file.
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<String> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(&full_path, data)?;
        Ok(full_path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().join("nested").to_string_lossy().into_owned());

        storage.write_file("out.csv", b"DOI\nold\nolder\n").await.unwrap();
        let path = storage.write_file("out.csv", b"DOI\nnew\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "DOI\nnew\n");
    }
}
