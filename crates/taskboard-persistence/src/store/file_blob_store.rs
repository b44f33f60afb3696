use crate::store::AtomicWriter;
use crate::traits::BlobStore;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use taskboard_core::{TaskboardError, TaskboardResult};

/// One `<key>.json` file per blob inside a state directory.
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> TaskboardResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(TaskboardError::Validation(format!(
                "Invalid storage key: {:?}",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn read(&self, key: &str) -> TaskboardResult<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        AtomicWriter::read_optional(&path).await
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> TaskboardResult<()> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        AtomicWriter::write_atomic(&path, bytes).await
    }
}
