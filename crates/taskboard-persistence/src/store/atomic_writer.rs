use std::io::ErrorKind;
use std::path::Path;
use taskboard_core::TaskboardResult;
use tokio::fs;

/// Write-to-temp-then-rename file writer, so a crash mid-write never leaves
/// a truncated blob behind.
pub struct AtomicWriter;

impl AtomicWriter {
    pub async fn write_atomic(path: &Path, data: &[u8]) -> TaskboardResult<()> {
        // Same directory keeps the rename on one filesystem.
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        let temp_path = tempfile::NamedTempFile::new_in(parent)?.into_temp_path();

        fs::write(&temp_path, data).await?;
        temp_path.persist(path).map_err(|e| e.error)?;

        tracing::debug!("Atomically wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }

    /// Reads the whole file, or `None` if it does not exist.
    pub async fn read_optional(path: &Path) -> TaskboardResult<Option<Vec<u8>>> {
        match fs::read(path).await {
            Ok(data) => {
                tracing::debug!("Read {} bytes from {}", data.len(), path.display());
                Ok(Some(data))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.json");

        AtomicWriter::write_atomic(&path, b"{\"a\":1}").await.unwrap();
        let data = AtomicWriter::read_optional(&path).await.unwrap();
        assert_eq!(data.as_deref(), Some(&b"{\"a\":1}"[..]));
    }

    #[tokio::test]
    async fn test_overwrite_leaves_no_temp_files() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("blob.json");

        AtomicWriter::write_atomic(&path, b"first").await.unwrap();
        AtomicWriter::write_atomic(&path, b"second").await.unwrap();

        let data = AtomicWriter::read_optional(&path).await.unwrap().unwrap();
        assert_eq!(data, b"second");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_none() {
        let dir = tempdir().unwrap();
        let data = AtomicWriter::read_optional(&dir.path().join("nope.json"))
            .await
            .unwrap();
        assert!(data.is_none());
    }
}
