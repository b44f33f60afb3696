use crate::traits::BlobStore;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use taskboard_core::TaskboardResult;

/// Process-local blob store, used when no state directory is wanted.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.blobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.lock().is_empty()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn read(&self, key: &str) -> TaskboardResult<Option<Vec<u8>>> {
        Ok(self.blobs.lock().get(key).cloned())
    }

    async fn write(&self, key: &str, bytes: &[u8]) -> TaskboardResult<()> {
        self.blobs.lock().insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
