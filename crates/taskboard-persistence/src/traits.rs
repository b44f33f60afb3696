use async_trait::async_trait;
use taskboard_core::TaskboardResult;

/// Storage key of the manual column order blob.
pub const COLUMN_ORDER_KEY: &str = "board-column-order";

/// Storage key of the view preferences blob.
pub const PREFERENCES_KEY: &str = "board-preferences";

/// Durable client-side key/value storage for small JSON blobs.
/// Implementations handle different backends (files, memory, ...).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Returns `None` when nothing has been stored under `key`.
    async fn read(&self, key: &str) -> TaskboardResult<Option<Vec<u8>>>;

    /// Replaces the blob stored under `key`.
    async fn write(&self, key: &str, bytes: &[u8]) -> TaskboardResult<()>;
}
