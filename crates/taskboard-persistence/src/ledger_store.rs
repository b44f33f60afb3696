use crate::traits::{BlobStore, COLUMN_ORDER_KEY};
use std::sync::Arc;
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::OrderLedger;

/// Reads and writes the manual column order blob.
#[derive(Clone)]
pub struct LedgerStore {
    store: Arc<dyn BlobStore>,
}

impl LedgerStore {
    pub fn new(store: Arc<dyn BlobStore>) -> Self {
        Self { store }
    }

    /// Missing, unreadable or malformed storage yields an empty ledger.
    pub async fn load(&self) -> OrderLedger {
        let bytes = match self.store.read(COLUMN_ORDER_KEY).await {
            Ok(Some(bytes)) => bytes,
            Ok(None) => return OrderLedger::new(),
            Err(e) => {
                tracing::warn!("Failed to read column order: {}", e);
                return OrderLedger::new();
            }
        };

        match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(value) => OrderLedger::from_value(&value),
            Err(e) => {
                tracing::warn!("Discarding malformed column order: {}", e);
                OrderLedger::new()
            }
        }
    }

    pub async fn save(&self, ledger: &OrderLedger) -> TaskboardResult<()> {
        let bytes = serde_json::to_vec(ledger)
            .map_err(|e| TaskboardError::Serialization(e.to_string()))?;
        self.store.write(COLUMN_ORDER_KEY, &bytes).await
    }
}
