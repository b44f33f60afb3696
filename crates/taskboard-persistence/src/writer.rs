use crate::LedgerStore;
use taskboard_domain::OrderLedger;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Spawns the background task that persists queued ledgers.
///
/// Bursts are coalesced: only the newest ledger waiting in the channel is
/// written. The task exits once every sender has been dropped.
pub fn spawn_ledger_writer(
    store: LedgerStore,
    mut rx: mpsc::UnboundedReceiver<OrderLedger>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(mut ledger) = rx.recv().await {
            while let Ok(newer) = rx.try_recv() {
                ledger = newer;
            }
            match store.save(&ledger).await {
                Ok(()) => tracing::info!("Column order saved"),
                Err(e) => tracing::error!("Failed to save column order: {}", e),
            }
        }
        tracing::debug!("Ledger writer stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::BlobStore;
    use crate::MemoryBlobStore;
    use std::sync::Arc;
    use taskboard_domain::{BoardStatus, TaskId};

    #[tokio::test]
    async fn test_writer_persists_latest_ledger() {
        let blobs: Arc<dyn BlobStore> = Arc::new(MemoryBlobStore::new());
        let store = LedgerStore::new(blobs);
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = spawn_ledger_writer(store.clone(), rx);

        for n in 0..5 {
            let mut ledger = OrderLedger::new();
            ledger.set_column(BoardStatus::Pending, vec![TaskId::from(n.to_string())]);
            tx.send(ledger).unwrap();
        }
        drop(tx);
        handle.await.unwrap();

        let saved = store.load().await;
        assert_eq!(saved.ids(BoardStatus::Pending), &[TaskId::from("4")]);
    }
}
