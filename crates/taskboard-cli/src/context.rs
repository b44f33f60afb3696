use crate::transport::JsonFileTransport;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use taskboard_core::{AppConfig, TaskboardResult};
use taskboard_domain::{MetricWindows, TaskTransport};
use taskboard_persistence::{
    spawn_ledger_writer, BlobStore, FileBlobStore, LedgerStore, PreferenceStore,
};
use taskboard_sync::BoardController;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Everything one CLI invocation works with.
pub struct CliContext {
    pub transport: JsonFileTransport,
    pub controller: BoardController,
    pub prefs: PreferenceStore,
    pub windows: MetricWindows,
    writer: JoinHandle<()>,
}

impl CliContext {
    pub async fn load(tasks_path: &Path, state_dir: Option<PathBuf>) -> TaskboardResult<Self> {
        let config = AppConfig::load();
        let state_dir = state_dir.unwrap_or_else(|| config.effective_state_dir());
        tracing::debug!("Using state directory {}", state_dir.display());

        let blobs: Arc<dyn BlobStore> = Arc::new(FileBlobStore::new(&state_dir));
        let ledger_store = LedgerStore::new(blobs.clone());
        let ledger = ledger_store.load().await;
        let prefs = PreferenceStore::load(blobs).await;

        let transport = JsonFileTransport::new(tasks_path);
        let tasks = transport.fetch_tasks().await?;

        let (tx, rx) = mpsc::unbounded_channel();
        let writer = spawn_ledger_writer(ledger_store, rx);
        let controller = BoardController::new(tasks, ledger).with_ledger_writer(tx);

        Ok(Self {
            transport,
            controller,
            prefs,
            windows: MetricWindows::from_days(
                config.effective_due_soon_days(),
                config.effective_completed_window_days(),
            ),
            writer,
        })
    }

    /// Closes the ledger channel and waits for pending writes.
    pub async fn finish(self) -> anyhow::Result<()> {
        let Self {
            controller, writer, ..
        } = self;
        drop(controller);
        writer.await?;
        Ok(())
    }
}
