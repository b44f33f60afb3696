use crate::traits::{BlobStore, PREFERENCES_KEY};
use std::sync::Arc;
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{BoardStatus, Density, FocusMode, Preferences};

/// Board view preferences backed by a blob store.
///
/// Every change rewrites the whole blob. When the write fails the error is
/// returned, but the in-memory value keeps the change.
pub struct PreferenceStore {
    store: Arc<dyn BlobStore>,
    prefs: Preferences,
}

impl PreferenceStore {
    /// Missing, unreadable or malformed storage yields default preferences.
    pub async fn load(store: Arc<dyn BlobStore>) -> Self {
        let prefs = match store.read(PREFERENCES_KEY).await {
            Ok(Some(bytes)) => match serde_json::from_slice::<serde_json::Value>(&bytes) {
                Ok(value) => Preferences::from_value(&value),
                Err(e) => {
                    tracing::warn!("Discarding malformed preferences: {}", e);
                    Preferences::default()
                }
            },
            Ok(None) => Preferences::default(),
            Err(e) => {
                tracing::warn!("Failed to read preferences: {}", e);
                Preferences::default()
            }
        };
        Self { store, prefs }
    }

    pub fn prefs(&self) -> &Preferences {
        &self.prefs
    }

    pub fn density(&self) -> Density {
        self.prefs.density
    }

    pub fn focus_mode(&self) -> FocusMode {
        self.prefs.focus_mode
    }

    pub fn is_collapsed(&self, status: BoardStatus) -> bool {
        self.prefs.is_collapsed(status)
    }

    pub async fn set_density(&mut self, density: Density) -> TaskboardResult<()> {
        self.prefs.density = density;
        self.persist().await
    }

    /// comfortable -> cozy -> compact -> comfortable
    pub async fn cycle_density(&mut self) -> TaskboardResult<Density> {
        self.prefs.density = self.prefs.density.next();
        self.persist().await?;
        Ok(self.prefs.density)
    }

    pub async fn set_focus_mode(&mut self, mode: FocusMode) -> TaskboardResult<()> {
        self.prefs.focus_mode = mode;
        self.persist().await
    }

    /// Returns whether the column is collapsed after the toggle.
    pub async fn toggle_column_collapsed(&mut self, status: BoardStatus) -> TaskboardResult<bool> {
        let collapsed = self.prefs.toggle_collapsed(status);
        self.persist().await?;
        Ok(collapsed)
    }

    async fn persist(&self) -> TaskboardResult<()> {
        let bytes = serde_json::to_vec(&self.prefs)
            .map_err(|e| TaskboardError::Serialization(e.to_string()))?;
        self.store.write(PREFERENCES_KEY, &bytes).await?;
        tracing::info!("Saved board preferences");
        Ok(())
    }
}
