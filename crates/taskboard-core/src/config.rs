use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const DEFAULT_DUE_SOON_DAYS: i64 = 3;
const DEFAULT_COMPLETED_WINDOW_DAYS: i64 = 30;
/// Longest metric window accepted from the config file, in days.
const MAX_WINDOW_DAYS: i64 = 36_500;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the persisted column order and preference blobs.
    #[serde(default)]
    pub state_dir: Option<PathBuf>,

    #[serde(default)]
    pub due_soon_days: Option<i64>,

    #[serde(default)]
    pub completed_window_days: Option<i64>,
}

impl AppConfig {
    pub fn config_path() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::home_dir().map(|home| home.join(".config/taskboard/config.toml"))
        }
        #[cfg(target_os = "linux")]
        {
            dirs::config_dir().map(|config| config.join("taskboard/config.toml"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|config| config.join("taskboard\\config.toml"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            None
        }
    }

    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Missing or unparseable files fall back to defaults.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        std::fs::read_to_string(path)
            .ok()
            .and_then(|content| toml::from_str(&content).ok())
            .unwrap_or_default()
    }

    pub fn effective_state_dir(&self) -> PathBuf {
        self.state_dir
            .clone()
            .or_else(|| dirs::data_local_dir().map(|dir| dir.join("taskboard")))
            .unwrap_or_else(|| PathBuf::from(".taskboard"))
    }

    pub fn effective_due_soon_days(&self) -> i64 {
        self.due_soon_days
            .filter(|days| (1..=MAX_WINDOW_DAYS).contains(days))
            .unwrap_or(DEFAULT_DUE_SOON_DAYS)
    }

    pub fn effective_completed_window_days(&self) -> i64 {
        self.completed_window_days
            .filter(|days| (1..=MAX_WINDOW_DAYS).contains(days))
            .unwrap_or(DEFAULT_COMPLETED_WINDOW_DAYS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_when_missing() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load_from(&dir.path().join("missing.toml"));
        assert_eq!(config.effective_due_soon_days(), 3);
        assert_eq!(config.effective_completed_window_days(), 30);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "state_dir = \"/tmp/board\"\ndue_soon_days = 7\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.effective_state_dir(), PathBuf::from("/tmp/board"));
        assert_eq!(config.effective_due_soon_days(), 7);
        assert_eq!(config.effective_completed_window_days(), 30);
    }

    #[test]
    fn test_invalid_file_degrades_to_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "due_soon_days = \"soon\"").unwrap();

        let config = AppConfig::load_from(&path);
        assert!(config.due_soon_days.is_none());
        assert_eq!(config.effective_due_soon_days(), 3);
    }

    #[test]
    fn test_non_positive_windows_ignored() {
        let config = AppConfig {
            state_dir: None,
            due_soon_days: Some(0),
            completed_window_days: Some(-5),
        };
        assert_eq!(config.effective_due_soon_days(), 3);
        assert_eq!(config.effective_completed_window_days(), 30);
    }

    #[test]
    fn test_oversized_windows_ignored() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "due_soon_days = 1000000000000\ncompleted_window_days = 36500\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path);
        assert_eq!(config.effective_due_soon_days(), 3);
        assert_eq!(config.effective_completed_window_days(), 36_500);
    }
}
