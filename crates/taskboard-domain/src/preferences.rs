//! Board view preferences.

use crate::BoardStatus;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Density {
    #[default]
    Comfortable,
    Cozy,
    Compact,
}

impl Density {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "comfortable" => Some(Self::Comfortable),
            "cozy" => Some(Self::Cozy),
            "compact" => Some(Self::Compact),
            _ => None,
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Comfortable => Self::Cozy,
            Self::Cozy => Self::Compact,
            Self::Compact => Self::Comfortable,
        }
    }
}

/// Which subset of tasks the board highlights.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FocusMode {
    #[default]
    #[serde(rename = "none")]
    Off,
    #[serde(rename = "dueSoon")]
    DueSoon,
    #[serde(rename = "overdue")]
    Overdue,
}

impl FocusMode {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "none" => Some(Self::Off),
            "dueSoon" => Some(Self::DueSoon),
            "overdue" => Some(Self::Overdue),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub density: Density,
    pub focus_mode: FocusMode,
    pub collapsed_columns: BTreeSet<BoardStatus>,
}

impl Preferences {
    /// Validating parse of a persisted blob. Each field falls back to its
    /// default independently; unknown column names are dropped.
    pub fn from_value(value: &Value) -> Self {
        let mut prefs = Self::default();
        let Some(object) = value.as_object() else {
            return prefs;
        };

        if let Some(density) = object
            .get("density")
            .and_then(Value::as_str)
            .and_then(Density::parse)
        {
            prefs.density = density;
        }

        if let Some(mode) = object
            .get("focusMode")
            .and_then(Value::as_str)
            .and_then(FocusMode::parse)
        {
            prefs.focus_mode = mode;
        }

        if let Some(collapsed) = object.get("collapsedColumns").and_then(Value::as_array) {
            prefs.collapsed_columns = collapsed
                .iter()
                .filter_map(Value::as_str)
                .filter_map(BoardStatus::parse)
                .collect();
        }

        prefs
    }

    pub fn is_collapsed(&self, status: BoardStatus) -> bool {
        self.collapsed_columns.contains(&status)
    }

    /// Flips the collapsed flag and returns the new value.
    pub fn toggle_collapsed(&mut self, status: BoardStatus) -> bool {
        if self.collapsed_columns.remove(&status) {
            false
        } else {
            self.collapsed_columns.insert(status);
            true
        }
    }
}
