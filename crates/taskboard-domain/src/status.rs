//! Status taxonomy and normalization.
//!
//! Upstream task data carries free-form status strings. Everything that
//! enters the board goes through [`normalize_status`], which maps any input
//! onto the six canonical statuses and never fails.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// One of the four columns rendered on the board, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoardStatus {
    Pending,
    InProgress,
    Review,
    Completed,
}

/// Canonical status: a board status or one of the two hidden statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Review,
    Completed,
    Archived,
    Deleted,
}

impl BoardStatus {
    pub const ALL: [BoardStatus; 4] = [
        BoardStatus::Pending,
        BoardStatus::InProgress,
        BoardStatus::Review,
        BoardStatus::Completed,
    ];

    pub fn as_str(self) -> &'static str {
        TaskStatus::from(self).as_str()
    }

    /// Human-facing column title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In Progress",
            Self::Review => "Review",
            Self::Completed => "Completed",
        }
    }

    /// Parses `raw` only if it names a board column (directly or by alias).
    pub fn parse(raw: &str) -> Option<Self> {
        TaskStatus::parse_known(raw)?.board_status()
    }
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 6] = [
        TaskStatus::Pending,
        TaskStatus::InProgress,
        TaskStatus::Review,
        TaskStatus::Completed,
        TaskStatus::Archived,
        TaskStatus::Deleted,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Review => "review",
            Self::Completed => "completed",
            Self::Archived => "archived",
            Self::Deleted => "deleted",
        }
    }

    /// The board column for this status, or `None` for archived/deleted.
    pub fn board_status(self) -> Option<BoardStatus> {
        match self {
            Self::Pending => Some(BoardStatus::Pending),
            Self::InProgress => Some(BoardStatus::InProgress),
            Self::Review => Some(BoardStatus::Review),
            Self::Completed => Some(BoardStatus::Completed),
            Self::Archived | Self::Deleted => None,
        }
    }

    fn from_canonical(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_str() == s)
    }

    /// Like [`normalize_status_str`] but without the `pending` fallback.
    pub fn parse_known(raw: &str) -> Option<Self> {
        let key = canonical_key(raw);
        Self::from_canonical(&key).or_else(|| {
            STATUS_ALIASES
                .iter()
                .find(|(alias, _)| *alias == key)
                .map(|(_, status)| *status)
        })
    }
}

impl From<BoardStatus> for TaskStatus {
    fn from(status: BoardStatus) -> Self {
        match status {
            BoardStatus::Pending => Self::Pending,
            BoardStatus::InProgress => Self::InProgress,
            BoardStatus::Review => Self::Review,
            BoardStatus::Completed => Self::Completed,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for BoardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const STATUS_ALIASES: &[(&str, TaskStatus)] = &[
    ("todo", TaskStatus::Pending),
    ("to_do", TaskStatus::Pending),
    ("backlog", TaskStatus::Pending),
    ("open", TaskStatus::Pending),
    ("new", TaskStatus::Pending),
    ("queued", TaskStatus::Pending),
    ("inprogress", TaskStatus::InProgress),
    ("doing", TaskStatus::InProgress),
    ("started", TaskStatus::InProgress),
    ("active", TaskStatus::InProgress),
    ("wip", TaskStatus::InProgress),
    ("working", TaskStatus::InProgress),
    ("under_review", TaskStatus::Review),
    ("in_review", TaskStatus::Review),
    ("reviewing", TaskStatus::Review),
    ("qa", TaskStatus::Review),
    ("testing", TaskStatus::Review),
    ("awaiting_review", TaskStatus::Review),
    ("done", TaskStatus::Completed),
    ("complete", TaskStatus::Completed),
    ("closed", TaskStatus::Completed),
    ("finished", TaskStatus::Completed),
    ("resolved", TaskStatus::Completed),
    ("archive", TaskStatus::Archived),
    ("removed", TaskStatus::Deleted),
    ("trash", TaskStatus::Deleted),
    ("trashed", TaskStatus::Deleted),
];

/// Lowercases, trims, and collapses runs of whitespace and hyphens into a
/// single underscore.
fn canonical_key(raw: &str) -> String {
    let mut key = String::with_capacity(raw.len());
    let mut pending_separator = false;
    for c in raw.trim().chars() {
        if c.is_whitespace() || c == '-' {
            pending_separator = true;
            continue;
        }
        if pending_separator {
            key.push('_');
            pending_separator = false;
        }
        key.extend(c.to_lowercase());
    }
    key
}

/// Maps any string onto a canonical status. Unknown values become `pending`.
pub fn normalize_status_str(raw: &str) -> TaskStatus {
    TaskStatus::parse_known(raw).unwrap_or(TaskStatus::Pending)
}

/// Total over arbitrary JSON: non-string values become `pending`.
pub fn normalize_status(value: &Value) -> TaskStatus {
    match value {
        Value::String(s) => normalize_status_str(s),
        _ => TaskStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_canonical_values_pass_through() {
        for status in TaskStatus::ALL {
            assert_eq!(normalize_status_str(status.as_str()), status);
        }
    }

    #[test]
    fn test_case_whitespace_and_hyphens() {
        assert_eq!(normalize_status_str("  In-Progress "), TaskStatus::InProgress);
        assert_eq!(normalize_status_str("IN PROGRESS"), TaskStatus::InProgress);
        assert_eq!(normalize_status_str("in - progress"), TaskStatus::InProgress);
        assert_eq!(normalize_status_str("Under Review"), TaskStatus::Review);
        assert_eq!(normalize_status_str("COMPLETED"), TaskStatus::Completed);
    }

    #[test]
    fn test_aliases() {
        assert_eq!(normalize_status_str("todo"), TaskStatus::Pending);
        assert_eq!(normalize_status_str("To Do"), TaskStatus::Pending);
        assert_eq!(normalize_status_str("done"), TaskStatus::Completed);
        assert_eq!(normalize_status_str("under_review"), TaskStatus::Review);
        assert_eq!(normalize_status_str("WIP"), TaskStatus::InProgress);
        assert_eq!(normalize_status_str("trash"), TaskStatus::Deleted);
    }

    #[test]
    fn test_unknown_defaults_to_pending() {
        assert_eq!(normalize_status_str(""), TaskStatus::Pending);
        assert_eq!(normalize_status_str("blocked-by-vendor"), TaskStatus::Pending);
        assert_eq!(normalize_status_str("🚀"), TaskStatus::Pending);
    }

    #[test]
    fn test_non_string_values_are_pending() {
        assert_eq!(normalize_status(&json!(null)), TaskStatus::Pending);
        assert_eq!(normalize_status(&json!(3)), TaskStatus::Pending);
        assert_eq!(normalize_status(&json!(true)), TaskStatus::Pending);
        assert_eq!(normalize_status(&json!(["done"])), TaskStatus::Pending);
        assert_eq!(normalize_status(&json!({"status": "done"})), TaskStatus::Pending);
        assert_eq!(normalize_status(&json!("done")), TaskStatus::Completed);
    }

    #[test]
    fn test_idempotent() {
        let inputs = [
            "todo",
            "In-Progress",
            " under review ",
            "DONE",
            "archive",
            "nonsense value",
            "",
            "--",
            "review",
        ];
        for input in inputs {
            let once = normalize_status_str(input);
            let twice = normalize_status_str(once.as_str());
            assert_eq!(once, twice, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn test_idempotent_across_spellings() {
        let names = STATUS_ALIASES
            .iter()
            .map(|(alias, _)| *alias)
            .chain(TaskStatus::ALL.iter().map(|status| status.as_str()));

        for name in names {
            let expected = normalize_status_str(name);
            let spaced = name.replace('_', " ");
            let variants = [
                name.to_uppercase(),
                format!("  {}\t", name),
                name.replace('_', "-"),
                spaced.clone(),
                spaced
                    .split(' ')
                    .map(|word| {
                        let mut chars = word.chars();
                        chars
                            .next()
                            .map(|first| first.to_uppercase().chain(chars).collect::<String>())
                            .unwrap_or_default()
                    })
                    .collect::<Vec<String>>()
                    .join(" "),
            ];
            for variant in variants {
                let once = normalize_status_str(&variant);
                assert_eq!(once, expected, "{:?} normalized differently from {:?}", variant, name);
                assert_eq!(normalize_status_str(once.as_str()), once);
            }
        }

        for junk in ["", " ", "_", "--", "x", "in progress!", "pending pending", "ñ", "0"] {
            let once = normalize_status_str(junk);
            assert_eq!(normalize_status_str(once.as_str()), once, "not idempotent for {:?}", junk);
        }
    }

    #[test]
    fn test_board_status_mapping() {
        assert_eq!(TaskStatus::Review.board_status(), Some(BoardStatus::Review));
        assert_eq!(TaskStatus::Archived.board_status(), None);
        assert_eq!(TaskStatus::Deleted.board_status(), None);
        assert_eq!(BoardStatus::parse("done"), Some(BoardStatus::Completed));
        assert_eq!(BoardStatus::parse("archived"), None);
        assert_eq!(BoardStatus::parse("mystery"), None);
        assert_eq!(TaskStatus::parse_known("mystery"), None);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&BoardStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        let parsed: TaskStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(parsed, TaskStatus::Archived);
    }
}
