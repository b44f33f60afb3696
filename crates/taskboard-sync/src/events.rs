use serde::Serialize;
use taskboard_domain::{BoardStatus, TaskId, TaskStatus};

/// Notifications the controller queues for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum BoardEvent {
    TaskMoved { task_id: TaskId, status: TaskStatus },
    MoveFailed { task_id: TaskId, message: String },
    ColumnReordered { status: BoardStatus },
    BulkArchived { status: BoardStatus, archived: usize, failed: usize },
    RefetchFailed { message: String },
}

impl BoardEvent {
    pub fn is_error(&self) -> bool {
        matches!(self, Self::MoveFailed { .. } | Self::RefetchFailed { .. })
    }

    /// One-line notification text.
    pub fn message(&self) -> String {
        match self {
            Self::TaskMoved { status, .. } => {
                let name = status.board_status().map(BoardStatus::label);
                format!("Moved to {}", name.unwrap_or(status.as_str()))
            }
            Self::MoveFailed { message, .. } => format!("Move failed: {}", message),
            Self::ColumnReordered { status } => format!("Reordered {}", status.label()),
            Self::BulkArchived {
                archived, failed, ..
            } => format!("archived {}, failed {}", archived, failed),
            Self::RefetchFailed { message } => format!("Refresh failed: {}", message),
        }
    }
}
