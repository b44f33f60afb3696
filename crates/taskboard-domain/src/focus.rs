use crate::metrics::{is_due_soon, is_overdue, MetricWindows};
use crate::{BoardStatus, ColumnState, FocusMode};
use chrono::{DateTime, Utc};

/// View-only filter over the rendered columns. Order is preserved.
pub fn apply_focus(
    columns: &ColumnState,
    mode: FocusMode,
    now: DateTime<Utc>,
    windows: MetricWindows,
) -> ColumnState {
    if mode == FocusMode::Off {
        return columns.clone();
    }

    let mut focused = ColumnState::new();
    for status in BoardStatus::ALL {
        let kept = columns
            .column(status)
            .iter()
            .filter(|task| match mode {
                FocusMode::Off => true,
                FocusMode::DueSoon => is_due_soon(task, now, windows.due_soon),
                FocusMode::Overdue => is_overdue(task, now),
            })
            .cloned();
        focused.column_mut(status).extend(kept);
    }
    focused
}
