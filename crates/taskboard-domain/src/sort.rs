//! Task ordering used by the board columns and the archive view.

use crate::Task;
use chrono::{DateTime, Utc};
use std::borrow::Borrow;
use std::cmp::Ordering;

/// Enum dispatch for comparing tasks by a single key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortBy {
    /// Earliest due date first; tasks without one sort last.
    DueDate,
    /// `high` before `medium` before `low`.
    Priority,
    /// Most recent activity first; tasks without any timestamp sort last.
    RecentActivity,
}

/// Default ordering within a board column.
pub const BOARD_COLUMN_ORDER: &[SortBy] = &[SortBy::DueDate, SortBy::Priority];

/// Ordering of the archive view.
pub const ARCHIVE_ORDER: &[SortBy] = &[SortBy::RecentActivity];

impl SortBy {
    pub fn compare(&self, a: &Task, b: &Task) -> Ordering {
        match self {
            Self::DueDate => compare_present_first(a.due_date, b.due_date, |x, y| x.cmp(&y)),
            Self::Priority => a.priority.rank().cmp(&b.priority.rank()),
            Self::RecentActivity => compare_present_first(
                activity_timestamp(a),
                activity_timestamp(b),
                |x, y| y.cmp(&x),
            ),
        }
    }
}

fn compare_present_first<T>(
    a: Option<T>,
    b: Option<T>,
    cmp: impl Fn(T, T) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Approximates "last touched": the first of updated, completed, due,
/// created that is present.
pub fn activity_timestamp(task: &Task) -> Option<DateTime<Utc>> {
    task.updated_at
        .or(task.completed_at)
        .or(task.due_date)
        .or(task.created_at)
}

/// Compares by each key in turn until one differs.
pub fn compare_by(keys: &[SortBy], a: &Task, b: &Task) -> Ordering {
    keys.iter()
        .map(|key| key.compare(a, b))
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Stable in-place sort. Works with both `&Task` and `Task` elements.
pub fn sort_tasks<T: Borrow<Task>>(tasks: &mut [T], keys: &[SortBy]) {
    tasks.sort_by(|a, b| compare_by(keys, a.borrow(), b.borrow()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskPriority;
    use chrono::TimeZone;

    fn day(d: u32) -> Option<DateTime<Utc>> {
        Some(Utc.with_ymd_and_hms(2024, 1, d, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_earlier_due_date_first() {
        let a = Task::new("a", "A").with_due_date(day(1));
        let b = Task::new("b", "B").with_due_date(day(2));
        assert_eq!(SortBy::DueDate.compare(&a, &b), Ordering::Less);
        assert_eq!(SortBy::DueDate.compare(&b, &a), Ordering::Greater);
    }

    #[test]
    fn test_missing_due_date_sorts_last() {
        let dated = Task::new("a", "A").with_due_date(day(28));
        let undated = Task::new("b", "B");
        assert_eq!(SortBy::DueDate.compare(&dated, &undated), Ordering::Less);
        assert_eq!(SortBy::DueDate.compare(&undated, &undated), Ordering::Equal);
    }

    #[test]
    fn test_priority_breaks_ties() {
        let mut tasks = vec![
            Task::new("low", "L").with_priority(TaskPriority::Low),
            Task::new("med", "M"),
            Task::new("high", "H").with_priority(TaskPriority::High),
        ];
        sort_tasks(&mut tasks, BOARD_COLUMN_ORDER);
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["high", "med", "low"]);
    }

    #[test]
    fn test_stable_under_full_ties() {
        let mut tasks = vec![
            Task::new("first", "1").with_due_date(day(3)),
            Task::new("second", "2").with_due_date(day(3)),
            Task::new("third", "3").with_due_date(day(3)),
        ];
        sort_tasks(&mut tasks, BOARD_COLUMN_ORDER);
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_activity_timestamp_fallback_chain() {
        let mut task = Task::new("a", "A");
        assert!(activity_timestamp(&task).is_none());

        task.created_at = day(1);
        assert_eq!(activity_timestamp(&task), day(1));
        task.due_date = day(2);
        assert_eq!(activity_timestamp(&task), day(2));
        task.completed_at = day(3);
        assert_eq!(activity_timestamp(&task), day(3));
        task.updated_at = day(4);
        assert_eq!(activity_timestamp(&task), day(4));
    }

    #[test]
    fn test_archive_most_recent_first() {
        let mut old = Task::new("old", "Old");
        old.updated_at = day(1);
        let mut recent = Task::new("recent", "Recent");
        recent.completed_at = day(9);
        let silent = Task::new("silent", "Silent");

        let mut tasks = vec![&silent, &old, &recent];
        sort_tasks(&mut tasks, ARCHIVE_ORDER);
        let ids: Vec<_> = tasks.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["recent", "old", "silent"]);
    }
}
