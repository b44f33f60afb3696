//! Derived board metrics.

use crate::{Task, TaskStatus};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Time windows for the due-soon and recently-completed counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricWindows {
    pub due_soon: Duration,
    pub completed: Duration,
}

impl Default for MetricWindows {
    fn default() -> Self {
        Self {
            due_soon: Duration::days(3),
            completed: Duration::days(30),
        }
    }
}

impl MetricWindows {
    /// Day counts that are not positive or do not fit a `Duration` fall back
    /// to the default for that window.
    pub fn from_days(due_soon_days: i64, completed_days: i64) -> Self {
        let defaults = Self::default();
        Self {
            due_soon: window_days(due_soon_days).unwrap_or(defaults.due_soon),
            completed: window_days(completed_days).unwrap_or(defaults.completed),
        }
    }
}

fn window_days(days: i64) -> Option<Duration> {
    if days <= 0 {
        return None;
    }
    Duration::try_days(days)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardMetrics {
    pub overdue: usize,
    pub due_soon: usize,
    pub completed_recently: usize,
}

/// Open board task: on a column and not yet completed.
fn is_open(task: &Task) -> bool {
    task.board_status().is_some() && !task.is_completed()
}

pub fn is_overdue(task: &Task, now: DateTime<Utc>) -> bool {
    is_open(task) && task.due_date.is_some_and(|due| due < now)
}

pub fn is_due_soon(task: &Task, now: DateTime<Utc>, window: Duration) -> bool {
    // A window reaching past the representable range has no upper bound.
    let until = now.checked_add_signed(window);
    is_open(task)
        && task
            .due_date
            .is_some_and(|due| due >= now && until.map_or(true, |until| due <= until))
}

fn completed_within(task: &Task, now: DateTime<Utc>, window: Duration) -> bool {
    if !matches!(task.status, TaskStatus::Completed | TaskStatus::Archived) {
        return false;
    }
    let since = now.checked_sub_signed(window);
    task.completed_at
        .or(task.updated_at)
        .is_some_and(|at| at <= now && since.map_or(true, |since| at >= since))
}

pub fn compute_metrics(tasks: &[Task], now: DateTime<Utc>, windows: MetricWindows) -> BoardMetrics {
    tasks.iter().fold(BoardMetrics::default(), |mut metrics, task| {
        if is_overdue(task, now) {
            metrics.overdue += 1;
        }
        if is_due_soon(task, now, windows.due_soon) {
            metrics.due_soon += 1;
        }
        if completed_within(task, now, windows.completed) {
            metrics.completed_recently += 1;
        }
        metrics
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_overdue_excludes_completed_and_hidden() {
        let yesterday = Some(now() - Duration::days(1));
        let tasks = vec![
            Task::new("1", "late").with_due_date(yesterday),
            Task::new("2", "late but done")
                .with_status(TaskStatus::Completed)
                .with_due_date(yesterday),
            Task::new("3", "archived")
                .with_status(TaskStatus::Archived)
                .with_due_date(yesterday),
            Task::new("4", "deleted")
                .with_status(TaskStatus::Deleted)
                .with_due_date(yesterday),
            Task::new("5", "undated"),
        ];
        let metrics = compute_metrics(&tasks, now(), MetricWindows::default());
        assert_eq!(metrics.overdue, 1);
    }

    #[test]
    fn test_due_soon_window_bounds() {
        let tasks = vec![
            Task::new("1", "in two days").with_due_date(Some(now() + Duration::days(2))),
            Task::new("2", "exactly at edge").with_due_date(Some(now() + Duration::days(3))),
            Task::new("3", "next week").with_due_date(Some(now() + Duration::days(7))),
            Task::new("4", "already late").with_due_date(Some(now() - Duration::hours(1))),
        ];
        let metrics = compute_metrics(&tasks, now(), MetricWindows::default());
        assert_eq!(metrics.due_soon, 2);
        assert_eq!(metrics.overdue, 1);

        let wide = compute_metrics(&tasks, now(), MetricWindows::from_days(10, 30));
        assert_eq!(wide.due_soon, 3);
    }

    #[test]
    fn test_completed_recently_uses_completion_then_update() {
        let mut recent = Task::new("1", "done last week").with_status(TaskStatus::Completed);
        recent.completed_at = Some(now() - Duration::days(7));

        let mut updated_only = Task::new("2", "archived recently").with_status(TaskStatus::Archived);
        updated_only.updated_at = Some(now() - Duration::days(2));

        let mut stale = Task::new("3", "done long ago").with_status(TaskStatus::Completed);
        stale.completed_at = Some(now() - Duration::days(45));
        stale.updated_at = Some(now() - Duration::days(1));

        let mut not_done = Task::new("4", "pending");
        not_done.completed_at = Some(now() - Duration::days(1));

        let no_timestamp = Task::new("5", "done, unknown when").with_status(TaskStatus::Completed);

        let tasks = vec![recent, updated_only, stale, not_done, no_timestamp];
        let metrics = compute_metrics(&tasks, now(), MetricWindows::default());
        assert_eq!(metrics.completed_recently, 2);
    }

    #[test]
    fn test_out_of_range_windows_fall_back_to_defaults() {
        assert_eq!(
            MetricWindows::from_days(1_000_000_000_000, i64::MAX),
            MetricWindows::default()
        );
        assert_eq!(MetricWindows::from_days(0, -1), MetricWindows::default());
        assert_eq!(MetricWindows::from_days(5, 30).due_soon, Duration::days(5));
    }

    #[test]
    fn test_huge_windows_do_not_overflow() {
        let mut done = Task::new("2", "done").with_status(TaskStatus::Completed);
        done.completed_at = Some(now() - Duration::days(400));
        let tasks = vec![
            Task::new("1", "tomorrow").with_due_date(Some(now() + Duration::days(1))),
            done,
        ];
        let windows = MetricWindows {
            due_soon: Duration::days(1_000_000_000),
            completed: Duration::days(1_000_000_000),
        };

        let metrics = compute_metrics(&tasks, now(), windows);
        assert_eq!(metrics.due_soon, 1);
        assert_eq!(metrics.completed_recently, 1);
    }
}
