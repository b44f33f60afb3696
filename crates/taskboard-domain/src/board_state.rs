//! Column state: the per-status task sequences the board renders.

use crate::sort::{sort_tasks, ARCHIVE_ORDER, BOARD_COLUMN_ORDER};
use crate::{BoardStatus, Task, TaskId, TaskStatus};
use serde::Serialize;
use std::collections::BTreeMap;

/// Ordered tasks for each of the four board columns.
///
/// Every board status always has an entry, possibly empty. A task id
/// appears in at most one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ColumnState {
    columns: BTreeMap<BoardStatus, Vec<Task>>,
}

impl Default for ColumnState {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnState {
    pub fn new() -> Self {
        Self {
            columns: BoardStatus::ALL
                .into_iter()
                .map(|status| (status, Vec::new()))
                .collect(),
        }
    }

    pub fn column(&self, status: BoardStatus) -> &[Task] {
        self.columns.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn column_mut(&mut self, status: BoardStatus) -> &mut Vec<Task> {
        self.columns.entry(status).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (BoardStatus, &[Task])> {
        self.columns
            .iter()
            .map(|(status, tasks)| (*status, tasks.as_slice()))
    }

    pub fn task_ids(&self, status: BoardStatus) -> Vec<TaskId> {
        self.column(status).iter().map(|t| t.id.clone()).collect()
    }

    /// Column and index currently holding `id`.
    pub fn locate(&self, id: &TaskId) -> Option<(BoardStatus, usize)> {
        self.columns.iter().find_map(|(status, tasks)| {
            tasks
                .iter()
                .position(|t| &t.id == id)
                .map(|index| (*status, index))
        })
    }

    pub fn contains(&self, id: &TaskId) -> bool {
        self.locate(id).is_some()
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        let (status, index) = self.locate(id)?;
        self.column(status).get(index)
    }

    pub fn len(&self) -> usize {
        self.columns.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Removes `id` from whichever column holds it.
    pub fn remove(&mut self, id: &TaskId) -> Option<(BoardStatus, Task)> {
        let (status, index) = self.locate(id)?;
        let task = self.column_mut(status).remove(index);
        Some((status, task))
    }
}

/// Columns plus the archive view, as derived from a task collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BoardState {
    pub columns: ColumnState,
    pub archived: Vec<Task>,
}

/// Partitions tasks into board columns and the archive, dropping deleted
/// tasks. Columns are in default order (due date, then priority); the
/// archive is most recently active first.
pub fn derive_board_state(tasks: &[Task]) -> BoardState {
    let mut state = BoardState::default();

    for task in tasks {
        match task.status {
            TaskStatus::Deleted => continue,
            TaskStatus::Archived => state.archived.push(task.clone()),
            status => {
                if let Some(column) = status.board_status() {
                    state.columns.column_mut(column).push(task.clone());
                }
            }
        }
    }

    for status in BoardStatus::ALL {
        sort_tasks(state.columns.column_mut(status), BOARD_COLUMN_ORDER);
    }
    sort_tasks(&mut state.archived, ARCHIVE_ORDER);

    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TaskPriority;
    use chrono::{Duration, Utc};

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_empty_state_has_all_columns() {
        let state = derive_board_state(&[]);
        assert_eq!(state.columns.iter().count(), 4);
        assert!(state.columns.is_empty());
        assert!(state.archived.is_empty());
    }

    #[test]
    fn test_partition_counts_modulo_deletion() {
        let tasks = vec![
            Task::new("1", "a"),
            Task::new("2", "b").with_status(TaskStatus::InProgress),
            Task::new("3", "c").with_status(TaskStatus::Review),
            Task::new("4", "d").with_status(TaskStatus::Completed),
            Task::new("5", "e").with_status(TaskStatus::Archived),
            Task::new("6", "f").with_status(TaskStatus::Deleted),
            Task::new("7", "g").with_status(TaskStatus::Deleted),
            Task::new("8", "h"),
        ];
        let state = derive_board_state(&tasks);
        let deleted = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Deleted)
            .count();

        assert_eq!(state.columns.len() + state.archived.len() + deleted, tasks.len());
        assert_eq!(state.columns.column(BoardStatus::Pending).len(), 2);
        assert_eq!(ids(&state.archived), vec!["5"]);
        assert!(!state.columns.contains(&TaskId::from("6")));
    }

    #[test]
    fn test_due_tomorrow_high_before_undated_low() {
        let tomorrow = Utc::now() + Duration::days(1);
        let tasks = vec![
            Task::new("B", "undated")
                .with_priority(TaskPriority::Low),
            Task::new("A", "due tomorrow")
                .with_priority(TaskPriority::High)
                .with_due_date(Some(tomorrow)),
        ];
        let state = derive_board_state(&tasks);
        assert_eq!(ids(state.columns.column(BoardStatus::Pending)), vec!["A", "B"]);
    }

    #[test]
    fn test_locate_and_remove() {
        let tasks = vec![
            Task::new("1", "a"),
            Task::new("2", "b").with_status(TaskStatus::Review),
        ];
        let mut columns = derive_board_state(&tasks).columns;

        assert_eq!(
            columns.locate(&TaskId::from("2")),
            Some((BoardStatus::Review, 0))
        );
        let (status, task) = columns.remove(&TaskId::from("2")).unwrap();
        assert_eq!(status, BoardStatus::Review);
        assert_eq!(task.title, "b");
        assert!(columns.column(BoardStatus::Review).is_empty());
        assert!(columns.remove(&TaskId::from("2")).is_none());
    }

    #[test]
    fn test_serializes_as_status_map() {
        let state = derive_board_state(&[Task::new("1", "a")]);
        let value = serde_json::to_value(&state.columns).unwrap();
        assert_eq!(value["pending"][0]["id"], "1");
        assert!(value["completed"].as_array().unwrap().is_empty());
    }
}
