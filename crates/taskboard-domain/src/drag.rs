//! Drag session state machine.
//!
//! `Idle → Dragging(origin, current) → Idle`. Pointer-over events move the
//! dragged card between the in-memory column arrays so the board renders the
//! tentative result; nothing leaves the process until the drop, which is
//! translated into either a local reorder or a status transition request.

use crate::{BoardStatus, ColumnState, DropTargetId, OrderLedger, TaskId, TaskStatus};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragSession {
    pub task_id: TaskId,
    pub origin: BoardStatus,
    pub current: BoardStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(DragSession),
}

/// A status change to send to the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionRequest {
    pub task_id: TaskId,
    pub new_status: TaskStatus,
    pub previous_status: TaskStatus,
}

/// What a drop turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    /// No drag was active.
    Ignored,
    /// No valid target; the caller must rebuild columns from source data.
    Cancelled { task_id: TaskId },
    /// Same column: only the manual order changed.
    Reordered { task_id: TaskId, status: BoardStatus },
    /// Different column: hand off to the mutation coordinator.
    StatusChange(TransitionRequest),
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

/// Column a drop target belongs to: the column itself, or the column
/// currently holding the hovered card.
pub fn resolve_target_column(target: &DropTargetId, columns: &ColumnState) -> Option<BoardStatus> {
    match target {
        DropTargetId::Column(status) => Some(*status),
        DropTargetId::Card(id) => columns.locate(id).map(|(status, _)| status),
    }
}

/// Moves `task_id` out of `from` and into `to`, before `before` when that
/// card is in `to`, otherwise at the end. The moved copy takes the status
/// of its new column.
fn move_across(
    columns: &mut ColumnState,
    task_id: &TaskId,
    from: BoardStatus,
    to: BoardStatus,
    before: Option<&TaskId>,
) -> bool {
    let Some(index) = columns.column(from).iter().position(|t| &t.id == task_id) else {
        return false;
    };
    let mut task = columns.column_mut(from).remove(index);
    task.status = to.into();

    let target = columns.column_mut(to);
    let insert_at = before
        .and_then(|id| target.iter().position(|t| &t.id == id))
        .unwrap_or(target.len());
    target.insert(insert_at, task);
    true
}

/// Array move within one column: remove at the dragged card's index and
/// insert at the hovered card's original index.
fn move_within(columns: &mut ColumnState, status: BoardStatus, task_id: &TaskId, over: &TaskId) {
    let column = columns.column_mut(status);
    let from = column.iter().position(|t| &t.id == task_id);
    let to = column.iter().position(|t| &t.id == over);
    if let (Some(from), Some(to)) = (from, to) {
        if from != to {
            let task = column.remove(from);
            column.insert(to, task);
        }
    }
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        match &self.state {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.session().is_some()
    }

    /// Enters `Dragging` if the task is on a board column. Returns whether
    /// a session started.
    pub fn start(&mut self, task_id: &TaskId, columns: &ColumnState) -> bool {
        let Some((origin, _)) = columns.locate(task_id) else {
            tracing::debug!("Drag start ignored: {} is not on the board", task_id);
            return false;
        };
        tracing::debug!("Drag started: {} from {}", task_id, origin);
        self.state = DragState::Dragging(DragSession {
            task_id: task_id.clone(),
            origin,
            current: origin,
        });
        true
    }

    /// Provisional cross-column move. Returns whether the arrays changed.
    pub fn over(&mut self, target: Option<&DropTargetId>, columns: &mut ColumnState) -> bool {
        let DragState::Dragging(session) = &mut self.state else {
            return false;
        };
        let Some(target) = target else {
            return false;
        };
        if matches!(target, DropTargetId::Card(id) if *id == session.task_id) {
            return false;
        }
        let Some(candidate) = resolve_target_column(target, columns) else {
            return false;
        };
        if candidate == session.current {
            return false;
        }

        let before = match target {
            DropTargetId::Card(id) => Some(id),
            DropTargetId::Column(_) => None,
        };
        if !move_across(columns, &session.task_id, session.current, candidate, before) {
            return false;
        }
        tracing::debug!(
            "Drag over: {} {} -> {}",
            session.task_id,
            session.current,
            candidate
        );
        session.current = candidate;
        true
    }

    /// Finalizes the gesture and always returns to `Idle`.
    ///
    /// On a valid drop the ledger is updated for every touched column.
    pub fn end(
        &mut self,
        target: Option<&DropTargetId>,
        columns: &mut ColumnState,
        ledger: &mut OrderLedger,
    ) -> DropOutcome {
        let DragState::Dragging(session) = std::mem::take(&mut self.state) else {
            return DropOutcome::Ignored;
        };

        let destination = target.and_then(|t| resolve_target_column(t, columns));
        let (Some(target), Some(destination)) = (target, destination) else {
            tracing::debug!("Drop without target: {}", session.task_id);
            return DropOutcome::Cancelled {
                task_id: session.task_id,
            };
        };

        if destination != session.current {
            let before = match target {
                DropTargetId::Card(id) => Some(id),
                DropTargetId::Column(_) => None,
            };
            if !move_across(columns, &session.task_id, session.current, destination, before) {
                return DropOutcome::Cancelled {
                    task_id: session.task_id,
                };
            }
        } else if let DropTargetId::Card(over) = target {
            move_within(columns, destination, &session.task_id, over);
        }

        ledger.record_column(columns, session.origin);
        ledger.record_column(columns, destination);

        if destination == session.origin {
            tracing::debug!("Reordered {} within {}", session.task_id, destination);
            DropOutcome::Reordered {
                task_id: session.task_id,
                status: destination,
            }
        } else {
            DropOutcome::StatusChange(TransitionRequest {
                task_id: session.task_id,
                new_status: destination.into(),
                previous_status: session.origin.into(),
            })
        }
    }

    /// Abandons the gesture (e.g. Escape). Same as a drop with no target.
    pub fn cancel(&mut self) -> Option<DragSession> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(session) => Some(session),
            DragState::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{derive_board_state, Task};

    fn board() -> ColumnState {
        let tasks = vec![
            Task::new("a", "A"),
            Task::new("b", "B"),
            Task::new("c", "C"),
            Task::new("x", "X").with_status(TaskStatus::InProgress),
            Task::new("y", "Y").with_status(TaskStatus::InProgress),
        ];
        derive_board_state(&tasks).columns
    }

    fn ids(columns: &ColumnState, status: BoardStatus) -> Vec<String> {
        columns
            .column(status)
            .iter()
            .map(|t| t.id.to_string())
            .collect()
    }

    fn card(id: &str) -> DropTargetId {
        DropTargetId::Card(TaskId::from(id))
    }

    #[test]
    fn test_start_requires_task_on_board() {
        let columns = board();
        let mut drag = DragController::new();
        assert!(!drag.start(&TaskId::from("missing"), &columns));
        assert_eq!(drag.state(), &DragState::Idle);

        assert!(drag.start(&TaskId::from("b"), &columns));
        let session = drag.session().unwrap();
        assert_eq!(session.origin, BoardStatus::Pending);
        assert_eq!(session.current, BoardStatus::Pending);
    }

    #[test]
    fn test_over_moves_provisionally_before_hovered_card() {
        let mut columns = board();
        let mut drag = DragController::new();
        drag.start(&TaskId::from("a"), &columns);

        assert!(drag.over(Some(&card("y")), &mut columns));
        assert_eq!(ids(&columns, BoardStatus::Pending), vec!["b", "c"]);
        assert_eq!(ids(&columns, BoardStatus::InProgress), vec!["x", "a", "y"]);
        assert_eq!(drag.session().unwrap().current, BoardStatus::InProgress);

        // Hovering within the same tentative column does not move again.
        assert!(!drag.over(Some(&card("x")), &mut columns));
        assert!(!drag.over(None, &mut columns));
    }

    #[test]
    fn test_over_column_body_appends() {
        let mut columns = board();
        let mut drag = DragController::new();
        drag.start(&TaskId::from("x"), &columns);

        assert!(drag.over(Some(&DropTargetId::Column(BoardStatus::Review)), &mut columns));
        assert_eq!(ids(&columns, BoardStatus::Review), vec!["x"]);
        assert_eq!(
            columns.column(BoardStatus::Review)[0].status,
            TaskStatus::Review
        );
    }

    #[test]
    fn test_over_does_not_touch_ledger_until_drop() {
        let mut columns = board();
        let mut ledger = OrderLedger::new();
        ledger.record_all(&columns);
        let before = ledger.clone();

        let mut drag = DragController::new();
        drag.start(&TaskId::from("a"), &columns);
        drag.over(Some(&DropTargetId::Column(BoardStatus::Completed)), &mut columns);
        assert_eq!(ledger, before);

        drag.end(
            Some(&DropTargetId::Column(BoardStatus::Completed)),
            &mut columns,
            &mut ledger,
        );
        assert_eq!(ledger.ids(BoardStatus::Pending), columns.task_ids(BoardStatus::Pending).as_slice());
        assert_eq!(ledger.ids(BoardStatus::Completed), &[TaskId::from("a")]);
    }

    #[test]
    fn test_end_cross_column_is_status_change() {
        let mut columns = board();
        let mut ledger = OrderLedger::new();
        let mut drag = DragController::new();
        drag.start(&TaskId::from("b"), &columns);
        drag.over(Some(&card("x")), &mut columns);

        let outcome = drag.end(
            Some(&DropTargetId::Column(BoardStatus::InProgress)),
            &mut columns,
            &mut ledger,
        );
        assert_eq!(
            outcome,
            DropOutcome::StatusChange(TransitionRequest {
                task_id: TaskId::from("b"),
                new_status: TaskStatus::InProgress,
                previous_status: TaskStatus::Pending,
            })
        );
        assert!(!drag.is_dragging());
        assert_eq!(ids(&columns, BoardStatus::InProgress), vec!["b", "x", "y"]);
        assert_eq!(ids(&columns, BoardStatus::Pending), vec!["a", "c"]);
    }

    #[test]
    fn test_drop_on_card_in_same_column_uses_array_move() {
        let mut columns = board();
        let mut ledger = OrderLedger::new();
        let mut drag = DragController::new();
        drag.start(&TaskId::from("y"), &columns);

        drag.end(Some(&card("x")), &mut columns, &mut ledger);
        assert_eq!(ids(&columns, BoardStatus::InProgress), vec!["y", "x"]);
    }

    #[test]
    fn test_end_same_column_reorders() {
        let mut columns = board();
        let mut ledger = OrderLedger::new();
        let mut drag = DragController::new();
        drag.start(&TaskId::from("a"), &columns);

        let outcome = drag.end(Some(&card("c")), &mut columns, &mut ledger);
        assert_eq!(
            outcome,
            DropOutcome::Reordered {
                task_id: TaskId::from("a"),
                status: BoardStatus::Pending,
            }
        );
        assert_eq!(ids(&columns, BoardStatus::Pending), vec!["b", "c", "a"]);
        assert_eq!(
            ledger.ids(BoardStatus::Pending),
            columns.task_ids(BoardStatus::Pending).as_slice()
        );
    }

    #[test]
    fn test_drag_away_and_back_is_reorder() {
        let mut columns = board();
        let mut ledger = OrderLedger::new();
        let mut drag = DragController::new();
        drag.start(&TaskId::from("c"), &columns);
        drag.over(Some(&card("x")), &mut columns);
        drag.over(Some(&card("a")), &mut columns);

        assert_eq!(ids(&columns, BoardStatus::Pending), vec!["c", "a", "b"]);
        let outcome = drag.end(Some(&card("a")), &mut columns, &mut ledger);
        assert!(matches!(outcome, DropOutcome::Reordered { .. }));
        assert_eq!(columns.get(&TaskId::from("c")).unwrap().status, TaskStatus::Pending);
    }

    #[test]
    fn test_end_without_target_cancels() {
        let mut columns = board();
        let mut ledger = OrderLedger::new();
        let mut drag = DragController::new();
        drag.start(&TaskId::from("a"), &columns);
        drag.over(Some(&card("x")), &mut columns);

        let outcome = drag.end(None, &mut columns, &mut ledger);
        assert_eq!(
            outcome,
            DropOutcome::Cancelled {
                task_id: TaskId::from("a")
            }
        );
        assert!(ledger.is_empty());
        assert!(!drag.is_dragging());
    }

    #[test]
    fn test_end_while_idle_is_ignored() {
        let mut columns = board();
        let mut ledger = OrderLedger::new();
        let mut drag = DragController::new();
        assert_eq!(
            drag.end(Some(&card("a")), &mut columns, &mut ledger),
            DropOutcome::Ignored
        );
        assert!(drag.cancel().is_none());
    }

    #[test]
    fn test_cancel_returns_session() {
        let columns = board();
        let mut drag = DragController::new();
        drag.start(&TaskId::from("y"), &columns);
        let session = drag.cancel().unwrap();
        assert_eq!(session.origin, BoardStatus::InProgress);
        assert!(!drag.is_dragging());
    }
}
