//! Board controller: owns the task cache and the rendered columns, turns drag
//! gestures into mutations and runs them optimistically against a transport.
//!
//! A status change is applied in three phases. `begin_transition` cancels
//! outstanding fetches, snapshots the cache and applies the new status
//! locally. The caller then sends the request, and `settle_transition`
//! either commits the server's answer or restores the snapshot verbatim.
//! `transition` runs all three against a [`TaskTransport`]. Until every
//! transition has settled, fetch results are held back by the cache and the
//! hydration guard stays armed.

use crate::cache::{CacheSnapshot, FetchTicket, TaskCache};
use crate::events::BoardEvent;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::collections::{HashMap, VecDeque};
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{
    apply_focus, apply_manual_order, compute_metrics, derive_board_state, merge_order,
    resolve_drop_target, BoardMetrics, BoardState, BoardStatus, CollisionInput, ColumnState,
    DragController, DragState, DropOutcome, DropTargetId, FocusMode, MetricWindows, OrderLedger,
    Task, TaskId, TaskStatus, TaskTransport, TransitionRequest,
};
use tokio::sync::mpsc;

/// An optimistic status change waiting for the server's answer.
#[derive(Debug)]
pub struct PendingTransition {
    request: TransitionRequest,
    snapshot: CacheSnapshot,
    ledger: OrderLedger,
    seq: u64,
}

impl PendingTransition {
    pub fn request(&self) -> &TransitionRequest {
        &self.request
    }
}

/// Outcome of archiving every task in one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkArchiveReport {
    pub status: BoardStatus,
    pub archived: Vec<TaskId>,
    /// Task id and a displayable reason.
    pub failed: Vec<(TaskId, String)>,
}

impl BulkArchiveReport {
    fn new(status: BoardStatus) -> Self {
        Self {
            status,
            archived: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn summary(&self) -> String {
        format!("archived {}, failed {}", self.archived.len(), self.failed.len())
    }
}

pub struct BoardController {
    cache: TaskCache,
    board: BoardState,
    ledger: OrderLedger,
    drag: DragController,
    /// Ledger as it was when the current drag started.
    drag_ledger: Option<OrderLedger>,
    skip_next_hydration: bool,
    /// Newest transition sequence number per task.
    in_flight: HashMap<TaskId, u64>,
    next_seq: u64,
    events: VecDeque<BoardEvent>,
    save_tx: Option<mpsc::UnboundedSender<OrderLedger>>,
}

impl BoardController {
    /// Builds the board from an initial collection and the persisted ledger.
    pub fn new(tasks: Vec<Task>, ledger: OrderLedger) -> Self {
        let mut controller = Self {
            cache: TaskCache::new(tasks),
            board: BoardState::default(),
            ledger,
            drag: DragController::new(),
            drag_ledger: None,
            skip_next_hydration: false,
            in_flight: HashMap::new(),
            next_seq: 0,
            events: VecDeque::new(),
            save_tx: None,
        };
        controller.hydrate();
        controller
    }

    /// Sends every ledger change to a background writer.
    pub fn with_ledger_writer(mut self, tx: mpsc::UnboundedSender<OrderLedger>) -> Self {
        self.save_tx = Some(tx);
        self
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn columns(&self) -> &ColumnState {
        &self.board.columns
    }

    pub fn archived(&self) -> &[Task] {
        &self.board.archived
    }

    pub fn ledger(&self) -> &OrderLedger {
        &self.ledger
    }

    pub fn cache(&self) -> &TaskCache {
        &self.cache
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    pub fn has_pending_transition(&self, id: &TaskId) -> bool {
        self.in_flight.contains_key(id)
    }

    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        self.events.drain(..).collect()
    }

    pub fn metrics(&self, now: DateTime<Utc>, windows: MetricWindows) -> BoardMetrics {
        compute_metrics(self.cache.tasks(), now, windows)
    }

    pub fn focused_columns(
        &self,
        mode: FocusMode,
        now: DateTime<Utc>,
        windows: MetricWindows,
    ) -> ColumnState {
        apply_focus(&self.board.columns, mode, now, windows)
    }

    /// Rebuilds columns and archive from the cache, reshaped by the ledger.
    pub fn hydrate(&mut self) {
        let derived = derive_board_state(self.cache.tasks());
        let merged = merge_order(&self.ledger, &derived.columns);
        self.board = BoardState {
            columns: apply_manual_order(&derived.columns, &merged),
            archived: derived.archived,
        };
        tracing::debug!(
            "Hydrated board from cache version {}: {} on board, {} archived",
            self.cache.version(),
            self.board.columns.len(),
            self.board.archived.len()
        );

        if merged != self.ledger {
            self.ledger = merged;
            self.queue_ledger_save();
        }
    }

    /// Reacts to a cache change. The first change after an optimistic edit
    /// is suppressed so the locally arranged columns survive it; the guard is
    /// disarmed once every transition has settled.
    pub fn on_cache_updated(&mut self) -> bool {
        if std::mem::take(&mut self.skip_next_hydration) {
            tracing::debug!("Skipping hydration after optimistic update");
            return false;
        }
        self.hydrate();
        true
    }

    pub fn drag_start(&mut self, task_id: &TaskId) -> bool {
        if !self.drag.start(task_id, &self.board.columns) {
            return false;
        }
        self.drag_ledger = Some(self.ledger.clone());
        true
    }

    pub fn drag_over(&mut self, input: &CollisionInput<'_>) -> bool {
        let target = resolve_drop_target(input);
        self.drag_over_target(target.as_ref())
    }

    pub fn drag_over_target(&mut self, target: Option<&DropTargetId>) -> bool {
        self.drag.over(target, &mut self.board.columns)
    }

    /// Finishes the gesture. Returns the status change to run, if any.
    pub fn drag_end(&mut self, input: &CollisionInput<'_>) -> Option<TransitionRequest> {
        let target = resolve_drop_target(input);
        self.drag_end_target(target.as_ref())
    }

    pub fn drag_end_target(&mut self, target: Option<&DropTargetId>) -> Option<TransitionRequest> {
        match self
            .drag
            .end(target, &mut self.board.columns, &mut self.ledger)
        {
            DropOutcome::Ignored => None,
            DropOutcome::Cancelled { task_id } => {
                tracing::debug!("Drag of {} cancelled, rebuilding columns", task_id);
                self.restore_after_cancel();
                None
            }
            DropOutcome::Reordered { status, .. } => {
                self.drag_ledger = None;
                self.queue_ledger_save();
                self.events.push_back(BoardEvent::ColumnReordered { status });
                None
            }
            DropOutcome::StatusChange(request) => {
                self.queue_ledger_save();
                Some(request)
            }
        }
    }

    /// Abandons the active drag, if any, and rebuilds from source data.
    pub fn drag_cancel(&mut self) -> bool {
        if self.drag.cancel().is_none() {
            return false;
        }
        self.restore_after_cancel();
        true
    }

    /// Drops onto `target` and runs the resulting status change, if any.
    pub async fn drop_on(
        &mut self,
        transport: &dyn TaskTransport,
        target: Option<&DropTargetId>,
    ) -> TaskboardResult<()> {
        match self.drag_end_target(target) {
            Some(request) => self.transition(transport, request).await,
            None => Ok(()),
        }
    }

    fn restore_after_cancel(&mut self) {
        if let Some(ledger) = self.drag_ledger.take() {
            self.ledger = ledger;
        }
        self.hydrate();
    }

    /// Moves a task within its column, before `before` or to the end.
    pub fn reorder_within(
        &mut self,
        task_id: &TaskId,
        before: Option<&TaskId>,
    ) -> TaskboardResult<BoardStatus> {
        let (status, index) = self
            .board
            .columns
            .locate(task_id)
            .ok_or_else(|| TaskboardError::NotFound(format!("Task {}", task_id)))?;

        if let Some(before) = before {
            match self.board.columns.locate(before) {
                Some((other, _)) if other == status => {}
                Some(_) => {
                    return Err(TaskboardError::Validation(format!(
                        "Task {} is not in the {} column",
                        before,
                        status.label()
                    )))
                }
                None => return Err(TaskboardError::NotFound(format!("Task {}", before))),
            }
            if before == task_id {
                return Ok(status);
            }
        }

        let column = self.board.columns.column_mut(status);
        let task = column.remove(index);
        let insert_at = before
            .and_then(|id| column.iter().position(|t| &t.id == id))
            .unwrap_or(column.len());
        column.insert(insert_at, task);

        self.ledger.record_column(&self.board.columns, status);
        self.queue_ledger_save();
        self.events.push_back(BoardEvent::ColumnReordered { status });
        Ok(status)
    }

    /// Phase one: snapshot, then apply the new status locally.
    pub fn begin_transition(&mut self, request: TransitionRequest) -> PendingTransition {
        let snapshot = self.cache.snapshot();
        let ledger = self
            .drag_ledger
            .take()
            .unwrap_or_else(|| self.ledger.clone());

        self.cache.begin_mutation();
        self.skip_next_hydration = true;
        self.cache.apply_status(&request.task_id, request.new_status);
        self.place_task(&request.task_id, request.new_status);

        self.next_seq += 1;
        let seq = self.next_seq;
        self.in_flight.insert(request.task_id.clone(), seq);
        tracing::debug!(
            "Optimistic move #{}: {} {} -> {}",
            seq,
            request.task_id,
            request.previous_status,
            request.new_status
        );

        PendingTransition {
            request,
            snapshot,
            ledger,
            seq,
        }
    }

    /// Phase three: commit the server's answer or roll back.
    ///
    /// Only the newest transition of a task touches the cache; an older one
    /// still reports its outcome but never overwrites newer local state.
    pub fn settle_transition(
        &mut self,
        pending: PendingTransition,
        result: TaskboardResult<Task>,
    ) -> TaskboardResult<()> {
        let PendingTransition {
            request,
            snapshot,
            ledger,
            seq,
        } = pending;

        let latest = self.in_flight.get(&request.task_id) == Some(&seq);
        if latest {
            self.in_flight.remove(&request.task_id);
        }
        self.cache.end_mutation();
        if !self.cache.has_pending_mutations() {
            self.skip_next_hydration = false;
        }

        match result {
            Ok(task) => {
                tracing::info!("Moved {} to {}", request.task_id, request.new_status);
                if latest {
                    self.cache.upsert(task);
                    self.hydrate();
                } else {
                    tracing::debug!("Move #{} of {} was superseded", seq, request.task_id);
                }
                self.cache.invalidate_all();
                self.events.push_back(BoardEvent::TaskMoved {
                    task_id: request.task_id,
                    status: request.new_status,
                });
                Ok(())
            }
            Err(e) => {
                if latest {
                    tracing::warn!("Move of {} failed, rolling back: {}", request.task_id, e);
                    self.cache.restore(snapshot);
                    self.ledger = ledger;
                    self.queue_ledger_save();
                    self.hydrate();
                } else {
                    tracing::warn!(
                        "Superseded move #{} of {} failed: {}",
                        seq,
                        request.task_id,
                        e
                    );
                }
                self.events.push_back(BoardEvent::MoveFailed {
                    task_id: request.task_id,
                    message: e.user_message(),
                });
                Err(e)
            }
        }
    }

    /// Runs a status change end to end, then refreshes the collection.
    /// A failed refresh is reported as an event, not as an error.
    pub async fn transition(
        &mut self,
        transport: &dyn TaskTransport,
        request: TransitionRequest,
    ) -> TaskboardResult<()> {
        let pending = self.begin_transition(request);
        let result = transport
            .update_status(&pending.request.task_id, pending.request.new_status)
            .await;
        self.settle_transition(pending, result)?;
        self.refetch(transport).await;
        Ok(())
    }

    pub fn begin_refetch(&self) -> FetchTicket {
        self.cache.begin_fetch()
    }

    /// Applies a fetch result. Returns whether the board was rebuilt.
    pub fn complete_refetch(
        &mut self,
        ticket: FetchTicket,
        result: TaskboardResult<Vec<Task>>,
    ) -> bool {
        match result {
            Ok(tasks) => self.cache.complete_fetch(ticket, tasks) && self.on_cache_updated(),
            Err(e) => {
                tracing::warn!("Refetch failed: {}", e);
                self.events.push_back(BoardEvent::RefetchFailed {
                    message: e.user_message(),
                });
                false
            }
        }
    }

    pub async fn refetch(&mut self, transport: &dyn TaskTransport) -> bool {
        let ticket = self.begin_refetch();
        let result = transport.fetch_tasks().await;
        self.complete_refetch(ticket, result)
    }

    /// Archives every task in `status`, one request per task, concurrently.
    ///
    /// Successes leave the column and are prepended to the archive view;
    /// failures stay where they were. The collection is marked stale but not
    /// refetched.
    pub async fn bulk_archive_column(
        &mut self,
        transport: &dyn TaskTransport,
        status: BoardStatus,
    ) -> BulkArchiveReport {
        let mut report = BulkArchiveReport::new(status);
        let ids = self.board.columns.task_ids(status);
        if ids.is_empty() {
            return report;
        }

        self.cache.cancel_fetches();
        let requests = ids
            .iter()
            .map(|id| async move { transport.update_status(id, TaskStatus::Archived).await });
        let results = join_all(requests).await;

        let mut archived = Vec::new();
        for (id, result) in ids.into_iter().zip(results) {
            match result {
                Ok(mut task) => {
                    task.status = TaskStatus::Archived;
                    self.board.columns.remove(&id);
                    self.cache.upsert(task.clone());
                    archived.push(task);
                    report.archived.push(id);
                }
                Err(e) => {
                    tracing::warn!("Failed to archive {}: {}", id, e);
                    report.failed.push((id, e.user_message()));
                }
            }
        }
        let older = std::mem::replace(&mut self.board.archived, archived);
        self.board.archived.extend(older);

        self.ledger.record_column(&self.board.columns, status);
        self.queue_ledger_save();
        self.cache.invalidate_all();

        tracing::info!("Bulk archive of {}: {}", status, report.summary());
        self.events.push_back(BoardEvent::BulkArchived {
            status,
            archived: report.archived.len(),
            failed: report.failed.len(),
        });
        report
    }

    /// Puts the task where `status` says it belongs, keeping its position
    /// if it is already there.
    fn place_task(&mut self, task_id: &TaskId, status: TaskStatus) {
        let current = self.board.columns.locate(task_id).map(|(s, _)| s);
        let target = status.board_status();
        if current.is_some() && current == target {
            return;
        }

        let task = match self.board.columns.remove(task_id) {
            Some((_, task)) => Some(task),
            None => self
                .board
                .archived
                .iter()
                .position(|t| &t.id == task_id)
                .map(|index| self.board.archived.remove(index)),
        };
        let Some(mut task) = task else {
            return;
        };
        task.status = status;

        match target {
            Some(column) => self.board.columns.column_mut(column).push(task),
            None if status == TaskStatus::Archived => self.board.archived.insert(0, task),
            None => {}
        }

        if let Some(from) = current {
            self.ledger.record_column(&self.board.columns, from);
        }
        if let Some(to) = target {
            self.ledger.record_column(&self.board.columns, to);
        }
        self.queue_ledger_save();
    }

    fn queue_ledger_save(&self) {
        if let Some(ref tx) = self.save_tx {
            tracing::debug!("Queueing column order for async save");
            if let Err(e) = tx.send(self.ledger.clone()) {
                tracing::error!("Failed to queue column order save: channel closed: {:?}", e);
            }
        }
    }
}
