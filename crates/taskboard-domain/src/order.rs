//! Manual order ledger.
//!
//! Remembers the user's chosen order of task ids within each column,
//! independent of the default due-date/priority sort. The ledger is a hint:
//! applying it never drops or duplicates a task that is in the column.

use crate::{BoardStatus, ColumnState, TaskId};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLedger {
    order: BTreeMap<BoardStatus, Vec<TaskId>>,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self, status: BoardStatus) -> &[TaskId] {
        self.order.get(&status).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn set_column(&mut self, status: BoardStatus, ids: Vec<TaskId>) {
        self.order.insert(status, ids);
    }

    /// Copies the current order of `status` from the rendered columns.
    pub fn record_column(&mut self, columns: &ColumnState, status: BoardStatus) {
        self.set_column(status, columns.task_ids(status));
    }

    pub fn record_all(&mut self, columns: &ColumnState) {
        for status in BoardStatus::ALL {
            self.record_column(columns, status);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.order.values().all(Vec::is_empty)
    }

    /// Lenient parse of a persisted blob. Unknown keys, non-array values and
    /// unusable ids are skipped; duplicates keep their first occurrence.
    /// Keys that alias the same column (`todo` and `pending`) are merged:
    /// later lists are appended to earlier ones in the blob's key order.
    pub fn from_value(value: &Value) -> Self {
        let mut ledger = Self::new();
        let Some(object) = value.as_object() else {
            return ledger;
        };
        let mut seen: HashMap<BoardStatus, HashSet<TaskId>> = HashMap::new();

        for (key, ids) in object {
            let Some(status) = BoardStatus::parse(key) else {
                tracing::debug!("Ignoring ledger entry for unknown column {:?}", key);
                continue;
            };
            let Some(ids) = ids.as_array() else {
                continue;
            };
            let seen = seen.entry(status).or_default();
            let parsed = ids
                .iter()
                .filter_map(TaskId::from_value)
                .filter(|id| seen.insert(id.clone()));
            ledger.order.entry(status).or_default().extend(parsed);
        }
        ledger
    }
}

/// Reconciles a previous ledger with the live columns.
///
/// Per column: ids no longer present are dropped, surviving ids keep their
/// relative order, and ids the ledger has never seen are appended in the
/// column's current order.
pub fn merge_order(previous: &OrderLedger, columns: &ColumnState) -> OrderLedger {
    let mut merged = OrderLedger::new();

    for status in BoardStatus::ALL {
        let present: HashSet<&TaskId> = columns.column(status).iter().map(|t| &t.id).collect();
        let mut seen: HashSet<&TaskId> = HashSet::new();

        let mut ids: Vec<TaskId> = previous
            .ids(status)
            .iter()
            .filter(|id| present.contains(id) && seen.insert(*id))
            .cloned()
            .collect();

        ids.extend(
            columns
                .column(status)
                .iter()
                .filter(|t| !seen.contains(&t.id))
                .map(|t| t.id.clone()),
        );

        merged.set_column(status, ids);
    }

    merged
}

/// Rebuilds each column in ledger order. Tasks the ledger does not mention
/// follow in their existing (default-sort) order.
pub fn apply_manual_order(columns: &ColumnState, order: &OrderLedger) -> ColumnState {
    let mut ordered = ColumnState::new();

    for status in BoardStatus::ALL {
        let tasks = columns.column(status);
        let by_id: HashMap<&TaskId, usize> =
            tasks.iter().enumerate().map(|(i, t)| (&t.id, i)).collect();

        let mut placed = vec![false; tasks.len()];
        let target = ordered.column_mut(status);

        for id in order.ids(status) {
            if let Some(&index) = by_id.get(id) {
                if !placed[index] {
                    placed[index] = true;
                    target.push(tasks[index].clone());
                }
            }
        }

        target.extend(
            tasks
                .iter()
                .zip(placed)
                .filter(|(_, was_placed)| !was_placed)
                .map(|(task, _)| task.clone()),
        );
    }

    ordered
}
