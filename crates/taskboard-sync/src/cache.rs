//! Versioned client-side copy of the task collection.

use std::collections::HashSet;
use taskboard_domain::{BoardStatus, Task, TaskId, TaskStatus};

/// A cached view of the task resource that can go stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    All,
    Status(BoardStatus),
}

impl QueryKey {
    /// The full collection and every per-column view.
    pub fn every() -> impl Iterator<Item = QueryKey> {
        std::iter::once(QueryKey::All).chain(BoardStatus::ALL.into_iter().map(QueryKey::Status))
    }
}

/// Proof that a fetch was started under a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// Verbatim copy of the collection taken before an optimistic edit.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    tasks: Vec<Task>,
}

impl CacheSnapshot {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }
}

#[derive(Debug, Default)]
pub struct TaskCache {
    tasks: Vec<Task>,
    version: u64,
    generation: u64,
    /// Optimistic edits whose server answer has not arrived yet.
    pending_mutations: usize,
    stale: HashSet<QueryKey>,
}

impl TaskCache {
    pub fn new(tasks: Vec<Task>) -> Self {
        Self {
            tasks,
            ..Default::default()
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| &t.id == id)
    }

    /// Bumped on every change to the collection.
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn replace(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
        self.version += 1;
    }

    pub fn begin_fetch(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
        }
    }

    /// Stores a fetch result unless the fetch was cancelled after the ticket
    /// was issued or a mutation is still unsettled. A result dropped for an
    /// unsettled mutation leaves every key stale. Returns whether the result
    /// was applied.
    pub fn complete_fetch(&mut self, ticket: FetchTicket, tasks: Vec<Task>) -> bool {
        if self.pending_mutations > 0 {
            tracing::debug!(
                "Discarding fetch while {} mutation(s) are unsettled",
                self.pending_mutations
            );
            self.invalidate_all();
            return false;
        }
        if ticket.generation != self.generation {
            tracing::debug!(
                "Discarding fetch from generation {} (current {})",
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.replace(tasks);
        self.stale.clear();
        true
    }

    /// Invalidates every outstanding ticket.
    pub fn cancel_fetches(&mut self) {
        self.generation += 1;
    }

    /// Marks an optimistic edit as in flight. Cancels outstanding fetches and
    /// holds back every fetch until the matching `end_mutation`.
    pub fn begin_mutation(&mut self) {
        self.cancel_fetches();
        self.pending_mutations += 1;
    }

    pub fn end_mutation(&mut self) {
        self.pending_mutations = self.pending_mutations.saturating_sub(1);
    }

    pub fn has_pending_mutations(&self) -> bool {
        self.pending_mutations > 0
    }

    pub fn invalidate(&mut self, key: QueryKey) {
        self.stale.insert(key);
    }

    pub fn invalidate_all(&mut self) {
        self.stale.extend(QueryKey::every());
    }

    pub fn is_stale(&self, key: QueryKey) -> bool {
        self.stale.contains(&key)
    }

    pub fn snapshot(&self) -> CacheSnapshot {
        CacheSnapshot {
            tasks: self.tasks.clone(),
        }
    }

    pub fn restore(&mut self, snapshot: CacheSnapshot) {
        self.replace(snapshot.tasks);
    }

    /// Optimistically sets a task's status. Returns false if the task is
    /// not cached.
    pub fn apply_status(&mut self, id: &TaskId, status: TaskStatus) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| &t.id == id) else {
            return false;
        };
        task.status = status;
        self.version += 1;
        true
    }

    /// Replaces the cached task with the same id, or appends it.
    pub fn upsert(&mut self, task: Task) {
        match self.tasks.iter_mut().find(|t| t.id == task.id) {
            Some(existing) => *existing = task,
            None => self.tasks.push(task),
        }
        self.version += 1;
    }
}
