use crate::{Task, TaskId, TaskStatus};
use async_trait::async_trait;
use taskboard_core::TaskboardResult;

/// The task resource the board talks to.
///
/// Implementations map onto the REST collaborator: `fetch_tasks` is the
/// collection GET, `update_status` is `PUT /tasks/{id}` with `{status}`.
#[async_trait]
pub trait TaskTransport: Send + Sync {
    async fn fetch_tasks(&self) -> TaskboardResult<Vec<Task>>;

    /// Returns the task as the server stored it.
    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> TaskboardResult<Task>;
}
