//! A task file standing in for the task server.
//!
//! The file holds either a JSON array of task records or an object with a
//! `tasks` array. Records are updated in place, so fields the engine does not
//! model survive. A record with `"locked": true` rejects every update.

use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use taskboard_core::{TaskboardError, TaskboardResult};
use taskboard_domain::{parse_task_list, Task, TaskId, TaskStatus, TaskTransport};
use taskboard_persistence::AtomicWriter;
use tokio::sync::Mutex;

pub struct JsonFileTransport {
    path: PathBuf,
    // Serializes read-modify-write cycles from concurrent updates.
    write_lock: Mutex<()>,
}

fn records(root: &Value) -> &Value {
    root.get("tasks").unwrap_or(root)
}

fn records_mut(root: &mut Value) -> Option<&mut Vec<Value>> {
    match root {
        Value::Array(items) => Some(items),
        Value::Object(map) => map.get_mut("tasks").and_then(Value::as_array_mut),
        _ => None,
    }
}

impl JsonFileTransport {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            write_lock: Mutex::new(()),
        }
    }

    async fn read_root(&self) -> TaskboardResult<Value> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(TaskboardError::NotFound(format!(
                    "Tasks file {}",
                    self.path.display()
                )))
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|e| TaskboardError::Serialization(e.to_string()))
    }
}

#[async_trait]
impl TaskTransport for JsonFileTransport {
    async fn fetch_tasks(&self) -> TaskboardResult<Vec<Task>> {
        let root = self.read_root().await?;
        let tasks = parse_task_list(records(&root));
        tracing::debug!("Fetched {} tasks from {}", tasks.len(), self.path.display());
        Ok(tasks)
    }

    async fn update_status(&self, id: &TaskId, status: TaskStatus) -> TaskboardResult<Task> {
        let _guard = self.write_lock.lock().await;
        let mut root = self.read_root().await?;

        let task = {
            let records = records_mut(&mut root).ok_or_else(|| {
                TaskboardError::Serialization("tasks file must hold an array".to_string())
            })?;
            let record = records
                .iter_mut()
                .find(|r| r.get("id").and_then(TaskId::from_value).as_ref() == Some(id))
                .ok_or_else(|| TaskboardError::NotFound(format!("Task {}", id)))?;

            if record.get("locked").and_then(Value::as_bool) == Some(true) {
                return Err(TaskboardError::Rejected {
                    status: 409,
                    message: format!("Task {} is locked", id),
                });
            }

            let object = record
                .as_object_mut()
                .ok_or_else(|| TaskboardError::Internal(format!("Task {} is not an object", id)))?;
            let now = Utc::now().to_rfc3339();
            object.insert("status".to_string(), Value::from(status.as_str()));
            object.insert("updatedAt".to_string(), Value::from(now.clone()));
            if status == TaskStatus::Completed {
                object.insert("completedAt".to_string(), Value::from(now));
            }

            Task::from_value(record)
                .ok_or_else(|| TaskboardError::Internal(format!("Task {} lost its id", id)))?
        };

        let bytes = serde_json::to_vec_pretty(&root)
            .map_err(|e| TaskboardError::Serialization(e.to_string()))?;
        AtomicWriter::write_atomic(&self.path, &bytes).await?;
        tracing::info!("Task {} is now {}", id, status);
        Ok(task)
    }
}
