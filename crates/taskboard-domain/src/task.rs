//! Task value object and its boundary parser.
//!
//! The server owns tasks; the board holds working copies. Records arrive as
//! loosely shaped JSON, so [`Task::from_value`] accepts anything and defaults
//! whatever it cannot read. Fields this crate does not model are carried in
//! [`Task::extra`] and written back untouched.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::status::{normalize_status, BoardStatus, TaskStatus};

/// Stable task identifier. Numeric ids are kept as their decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Accepts non-empty strings and numbers; everything else is not an id.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(Self(s.trim().to_string())),
            Value::Number(n) => Some(Self(n.to_string())),
            _ => None,
        }
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    High,
    #[default]
    Medium,
    Low,
}

impl TaskPriority {
    /// Unrecognized or missing priorities are `medium`.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::String(s) => match s.trim().to_lowercase().as_str() {
                "high" => Self::High,
                "low" => Self::Low,
                _ => Self::Medium,
            },
            _ => Self::Medium,
        }
    }

    /// Sort rank: lower sorts first.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 1,
            Self::Medium => 2,
            Self::Low => 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

const DUE_DATE_KEYS: &[&str] = &["dueDate", "due_date"];
const ASSIGNEE_KEYS: &[&str] = &["assignee", "assignedTo", "assigned_to", "assigneeId", "assignee_id"];
const CREATED_KEYS: &[&str] = &["createdAt", "created_at"];
const UPDATED_KEYS: &[&str] = &["updatedAt", "updated_at"];
const COMPLETED_KEYS: &[&str] = &["completedAt", "completed_at"];
const SIMPLE_KEYS: &[&str] = &["id", "status", "priority", "title", "description"];

fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| object.get(*key))
        .find(|value| !value.is_null())
}

fn is_modelled_key(key: &str) -> bool {
    [
        SIMPLE_KEYS,
        DUE_DATE_KEYS,
        ASSIGNEE_KEYS,
        CREATED_KEYS,
        UPDATED_KEYS,
        COMPLETED_KEYS,
    ]
    .iter()
    .any(|keys| keys.contains(&key))
}

/// RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` (UTC), bare `YYYY-MM-DD`
/// (midnight UTC), or epoch milliseconds.
pub fn parse_timestamp(value: &Value) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => {
            let s = s.trim();
            if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
                return Some(dt.with_timezone(&Utc));
            }
            if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f") {
                return Some(naive.and_utc());
            }
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        }
        Value::Number(n) => n.as_i64().and_then(DateTime::from_timestamp_millis),
        _ => None,
    }
}

fn parse_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_assignee(value: Option<&Value>) -> Option<String> {
    let raw = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Object(object) => return parse_assignee(object.get("id")),
        _ => return None,
    };
    if raw.is_empty() || raw.eq_ignore_ascii_case("unassigned") {
        None
    } else {
        Some(raw)
    }
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            status: TaskStatus::Pending,
            priority: TaskPriority::Medium,
            title: title.into(),
            description: None,
            due_date: None,
            assignee: None,
            created_at: None,
            updated_at: None,
            completed_at: None,
            extra: Map::new(),
        }
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn with_assignee(mut self, assignee: Option<String>) -> Self {
        self.assignee = assignee;
        self
    }

    /// Parses one upstream record. Returns `None` only when there is no
    /// usable identifier; every other field defaults.
    pub fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let id = object.get("id").and_then(TaskId::from_value)?;

        let extra = object
            .iter()
            .filter(|(key, _)| !is_modelled_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(Self {
            id,
            status: normalize_status(object.get("status").unwrap_or(&Value::Null)),
            priority: TaskPriority::from_value(object.get("priority").unwrap_or(&Value::Null)),
            title: parse_text(object.get("title")).unwrap_or_default(),
            description: parse_text(object.get("description")),
            due_date: first_present(object, DUE_DATE_KEYS).and_then(parse_timestamp),
            assignee: parse_assignee(first_present(object, ASSIGNEE_KEYS)),
            created_at: first_present(object, CREATED_KEYS).and_then(parse_timestamp),
            updated_at: first_present(object, UPDATED_KEYS).and_then(parse_timestamp),
            completed_at: first_present(object, COMPLETED_KEYS).and_then(parse_timestamp),
            extra,
        })
    }

    pub fn board_status(&self) -> Option<BoardStatus> {
        self.status.board_status()
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }
}

impl<'de> Deserialize<'de> for Task {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Task::from_value(&value).ok_or_else(|| serde::de::Error::custom("task record has no id"))
    }
}

/// Parses a task collection, skipping entries without an identifier.
/// A non-array payload yields an empty collection.
pub fn parse_task_list(value: &Value) -> Vec<Task> {
    let Some(items) = value.as_array() else {
        tracing::warn!("Task payload is not an array; treating as empty");
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| {
            let task = Task::from_value(item);
            if task.is_none() {
                tracing::warn!("Skipping task record without a usable id");
            }
            task
        })
        .collect()
}
