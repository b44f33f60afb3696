pub mod board;
pub mod prefs;
pub mod task;

use serde::Serialize;
use serde_json::Value;

/// What a handler wants printed once the context has been flushed.
pub enum CommandOutput {
    Data(Value),
    Failed(String),
}

impl CommandOutput {
    pub fn data<T: Serialize>(data: T) -> anyhow::Result<Self> {
        Ok(Self::Data(serde_json::to_value(data)?))
    }

    pub fn failed(message: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self::Failed(message.into()))
    }
}
