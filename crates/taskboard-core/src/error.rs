use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskboardError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Server rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl TaskboardError {
    /// Short message suitable for a dismissible notification.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => "Could not reach the server".to_string(),
            Self::Rejected { message, .. } => message.clone(),
            Self::NotFound(what) => format!("{} no longer exists", what),
            other => other.to_string(),
        }
    }
}
