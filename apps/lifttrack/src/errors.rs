use thiserror::Error;

use crate::storage::StorageError;

/// Application-level error type.
/// Inference failures are absorbed by the advisor; storage failures reach the
/// command line only when a write is refused to protect an unreadable log.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl AppError {
    /// Short, user-facing message. Infrastructure details go to the log instead.
    pub fn user_message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Storage(e) => {
                tracing::error!("Storage error: {e}");
                "A storage error occurred; nothing was saved".to_string()
            }
        }
    }
}
