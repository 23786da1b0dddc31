use thiserror::Error;

use crate::SessionKey;

/// Errors that can occur when interacting with the session store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing session store rejected or failed the operation.
    #[error("Session backend error for {session}: {message}")]
    Backend { session: SessionKey, message: String },

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Creates a backend error for the given session.
    pub fn backend(session: &SessionKey, message: impl Into<String>) -> Self {
        Self::Backend {
            session: session.clone(),
            message: message.into(),
        }
    }
}

/// Result type for session store operations.
pub type Result<T> = std::result::Result<T, StorageError>;
