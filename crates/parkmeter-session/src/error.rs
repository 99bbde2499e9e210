//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Parking lot not found: {0}")]
    InvalidLot(String),

    #[error("Session not found: {0}")]
    NotFound(String),

    #[error("A parking session is already active: {0}")]
    ActiveSessionExists(String),

    #[error("Session already ended: {0}")]
    AlreadyEnded(String),

    #[error("Storage error: {0}")]
    Storage(#[from] parkmeter_storage::StorageError),
}
