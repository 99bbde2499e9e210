//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] parkmeter_storage::StorageError),

    #[error("Lot error: {0}")]
    Lot(#[from] parkmeter_lots::LotError),

    #[error("Session error: {0}")]
    Session(#[from] parkmeter_session::SessionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
