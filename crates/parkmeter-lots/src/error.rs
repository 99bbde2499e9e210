//! Lot error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LotError {
    #[error("Parking lot not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(#[from] parkmeter_storage::StorageError),
}
