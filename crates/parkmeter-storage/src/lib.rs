//! ParkMeter Storage Layer
//!
//! SQLite-based persistence for parking lots and parking sessions.
//! One writer at a time; the domain crates serialize access through the
//! shared connection handle.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
