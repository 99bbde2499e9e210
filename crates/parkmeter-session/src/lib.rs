//! ParkMeter Session Engine
//!
//! Owns the parking-session lifecycle:
//! - at most one session is active (no end timestamp) at a time
//! - cost is computed and frozen at the moment a session ends
//! - reminders are scheduled 15 minutes before the chosen hour threshold
//!   and cancelled when the session ends or the reminder is disabled

mod engine;
mod error;
mod session;

pub use engine::SessionEngine;
pub use error::SessionError;
pub use session::{ParkingSession, SessionDraft};

pub type Result<T> = std::result::Result<T, SessionError>;
