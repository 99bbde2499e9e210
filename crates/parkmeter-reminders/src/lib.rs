//! ParkMeter Reminders
//!
//! One-shot time-delayed alerts, one outstanding reminder per session.
//! The engine talks to the `ReminderScheduler` trait; scheduling failures
//! are non-fatal to session lifecycle (the caller logs and carries on).

mod error;
mod scheduler;

pub use error::ReminderError;
pub use scheduler::{LocalScheduler, ReminderScheduler};

pub type Result<T> = std::result::Result<T, ReminderError>;

/// Identifier convention: one reminder per session
pub fn reminder_id(session_id: &str) -> String {
    format!("reminder_{}", session_id)
}
