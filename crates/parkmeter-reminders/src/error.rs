//! Reminder error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReminderError {
    #[error("No async runtime available for reminder timers")]
    NoRuntime,
}
