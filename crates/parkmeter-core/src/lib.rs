//! ParkMeter Core
//!
//! Coordination layer for the parking tracker: wires the storage layer,
//! lot catalog, reminder scheduler, and session engine into one container
//! a shell application can embed.

mod app;
mod config;
mod currency;
mod error;

pub use app::ParkMeter;
pub use config::Config;
pub use currency::format_amount;
pub use error::CoreError;

// Re-export core components
pub use parkmeter_lots::{LotCatalog, LotError, ParkingLot, VehicleType};
pub use parkmeter_reminders::{
    reminder_id, LocalScheduler, ReminderError, ReminderScheduler,
};
pub use parkmeter_session::{ParkingSession, SessionDraft, SessionEngine, SessionError};
pub use parkmeter_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
