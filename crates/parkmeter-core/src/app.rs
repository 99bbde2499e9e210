//! Main application state container

use std::sync::Arc;

use parkmeter_lots::{LotCatalog, ParkingLot};
use parkmeter_reminders::{LocalScheduler, ReminderScheduler};
use parkmeter_session::{ParkingSession, SessionDraft, SessionEngine};
use parkmeter_storage::Database;

use crate::config::Config;
use crate::Result;

/// Main ParkMeter instance
///
/// Central state container for the parking tracker. A shell application
/// owns one of these and drives every operation through it.
pub struct ParkMeter {
    /// Configuration
    config: Config,
    /// Database
    db: Database,
    /// Lot catalog
    catalog: LotCatalog,
    /// Session engine
    engine: SessionEngine,
}

impl ParkMeter {
    /// Open the database at the configured path and wire up the engine
    /// with the local timer-backed reminder scheduler.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_scheduler(config, Arc::new(LocalScheduler::new()))
    }

    /// Same as `new` but with a caller-supplied scheduler, for embedders
    /// that deliver alerts through their own notification surface.
    pub fn with_scheduler(
        config: Config,
        scheduler: Arc<dyn ReminderScheduler>,
    ) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;
        Ok(Self::wire(config, db, scheduler))
    }

    /// Wire onto an already-open database. Used by tests and embedders
    /// that manage the database themselves.
    pub fn with_database(
        config: Config,
        db: Database,
        scheduler: Arc<dyn ReminderScheduler>,
    ) -> Self {
        Self::wire(config, db, scheduler)
    }

    fn wire(config: Config, db: Database, scheduler: Arc<dyn ReminderScheduler>) -> Self {
        let catalog = LotCatalog::new(db.clone());
        let engine = SessionEngine::new(db.clone(), catalog.clone(), scheduler);

        Self {
            config,
            db,
            catalog,
            engine,
        }
    }

    /// Seed the lot catalog (first launch only) and log readiness
    pub fn initialize(&self) -> Result<()> {
        self.catalog.initialize()?;

        tracing::info!(
            database = %self.config.database_path.display(),
            "ParkMeter initialized"
        );

        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn engine(&self) -> &SessionEngine {
        &self.engine
    }

    // === Lot operations ===

    /// All lots, ordered by name
    pub fn lots(&self) -> Result<Vec<ParkingLot>> {
        Ok(self.catalog.list()?)
    }

    pub fn lot(&self, lot_id: &str) -> Result<ParkingLot> {
        Ok(self.catalog.get(lot_id)?)
    }

    // === Session operations ===

    pub fn start_session(&self, draft: SessionDraft) -> Result<ParkingSession> {
        Ok(self.engine.start_session(draft)?)
    }

    pub fn edit_session(&self, session_id: &str, draft: SessionDraft) -> Result<ParkingSession> {
        Ok(self.engine.edit_session(session_id, draft)?)
    }

    pub fn end_session(&self, session_id: &str) -> Result<ParkingSession> {
        Ok(self.engine.end_session(session_id)?)
    }

    /// All sessions, most recently started first
    pub fn sessions(&self) -> Result<Vec<ParkingSession>> {
        Ok(self.engine.list_sessions()?)
    }

    pub fn active_session(&self) -> Result<Option<ParkingSession>> {
        Ok(self.engine.find_active_session()?)
    }

    pub fn calculate_cost(&self, session: &ParkingSession) -> f64 {
        self.engine.calculate_cost(session)
    }

    /// Most recently ended session, for summary display
    pub fn last_ended(&self) -> Option<ParkingSession> {
        self.engine.last_ended()
    }

    /// Clear the summary state after it has been shown
    pub fn clear_last_ended(&self) {
        self.engine.clear_last_ended();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use parkmeter_lots::VehicleType;
    use std::path::PathBuf;

    fn test_app() -> ParkMeter {
        let config = Config::new(PathBuf::from("/tmp/parkmeter-test"));
        let db = Database::open_in_memory().unwrap();
        let app = ParkMeter::with_database(config, db, Arc::new(LocalScheduler::new()));
        app.initialize().unwrap();
        app
    }

    fn draft_for(lot: &ParkingLot) -> SessionDraft {
        SessionDraft {
            lot_id: lot.id.clone(),
            vehicle: VehicleType::Car,
            start_time: Utc::now(),
            reminder_enabled: false,
            reminder_hours: None,
            position: None,
        }
    }

    #[test]
    fn test_initialize_seeds_catalog() {
        let app = test_app();
        let lots = app.lots().unwrap();
        assert_eq!(lots.len(), 7);
        assert!(app.active_session().unwrap().is_none());
    }

    #[test]
    fn test_full_session_flow() {
        let app = test_app();
        let lots = app.lots().unwrap();

        let mut draft = draft_for(&lots[0]);
        draft.start_time = Utc::now() - Duration::minutes(75);
        let session = app.start_session(draft).unwrap();
        assert_eq!(app.active_session().unwrap().unwrap().id, session.id);

        let ended = app.end_session(&session.id).unwrap();
        // 1h15m at 5000 first hour + 4000 per subsequent hour
        assert_eq!(ended.total_cost, Some(9000.0));
        assert!(app.active_session().unwrap().is_none());
        assert_eq!(app.last_ended().unwrap().id, ended.id);

        app.clear_last_ended();
        assert!(app.last_ended().is_none());
    }

    #[tokio::test]
    async fn test_reminder_flow_with_local_scheduler() {
        let config = Config::new(PathBuf::from("/tmp/parkmeter-test"));
        let db = Database::open_in_memory().unwrap();
        let scheduler = Arc::new(LocalScheduler::new());
        let app = ParkMeter::with_database(config, db, scheduler.clone());
        app.initialize().unwrap();

        let lots = app.lots().unwrap();
        let mut draft = draft_for(&lots[0]);
        draft.reminder_enabled = true;
        draft.reminder_hours = Some(2.0);

        let session = app.start_session(draft).unwrap();
        assert_eq!(scheduler.pending_count(), 1);

        app.end_session(&session.id).unwrap();
        assert_eq!(scheduler.pending_count(), 0);
    }
}
