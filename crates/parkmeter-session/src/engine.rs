//! Session Engine
//!
//! Lifecycle and cost computation. The active session is never cached:
//! every read goes through a repository query, and every mutation is
//! followed by a re-fetch of the persisted row.

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use std::sync::Arc;

use parkmeter_lots::{LotCatalog, LotError, VehicleType};
use parkmeter_reminders::{reminder_id, ReminderScheduler};
use parkmeter_storage::Database;

use crate::error::SessionError;
use crate::session::{ParkingSession, SessionDraft};
use crate::Result;

/// Reminders fire this long before the chosen hour threshold
const REMINDER_LEAD: Duration = Duration::minutes(15);

pub struct SessionEngine {
    /// Database for persistence
    db: Database,
    /// Lot catalog for id resolution and rate lookup
    catalog: LotCatalog,
    /// Reminder scheduler; failures here never fail a session operation
    scheduler: Arc<dyn ReminderScheduler>,
    /// Most recently ended session, kept for summary display
    last_ended: Arc<RwLock<Option<ParkingSession>>>,
}

impl SessionEngine {
    pub fn new(db: Database, catalog: LotCatalog, scheduler: Arc<dyn ReminderScheduler>) -> Self {
        Self {
            db,
            catalog,
            scheduler,
            last_ended: Arc::new(RwLock::new(None)),
        }
    }

    /// Start a new session at the given lot.
    ///
    /// Rejected while another session is active, or when the lot id does
    /// not resolve; neither case creates a record.
    pub fn start_session(&self, draft: SessionDraft) -> Result<ParkingSession> {
        if let Some(active) = self.find_active_session()? {
            return Err(SessionError::ActiveSessionExists(active.id));
        }

        let lot = self.resolve_lot(&draft.lot_id)?;
        let session = ParkingSession::from_draft(lot.name.clone(), &draft);

        self.save_session(&session)?;

        if session.reminder_enabled && session.reminder_hours.is_some() {
            self.schedule_reminder(&session);
        }

        tracing::info!(
            session_id = %session.id,
            lot_name = %session.lot_name,
            vehicle = %session.vehicle,
            "Started parking session"
        );

        self.get_session(&session.id)
    }

    /// Overwrite the mutable fields of a still-active session.
    ///
    /// The reminder is rescheduled under the same identifier when enabled,
    /// cancelled when disabled. Ended sessions are rejected.
    pub fn edit_session(&self, session_id: &str, draft: SessionDraft) -> Result<ParkingSession> {
        let mut session = self.get_session(session_id)?;
        if !session.is_active() {
            return Err(SessionError::AlreadyEnded(session.id));
        }

        let lot = self.resolve_lot(&draft.lot_id)?;
        session.apply_draft(lot.name.clone(), &draft);

        self.save_session(&session)?;

        if session.reminder_enabled && session.reminder_hours.is_some() {
            self.schedule_reminder(&session);
        } else {
            self.scheduler.cancel(&reminder_id(&session.id));
        }

        tracing::info!(
            session_id = %session.id,
            lot_name = %session.lot_name,
            "Edited parking session"
        );

        self.get_session(&session.id)
    }

    /// End a session: set the end timestamp, freeze the cost, cancel the
    /// reminder. A second call fails and leaves the frozen cost untouched.
    pub fn end_session(&self, session_id: &str) -> Result<ParkingSession> {
        let mut session = self.get_session(session_id)?;
        if !session.is_active() {
            return Err(SessionError::AlreadyEnded(session.id));
        }

        let now = Utc::now();
        session.end_time = Some(now);
        session.total_cost = Some(self.cost_as_of(&session, now));

        self.save_session(&session)?;
        self.scheduler.cancel(&reminder_id(&session.id));

        let finalized = self.get_session(&session.id)?;
        *self.last_ended.write() = Some(finalized.clone());

        tracing::info!(
            session_id = %finalized.id,
            lot_name = %finalized.lot_name,
            total_cost = finalized.total_cost.unwrap_or(0.0),
            "Ended parking session"
        );

        Ok(finalized)
    }

    /// Cost of a session as of its end time, or now while still active
    pub fn calculate_cost(&self, session: &ParkingSession) -> f64 {
        let as_of = session.end_time.unwrap_or_else(Utc::now);
        self.cost_as_of(session, as_of)
    }

    /// Cost at an explicit instant. A lot that no longer resolves yields
    /// zero rather than an error; the denormalized lot name may outlive
    /// the lot itself.
    pub fn cost_as_of(&self, session: &ParkingSession, as_of: DateTime<Utc>) -> f64 {
        let lot = match self.catalog.get(&session.lot_id) {
            Ok(lot) => lot,
            Err(_) => {
                tracing::warn!(
                    session_id = %session.id,
                    lot_name = %session.lot_name,
                    "Parking lot not found for cost calculation, using zero cost"
                );
                return 0.0;
            }
        };

        let total_hours = billable_hours(session.start_time, as_of);
        let (first_hour_rate, per_hour_rate) = lot.rates_for(session.vehicle);

        if total_hours <= 0 {
            0.0
        } else if total_hours == 1 {
            first_hour_rate
        } else {
            first_hour_rate + (total_hours - 1) as f64 * per_hour_rate
        }
    }

    /// The single session with no end timestamp, if any
    pub fn find_active_session(&self) -> Result<Option<ParkingSession>> {
        let session = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!(
                "{} WHERE end_time IS NULL ORDER BY start_time DESC LIMIT 1",
                SELECT_SESSION
            ))?;

            let mut rows = stmt.query_map([], session_from_row)?;
            Ok(rows.next().transpose()?)
        })?;

        Ok(session)
    }

    /// All sessions, most recently started first
    pub fn list_sessions(&self) -> Result<Vec<ParkingSession>> {
        let sessions = self.db.with_connection(|conn| {
            let mut stmt =
                conn.prepare(&format!("{} ORDER BY start_time DESC", SELECT_SESSION))?;

            let sessions: Vec<ParkingSession> = stmt
                .query_map([], session_from_row)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(sessions)
        })?;

        Ok(sessions)
    }

    pub fn get_session(&self, session_id: &str) -> Result<ParkingSession> {
        let session = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(&format!("{} WHERE id = ?1", SELECT_SESSION))?;
            let mut rows = stmt.query_map([session_id], session_from_row)?;
            Ok(rows.next().transpose()?)
        })?;

        session.ok_or_else(|| SessionError::NotFound(session_id.to_string()))
    }

    /// Most recently ended session, for summary display
    pub fn last_ended(&self) -> Option<ParkingSession> {
        self.last_ended.read().clone()
    }

    /// Clear the summary state after it has been shown
    pub fn clear_last_ended(&self) {
        *self.last_ended.write() = None;
    }

    fn resolve_lot(&self, lot_id: &str) -> Result<parkmeter_lots::ParkingLot> {
        match self.catalog.get(lot_id) {
            Ok(lot) => Ok(lot),
            Err(LotError::NotFound(id)) => Err(SessionError::InvalidLot(id)),
            Err(LotError::Storage(e)) => Err(SessionError::Storage(e)),
        }
    }

    fn save_session(&self, session: &ParkingSession) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO parking_sessions
                 (id, lot_id, lot_name, vehicle_type, start_time, end_time,
                  reminder_enabled, reminder_hours, position, total_cost)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                rusqlite::params![
                    session.id,
                    session.lot_id,
                    session.lot_name,
                    session.vehicle.as_str(),
                    session.start_time.to_rfc3339(),
                    session.end_time.map(|t| t.to_rfc3339()),
                    session.reminder_enabled as i32,
                    session.reminder_hours,
                    session.position,
                    session.total_cost,
                ],
            )?;
            Ok(())
        })?;

        Ok(())
    }

    /// Fire-and-forget: a session without its reminder is still valid
    fn schedule_reminder(&self, session: &ParkingSession) {
        let Some(hours) = session.reminder_hours else {
            return;
        };

        let threshold = Duration::milliseconds((hours * 3_600_000.0) as i64);
        let fire_at = session.start_time + threshold - REMINDER_LEAD;
        let fire_in = fire_at.signed_duration_since(Utc::now());

        let fire_in = match fire_in.to_std() {
            Ok(d) => d,
            Err(_) => {
                tracing::warn!(
                    session_id = %session.id,
                    reminder_hours = hours,
                    "Reminder threshold is within the 15 minute lead, firing immediately"
                );
                std::time::Duration::ZERO
            }
        };

        let message = format!(
            "Your parking at {} is nearing {} hours.",
            session.lot_name,
            hours.trunc() as i64
        );

        if let Err(e) = self
            .scheduler
            .schedule(&reminder_id(&session.id), fire_in, &message)
        {
            tracing::warn!(
                session_id = %session.id,
                error = %e,
                "Failed to schedule parking reminder"
            );
        }
    }
}

impl Clone for SessionEngine {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
            catalog: self.catalog.clone(),
            scheduler: Arc::clone(&self.scheduler),
            last_ended: Arc::clone(&self.last_ended),
        }
    }
}

const SELECT_SESSION: &str = "SELECT id, lot_id, lot_name, vehicle_type, start_time, end_time,
        reminder_enabled, reminder_hours, position, total_cost
 FROM parking_sessions";

fn session_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<ParkingSession> {
    let vehicle_str: String = row.get(3)?;
    let vehicle: VehicleType = vehicle_str.parse().unwrap_or(VehicleType::Car);

    let start_str: String = row.get(4)?;
    let start_time = DateTime::parse_from_rfc3339(&start_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now());

    let end_str: Option<String> = row.get(5)?;
    let end_time = end_str.and_then(|s| {
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
    });

    Ok(ParkingSession {
        id: row.get(0)?,
        lot_id: row.get(1)?,
        lot_name: row.get(2)?,
        vehicle,
        start_time,
        end_time,
        reminder_enabled: row.get::<_, i32>(6)? != 0,
        reminder_hours: row.get(7)?,
        position: row.get(8)?,
        total_cost: row.get(9)?,
    })
}

/// Whole elapsed hours plus leftover minutes, any leftover minutes rounding
/// the total up to the next billable hour. Seconds are truncated, so a
/// sub-minute stay bills as zero.
fn billable_hours(start: DateTime<Utc>, end: DateTime<Utc>) -> i64 {
    let elapsed = end.signed_duration_since(start);
    let hours = elapsed.num_hours();
    let minutes = elapsed.num_minutes() - hours * 60;

    hours + if minutes > 0 { 1 } else { 0 }
}
