//! Parking session data structure

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parkmeter_lots::VehicleType;

/// Caller input for starting or editing a session. The lot name is never
/// part of the draft; the engine denormalizes it from the resolved lot.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub lot_id: String,
    pub vehicle: VehicleType,
    pub start_time: DateTime<Utc>,
    pub reminder_enabled: bool,
    pub reminder_hours: Option<f64>,
    pub position: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParkingSession {
    /// Unique identifier
    pub id: String,
    /// Lot the vehicle is parked at
    pub lot_id: String,
    /// Lot name copied at creation time, stable for display even if the
    /// lot later changes or disappears
    pub lot_name: String,
    /// Vehicle category, selects the rate pair
    pub vehicle: VehicleType,
    pub start_time: DateTime<Utc>,
    /// None while the session is active
    pub end_time: Option<DateTime<Utc>>,
    pub reminder_enabled: bool,
    /// Hour threshold for the reminder; Some only while reminders are enabled
    pub reminder_hours: Option<f64>,
    /// Free-text note of where the vehicle is parked
    pub position: Option<String>,
    /// Frozen at the moment the session ends, never recomputed
    pub total_cost: Option<f64>,
}

impl ParkingSession {
    pub fn from_draft(lot_name: String, draft: &SessionDraft) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            lot_id: draft.lot_id.clone(),
            lot_name,
            vehicle: draft.vehicle,
            start_time: draft.start_time,
            end_time: None,
            reminder_enabled: draft.reminder_enabled,
            reminder_hours: normalize_reminder_hours(draft),
            position: normalize_position(draft.position.as_deref()),
            total_cost: None,
        }
    }

    /// Overwrite all mutable fields from a draft. End time and cost are
    /// untouched; the engine rejects edits on ended sessions before this
    /// is reached.
    pub fn apply_draft(&mut self, lot_name: String, draft: &SessionDraft) {
        self.lot_id = draft.lot_id.clone();
        self.lot_name = lot_name;
        self.vehicle = draft.vehicle;
        self.start_time = draft.start_time;
        self.reminder_enabled = draft.reminder_enabled;
        self.reminder_hours = normalize_reminder_hours(draft);
        self.position = normalize_position(draft.position.as_deref());
    }

    pub fn is_active(&self) -> bool {
        self.end_time.is_none()
    }
}

fn normalize_reminder_hours(draft: &SessionDraft) -> Option<f64> {
    if draft.reminder_enabled {
        draft.reminder_hours
    } else {
        None
    }
}

fn normalize_position(position: Option<&str>) -> Option<String> {
    position
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> SessionDraft {
        SessionDraft {
            lot_id: "lot-1".to_string(),
            vehicle: VehicleType::Car,
            start_time: Utc::now(),
            reminder_enabled: false,
            reminder_hours: None,
            position: None,
        }
    }

    #[test]
    fn test_new_session_is_active() {
        let session = ParkingSession::from_draft("Green Office Park 1".to_string(), &draft());
        assert!(session.is_active());
        assert!(session.end_time.is_none());
        assert!(session.total_cost.is_none());
        assert_eq!(session.lot_name, "Green Office Park 1");
    }

    #[test]
    fn test_reminder_hours_cleared_when_disabled() {
        let mut d = draft();
        d.reminder_enabled = false;
        d.reminder_hours = Some(3.0);

        let session = ParkingSession::from_draft("Lot".to_string(), &d);
        assert!(session.reminder_hours.is_none());
    }

    #[test]
    fn test_empty_position_becomes_none() {
        let mut d = draft();
        d.position = Some("   ".to_string());
        let session = ParkingSession::from_draft("Lot".to_string(), &d);
        assert!(session.position.is_none());

        d.position = Some(" B2, pillar 14 ".to_string());
        let session = ParkingSession::from_draft("Lot".to_string(), &d);
        assert_eq!(session.position.as_deref(), Some("B2, pillar 14"));
    }

    #[test]
    fn test_apply_draft_overwrites_mutable_fields() {
        let mut session = ParkingSession::from_draft("Old Lot".to_string(), &draft());

        let mut d = draft();
        d.lot_id = "lot-2".to_string();
        d.vehicle = VehicleType::Motorcycle;
        d.reminder_enabled = true;
        d.reminder_hours = Some(2.0);
        d.position = Some("rooftop".to_string());

        session.apply_draft("New Lot".to_string(), &d);

        assert_eq!(session.lot_id, "lot-2");
        assert_eq!(session.lot_name, "New Lot");
        assert_eq!(session.vehicle, VehicleType::Motorcycle);
        assert_eq!(session.reminder_hours, Some(2.0));
        assert_eq!(session.position.as_deref(), Some("rooftop"));
        assert!(session.is_active());
    }
}
