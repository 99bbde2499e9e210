//! Reminder scheduling
//!
//! `LocalScheduler` runs one tokio timer task per pending reminder and
//! fires the alert into the log. Scheduling under an id that already has a
//! pending reminder supersedes it.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::sleep;

use crate::Result;
use crate::ReminderError;

pub trait ReminderScheduler: Send + Sync {
    /// Schedule a one-shot alert `fire_in` from now. Replaces any pending
    /// reminder with the same id.
    fn schedule(&self, id: &str, fire_in: Duration, message: &str) -> Result<()>;

    /// Cancel a pending reminder. Unknown ids are a no-op.
    fn cancel(&self, id: &str);
}

pub struct LocalScheduler {
    /// Pending timer tasks, keyed by reminder id
    pending: Arc<Mutex<HashMap<String, JoinHandle<()>>>>,
}

impl LocalScheduler {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of reminders still waiting to fire
    pub fn pending_count(&self) -> usize {
        let mut pending = self.pending.lock();
        pending.retain(|_, handle| !handle.is_finished());
        pending.len()
    }
}

impl Default for LocalScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ReminderScheduler for LocalScheduler {
    fn schedule(&self, id: &str, fire_in: Duration, message: &str) -> Result<()> {
        let runtime = Handle::try_current().map_err(|_| ReminderError::NoRuntime)?;

        let mut pending = self.pending.lock();

        // Cancel-then-create: one outstanding reminder per id
        if let Some(previous) = pending.remove(id) {
            previous.abort();
            tracing::debug!(reminder_id = %id, "Superseded pending reminder");
        }

        let reminder_id = id.to_string();
        let message = message.to_string();

        let task = runtime.spawn(async move {
            sleep(fire_in).await;
            tracing::info!(reminder_id = %reminder_id, "{}", message);
        });

        pending.insert(id.to_string(), task);

        tracing::debug!(
            reminder_id = %id,
            fire_in_secs = fire_in.as_secs(),
            "Scheduled reminder"
        );

        Ok(())
    }

    fn cancel(&self, id: &str) {
        if let Some(task) = self.pending.lock().remove(id) {
            task.abort();
            tracing::debug!(reminder_id = %id, "Cancelled reminder");
        }
    }
}

impl Drop for LocalScheduler {
    fn drop(&mut self) {
        for (_, task) in self.pending.lock().drain() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_schedule_and_cancel() {
        let scheduler = LocalScheduler::new();

        scheduler
            .schedule("reminder_a", Duration::from_secs(3600), "Parking reminder")
            .unwrap();
        assert_eq!(scheduler.pending_count(), 1);

        scheduler.cancel("reminder_a");
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_schedule_supersedes_same_id() {
        let scheduler = LocalScheduler::new();

        scheduler
            .schedule("reminder_a", Duration::from_secs(3600), "first")
            .unwrap();
        scheduler
            .schedule("reminder_a", Duration::from_secs(7200), "second")
            .unwrap();

        assert_eq!(scheduler.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_cancel_unknown_id_is_noop() {
        let scheduler = LocalScheduler::new();
        scheduler.cancel("reminder_missing");
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fired_reminder_clears_pending() {
        let scheduler = LocalScheduler::new();

        scheduler
            .schedule("reminder_a", Duration::from_secs(1), "Parking reminder")
            .unwrap();

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[test]
    fn test_schedule_without_runtime_fails() {
        let scheduler = LocalScheduler::new();
        let err = scheduler
            .schedule("reminder_a", Duration::from_secs(60), "Parking reminder")
            .unwrap_err();
        assert!(matches!(err, ReminderError::NoRuntime));
    }
}
