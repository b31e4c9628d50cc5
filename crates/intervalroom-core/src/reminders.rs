//! One-shot reminders delivered by the device notification service.
//!
//! The service itself is external and abstracted as [`AlertScheduler`].
//! [`ReminderService`] owns the request rules: non-empty message, time
//! truncated to the minute and strictly in the future.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ReminderError;
use crate::notify::Alert;

pub const REMINDER_TITLE: &str = "Reminder! 🔔";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledAlert {
    pub id: String,
    pub at: DateTime<Utc>,
    pub alert: Alert,
}

/// Schedule an alert for an absolute time, cancel by id, list pending.
pub trait AlertScheduler {
    fn schedule(&mut self, at: DateTime<Utc>, alert: Alert) -> Result<String, ReminderError>;
    fn cancel(&mut self, id: &str) -> Result<(), ReminderError>;
    fn pending(&self) -> Vec<ScheduledAlert>;
}

pub struct ReminderService<S> {
    scheduler: S,
}

impl<S: AlertScheduler> ReminderService<S> {
    pub fn new(scheduler: S) -> Self {
        Self { scheduler }
    }

    /// Validate and hand a reminder to the scheduler.
    ///
    /// `now` is injected so callers and tests control the clock.
    pub fn schedule(
        &mut self,
        message: &str,
        at: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<ScheduledAlert, ReminderError> {
        let message = message.trim();
        if message.is_empty() {
            return Err(ReminderError::EmptyMessage);
        }
        let at = truncate_to_minute(at);
        if at <= now {
            return Err(ReminderError::NotInFuture { at });
        }

        let alert = Alert::new(REMINDER_TITLE, message);
        let id = self.scheduler.schedule(at, alert.clone())?;
        tracing::info!(%id, %at, "reminder scheduled");
        Ok(ScheduledAlert { id, at, alert })
    }

    pub fn cancel(&mut self, id: &str) -> Result<(), ReminderError> {
        self.scheduler.cancel(id)?;
        tracing::info!(%id, "reminder cancelled");
        Ok(())
    }

    /// Pending reminders, soonest first.
    pub fn pending(&self) -> Vec<ScheduledAlert> {
        let mut pending = self.scheduler.pending();
        pending.sort_by_key(|a| a.at);
        pending
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

fn truncate_to_minute(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// Process-local scheduler. Hosts poll [`InMemoryScheduler::take_due`].
///
/// Serializes as a plain array so hosts can keep it between runs.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryScheduler {
    alerts: Vec<ScheduledAlert>,
}

impl InMemoryScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return every alert whose time has come.
    pub fn take_due(&mut self, now: DateTime<Utc>) -> Vec<ScheduledAlert> {
        let (due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.alerts)
            .into_iter()
            .partition(|a| a.at <= now);
        self.alerts = pending;
        due
    }
}

impl AlertScheduler for InMemoryScheduler {
    fn schedule(&mut self, at: DateTime<Utc>, alert: Alert) -> Result<String, ReminderError> {
        let id = Uuid::new_v4().to_string();
        self.alerts.push(ScheduledAlert {
            id: id.clone(),
            at,
            alert,
        });
        Ok(id)
    }

    fn cancel(&mut self, id: &str) -> Result<(), ReminderError> {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        if self.alerts.len() == before {
            return Err(ReminderError::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn pending(&self) -> Vec<ScheduledAlert> {
        self.alerts.clone()
    }
}
