//! Alert delivery for timer events.
//!
//! The engine emits [`TimerEvent`]s; this module turns them into
//! user-visible alerts and hands them to a [`Notifier`]. Delivery is
//! best-effort: failures are logged and dropped so they can never affect
//! the transition that produced the event.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::NotifyError;
use crate::events::TimerEvent;

/// A one-shot, user-visible notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub title: String,
    pub body: String,
    pub sound: bool,
}

impl Alert {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            sound: true,
        }
    }

    /// Fixed alert template for each timer event.
    pub fn for_event(event: &TimerEvent) -> Self {
        match event {
            TimerEvent::RestStarted { .. } => Self::new("Rest Time! ☕", "Take a breather."),
            TimerEvent::WorkStarted { round } => {
                Self::new("Work! 💪", format!("Round {round} starting!"))
            }
            TimerEvent::SessionCompleted => Self::new("Workout Complete! 🎉", "Great job!"),
        }
    }

    pub fn with_sound(mut self, sound: bool) -> Self {
        self.sound = sound;
        self
    }
}

/// Fires an alert immediately. Implemented by the hosting platform.
pub trait Notifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        (**self).notify(alert)
    }
}

impl<N: Notifier + ?Sized> Notifier for std::sync::Arc<N> {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        (**self).notify(alert)
    }
}

/// Translates timer events into notifier calls.
pub struct NotificationDispatcher<N> {
    notifier: N,
    enabled: bool,
    sound: bool,
}

impl<N: Notifier> NotificationDispatcher<N> {
    pub fn new(notifier: N) -> Self {
        Self {
            notifier,
            enabled: true,
            sound: true,
        }
    }

    /// Build from the `[notifications]` config section.
    pub fn from_config(notifier: N, config: &crate::storage::NotificationsConfig) -> Self {
        Self {
            notifier,
            enabled: config.enabled,
            sound: config.sound,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Deliver one event. Returns whether the notifier accepted it.
    pub fn dispatch(&self, event: &TimerEvent) -> bool {
        if !self.enabled {
            return false;
        }
        let alert = Alert::for_event(event).with_sound(self.sound);
        match self.notifier.notify(&alert) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(?event, error = %e, "dropping undeliverable timer alert");
                false
            }
        }
    }

    /// Deliver events in order. Returns how many were delivered.
    pub fn dispatch_all(&self, events: &[TimerEvent]) -> usize {
        events.iter().filter(|event| self.dispatch(event)).count()
    }
}

/// Keeps every alert in memory. Useful for hosts without a notification
/// service and for tests.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    alerts: Mutex<Vec<Alert>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alerts(&self) -> Vec<Alert> {
        self.alerts
            .lock()
            .map(|alerts| alerts.clone())
            .unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        self.alerts
            .lock()
            .map_err(|e| NotifyError::Delivery(e.to_string()))?
            .push(alert.clone());
        Ok(())
    }
}
