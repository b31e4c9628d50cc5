//! # Intervalroom Core Library
//!
//! This library provides the core logic for the Intervalroom interval
//! timer. Every operation is available through the standalone CLI binary;
//! any GUI is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A pure work/rest state machine that requires the
//!   caller to invoke `tick()` once per second while running
//! - **Session Driver**: A tokio task that owns the clock for a live session
//! - **Notifications**: Translation of timer events into best-effort alerts
//! - **Storage**: TOML configuration plus JSON task and reminder documents
//! - **Tasks / Reminders**: Dated to-do list and one-shot reminder rules
//!
//! ## Key Components
//!
//! - [`IntervalTimerEngine`]: Core timer state machine
//! - [`NotificationDispatcher`]: Event to alert delivery
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod notify;
pub mod reminders;
pub mod storage;
pub mod tasks;
pub mod time_fmt;
pub mod timer;

pub use error::{
    ConfigError, CoreError, DriverError, InvalidConfigError, NotifyError, ReminderError,
    RestoreError, TaskError,
};
pub use events::TimerEvent;
pub use notify::{Alert, NotificationDispatcher, Notifier, RecordingNotifier};
pub use reminders::{AlertScheduler, InMemoryScheduler, ReminderService, ScheduledAlert};
pub use storage::Config;
pub use tasks::{Task, TaskList};
pub use time_fmt::{hms_to_seconds, seconds_to_hms, Hms};
pub use timer::{
    DriverHandle, IntervalConfig, IntervalTimerEngine, Phase, Session, SessionDriver,
    SessionUpdate, TimerStatus,
};
