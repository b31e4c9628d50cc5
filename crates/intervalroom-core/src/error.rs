//! Core error types for intervalroom-core.
//!
//! This module defines the error hierarchy using thiserror. Timer commands
//! other than `reconfigure` are total and never fail.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for intervalroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected interval configuration
    #[error("Invalid interval configuration: {0}")]
    InvalidConfig(#[from] InvalidConfigError),

    /// Configuration-file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Session driver errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Task list errors
    #[error("Task error: {0}")]
    Task(#[from] TaskError),

    /// Reminder errors
    #[error("Reminder error: {0}")]
    Reminder(#[from] ReminderError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A configuration was rejected before it replaced the active one.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidConfigError {
    #[error("work duration must be greater than 0 seconds (got {0})")]
    WorkDuration(i64),

    #[error("rest duration must not be negative (got {0})")]
    RestDuration(i64),

    #[error("rounds must be at least 1 (got {0})")]
    Rounds(i64),
}

/// Saved engine state that the engine could never have produced.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreError {
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfigError),

    #[error("round {round} is outside 1..={rounds}")]
    Round { round: i64, rounds: i64 },

    #[error("time remaining {remaining} is outside the phase length {limit}")]
    TimeRemaining { remaining: i64, limit: i64 },
}

/// Errors returned through a [`crate::timer::DriverHandle`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DriverError {
    #[error(transparent)]
    InvalidConfig(#[from] InvalidConfigError),

    /// The driver task has exited and no longer accepts commands
    #[error("timer driver has stopped")]
    Stopped,
}

/// Configuration-file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to determine or create the data directory
    #[error("Failed to access data directory: {0}")]
    DataDir(String),

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Delivery failure reported by a notifier. Never reaches engine state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NotifyError {
    #[error("notification permission denied")]
    PermissionDenied,

    #[error("notification delivery failed: {0}")]
    Delivery(String),
}

/// Task list errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("task text must not be empty")]
    EmptyText,

    #[error("task '{0}' not found")]
    NotFound(String),
}

/// Reminder scheduling errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReminderError {
    #[error("reminder message must not be empty")]
    EmptyMessage,

    #[error("reminder time {at} is not in the future")]
    NotInFuture { at: chrono::DateTime<chrono::Utc> },

    #[error("reminder '{0}' not found")]
    NotFound(String),

    #[error("the system rejected the notification trigger: {0}")]
    Rejected(String),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
