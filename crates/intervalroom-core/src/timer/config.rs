use serde::{Deserialize, Serialize};

use super::Phase;
use crate::error::InvalidConfigError;

/// Work/rest/rounds configuration for an interval session.
///
/// Durations are whole seconds. Fields are signed so that out-of-range
/// input can be represented and rejected by [`IntervalConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalConfig {
    pub work_duration: i64,
    pub rest_duration: i64,
    pub rounds: i64,
}

impl IntervalConfig {
    pub const DEFAULT_WORK_SECS: i64 = 30;
    pub const DEFAULT_REST_SECS: i64 = 10;
    pub const DEFAULT_ROUNDS: i64 = 8;

    pub fn new(work_duration: i64, rest_duration: i64, rounds: i64) -> Self {
        Self {
            work_duration,
            rest_duration,
            rounds,
        }
    }

    /// Reports the first violated constraint, checked work, rest, rounds.
    pub fn validate(&self) -> Result<(), InvalidConfigError> {
        if self.work_duration <= 0 {
            return Err(InvalidConfigError::WorkDuration(self.work_duration));
        }
        if self.rest_duration < 0 {
            return Err(InvalidConfigError::RestDuration(self.rest_duration));
        }
        if self.rounds < 1 {
            return Err(InvalidConfigError::Rounds(self.rounds));
        }
        Ok(())
    }

    pub fn phase_duration(&self, phase: Phase) -> i64 {
        match phase {
            Phase::Working => self.work_duration,
            Phase::Resting => self.rest_duration,
        }
    }

    /// Full session length in seconds.
    pub fn total_duration(&self) -> i64 {
        self.rounds
            .saturating_mul(self.work_duration.saturating_add(self.rest_duration))
    }
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self::new(
            Self::DEFAULT_WORK_SECS,
            Self::DEFAULT_REST_SECS,
            Self::DEFAULT_ROUNDS,
        )
    }
}
