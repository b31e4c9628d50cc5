//! Interval timer engine.
//!
//! A pure state machine driving a repeating work/rest cycle. It owns no
//! clock and no threads: the host calls `tick()` once per second while the
//! engine is running and forwards the returned events to a notifier.
//!
//! ## State Transitions
//!
//! ```text
//! Idle/Paused <-> Running        (start / pause)
//! Working -> Resting -> Working  (countdown reaches zero, next round)
//! Resting(last round) -> Idle    (SessionCompleted, full reset)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = IntervalTimerEngine::new(IntervalConfig::new(30, 10, 8))?;
//! engine.start();
//! // Once per second, while engine.is_running():
//! for event in engine.tick() {
//!     dispatcher.dispatch(&event);
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::config::IntervalConfig;
use crate::error::{InvalidConfigError, RestoreError};
use crate::events::TimerEvent;
use crate::time_fmt::{seconds_to_hms, Hms};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Working,
    Resting,
}

impl Phase {
    pub fn label(&self) -> &'static str {
        match self {
            Phase::Working => "Work",
            Phase::Resting => "Rest",
        }
    }
}

/// Mutable progress of the current session.
///
/// Always replaced as a whole value, never patched field by field from
/// outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub phase: Phase,
    /// 1-indexed, never above `config.rounds`.
    pub current_round: i64,
    /// Seconds left in the current phase.
    pub time_remaining: i64,
    pub running: bool,
}

impl Session {
    /// Round 1, Working, full work duration, not running.
    pub fn fresh(config: &IntervalConfig) -> Self {
        Self {
            phase: Phase::Working,
            current_round: 1,
            time_remaining: config.work_duration,
            running: false,
        }
    }
}

/// Query snapshot for hosts. Serializes to the JSON the CLI prints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerStatus {
    pub phase: Phase,
    pub current_round: i64,
    pub rounds: i64,
    pub time_remaining: i64,
    pub running: bool,
    pub status_text: String,
    pub formatted_time: Hms,
    pub resumable: bool,
    pub completed_intervals: i64,
}

/// Core interval timer engine.
///
/// Deserializing goes through [`IntervalTimerEngine::restore`], so saved
/// state is checked the same way a fresh configuration is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "SavedEngine")]
pub struct IntervalTimerEngine {
    config: IntervalConfig,
    session: Session,
}

#[derive(Deserialize)]
struct SavedEngine {
    config: IntervalConfig,
    session: Session,
}

impl TryFrom<SavedEngine> for IntervalTimerEngine {
    type Error = RestoreError;

    fn try_from(saved: SavedEngine) -> Result<Self, Self::Error> {
        Self::restore(saved.config, saved.session)
    }
}

impl IntervalTimerEngine {
    /// Create an idle engine at round 1 of the given configuration.
    pub fn new(config: IntervalConfig) -> Result<Self, InvalidConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            session: Session::fresh(&config),
        })
    }

    /// Rebuild an engine from saved state.
    ///
    /// The session must be one the engine could have reached: round within
    /// `1..=rounds`, remaining time within the phase, and a running session
    /// never parked at zero.
    pub fn restore(config: IntervalConfig, session: Session) -> Result<Self, RestoreError> {
        config.validate()?;
        if session.current_round < 1 || session.current_round > config.rounds {
            return Err(RestoreError::Round {
                round: session.current_round,
                rounds: config.rounds,
            });
        }
        let limit = config.phase_duration(session.phase);
        let floor = if session.running { 1 } else { 0 };
        if session.time_remaining < floor || session.time_remaining > limit {
            return Err(RestoreError::TimeRemaining {
                remaining: session.time_remaining,
                limit,
            });
        }
        Ok(Self { config, session })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn config(&self) -> &IntervalConfig {
        &self.config
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn phase(&self) -> Phase {
        self.session.phase
    }

    pub fn current_round(&self) -> i64 {
        self.session.current_round
    }

    pub fn time_remaining(&self) -> i64 {
        self.session.time_remaining
    }

    pub fn is_running(&self) -> bool {
        self.session.running
    }

    /// True when a paused session can be continued rather than started fresh.
    pub fn resumable(&self) -> bool {
        let remaining = self.session.time_remaining;
        !self.session.running
            && remaining > 0
            && remaining < self.config.phase_duration(self.session.phase)
    }

    /// Work and rest intervals begun before the current one.
    ///
    /// Counts 0, 1, 2, 3, ... as Working/Resting of rounds 1, 1, 2, 2, ... begin.
    pub fn completed_intervals(&self) -> i64 {
        let resting = match self.session.phase {
            Phase::Working => 0,
            Phase::Resting => 1,
        };
        (self.session.current_round - 1) * 2 + resting
    }

    pub fn status_text(&self) -> String {
        format!(
            "{}: Round {}/{}",
            self.session.phase.label(),
            self.session.current_round,
            self.config.rounds
        )
    }

    pub fn formatted_time(&self) -> Hms {
        seconds_to_hms(self.session.time_remaining.max(0) as u64)
    }

    pub fn status(&self) -> TimerStatus {
        TimerStatus {
            phase: self.session.phase,
            current_round: self.session.current_round,
            rounds: self.config.rounds,
            time_remaining: self.session.time_remaining,
            running: self.session.running,
            status_text: self.status_text(),
            formatted_time: self.formatted_time(),
            resumable: self.resumable(),
            completed_intervals: self.completed_intervals(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin or continue the countdown. No-op when already running.
    pub fn start(&mut self) {
        if !self.session.running && self.session.time_remaining > 0 {
            self.session.running = true;
            tracing::debug!(
                round = self.session.current_round,
                phase = ?self.session.phase,
                remaining = self.session.time_remaining,
                "timer started"
            );
        }
    }

    pub fn pause(&mut self) {
        if self.session.running {
            tracing::debug!(remaining = self.session.time_remaining, "timer paused");
        }
        self.session.running = false;
    }

    /// Discard in-flight progress and return to round 1, Working, stopped.
    pub fn reset(&mut self) {
        self.session = Session::fresh(&self.config);
    }

    /// Replace the configuration and start a fresh, stopped session.
    ///
    /// On error neither config nor session changes.
    pub fn reconfigure(&mut self, config: IntervalConfig) -> Result<(), InvalidConfigError> {
        if let Err(e) = config.validate() {
            tracing::warn!(?config, error = %e, "rejected interval configuration");
            return Err(e);
        }
        *self = Self {
            config,
            session: Session::fresh(&config),
        };
        tracing::info!(
            work = config.work_duration,
            rest = config.rest_duration,
            rounds = config.rounds,
            "timer reconfigured"
        );
        Ok(())
    }

    /// Advance the countdown by one second.
    ///
    /// Returns the events produced, in order. Reaching zero advances the
    /// phase within the same tick, and a zero-length rest is skipped
    /// through immediately, so one tick may yield two events.
    pub fn tick(&mut self) -> Vec<TimerEvent> {
        self.tick_with_status()
            .into_iter()
            .map(|(event, _)| event)
            .collect()
    }

    /// [`tick`](Self::tick), pairing each event with the status taken right
    /// after its own transition rather than at the end of the tick.
    pub fn tick_with_status(&mut self) -> Vec<(TimerEvent, TimerStatus)> {
        let mut updates = Vec::new();
        if !self.session.running {
            return updates;
        }
        if self.session.time_remaining > 0 {
            self.session.time_remaining -= 1;
        }
        while self.session.running && self.session.time_remaining == 0 {
            let event = self.advance();
            updates.push((event, self.status()));
        }
        updates
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self) -> TimerEvent {
        let round = self.session.current_round;
        let event = match self.session.phase {
            Phase::Working => {
                self.session = Session {
                    phase: Phase::Resting,
                    time_remaining: self.config.rest_duration,
                    ..self.session
                };
                TimerEvent::RestStarted { round }
            }
            Phase::Resting if round < self.config.rounds => {
                self.session = Session {
                    phase: Phase::Working,
                    current_round: round + 1,
                    time_remaining: self.config.work_duration,
                    ..self.session
                };
                TimerEvent::WorkStarted { round: round + 1 }
            }
            Phase::Resting => {
                self.reset();
                tracing::info!(rounds = self.config.rounds, "interval session completed");
                TimerEvent::SessionCompleted
            }
        };
        tracing::debug!(?event, "phase advanced");
        event
    }
}

impl Default for IntervalTimerEngine {
    fn default() -> Self {
        let config = IntervalConfig::default();
        Self {
            config,
            session: Session::fresh(&config),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(work: i64, rest: i64, rounds: i64) -> IntervalTimerEngine {
        IntervalTimerEngine::new(IntervalConfig::new(work, rest, rounds)).unwrap()
    }

    fn tick_n(engine: &mut IntervalTimerEngine, n: usize) -> Vec<TimerEvent> {
        (0..n).flat_map(|_| engine.tick()).collect()
    }

    #[test]
    fn new_engine_is_idle_at_round_one() {
        let e = engine(30, 10, 8);
        assert_eq!(e.phase(), Phase::Working);
        assert_eq!(e.current_round(), 1);
        assert_eq!(e.time_remaining(), 30);
        assert!(!e.is_running());
        assert!(!e.resumable());
    }

    #[test]
    fn new_rejects_invalid_config() {
        assert_eq!(
            IntervalTimerEngine::new(IntervalConfig::new(30, 10, 0)),
            Err(InvalidConfigError::Rounds(0))
        );
    }

    #[test]
    fn tick_is_noop_while_stopped() {
        let mut e = engine(30, 10, 2);
        assert!(e.tick().is_empty());
        assert_eq!(e.time_remaining(), 30);
    }

    #[test]
    fn start_and_pause_are_idempotent() {
        let mut e = engine(30, 10, 2);
        e.start();
        e.start();
        assert!(e.is_running());
        tick_n(&mut e, 3);
        assert_eq!(e.time_remaining(), 27);

        e.pause();
        e.pause();
        assert!(!e.is_running());
        assert_eq!(e.time_remaining(), 27);
    }

    #[test]
    fn start_keeps_remaining_time() {
        let mut e = engine(30, 10, 2);
        e.start();
        tick_n(&mut e, 5);
        e.pause();
        e.start();
        assert_eq!(e.time_remaining(), 25);
    }

    #[test]
    fn full_session_emits_expected_events() {
        let mut e = engine(30, 10, 2);
        e.start();

        assert!(tick_n(&mut e, 29).is_empty());
        assert_eq!(e.tick(), vec![TimerEvent::RestStarted { round: 1 }]);
        assert_eq!(e.phase(), Phase::Resting);
        assert_eq!(e.time_remaining(), 10);

        assert_eq!(tick_n(&mut e, 10), vec![TimerEvent::WorkStarted { round: 2 }]);
        assert_eq!(e.current_round(), 2);
        assert_eq!(e.time_remaining(), 30);

        assert_eq!(tick_n(&mut e, 30), vec![TimerEvent::RestStarted { round: 2 }]);
        assert_eq!(e.time_remaining(), 10);

        assert_eq!(tick_n(&mut e, 10), vec![TimerEvent::SessionCompleted]);
        assert_eq!(e.session(), Session::fresh(e.config()));
    }

    #[test]
    fn zero_rest_goes_straight_to_next_round() {
        let mut e = engine(5, 0, 2);
        e.start();
        let events = tick_n(&mut e, 5);
        assert_eq!(
            events,
            vec![
                TimerEvent::RestStarted { round: 1 },
                TimerEvent::WorkStarted { round: 2 },
            ]
        );
        assert_eq!(e.phase(), Phase::Working);
        assert_eq!(e.current_round(), 2);
        assert_eq!(e.time_remaining(), 5);
        assert!(e.is_running());
    }

    #[test]
    fn statuses_reflect_each_transition() {
        let mut e = engine(1, 0, 2);
        e.start();
        let updates = e.tick_with_status();
        let texts: Vec<_> = updates.iter().map(|(_, s)| s.status_text.as_str()).collect();
        assert_eq!(texts, vec!["Rest: Round 1/2", "Work: Round 2/2"]);
        assert_eq!(updates[0].1.time_remaining, 0);
        assert_eq!(updates[1].1.time_remaining, 1);
    }

    #[test]
    fn zero_rest_on_last_round_completes() {
        let mut e = engine(2, 0, 1);
        e.start();
        assert_eq!(
            tick_n(&mut e, 2),
            vec![TimerEvent::RestStarted { round: 1 }, TimerEvent::SessionCompleted]
        );
        assert!(!e.is_running());
        assert_eq!(e.time_remaining(), 2);
    }

    #[test]
    fn completed_intervals_counts_phase_starts() {
        let mut e = engine(2, 1, 3);
        e.start();
        let mut seen = vec![e.completed_intervals()];
        while seen.len() < 6 {
            if !e.tick().is_empty() {
                seen.push(e.completed_intervals());
            }
        }
        assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn reconfigure_while_running_stops_and_resets() {
        let mut e = engine(30, 10, 2);
        e.start();
        tick_n(&mut e, 35);
        assert_eq!(e.phase(), Phase::Resting);

        e.reconfigure(IntervalConfig::new(60, 20, 4)).unwrap();
        assert_eq!(
            e.session(),
            Session {
                phase: Phase::Working,
                current_round: 1,
                time_remaining: 60,
                running: false,
            }
        );
        assert_eq!(e.config().rounds, 4);
        assert!(e.tick().is_empty());
    }

    #[test]
    fn rejected_reconfigure_leaves_state_untouched() {
        let mut e = engine(30, 10, 2);
        e.start();
        tick_n(&mut e, 4);
        let before = e.clone();

        for bad in [
            IntervalConfig::new(30, 10, 0),
            IntervalConfig::new(0, 10, 2),
            IntervalConfig::new(30, -1, 2),
        ] {
            assert!(e.reconfigure(bad).is_err());
            assert_eq!(e, before);
        }
    }

    #[test]
    fn resumable_only_mid_phase_and_paused() {
        let mut e = engine(30, 10, 2);
        e.start();
        assert!(!e.resumable());
        tick_n(&mut e, 1);
        assert!(!e.resumable());
        e.pause();
        assert!(e.resumable());
        e.reset();
        assert!(!e.resumable());
    }

    #[test]
    fn resumable_during_rest_uses_rest_duration() {
        let mut e = engine(3, 10, 2);
        e.start();
        tick_n(&mut e, 3);
        e.pause();
        // Rest has just begun: full rest duration left, so not resumable yet.
        assert_eq!(e.time_remaining(), 10);
        assert!(!e.resumable());
        e.start();
        e.tick();
        e.pause();
        assert!(e.resumable());
    }

    #[test]
    fn status_snapshot_fields() {
        let mut e = engine(3725, 10, 8);
        let status = e.status();
        assert_eq!(status.status_text, "Work: Round 1/8");
        assert_eq!(status.formatted_time.to_string(), "01:02:05");
        assert_eq!(status.completed_intervals, 0);

        e.start();
        tick_n(&mut e, 3725);
        assert_eq!(e.status_text(), "Rest: Round 1/8");
        assert_eq!(e.status().completed_intervals, 1);
    }

    #[test]
    fn saved_engine_restores_mid_session() {
        let mut e = engine(30, 10, 3);
        e.start();
        tick_n(&mut e, 42);
        let json = serde_json::to_string(&e).unwrap();
        let restored: IntervalTimerEngine = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, e);
    }

    #[test]
    fn restore_rejects_invalid_config() {
        let json = r#"{
            "config": {"work_duration": 0, "rest_duration": -3, "rounds": 0},
            "session": {"phase": "working", "current_round": 5, "time_remaining": -7, "running": true}
        }"#;
        let err = serde_json::from_str::<IntervalTimerEngine>(json).unwrap_err();
        assert!(err.to_string().contains("work duration must be greater than 0"), "{err}");
    }

    #[test]
    fn restore_rejects_unreachable_sessions() {
        let config = IntervalConfig::new(30, 10, 2);
        let session = |phase, current_round, time_remaining, running| Session {
            phase,
            current_round,
            time_remaining,
            running,
        };

        assert_eq!(
            IntervalTimerEngine::restore(config, session(Phase::Working, 3, 5, false)),
            Err(RestoreError::Round { round: 3, rounds: 2 })
        );
        assert_eq!(
            IntervalTimerEngine::restore(config, session(Phase::Working, 1, -7, true)),
            Err(RestoreError::TimeRemaining { remaining: -7, limit: 30 })
        );
        assert_eq!(
            IntervalTimerEngine::restore(config, session(Phase::Resting, 1, 11, false)),
            Err(RestoreError::TimeRemaining { remaining: 11, limit: 10 })
        );
        assert_eq!(
            IntervalTimerEngine::restore(config, session(Phase::Working, 1, 0, true)),
            Err(RestoreError::TimeRemaining { remaining: 0, limit: 30 })
        );

        let paused = session(Phase::Resting, 2, 4, false);
        assert_eq!(
            IntervalTimerEngine::restore(config, paused).unwrap().session(),
            paused
        );
    }

    #[test]
    fn default_engine_uses_default_config() {
        let e = IntervalTimerEngine::default();
        assert_eq!(*e.config(), IntervalConfig::default());
        assert_eq!(e.time_remaining(), 30);
    }
}
