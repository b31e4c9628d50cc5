//! Clock ownership for a live session.
//!
//! [`SessionDriver`] runs on a tokio task, owns one engine and ticks it on
//! a fixed period while it is running. Commands from any number of
//! [`DriverHandle`]s arrive on a channel and are interleaved with ticks by
//! `select!`, so each command or tick runs to completion before the next.

use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

use super::config::IntervalConfig;
use super::engine::{IntervalTimerEngine, TimerStatus};
use crate::error::{DriverError, InvalidConfigError};
use crate::events::TimerEvent;
use crate::notify::{NotificationDispatcher, Notifier};

const COMMAND_BUFFER: usize = 16;

/// An emitted event and the session status right after its transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionUpdate {
    pub event: TimerEvent,
    pub status: TimerStatus,
}

enum Command {
    Start,
    Pause,
    Reset,
    Reconfigure(IntervalConfig, oneshot::Sender<Result<(), InvalidConfigError>>),
    Status(oneshot::Sender<TimerStatus>),
    Shutdown,
}

/// Cloneable remote control for a spawned [`SessionDriver`].
#[derive(Clone)]
pub struct DriverHandle {
    tx: mpsc::Sender<Command>,
}

impl DriverHandle {
    pub async fn start(&self) -> Result<(), DriverError> {
        self.send(Command::Start).await
    }

    pub async fn pause(&self) -> Result<(), DriverError> {
        self.send(Command::Pause).await
    }

    pub async fn reset(&self) -> Result<(), DriverError> {
        self.send(Command::Reset).await
    }

    pub async fn reconfigure(&self, config: IntervalConfig) -> Result<(), DriverError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Reconfigure(config, reply)).await?;
        rx.await.map_err(|_| DriverError::Stopped)??;
        Ok(())
    }

    pub async fn status(&self) -> Result<TimerStatus, DriverError> {
        let (reply, rx) = oneshot::channel();
        self.send(Command::Status(reply)).await?;
        rx.await.map_err(|_| DriverError::Stopped)
    }

    /// Ask the driver to exit. Its join handle then yields the engine.
    pub async fn shutdown(&self) -> Result<(), DriverError> {
        self.send(Command::Shutdown).await
    }

    async fn send(&self, command: Command) -> Result<(), DriverError> {
        self.tx.send(command).await.map_err(|_| DriverError::Stopped)
    }
}

pub struct SessionDriver<N> {
    engine: IntervalTimerEngine,
    dispatcher: NotificationDispatcher<N>,
    period: Duration,
    sink: Option<mpsc::UnboundedSender<SessionUpdate>>,
}

impl<N> SessionDriver<N>
where
    N: Notifier + Send + 'static,
{
    /// `period` is the length of one tick; one second in production.
    pub fn new(
        engine: IntervalTimerEngine,
        dispatcher: NotificationDispatcher<N>,
        period: Duration,
    ) -> Self {
        Self {
            engine,
            dispatcher,
            period,
            sink: None,
        }
    }

    /// Forward every emitted event to `sink` after it has been dispatched.
    pub fn with_event_sink(mut self, sink: mpsc::UnboundedSender<SessionUpdate>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Spawn onto the current tokio runtime.
    pub fn spawn(self) -> (DriverHandle, JoinHandle<IntervalTimerEngine>) {
        let (tx, rx) = mpsc::channel(COMMAND_BUFFER);
        let task = tokio::spawn(self.run(rx));
        (DriverHandle { tx }, task)
    }

    async fn run(mut self, mut commands: mpsc::Receiver<Command>) -> IntervalTimerEngine {
        let mut ticker = self.arm();
        loop {
            tokio::select! {
                command = commands.recv() => {
                    let Some(command) = command else { break };
                    if !self.apply(command, &mut ticker) {
                        break;
                    }
                }
                _ = ticker.tick(), if self.engine.is_running() => {
                    let updates = self.engine.tick_with_status();
                    self.emit(updates);
                }
            }
        }
        tracing::debug!("session driver stopped");
        self.engine
    }

    /// Returns false when the driver should exit.
    fn apply(&mut self, command: Command, ticker: &mut Interval) -> bool {
        match command {
            Command::Start => {
                let was_running = self.engine.is_running();
                self.engine.start();
                if !was_running && self.engine.is_running() {
                    *ticker = self.arm();
                }
            }
            Command::Pause => self.engine.pause(),
            Command::Reset => self.engine.reset(),
            Command::Reconfigure(config, reply) => {
                let _ = reply.send(self.engine.reconfigure(config));
            }
            Command::Status(reply) => {
                let _ = reply.send(self.engine.status());
            }
            Command::Shutdown => return false,
        }
        true
    }

    fn emit(&self, updates: Vec<(TimerEvent, TimerStatus)>) {
        for (event, status) in updates {
            self.dispatcher.dispatch(&event);
            if let Some(sink) = &self.sink {
                // Host stopped listening; the alert still went out.
                let _ = sink.send(SessionUpdate { event, status });
            }
        }
    }

    /// First tick lands one full period from now.
    fn arm(&self) -> Interval {
        let mut ticker = interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::RecordingNotifier;
    use crate::timer::Phase;
    use std::sync::Arc;

    fn spawn_driver(
        config: IntervalConfig,
    ) -> (
        DriverHandle,
        JoinHandle<IntervalTimerEngine>,
        mpsc::UnboundedReceiver<SessionUpdate>,
        Arc<RecordingNotifier>,
    ) {
        let notifier = Arc::new(RecordingNotifier::new());
        let (sink, events) = mpsc::unbounded_channel();
        let engine = IntervalTimerEngine::new(config).unwrap();
        let dispatcher = NotificationDispatcher::new(Arc::clone(&notifier));
        let (handle, task) = SessionDriver::new(engine, dispatcher, Duration::from_secs(1))
            .with_event_sink(sink)
            .spawn();
        (handle, task, events, notifier)
    }

    #[tokio::test(start_paused = true)]
    async fn runs_session_to_completion() {
        let (handle, task, mut events, notifier) = spawn_driver(IntervalConfig::new(3, 1, 1));
        let started = Instant::now();
        handle.start().await.unwrap();

        let rest = events.recv().await.unwrap();
        assert_eq!(rest.event, TimerEvent::RestStarted { round: 1 });
        assert_eq!(rest.status.status_text, "Rest: Round 1/1");
        assert_eq!(started.elapsed(), Duration::from_secs(3));

        let done = events.recv().await.unwrap();
        assert_eq!(done.event, TimerEvent::SessionCompleted);
        assert!(!done.status.running);
        assert_eq!(started.elapsed(), Duration::from_secs(4));

        let status = handle.status().await.unwrap();
        assert!(!status.running);
        assert_eq!(status.time_remaining, 3);
        assert_eq!(notifier.alerts().len(), 2);

        handle.shutdown().await.unwrap();
        let engine = task.await.unwrap();
        assert!(!engine.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_rest_updates_carry_their_own_status() {
        let (handle, _task, mut events, _notifier) = spawn_driver(IntervalConfig::new(2, 0, 2));
        handle.start().await.unwrap();

        let rest = events.recv().await.unwrap();
        let work = events.recv().await.unwrap();
        assert_eq!(rest.event, TimerEvent::RestStarted { round: 1 });
        assert_eq!(rest.status.phase, Phase::Resting);
        assert_eq!(rest.status.current_round, 1);
        assert_eq!(work.event, TimerEvent::WorkStarted { round: 2 });
        assert_eq!(work.status.phase, Phase::Working);
        assert_eq!(work.status.time_remaining, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn pause_stops_ticking() {
        let (handle, _task, _events, _notifier) = spawn_driver(IntervalConfig::new(10, 5, 2));
        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(2500)).await;
        handle.pause().await.unwrap();
        assert_eq!(handle.status().await.unwrap().time_remaining, 8);

        tokio::time::sleep(Duration::from_secs(30)).await;
        let status = handle.status().await.unwrap();
        assert_eq!(status.time_remaining, 8);
        assert!(status.resumable);

        handle.start().await.unwrap();
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(handle.status().await.unwrap().time_remaining, 7);
    }

    #[tokio::test(start_paused = true)]
    async fn reconfigure_reports_validation_errors() {
        let (handle, _task, _events, _notifier) = spawn_driver(IntervalConfig::new(10, 5, 2));
        assert_eq!(
            handle.reconfigure(IntervalConfig::new(10, 5, 0)).await,
            Err(DriverError::InvalidConfig(InvalidConfigError::Rounds(0)))
        );

        handle.start().await.unwrap();
        handle.reconfigure(IntervalConfig::new(20, 5, 3)).await.unwrap();
        let status = handle.status().await.unwrap();
        assert!(!status.running);
        assert_eq!(status.time_remaining, 20);
        assert_eq!(status.rounds, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn handle_reports_stopped_driver() {
        let (handle, task, _events, _notifier) = spawn_driver(IntervalConfig::default());
        handle.shutdown().await.unwrap();
        task.await.unwrap();
        assert_eq!(handle.start().await, Err(DriverError::Stopped));
    }
}
