use std::time::Duration;

use clap::{Args, Subcommand};
use intervalroom_core::{
    hms_to_seconds, seconds_to_hms, Config, IntervalConfig, IntervalTimerEngine,
    NotificationDispatcher, SessionDriver, SessionUpdate, TimerEvent,
};
use serde::Serialize;
use tokio::sync::mpsc;

use super::{print_json_line, TerminalNotifier};

/// Longest session `plan` will simulate (one week).
const MAX_PLAN_SECS: i64 = 7 * 24 * 3600;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Run a live session, printing each event and the status it left as JSON lines
    Run {
        #[command(flatten)]
        intervals: IntervalArgs,
        /// Tick length in milliseconds (defaults to driver.tick_interval_ms)
        #[arg(long)]
        tick_ms: Option<u64>,
    },
    /// Print the status of a fresh session as JSON
    Status {
        #[command(flatten)]
        intervals: IntervalArgs,
    },
    /// Simulate a whole session and print when each event fires
    Plan {
        #[command(flatten)]
        intervals: IntervalArgs,
    },
}

/// Overrides for the configured intervals.
#[derive(Args)]
pub struct IntervalArgs {
    /// Work duration as SECONDS, M:S or H:M:S
    #[arg(long, value_parser = parse_duration, allow_hyphen_values = true)]
    work: Option<i64>,
    /// Rest duration as SECONDS, M:S or H:M:S
    #[arg(long, value_parser = parse_duration, allow_hyphen_values = true)]
    rest: Option<i64>,
    /// Number of work/rest rounds
    #[arg(long, allow_hyphen_values = true)]
    rounds: Option<i64>,
}

impl IntervalArgs {
    fn resolve(&self, base: IntervalConfig) -> IntervalConfig {
        IntervalConfig::new(
            self.work.unwrap_or(base.work_duration),
            self.rest.unwrap_or(base.rest_duration),
            self.rounds.unwrap_or(base.rounds),
        )
    }
}

/// Accepts `90`, `1:30` or `0:01:30`. Empty fields count as zero.
fn parse_duration(input: &str) -> Result<i64, String> {
    let input = input.trim();
    let parts: Vec<&str> = input.split(':').collect();
    if let [single] = parts.as_slice() {
        return single
            .parse::<i64>()
            .map_err(|_| format!("invalid duration '{input}'"));
    }

    let fields = parts
        .iter()
        .map(|p| if p.is_empty() { Ok(0) } else { p.parse::<u64>() })
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| format!("invalid duration '{input}'"))?;
    let secs = match fields.as_slice() {
        [m, s] => hms_to_seconds(0, *m, *s),
        [h, m, s] => hms_to_seconds(*h, *m, *s),
        _ => return Err(format!("invalid duration '{input}': expected at most H:M:S")),
    };
    i64::try_from(secs).map_err(|_| format!("duration '{input}' is too large"))
}

#[derive(Serialize)]
struct PlanEntry {
    at_secs: i64,
    at: String,
    event: TimerEvent,
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();

    match action {
        TimerAction::Run { intervals, tick_ms } => {
            let engine = IntervalTimerEngine::new(intervals.resolve(config.interval()))?;
            let period = tick_ms
                .map(|ms| Duration::from_millis(ms.max(1)))
                .unwrap_or_else(|| config.tick_interval());
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            runtime.block_on(run_live(engine, &config, period))?;
        }
        TimerAction::Status { intervals } => {
            let engine = IntervalTimerEngine::new(intervals.resolve(config.interval()))?;
            println!("{}", serde_json::to_string_pretty(&engine.status())?);
        }
        TimerAction::Plan { intervals } => {
            let interval = intervals.resolve(config.interval());
            let mut engine = IntervalTimerEngine::new(interval)?;
            if interval.total_duration() > MAX_PLAN_SECS {
                return Err(format!(
                    "session lasts {} which is longer than plan supports",
                    seconds_to_hms(interval.total_duration() as u64)
                )
                .into());
            }
            println!("{}", serde_json::to_string_pretty(&plan(&mut engine))?);
        }
    }
    Ok(())
}

fn plan(engine: &mut IntervalTimerEngine) -> Vec<PlanEntry> {
    let mut entries = Vec::new();
    let mut elapsed = 0;
    engine.start();
    while engine.is_running() {
        let events = engine.tick();
        elapsed += 1;
        entries.extend(events.into_iter().map(|event| PlanEntry {
            at_secs: elapsed,
            at: seconds_to_hms(elapsed as u64).to_string(),
            event,
        }));
    }
    entries
}

async fn run_live(
    engine: IntervalTimerEngine,
    config: &Config,
    period: Duration,
) -> Result<(), Box<dyn std::error::Error>> {
    let dispatcher = NotificationDispatcher::from_config(TerminalNotifier, &config.notifications);
    let (sink, mut events) = mpsc::unbounded_channel();
    let (handle, task) = SessionDriver::new(engine, dispatcher, period)
        .with_event_sink(sink)
        .spawn();

    print_json_line(&handle.status().await?)?;
    handle.start().await?;

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    loop {
        tokio::select! {
            update = events.recv() => {
                let Some(SessionUpdate { event, status }) = update else { break };
                print_json_line(&event)?;
                print_json_line(&status)?;
                if event == TimerEvent::SessionCompleted {
                    break;
                }
            }
            _ = &mut ctrl_c => {
                handle.pause().await?;
                let status = handle.status().await?;
                tracing::debug!(remaining = status.time_remaining, "interrupted");
                print_json_line(&status)?;
                break;
            }
        }
    }

    handle.shutdown().await?;
    task.await?;
    Ok(())
}
