mod config;
mod driver;
mod engine;

pub use config::IntervalConfig;
pub use driver::{DriverHandle, SessionDriver, SessionUpdate};
pub use engine::{IntervalTimerEngine, Phase, Session, TimerStatus};
