pub mod config;
pub mod reminder;
pub mod task;
pub mod timer;

use std::io::Write;

use intervalroom_core::error::NotifyError;
use intervalroom_core::{Alert, Notifier};

/// Print a value as one compact JSON line.
pub fn print_json_line<T: serde::Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

/// Writes alerts to stderr, ringing the terminal bell when sound is on.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, alert: &Alert) -> Result<(), NotifyError> {
        let bell = if alert.sound { "\x07" } else { "" };
        writeln!(std::io::stderr(), "{bell}{}  {}", alert.title, alert.body)
            .map_err(|e| NotifyError::Delivery(e.to_string()))
    }
}
