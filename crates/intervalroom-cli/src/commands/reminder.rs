//! One-shot reminder commands.
//!
//! Reminders are kept in `reminders.json`; `reminder due` delivers the ones
//! whose time has come and removes them.

use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use clap::Subcommand;
use intervalroom_core::storage::store::{load_json, reminders_path, save_json};
use intervalroom_core::{InMemoryScheduler, Notifier, ReminderService};

use super::TerminalNotifier;

#[derive(Subcommand)]
pub enum ReminderAction {
    /// Schedule a reminder
    Add {
        /// Reminder message
        message: String,
        /// Local time as "YYYY-MM-DD HH:MM"
        #[arg(long, value_parser = parse_local_time, required_unless_present = "in_minutes")]
        at: Option<DateTime<Utc>>,
        /// Minutes from now
        #[arg(long = "in", conflicts_with = "at", allow_hyphen_values = true)]
        in_minutes: Option<i64>,
    },
    /// List pending reminders, soonest first
    List,
    /// Cancel a pending reminder
    Cancel {
        /// Reminder ID
        id: String,
    },
    /// Deliver and remove reminders that are due
    Due,
}

fn parse_local_time(input: &str) -> Result<DateTime<Utc>, String> {
    let naive = NaiveDateTime::parse_from_str(input.trim(), "%Y-%m-%d %H:%M")
        .map_err(|_| format!("invalid time '{input}': expected \"YYYY-MM-DD HH:MM\""))?;
    Local
        .from_local_datetime(&naive)
        .single()
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| format!("'{input}' is not a single local time"))
}

pub fn run(action: ReminderAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = reminders_path()?;
    let mut service = ReminderService::new(load_json::<InMemoryScheduler>(&path)?);
    let now = Utc::now();

    match action {
        ReminderAction::Add {
            message,
            at,
            in_minutes,
        } => {
            let at = match (at, in_minutes) {
                (Some(at), _) => at,
                (None, Some(minutes)) => Duration::try_minutes(minutes)
                    .and_then(|offset| now.checked_add_signed(offset))
                    .ok_or_else(|| format!("--in {minutes} is out of range"))?,
                (None, None) => return Err("either --at or --in is required".into()),
            };
            let scheduled = service.schedule(&message, at, now)?;
            save_json(&path, service.scheduler())?;
            println!("{}", serde_json::to_string_pretty(&scheduled)?);
        }
        ReminderAction::List => {
            println!("{}", serde_json::to_string_pretty(&service.pending())?);
        }
        ReminderAction::Cancel { id } => {
            service.cancel(&id)?;
            save_json(&path, service.scheduler())?;
            println!("cancelled {id}");
        }
        ReminderAction::Due => {
            let due = service.scheduler_mut().take_due(now);
            for reminder in &due {
                if let Err(e) = TerminalNotifier.notify(&reminder.alert) {
                    tracing::warn!(id = %reminder.id, error = %e, "dropping undeliverable reminder");
                }
            }
            save_json(&path, service.scheduler())?;
            println!("{}", serde_json::to_string_pretty(&due)?);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parse_local_time_reads_minutes() {
        let at = parse_local_time("2026-05-01 09:30").unwrap();
        let local = at.with_timezone(&Local);
        assert_eq!((local.hour(), local.minute()), (9, 30));
        assert!(parse_local_time("2026-05-01").is_err());
        assert!(parse_local_time("tomorrow").is_err());
    }
}
