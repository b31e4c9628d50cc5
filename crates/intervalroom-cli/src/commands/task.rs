//! Dated to-do list commands.

use chrono::NaiveDate;
use clap::Subcommand;
use intervalroom_core::storage::store::{load_json, save_json, tasks_path};
use intervalroom_core::TaskList;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
        /// Day as YYYY-MM-DD (default: today)
        #[arg(long, value_parser = parse_date)]
        date: Option<NaiveDate>,
    },
    /// List all tasks
    List {
        /// Only tasks not yet completed
        #[arg(long)]
        active: bool,
    },
    /// List tasks for one day
    OnDate {
        /// Day as YYYY-MM-DD
        #[arg(value_parser = parse_date)]
        date: NaiveDate,
    },
    /// Days that carry at least one task
    Dates,
    /// Flip a task between open and completed
    Toggle {
        /// Task ID
        id: String,
    },
    /// Replace a task's text
    Edit {
        /// Task ID
        id: String,
        /// New text
        text: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{input}': expected YYYY-MM-DD"))
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let path = tasks_path()?;
    let mut tasks: TaskList = load_json(&path)?;

    match action {
        TaskAction::Add { text, date } => {
            let task = tasks.add(&text, date)?.clone();
            save_json(&path, &tasks)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { active } => {
            let listed: Vec<_> = tasks
                .list()
                .iter()
                .filter(|t| !active || !t.is_completed)
                .collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        TaskAction::OnDate { date } => {
            let listed: Vec<_> = tasks.on_date(date).collect();
            println!("{}", serde_json::to_string_pretty(&listed)?);
        }
        TaskAction::Dates => {
            println!("{}", serde_json::to_string_pretty(&tasks.marked_dates())?);
        }
        TaskAction::Toggle { id } => {
            tasks.toggle(&id)?;
            save_json(&path, &tasks)?;
            if let Some(task) = tasks.get(&id) {
                println!("{}", serde_json::to_string_pretty(task)?);
            }
        }
        TaskAction::Edit { id, text } => {
            tasks.update_text(&id, &text)?;
            save_json(&path, &tasks)?;
            if let Some(task) = tasks.get(&id) {
                println!("{}", serde_json::to_string_pretty(task)?);
            }
        }
        TaskAction::Delete { id } => {
            let task = tasks.delete(&id)?;
            save_json(&path, &tasks)?;
            tracing::info!(id = %task.id, "task deleted");
            println!("deleted {}", task.id);
        }
    }
    Ok(())
}
