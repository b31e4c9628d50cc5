//! Dated to-do list backing the task and calendar views.
//!
//! [`TaskList`] is plain serde data; hosts persist it with
//! [`crate::storage::store`].

use std::collections::BTreeSet;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::TaskError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub is_completed: bool,
    /// Serialized as `YYYY-MM-DD`.
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task. `date` defaults to today in local time.
    pub fn add(&mut self, text: &str, date: Option<NaiveDate>) -> Result<&Task, TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }
        self.tasks.push(Task {
            id: Uuid::new_v4().to_string(),
            text: text.to_string(),
            is_completed: false,
            date: date.unwrap_or_else(|| Local::now().date_naive()),
        });
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    pub fn delete(&mut self, id: &str) -> Result<Task, TaskError> {
        let idx = self.position(id)?;
        Ok(self.tasks.remove(idx))
    }

    /// Flip completion. Returns the new state.
    pub fn toggle(&mut self, id: &str) -> Result<bool, TaskError> {
        let idx = self.position(id)?;
        let task = &mut self.tasks[idx];
        task.is_completed = !task.is_completed;
        Ok(task.is_completed)
    }

    pub fn update_text(&mut self, id: &str, text: &str) -> Result<(), TaskError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TaskError::EmptyText);
        }
        let idx = self.position(id)?;
        self.tasks[idx].text = text.to_string();
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn list(&self) -> &[Task] {
        &self.tasks
    }

    pub fn on_date(&self, date: NaiveDate) -> impl Iterator<Item = &Task> + '_ {
        self.tasks.iter().filter(move |t| t.date == date)
    }

    /// Days carrying at least one task, for calendar markers.
    pub fn marked_dates(&self) -> BTreeSet<NaiveDate> {
        self.tasks.iter().map(|t| t.date).collect()
    }

    pub fn active_count(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_completed).count()
    }

    fn position(&self, id: &str) -> Result<usize, TaskError> {
        self.tasks
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| TaskError::NotFound(id.to_string()))
    }
}
