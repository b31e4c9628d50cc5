//! JSON documents kept next to `config.toml`.
//!
//! Tasks and reminders are small whole-file documents: hosts load one,
//! change it in memory and write it back.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::error::Result;

pub const TASKS_FILE: &str = "tasks.json";
pub const REMINDERS_FILE: &str = "reminders.json";

/// `tasks.json` in the data directory.
pub fn tasks_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(TASKS_FILE))
}

/// `reminders.json` in the data directory.
pub fn reminders_path() -> Result<PathBuf> {
    Ok(data_dir()?.join(REMINDERS_FILE))
}

/// Read a document, or `T::default()` when the file does not exist yet.
pub fn load_json<T: DeserializeOwned + Default>(path: &Path) -> Result<T> {
    match std::fs::read_to_string(path) {
        Ok(content) => Ok(serde_json::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(T::default()),
        Err(e) => Err(e.into()),
    }
}

/// Write through a sibling temp file so a crash never leaves half a document.
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    std::fs::write(&tmp, serde_json::to_string_pretty(value)?)?;
    std::fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::tasks::TaskList;

    #[test]
    fn missing_file_loads_default() {
        let dir = tempfile::tempdir().unwrap();
        let list: TaskList = load_json(&dir.path().join(TASKS_FILE)).unwrap();
        assert!(list.list().is_empty());
    }

    #[test]
    fn saved_document_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        let mut list = TaskList::new();
        list.add("stretch", None).unwrap();

        save_json(&path, &list).unwrap();
        assert_eq!(load_json::<TaskList>(&path).unwrap(), list);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn corrupt_document_is_a_json_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(TASKS_FILE);
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(
            load_json::<TaskList>(&path),
            Err(CoreError::Json(_))
        ));
    }
}
