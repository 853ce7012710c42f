use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::model::task::{Store, Task, TaskId};

/// Error type for store file I/O
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("{path} is not a valid task store: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{path} is not a valid task store: {reason}")]
    Invalid { path: PathBuf, reason: String },
    #[error("could not serialize task store: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load the store at `path`, creating it with an empty store if it does not
/// exist yet.
pub fn load_store(path: &Path) -> Result<Store, StoreError> {
    if !path.exists() {
        info!(path = %path.display(), "store file missing, creating an empty one");
        let store = Store::new();
        save_store(path, &store)?;
        return Ok(store);
    }

    let text = fs::read_to_string(path).map_err(|e| StoreError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    let store = parse_store(path, &text)?;
    debug!(
        path = %path.display(),
        tasks = store.tasks.len(),
        next_id_counter = store.next_id_counter,
        "loaded store"
    );
    Ok(store)
}

/// On-disk shape. Earlier versions wrote the counter as `curr_id`, and
/// some of them decremented it on delete, so it may trail the highest id.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StoreFile {
    tasks: Vec<Task>,
    #[serde(default)]
    next_id_counter: Option<TaskId>,
    #[serde(default)]
    curr_id: Option<TaskId>,
}

/// Parse and validate store JSON. `path` is only used for error messages.
pub fn parse_store(path: &Path, text: &str) -> Result<Store, StoreError> {
    let invalid = |reason: String| StoreError::Invalid {
        path: path.to_path_buf(),
        reason,
    };
    let file: StoreFile = serde_json::from_str(text).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    let next_id_counter = match (file.next_id_counter, file.curr_id) {
        (Some(counter), None) => counter,
        (None, Some(legacy)) => {
            let highest = file.tasks.iter().map(|t| t.id).max().unwrap_or(0);
            let counter = legacy.max(highest);
            warn!(
                path = %path.display(),
                curr_id = legacy,
                next_id_counter = counter,
                "upgrading legacy curr_id counter key"
            );
            counter
        }
        (None, None) => return Err(invalid("missing next_id_counter".to_string())),
        (Some(_), Some(_)) => {
            return Err(invalid(
                "both next_id_counter and curr_id are present".to_string(),
            ));
        }
    };

    let store = Store {
        tasks: file.tasks,
        next_id_counter,
    };
    store.check_invariants().map_err(invalid)?;
    Ok(store)
}

/// Rewrite the whole store file.
pub fn save_store(path: &Path, store: &Store) -> Result<(), StoreError> {
    let mut content = serde_json::to_string_pretty(store)?;
    content.push('\n');
    atomic_write(path, content.as_bytes()).map_err(|e| StoreError::Write {
        path: path.to_path_buf(),
        source: e,
    })?;
    debug!(
        path = %path.display(),
        tasks = store.tasks.len(),
        next_id_counter = store.next_id_counter,
        "saved store"
    );
    Ok(())
}

/// Write `content` to `path` atomically using a temp file + rename.
/// Missing parent directories are created first.
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::task::{Task, TaskStatus, Timestamp};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_store() -> Store {
        let t1 = Timestamp::parse("01.01.2025 12:00").unwrap();
        let t2 = Timestamp::parse("02.01.2025 09:30").unwrap();
        let mut second = Task::new(3, "Walk the dog".into(), t1.clone());
        second.status = TaskStatus::InProgress;
        second.touch(t2);
        Store {
            tasks: vec![Task::new(1, "Buy milk".into(), t1), second],
            next_id_counter: 3,
        }
    }

    #[test]
    fn load_creates_missing_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");

        let store = load_store(&path).unwrap();
        assert!(store.tasks.is_empty());
        assert_eq!(store.next_id_counter, 0);
        assert!(path.exists());

        let reloaded = load_store(&path).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn save_creates_parent_directories() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/tasks.json");
        save_store(&path, &sample_store()).unwrap();
        assert_eq!(load_store(&path).unwrap(), sample_store());
    }

    #[test]
    fn save_then_load_is_stable() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        save_store(&path, &sample_store()).unwrap();
        let first = fs::read_to_string(&path).unwrap();

        let loaded = load_store(&path).unwrap();
        save_store(&path, &loaded).unwrap();
        let second = fs::read_to_string(&path).unwrap();

        assert_eq!(loaded, sample_store());
        assert_eq!(first, second);
    }

    #[test]
    fn persisted_shape_uses_plain_names() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        save_store(&path, &sample_store()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["next_id_counter"], 3);
        assert_eq!(value["tasks"][1]["status"], "in-progress");
        assert_eq!(value["tasks"][1]["created"], "01.01.2025 12:00");
        assert_eq!(value["tasks"][1]["updated"], "02.01.2025 09:30");
    }

    #[test]
    fn legacy_counter_key_is_rewritten() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(
            &path,
            r#"{"tasks": [{"id": 2, "description": "Buy milk", "status": "done", "created": "01.01.2025 12:00", "updated": "01.01.2025 12:00"}], "curr_id": 2}"#,
        )
        .unwrap();

        let store = load_store(&path).unwrap();
        assert_eq!(store.next_id_counter, 2);
        save_store(&path, &store).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("next_id_counter"));
        assert!(!text.contains("curr_id"));
    }

    #[test]
    fn legacy_counter_behind_highest_id_is_raised() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(
            &path,
            r#"{"tasks": [{"id": 2, "description": "Buy milk", "status": "todo", "created": "01.01.2025 12:00", "updated": "01.01.2025 12:00"}], "curr_id": 1}"#,
        )
        .unwrap();

        let mut store = load_store(&path).unwrap();
        assert_eq!(store.next_id_counter, 2);

        let rules = crate::model::config::TaskRules::default();
        let now = Timestamp::parse("02.01.2025 08:00").unwrap();
        let added = crate::ops::task_ops::add_task(&mut store, "Walk the dog", &rules, now)
            .unwrap()
            .id;
        assert_eq!(added, 3);
    }

    #[test]
    fn counter_keys_must_appear_exactly_once() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");

        for bad in [
            r#"{"tasks": []}"#,
            r#"{"tasks": [], "next_id_counter": 0, "curr_id": 0}"#,
        ] {
            fs::write(&path, bad).unwrap();
            assert!(
                matches!(load_store(&path), Err(StoreError::Invalid { .. })),
                "expected invalid store for {}",
                bad
            );
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, "not json {{{").unwrap();
        assert!(matches!(load_store(&path), Err(StoreError::Parse { .. })));
    }

    #[test]
    fn wrong_shape_is_a_parse_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");

        for bad in [
            r#"{"tasks": {}, "next_id_counter": 0}"#,
            r#"{"tasks": [{"id": 1, "description": "Buy milk"}], "next_id_counter": 1}"#,
            r#"{"tasks": [{"id": 1, "description": "Buy milk", "status": "later", "created": "01.01.2025 12:00", "updated": "01.01.2025 12:00"}], "next_id_counter": 1}"#,
            r#"{"tasks": [{"id": 1, "description": "Buy milk", "status": "todo", "created": "2025-01-01", "updated": "01.01.2025 12:00"}], "next_id_counter": 1}"#,
            r#"{"tasks": [], "next_id_counter": -1}"#,
        ] {
            fs::write(&path, bad).unwrap();
            assert!(
                matches!(load_store(&path), Err(StoreError::Parse { .. })),
                "expected parse error for {}",
                bad
            );
        }
    }

    #[test]
    fn broken_invariants_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(
            &path,
            r#"{"tasks": [{"id": 4, "description": "Buy milk", "status": "todo", "created": "01.01.2025 12:00", "updated": "01.01.2025 12:00"}], "next_id_counter": 1}"#,
        )
        .unwrap();

        let err = load_store(&path).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { .. }));
        assert!(err.to_string().contains("exceeds"));
    }

    #[test]
    fn failed_load_leaves_file_untouched() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("tasks.json");
        fs::write(&path, "[]").unwrap();
        assert!(load_store(&path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }
}
