use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Store file used when nothing else is configured
pub const DEFAULT_STORE_FILE: &str = "tasks.json";

/// Contents of the optional `config.toml`. Every key may be omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub store_path: Option<PathBuf>,
    #[serde(default)]
    pub rules: TaskRules,
}

/// Validation rules applied by the task operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRules {
    /// Minimum description length, counted after trimming
    #[serde(default = "default_min_description_length")]
    pub min_description_length: usize,
}

impl Default for TaskRules {
    fn default() -> Self {
        TaskRules {
            min_description_length: default_min_description_length(),
        }
    }
}

fn default_min_description_length() -> usize {
    5
}

/// Fully resolved settings for one invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub store_path: PathBuf,
    pub rules: TaskRules,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            store_path: PathBuf::from(DEFAULT_STORE_FILE),
            rules: TaskRules::default(),
        }
    }
}
