use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the `contacts` module
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactsConfig {
    /// JSON file holding the initial contact records, read once at startup.
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    /// Start with an empty directory instead of failing when the dataset
    /// file does not exist.
    #[serde(default)]
    pub allow_missing_dataset: bool,
    /// Upper bound for JSON request bodies, in bytes.
    #[serde(default = "default_body_limit_bytes")]
    pub body_limit_bytes: usize,
}

impl Default for ContactsConfig {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            allow_missing_dataset: false,
            body_limit_bytes: default_body_limit_bytes(),
        }
    }
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("contacts.json")
}

fn default_body_limit_bytes() -> usize {
    100 * 1024
}
