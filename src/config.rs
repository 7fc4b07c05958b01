use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::BigQueryError;

/// What to do after a failed status read, while retries remain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusFailurePolicy {
    /// Read the status of the same job again.
    #[default]
    RetryRead,
    /// Submit the job payload again and poll the new job. May leave a
    /// duplicate job running on the service.
    Resubmit,
}

/// Polling knobs. Every field can be left out of a config file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Wait between two status reads, and before each retry.
    pub poll_interval_ms: u64,
    /// Failed status reads tolerated over the whole execution.
    pub max_status_retries: u32,
    pub status_failure_policy: StatusFailurePolicy,
    /// Successful status reads allowed before giving up on a job that is not DONE.
    /// `None` polls until the job finishes, however long that takes.
    pub max_polls: Option<u64>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        PollerConfig {
            poll_interval_ms: 1000,
            max_status_retries: 5,
            status_failure_policy: StatusFailurePolicy::default(),
            max_polls: None,
        }
    }
}

impl PollerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn from_json(json: &str) -> Result<Self, BigQueryError> {
        Self::parse(json, "<inline>")
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, BigQueryError> {
        let path = path.as_ref().display().to_string();
        let contents = std::fs::read_to_string(&path).map_err(|e| BigQueryError::ConfigFile {
            path: path.clone(),
            msg: e.to_string(),
        })?;
        Self::parse(&contents, &path)
    }

    fn parse(json: &str, path: &str) -> Result<Self, BigQueryError> {
        serde_json::from_str(json).map_err(|e| BigQueryError::ConfigFile {
            path: path.to_string(),
            msg: e.to_string(),
        })
    }
}
