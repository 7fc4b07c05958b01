use crate::structs::job_configuration::JobConfiguration;
use crate::structs::job_reference::JobReference;
use crate::structs::job_status::JobStatus;
use serde::{Deserialize, Serialize};

// https://cloud.google.com/bigquery/docs/reference/rest/v2/Job
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_reference: Option<JobReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<JobConfiguration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<JobStatus>,
}

impl Job {
    pub fn with_configuration(configuration: JobConfiguration) -> Self {
        Job {
            configuration: Some(configuration),
            ..Default::default()
        }
    }

    /// A job without a status has not been picked up yet.
    pub fn is_done(&self) -> bool {
        self.status.as_ref().map_or(false, JobStatus::is_done)
    }
}
