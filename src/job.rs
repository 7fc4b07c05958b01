use std::fmt;

use crate::structs::error_proto::ErrorProto;
use crate::structs::job::Job;
use crate::structs::job_reference::JobReference;
use crate::structs::job_status::JobStatus;
use crate::structs::table_reference::TableReference;

pub const SUCCESS_MESSAGE: &str = "Success";

/// What a job writes where. Only used to make logs and errors readable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobTarget {
    Load {
        table: TableReference,
        source_uri: String,
    },
    Query {
        table: TableReference,
        sql: String,
    },
}

impl JobTarget {
    pub fn table(&self) -> &TableReference {
        match self {
            JobTarget::Load { table, .. } | JobTarget::Query { table, .. } => table,
        }
    }
}

impl fmt::Display for JobTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobTarget::Load { table, source_uri } => {
                write!(f, "load of {source_uri} into {table}")
            }
            JobTarget::Query { table, sql } => {
                let sql = sql.split_whitespace().collect::<Vec<_>>().join(" ");
                write!(f, "query into {table}: {sql}")
            }
        }
    }
}

/// The error payload of a job that finished in the DONE state but failed.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("{target} failed: {message}")]
pub struct JobError {
    pub target: JobTarget,
    pub reason: String,
    pub message: String,
    /// Every error the service listed for the job, the fatal one included.
    pub details: Vec<ErrorProto>,
}

/// Outcome of a job that reached the DONE state.
#[derive(Debug, Clone)]
pub struct JobResult {
    job: Job,
    target: JobTarget,
    message: String,
    error: Option<JobError>,
}

impl JobResult {
    pub(crate) fn from_done_job(job: Job, target: JobTarget) -> Self {
        let status = job.status.clone().unwrap_or_default();
        let (message, error) = match status.error_result {
            Some(error_result) => (
                format!("Error: {}", error_result.message),
                Some(JobError {
                    target: target.clone(),
                    reason: error_result.reason,
                    message: error_result.message,
                    details: status.errors.unwrap_or_default(),
                }),
            ),
            None => (SUCCESS_MESSAGE.to_string(), None),
        };
        JobResult {
            job,
            target,
            message,
            error,
        }
    }

    /// `"Success"`, or `"Error: "` followed by the remote error message.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn error(&self) -> Option<&JobError> {
        self.error.as_ref()
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    pub fn target(&self) -> &JobTarget {
        &self.target
    }

    /// Last snapshot of the job as returned by the service.
    pub fn job(&self) -> &Job {
        &self.job
    }

    pub fn status(&self) -> Option<&JobStatus> {
        self.job.status.as_ref()
    }

    pub fn job_reference(&self) -> Option<&JobReference> {
        self.job.job_reference.as_ref()
    }

    pub fn into_result(self) -> Result<Job, JobError> {
        match self.error {
            Some(error) => Err(error),
            None => Ok(self.job),
        }
    }
}
