use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::BigQueryError;
use crate::structs::error_proto::ErrorProto;
use crate::structs::job::Job;
use crate::structs::job_reference::JobReference;
use crate::structs::job_status::{JobStatus, State};
use crate::transport::JobsApi;

pub(crate) type ScriptedRead = Result<JobStatus, String>;

pub(crate) fn running() -> ScriptedRead {
    Ok(JobStatus::with_state(State::Running))
}

pub(crate) fn done() -> ScriptedRead {
    Ok(JobStatus::with_state(State::Done))
}

pub(crate) fn done_with_error(message: &str) -> ScriptedRead {
    let error = ErrorProto::new("quotaExceeded", message);
    Ok(JobStatus {
        state: Some(State::Done),
        error_result: Some(error.clone()),
        errors: Some(vec![error]),
    })
}

pub(crate) fn read_failure(message: &str) -> ScriptedRead {
    Err(message.to_string())
}

/// In-memory jobs API replaying a script of status reads. The last entry
/// repeats once the others are used up.
pub(crate) struct ScriptedApi {
    script: Mutex<VecDeque<ScriptedRead>>,
    submissions: Mutex<Vec<Job>>,
    reads: Mutex<Vec<String>>,
    insert_error: Option<String>,
    assign_job_ids: bool,
}

impl ScriptedApi {
    pub(crate) fn new(script: Vec<ScriptedRead>) -> Self {
        assert!(!script.is_empty(), "script needs at least one status read");
        ScriptedApi {
            script: Mutex::new(script.into()),
            submissions: Mutex::new(Vec::new()),
            reads: Mutex::new(Vec::new()),
            insert_error: None,
            assign_job_ids: true,
        }
    }

    pub(crate) fn failing_inserts(mut self, message: &str) -> Self {
        self.insert_error = Some(message.to_string());
        self
    }

    pub(crate) fn without_job_ids(mut self) -> Self {
        self.assign_job_ids = false;
        self
    }

    /// Every payload passed to `insert_job`, in order.
    pub(crate) fn submissions(&self) -> Vec<Job> {
        self.submissions.lock().unwrap().clone()
    }

    pub(crate) fn status_reads(&self) -> usize {
        self.reads.lock().unwrap().len()
    }

    /// Job id of each `get_job` call, in order.
    pub(crate) fn read_job_ids(&self) -> Vec<String> {
        self.reads.lock().unwrap().clone()
    }

    fn next_read(&self) -> ScriptedRead {
        let mut script = self.script.lock().unwrap();
        if script.len() > 1 {
            script.pop_front().unwrap()
        } else {
            script.front().cloned().unwrap()
        }
    }
}

#[async_trait]
impl JobsApi for ScriptedApi {
    async fn insert_job(&self, project_id: &str, job: &Job) -> Result<Job, BigQueryError> {
        let mut submissions = self.submissions.lock().unwrap();
        submissions.push(job.clone());
        if let Some(message) = &self.insert_error {
            return Err(BigQueryError::ApiResponse {
                status: 403,
                message: message.clone(),
            });
        }
        let job_id = format!("job_{}", submissions.len());
        Ok(Job {
            job_reference: Some(JobReference {
                project_id: Some(project_id.to_string()),
                job_id: self.assign_job_ids.then_some(job_id),
                location: Some("US".to_string()),
            }),
            configuration: job.configuration.clone(),
            status: Some(JobStatus::with_state(State::Pending)),
        })
    }

    async fn get_job(
        &self,
        _project_id: &str,
        job_reference: &JobReference,
    ) -> Result<Job, BigQueryError> {
        self.reads
            .lock()
            .unwrap()
            .push(job_reference.job_id.clone().unwrap_or_default());
        match self.next_read() {
            Ok(status) => Ok(Job {
                job_reference: Some(job_reference.clone()),
                configuration: None,
                status: Some(status),
            }),
            Err(message) => Err(BigQueryError::ApiResponse {
                status: 503,
                message,
            }),
        }
    }
}
