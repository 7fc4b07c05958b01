//! Submit-then-poll loop shared by load and query jobs.
//!
//! A job is inserted once, then its status is read every
//! [`PollerConfig::poll_interval`] until the service reports `DONE`. Failed
//! status reads are retried within [`PollerConfig::max_status_retries`],
//! either by reading again or by resubmitting the job, depending on
//! [`PollerConfig::status_failure_policy`]. A failed insert is never retried.

use log::{debug, info, warn};

use crate::config::{PollerConfig, StatusFailurePolicy};
use crate::error::BigQueryError;
use crate::job::{JobResult, JobTarget};
use crate::structs::job::Job;
use crate::structs::job_reference::JobReference;
use crate::transport::JobsApi;

pub struct Poller<'a> {
    api: &'a dyn JobsApi,
    project_id: &'a str,
    config: &'a PollerConfig,
}

impl<'a> Poller<'a> {
    pub fn new(api: &'a dyn JobsApi, project_id: &'a str, config: &'a PollerConfig) -> Self {
        Poller {
            api,
            project_id,
            config,
        }
    }

    /// Runs `payload` to completion. A job that finishes with an error is an
    /// `Ok` result carrying that error.
    pub async fn run(&self, payload: &Job, target: &JobTarget) -> Result<JobResult, BigQueryError> {
        let mut failed_reads: u32 = 0;
        'submit: loop {
            let job_reference = self.submit(payload, target).await?;
            let mut polls: u64 = 0;
            loop {
                let job = match self.api.get_job(self.project_id, &job_reference).await {
                    Ok(job) => job,
                    Err(err) => {
                        if failed_reads >= self.config.max_status_retries {
                            return Err(BigQueryError::StatusRead {
                                target: target.clone(),
                                attempts: failed_reads + 1,
                                source: Box::new(err),
                            });
                        }
                        failed_reads += 1;
                        warn!(
                            "failed to read status of {target} (retry {failed_reads}/{}): {err}",
                            self.config.max_status_retries
                        );
                        self.wait().await;
                        match self.config.status_failure_policy {
                            StatusFailurePolicy::RetryRead => continue,
                            StatusFailurePolicy::Resubmit => continue 'submit,
                        }
                    }
                };
                polls += 1;

                if job.is_done() {
                    return Ok(self.finish(job, target));
                }
                debug!(
                    "{target} is {:?} after {polls} status reads",
                    job.status.as_ref().and_then(|status| status.state)
                );
                if let Some(max_polls) = self.config.max_polls {
                    if polls >= max_polls {
                        return Err(BigQueryError::PollLimitExceeded {
                            target: target.clone(),
                            polls,
                        });
                    }
                }
                self.wait().await;
            }
        }
    }

    async fn submit(&self, payload: &Job, target: &JobTarget) -> Result<JobReference, BigQueryError> {
        let inserted = self
            .api
            .insert_job(self.project_id, payload)
            .await
            .map_err(|err| BigQueryError::Submission {
                target: target.clone(),
                source: Box::new(err),
            })?;
        let job_reference = inserted
            .job_reference
            .filter(|job_reference| job_reference.job_id.is_some())
            .ok_or_else(|| BigQueryError::Submission {
                target: target.clone(),
                source: Box::new(BigQueryError::MissingJobIdInGoogleApiResponse),
            })?;
        info!(
            "submitted job {} for {target}",
            job_reference.job_id.as_deref().unwrap_or_default()
        );
        Ok(job_reference)
    }

    fn finish(&self, job: Job, target: &JobTarget) -> JobResult {
        let result = JobResult::from_done_job(job, target.clone());
        match result.error() {
            Some(error) => {
                warn!("{error}");
                for detail in &error.details {
                    warn!("  {}: {}", detail.reason, detail.message);
                }
            }
            None => info!("{target} succeeded"),
        }
        result
    }

    async fn wait(&self) {
        tokio::time::sleep(self.config.poll_interval()).await;
    }
}
