use async_trait::async_trait;
use log::debug;
use serde::Deserialize;
use yup_oauth2::authenticator::DefaultAuthenticator;

use crate::error::BigQueryError;
use crate::structs::job::Job;
use crate::structs::job_reference::JobReference;

pub const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

const SCOPES: &[&str; 1] = &["https://www.googleapis.com/auth/bigquery"];

/// The two calls of the jobs API that submitting and watching a job needs.
#[async_trait]
pub trait JobsApi: Send + Sync {
    /// `jobs.insert`: returns the created job, including its reference.
    async fn insert_job(&self, project_id: &str, job: &Job) -> Result<Job, BigQueryError>;

    /// `jobs.get`: returns the current state of a job.
    async fn get_job(
        &self,
        project_id: &str,
        job_reference: &JobReference,
    ) -> Result<Job, BigQueryError>;
}

/// [`JobsApi`] over the BigQuery v2 REST endpoints.
pub struct RestJobsApi {
    authenticator: DefaultAuthenticator,
    reqwest_client: reqwest::Client,
    base_url: String,
}

impl RestJobsApi {
    pub fn new(authenticator: DefaultAuthenticator) -> Self {
        RestJobsApi {
            authenticator,
            reqwest_client: reqwest::Client::new(),
            base_url: normalize_base_url(DEFAULT_BASE_URL),
        }
    }

    /// Points the client at another endpoint, such as a local emulator.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base_url(&base_url.into());
        self
    }

    async fn read_job(res: reqwest::Response) -> Result<Job, BigQueryError> {
        let status = res.status();
        if status.is_success() {
            return Ok(res.json().await?);
        }
        let body = res.text().await?;
        Err(api_error(status.as_u16(), &body))
    }
}

#[async_trait]
impl JobsApi for RestJobsApi {
    async fn insert_job(&self, project_id: &str, job: &Job) -> Result<Job, BigQueryError> {
        let tok = self.authenticator.token(SCOPES).await?;
        let res = insert_job_request(&self.reqwest_client, &self.base_url, project_id, job)
            .bearer_auth(tok.as_str())
            .send()
            .await?;
        Self::read_job(res).await
    }

    async fn get_job(
        &self,
        project_id: &str,
        job_reference: &JobReference,
    ) -> Result<Job, BigQueryError> {
        let req = get_job_request(
            &self.reqwest_client,
            &self.base_url,
            project_id,
            job_reference,
        )?;
        let tok = self.authenticator.token(SCOPES).await?;
        debug!(
            "reading status of job {}",
            job_reference.job_id.as_deref().unwrap_or_default()
        );
        let res = req.bearer_auth(tok.as_str()).send().await?;
        Self::read_job(res).await
    }
}

fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// `POST {base}/projects/{project}/jobs` with `job` as the body, unauthenticated.
fn insert_job_request(
    client: &reqwest::Client,
    base_url: &str,
    project_id: &str,
    job: &Job,
) -> reqwest::RequestBuilder {
    let api_url = format!("{base_url}/projects/{project_id}/jobs");
    client.post(api_url).json(job)
}

/// `GET {base}/projects/{project}/jobs/{jobId}`, unauthenticated.
fn get_job_request(
    client: &reqwest::Client,
    base_url: &str,
    project_id: &str,
    job_reference: &JobReference,
) -> Result<reqwest::RequestBuilder, BigQueryError> {
    let job_id = job_reference
        .job_id
        .as_deref()
        .ok_or(BigQueryError::MissingJobIdInGoogleApiResponse)?;
    let api_url = format!("{base_url}/projects/{project_id}/jobs/{job_id}");
    let mut req = client.get(api_url);
    // jobs outside the US and EU multi-regions are only found with their location
    if let Some(location) = &job_reference.location {
        req = req.query(&[("location", location)]);
    }
    Ok(req)
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Builds an error from a non 2xx response, preferring the message of the
/// standard Google error envelope over the raw body.
fn api_error(status: u16, body: &str) -> BigQueryError {
    let message = match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse { error }) if !error.message.is_empty() => error.message,
        _ => body.trim().to_string(),
    };
    BigQueryError::ApiResponse { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::job_status::{JobStatus, State};

    fn job_reference(job_id: Option<&str>, location: Option<&str>) -> JobReference {
        JobReference {
            project_id: Some("proj".to_string()),
            job_id: job_id.map(str::to_string),
            location: location.map(str::to_string),
        }
    }

    #[test]
    fn base_url_loses_trailing_slashes() {
        assert_eq!(normalize_base_url("http://localhost:9050//"), "http://localhost:9050");
        assert_eq!(normalize_base_url(DEFAULT_BASE_URL), DEFAULT_BASE_URL);
    }

    #[test]
    fn insert_posts_to_project_jobs() {
        let client = reqwest::Client::new();
        let job = Job {
            status: Some(JobStatus::with_state(State::Pending)),
            ..Default::default()
        };
        let req = insert_job_request(&client, DEFAULT_BASE_URL, "proj", &job)
            .build()
            .unwrap();

        assert_eq!(req.method(), &reqwest::Method::POST);
        assert_eq!(
            req.url().as_str(),
            "https://bigquery.googleapis.com/bigquery/v2/projects/proj/jobs"
        );
        let body: serde_json::Value =
            serde_json::from_slice(req.body().and_then(|b| b.as_bytes()).unwrap()).unwrap();
        assert_eq!(body, serde_json::to_value(&job).unwrap());
    }

    #[test]
    fn get_sends_job_location() {
        let client = reqwest::Client::new();
        let reference = job_reference(Some("job_1"), Some("asia-northeast1"));
        let req = get_job_request(&client, DEFAULT_BASE_URL, "proj", &reference)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(req.method(), &reqwest::Method::GET);
        assert_eq!(
            req.url().as_str(),
            "https://bigquery.googleapis.com/bigquery/v2/projects/proj/jobs/job_1?location=asia-northeast1"
        );
    }

    #[test]
    fn get_without_location_has_no_query() {
        let client = reqwest::Client::new();
        let base_url = normalize_base_url("http://localhost:9050/");
        let reference = job_reference(Some("job_1"), None);
        let req = get_job_request(&client, &base_url, "proj", &reference)
            .unwrap()
            .build()
            .unwrap();

        assert_eq!(req.url().as_str(), "http://localhost:9050/projects/proj/jobs/job_1");
        assert!(req.url().query().is_none());
    }

    #[test]
    fn get_without_job_id_is_rejected() {
        let client = reqwest::Client::new();
        let reference = job_reference(None, Some("US"));
        assert!(matches!(
            get_job_request(&client, DEFAULT_BASE_URL, "proj", &reference),
            Err(BigQueryError::MissingJobIdInGoogleApiResponse)
        ));
    }

    #[test]
    fn error_envelope_message_is_used() {
        let body = r#"{
            "error": {
                "code": 404,
                "message": "Not found: Job proj:US.job_123",
                "errors": [{ "message": "Not found: Job proj:US.job_123", "domain": "global", "reason": "notFound" }],
                "status": "NOT_FOUND"
            }
        }"#;
        match api_error(404, body) {
            BigQueryError::ApiResponse { status, message } => {
                assert_eq!(status, 404);
                assert_eq!(message, "Not found: Job proj:US.job_123");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn raw_body_is_used_when_not_an_envelope() {
        match api_error(502, "  Bad Gateway\n") {
            BigQueryError::ApiResponse { status, message } => {
                assert_eq!(status, 502);
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
