use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use log::info;
use yup_oauth2::authenticator::DefaultAuthenticator;

use crate::config::PollerConfig;
use crate::error::BigQueryError;
use crate::job::{JobResult, JobTarget};
use crate::load_job::LoadJob;
use crate::poller::Poller;
use crate::query_job::QueryJob;
use crate::schema::Schema;
use crate::structs::job::Job;
use crate::transport::{JobsApi, RestJobsApi};

/// Where the credentials used to call BigQuery come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// JSON key of a service account.
    ServiceAccountKeyFile(PathBuf),
    /// `application_default_credentials.json` as written by
    /// `gcloud auth application-default login`.
    AuthorizedUserFile(PathBuf),
}

impl CredentialSource {
    async fn authenticator(&self) -> Result<DefaultAuthenticator, BigQueryError> {
        match self {
            CredentialSource::ServiceAccountKeyFile(path) => {
                let key = yup_oauth2::read_service_account_key(path)
                    .await
                    .map_err(|source| BigQueryError::Configuration {
                        msg: format!("failed to read service account key {}", path.display()),
                        source,
                    })?;
                yup_oauth2::ServiceAccountAuthenticator::builder(key)
                    .build()
                    .await
                    .map_err(|source| BigQueryError::Configuration {
                        msg: "failed to create service account authenticator".to_string(),
                        source,
                    })
            }
            CredentialSource::AuthorizedUserFile(path) => {
                let secret = yup_oauth2::read_authorized_user_secret(path)
                    .await
                    .map_err(|source| BigQueryError::Configuration {
                        msg: format!("failed to read authorized user secret {}", path.display()),
                        source,
                    })?;
                yup_oauth2::AuthorizedUserAuthenticator::builder(secret)
                    .build()
                    .await
                    .map_err(|source| BigQueryError::Configuration {
                        msg: "failed to create authorized user authenticator".to_string(),
                        source,
                    })
            }
        }
    }
}

struct InnerService {
    api: Arc<dyn JobsApi>,
    project_id: String,
    poller_config: PollerConfig,
}

/// Authenticated handle on the jobs of one project. Cheap to clone and safe
/// to share between tasks running different jobs.
#[derive(Clone)]
pub struct Service {
    inner: Arc<InnerService>,
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Service")
            .field("project_id", &self.inner.project_id)
            .field("poller_config", &self.inner.poller_config)
            .finish()
    }
}

impl Service {
    /// Loads credentials and connects to the BigQuery REST API. Errors here are
    /// configuration problems and are not worth retrying.
    pub async fn connect(
        project_id: impl Into<String>,
        credentials: CredentialSource,
    ) -> Result<Self, BigQueryError> {
        let project_id = project_id.into();
        let authenticator = credentials.authenticator().await?;
        info!("connected to BigQuery for project {project_id}");
        Ok(Self::with_api(
            project_id,
            Arc::new(RestJobsApi::new(authenticator)),
        ))
    }

    /// Builds a handle over any [`JobsApi`] implementation.
    pub fn with_api(project_id: impl Into<String>, api: Arc<dyn JobsApi>) -> Self {
        Service {
            inner: Arc::new(InnerService {
                api,
                project_id: project_id.into(),
                poller_config: PollerConfig::default(),
            }),
        }
    }

    pub fn with_poller_config(self, poller_config: PollerConfig) -> Self {
        Service {
            inner: Arc::new(InnerService {
                api: self.inner.api.clone(),
                project_id: self.inner.project_id.clone(),
                poller_config,
            }),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.inner.project_id
    }

    pub fn poller_config(&self) -> &PollerConfig {
        &self.inner.poller_config
    }

    /// Prepares a load of newline-delimited JSON from `source_uri` into
    /// `dataset.table`, replacing the table's contents.
    pub fn new_load_job<'a>(
        &'a self,
        dataset: &str,
        table: &str,
        source_uri: &str,
        schema: &'a Schema,
    ) -> LoadJob<'a> {
        LoadJob::new(self, dataset, table, source_uri, schema)
    }

    /// Prepares a standard SQL query whose result replaces `dataset.table`.
    pub fn query(&self, sql: &str, dataset: &str, table: &str) -> QueryJob<'_> {
        QueryJob::new(self, sql, dataset, table)
    }

    pub(crate) async fn run(
        &self,
        payload: &Job,
        target: &JobTarget,
    ) -> Result<JobResult, BigQueryError> {
        Poller::new(
            self.inner.api.as_ref(),
            &self.inner.project_id,
            &self.inner.poller_config,
        )
        .run(payload, target)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structs::table_field_schema::Type;
    use crate::testing::{done, done_with_error, running, ScriptedApi};
    use crate::Field;

    #[tokio::test]
    async fn missing_key_file_is_a_configuration_error() {
        let err = Service::connect(
            "proj",
            CredentialSource::ServiceAccountKeyFile("/nonexistent/key.json".into()),
        )
        .await
        .unwrap_err();
        match err {
            BigQueryError::Configuration { msg, .. } => {
                assert!(msg.contains("/nonexistent/key.json"), "{msg}")
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn poller_config_is_replaced_not_shared() {
        let service = Service::with_api("proj", Arc::new(ScriptedApi::new(vec![done()])));
        let tuned = service.clone().with_poller_config(PollerConfig {
            poll_interval_ms: 10,
            ..Default::default()
        });
        assert_eq!(service.poller_config().poll_interval_ms, 1000);
        assert_eq!(tuned.poller_config().poll_interval_ms, 10);
        assert_eq!(tuned.project_id(), "proj");
    }

    #[tokio::test(start_paused = true)]
    async fn jobs_run_concurrently_on_one_service() {
        let load_api = Arc::new(ScriptedApi::new(vec![running(), done()]));
        let query_api = Arc::new(ScriptedApi::new(vec![done_with_error("syntax error")]));
        let loads = Service::with_api("proj", load_api.clone());
        let queries = Service::with_api("proj", query_api.clone());
        let schema = Schema::new(vec![Field::new("id", Type::String, "")]);

        let load = loads.new_load_job("analytics", "events", "gs://bucket/*.json", &schema);
        let query = queries.query("SELEC 1", "analytics", "one");
        let (load_result, query_result) =
            futures::future::join(load.execute(), query.execute()).await;

        assert!(load_result.unwrap().is_success());
        assert_eq!(query_result.unwrap().message(), "Error: syntax error");
        assert_eq!(load_api.status_reads(), 2);
        assert_eq!(query_api.status_reads(), 1);
    }
}
