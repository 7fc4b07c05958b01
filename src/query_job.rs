use log::info;

use crate::client::Service;
use crate::error::BigQueryError;
use crate::job::{JobResult, JobTarget};
use crate::structs::dataset_reference::DatasetReference;
use crate::structs::job::Job;
use crate::structs::job_configuration::JobConfiguration;
use crate::structs::job_configuration_query::JobConfigurationQuery;
use crate::structs::table_reference::TableReference;

pub const CREATE_DISPOSITION: &str = "CREATE_IF_NEEDED";
pub const WRITE_DISPOSITION: &str = "WRITE_TRUNCATE";

/// Standard SQL query whose result replaces the destination table. Unqualified
/// table names in the query resolve against the destination dataset.
#[derive(Debug, Clone)]
pub struct QueryJob<'a> {
    service: &'a Service,
    sql: String,
    dataset: String,
    table: String,
}

impl<'a> QueryJob<'a> {
    pub(crate) fn new(service: &'a Service, sql: &str, dataset: &str, table: &str) -> Self {
        QueryJob {
            service,
            sql: sql.to_string(),
            dataset: dataset.to_string(),
            table: table.to_string(),
        }
    }

    pub fn table_reference(&self) -> TableReference {
        TableReference::new(self.service.project_id(), &self.dataset, &self.table)
    }

    pub fn target(&self) -> JobTarget {
        JobTarget::Query {
            table: self.table_reference(),
            sql: self.sql.clone(),
        }
    }

    pub fn to_job(&self) -> Job {
        Job::with_configuration(JobConfiguration {
            query: Some(JobConfigurationQuery {
                query: Some(self.sql.clone()),
                use_legacy_sql: Some(false),
                create_disposition: Some(CREATE_DISPOSITION.to_string()),
                write_disposition: Some(WRITE_DISPOSITION.to_string()),
                default_dataset: Some(DatasetReference {
                    project_id: self.service.project_id().to_string(),
                    dataset_id: self.dataset.clone(),
                }),
                destination_table: Some(self.table_reference()),
            }),
            ..Default::default()
        })
    }

    pub async fn execute(&self) -> Result<JobResult, BigQueryError> {
        info!("running query into {}", self.table_reference());
        self.service.run(&self.to_job(), &self.target()).await
    }
}
