use log::info;

use crate::client::Service;
use crate::error::BigQueryError;
use crate::job::{JobResult, JobTarget};
use crate::schema::Schema;
use crate::structs::job::Job;
use crate::structs::job_configuration::JobConfiguration;
use crate::structs::job_configuration_load::JobConfigurationLoad;
use crate::structs::table_reference::TableReference;

pub const SOURCE_FORMAT: &str = "NEWLINE_DELIMITED_JSON";
pub const WRITE_DISPOSITION: &str = "WRITE_TRUNCATE";

/// Import of newline-delimited JSON files from Cloud Storage into a table.
#[derive(Debug, Clone)]
pub struct LoadJob<'a> {
    service: &'a Service,
    schema: &'a Schema,
    dataset: String,
    table: String,
    source_uri: String,
}

impl<'a> LoadJob<'a> {
    pub(crate) fn new(
        service: &'a Service,
        dataset: &str,
        table: &str,
        source_uri: &str,
        schema: &'a Schema,
    ) -> Self {
        LoadJob {
            service,
            schema,
            dataset: dataset.to_string(),
            table: table.to_string(),
            source_uri: source_uri.to_string(),
        }
    }

    pub fn table_reference(&self) -> TableReference {
        TableReference::new(self.service.project_id(), &self.dataset, &self.table)
    }

    pub fn target(&self) -> JobTarget {
        JobTarget::Load {
            table: self.table_reference(),
            source_uri: self.source_uri.clone(),
        }
    }

    /// The `jobs.insert` request body.
    pub fn to_job(&self) -> Job {
        Job::with_configuration(JobConfiguration {
            load: Some(JobConfigurationLoad {
                destination_table: Some(self.table_reference()),
                source_format: Some(SOURCE_FORMAT.to_string()),
                source_uris: vec![self.source_uri.clone()],
                write_disposition: Some(WRITE_DISPOSITION.to_string()),
                schema: Some(self.schema.to_table_schema()),
            }),
            ..Default::default()
        })
    }

    /// Submits the load and waits until it is done. The schema is checked first,
    /// so an invalid one never reaches the service.
    pub async fn execute(&self) -> Result<JobResult, BigQueryError> {
        self.schema.validate()?;
        info!(
            "loading {} into {}",
            self.source_uri,
            self.table_reference()
        );
        self.service.run(&self.to_job(), &self.target()).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::schema::Field;
    use crate::structs::table_field_schema::Type;
    use crate::testing::{done, ScriptedApi};

    fn id_schema() -> Schema {
        Schema::new(vec![Field::new("id", Type::String, "")])
    }

    #[test]
    fn payload_matches_load_configuration() {
        let service = Service::with_api("proj", Arc::new(ScriptedApi::new(vec![done()])));
        let schema = Schema::new(vec![
            Field::new("date", Type::Timestamp, "Date"),
            Field::new("currency", Type::String, "Currency"),
        ]);
        let job = service.new_load_job("go", "xe", "gs://lx-ga/dwh/xe/*", &schema);

        let payload = serde_json::to_value(job.to_job()).unwrap();
        assert_eq!(
            payload,
            json!({
                "configuration": {
                    "load": {
                        "destinationTable": { "projectId": "proj", "datasetId": "go", "tableId": "xe" },
                        "sourceFormat": "NEWLINE_DELIMITED_JSON",
                        "sourceUris": ["gs://lx-ga/dwh/xe/*"],
                        "writeDisposition": "WRITE_TRUNCATE",
                        "schema": {
                            "fields": [
                                { "name": "date", "type": "TIMESTAMP", "mode": "NULLABLE", "description": "Date" },
                                { "name": "currency", "type": "STRING", "mode": "NULLABLE", "description": "Currency" }
                            ]
                        }
                    }
                }
            })
        );
    }

    #[tokio::test]
    async fn load_into_analytics_events_succeeds() {
        let api = Arc::new(ScriptedApi::new(vec![done()]));
        let service = Service::with_api("proj", api.clone());
        let schema = id_schema();

        let result = service
            .new_load_job("analytics", "events", "gs://bucket/events.json", &schema)
            .execute()
            .await
            .unwrap();

        assert_eq!(result.message(), "Success");
        assert!(result.error().is_none());
        let submissions = api.submissions();
        assert_eq!(submissions.len(), 1);
        let load = submissions[0]
            .configuration
            .as_ref()
            .and_then(|c| c.load.as_ref())
            .unwrap();
        assert_eq!(load.source_uris, vec!["gs://bucket/events.json"]);
        assert_eq!(
            load.destination_table,
            Some(TableReference::new("proj", "analytics", "events"))
        );
    }

    #[tokio::test]
    async fn invalid_schema_is_never_submitted() {
        let api = Arc::new(ScriptedApi::new(vec![done()]));
        let service = Service::with_api("proj", api.clone());
        let schema = Schema::new(vec![
            Field::new("id", Type::String, ""),
            Field::nested("attributes", "", &Schema::empty()),
        ]);

        let err = service
            .new_load_job("analytics", "events", "gs://bucket/events.json", &schema)
            .execute()
            .await
            .unwrap_err();

        assert!(matches!(err, BigQueryError::InvalidSchema(msg) if msg.contains("'attributes'")));
        assert!(api.submissions().is_empty());
    }

    #[tokio::test]
    async fn empty_schema_load_is_submitted() {
        let api = Arc::new(ScriptedApi::new(vec![done()]));
        let service = Service::with_api("proj", api.clone());
        let schema = Schema::empty();

        let result = service
            .new_load_job("analytics", "events", "gs://bucket/events.json", &schema)
            .execute()
            .await
            .unwrap();

        assert!(result.is_success());
        let payload = serde_json::to_value(&api.submissions()[0]).unwrap();
        assert_eq!(payload["configuration"]["load"]["schema"], json!({ "fields": [] }));
    }
}
