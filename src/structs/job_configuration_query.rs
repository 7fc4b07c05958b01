use crate::structs::dataset_reference::DatasetReference;
use crate::structs::table_reference::TableReference;
use serde::{Deserialize, Serialize};

// https://cloud.google.com/bigquery/docs/reference/rest/v2/Job#jobconfigurationquery
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfigurationQuery {
    // Actual SQL query text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    // Changes syntax of SQL query. See https://cloud.google.com/bigquery/docs/reference/legacy-sql for details.
    // The service treats an absent value differently from `false`, so set it explicitly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub use_legacy_sql: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_dataset: Option<DatasetReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_table: Option<TableReference>,
}
