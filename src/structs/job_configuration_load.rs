use crate::structs::table_reference::TableReference;
use crate::structs::table_schema::TableSchema;
use serde::{Deserialize, Serialize};

// https://cloud.google.com/bigquery/docs/reference/rest/v2/Job#jobconfigurationload
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobConfigurationLoad {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination_table: Option<TableReference>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_format: Option<String>,
    // May contain a single `*` wildcard, expanded by the service.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_uris: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write_disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<TableSchema>,
}
