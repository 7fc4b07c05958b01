use serde::{Deserialize, Serialize};

use crate::structs::table_field_schema::TableFieldSchema;

// https://cloud.google.com/bigquery/docs/reference/rest/v2/tables#TableSchema
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableFieldSchema>,
}
