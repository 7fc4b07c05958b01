use serde::{Deserialize, Serialize};

// https://cloud.google.com/bigquery/docs/reference/rest/v2/ErrorProto
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorProto {
    #[serde(default)]
    pub reason: String,
    #[serde(default)]
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug_info: Option<String>,
    #[serde(default)]
    pub message: String,
}

impl ErrorProto {
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        ErrorProto {
            reason: reason.into(),
            message: message.into(),
            ..Default::default()
        }
    }
}
