use crate::structs::error_proto::ErrorProto;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum State {
    Pending,
    Running,
    Done,
}

// https://cloud.google.com/bigquery/docs/reference/rest/v2/JobStatus
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<State>,
    // Set only when the job is DONE and failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_result: Option<ErrorProto>,
    // Every error met while running, including ones that did not fail the job.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorProto>>,
}

impl JobStatus {
    pub fn with_state(state: State) -> Self {
        JobStatus {
            state: Some(state),
            ..Default::default()
        }
    }

    pub fn is_done(&self) -> bool {
        self.state == Some(State::Done)
    }
}
