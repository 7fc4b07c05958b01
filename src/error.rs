use crate::job::JobTarget;

#[derive(thiserror::Error, Debug)]
pub enum BigQueryError {
    #[error("Configuration error: {msg} (error: {source})")]
    Configuration {
        msg: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Authentication error (error: {0})")]
    YupAuthError(#[from] yup_oauth2::Error),
    #[error("Request to google api error (error: {0})")]
    ApiRequestError(#[from] reqwest::Error),
    #[error("Google api responded with status {status}: {message}")]
    ApiResponse { status: u16, message: String },
    #[error("Malformed google api response: missing job_id")]
    MissingJobIdInGoogleApiResponse,
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),
    #[error("Failed to parse schema (error: {0})")]
    SchemaParse(#[from] serde_json::Error),
    #[error("Failed to submit {target} (error: {source})")]
    Submission {
        target: JobTarget,
        #[source]
        source: Box<BigQueryError>,
    },
    #[error("Failed to read the status of {target} after {attempts} attempts (error: {source})")]
    StatusRead {
        target: JobTarget,
        attempts: u32,
        #[source]
        source: Box<BigQueryError>,
    },
    #[error("{target} was not done after {polls} status reads")]
    PollLimitExceeded { target: JobTarget, polls: u64 },
    #[error("Failed to load config from {path}: {msg}")]
    ConfigFile { path: String, msg: String },
}
