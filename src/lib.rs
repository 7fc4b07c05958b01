//! Submit BigQuery load and query jobs and wait for them to finish.
//!
//! ```no_run
//! # async fn run() -> Result<(), bq_jobs::BigQueryError> {
//! use bq_jobs::{CredentialSource, Field, Schema, Service, Type};
//!
//! let service = Service::connect(
//!     "my-project",
//!     CredentialSource::ServiceAccountKeyFile("key.json".into()),
//! )
//! .await?;
//! let schema = Schema::new(vec![Field::new("id", Type::String, "Event id")]);
//! let result = service
//!     .new_load_job("analytics", "events", "gs://bucket/events/*.json", &schema)
//!     .execute()
//!     .await?;
//! println!("{}", result.message());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod job;
pub mod load_job;
pub mod poller;
pub mod query_job;
pub mod schema;
pub mod structs;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::{CredentialSource, Service};
pub use config::{PollerConfig, StatusFailurePolicy};
pub use error::BigQueryError;
pub use job::{JobError, JobResult, JobTarget};
pub use load_job::LoadJob;
pub use query_job::QueryJob;
pub use schema::{Field, Schema};
pub use structs::table_field_schema::{Mode, Type};
pub use transport::{JobsApi, RestJobsApi};
