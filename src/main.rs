use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bq_jobs::{CredentialSource, PollerConfig, Schema, Service};
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "bq_jobs", version, about = "Run BigQuery load and query jobs to completion")]
struct Args {
    /// Project that runs the job and owns the destination table
    #[arg(long, env = "BQ_PROJECT_ID")]
    project: String,

    /// Path to a service account key
    #[arg(long, env = "BQ_KEY_FILE")]
    key_file: PathBuf,

    /// Read the key file as gcloud application default credentials instead
    #[arg(long)]
    authorized_user: bool,

    /// JSON file with polling settings
    #[arg(long, env = "BQ_POLLER_CONFIG")]
    poller_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Replace a table with newline-delimited JSON files from Cloud Storage
    Load {
        #[arg(long)]
        dataset: String,
        #[arg(long)]
        table: String,
        /// gs:// URI, may contain a `*` wildcard
        #[arg(long)]
        source: String,
        /// JSON schema file, as printed by `bq show --schema --format=json`
        #[arg(long)]
        schema: PathBuf,
    },
    /// Replace a table with the result of a standard SQL query
    Query {
        #[arg(long)]
        dataset: String,
        #[arg(long)]
        table: String,
        #[arg(long)]
        sql: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let credentials = if args.authorized_user {
        CredentialSource::AuthorizedUserFile(args.key_file)
    } else {
        CredentialSource::ServiceAccountKeyFile(args.key_file)
    };
    let mut service = Service::connect(args.project, credentials)
        .await
        .context("failed to connect to BigQuery")?;
    if let Some(path) = args.poller_config {
        service = service.with_poller_config(PollerConfig::from_file(path)?);
    }

    let result = match args.command {
        Command::Load {
            dataset,
            table,
            source,
            schema,
        } => {
            let doc = fs::read_to_string(&schema)
                .with_context(|| format!("failed to read schema {}", schema.display()))?;
            let schema = Schema::from_json(&doc)?;
            service
                .new_load_job(&dataset, &table, &source, &schema)
                .execute()
                .await?
        }
        Command::Query {
            dataset,
            table,
            sql,
        } => service.query(&sql, &dataset, &table).execute().await?,
    };

    println!("{}", result.message());
    result.into_result()?;
    Ok(())
}
