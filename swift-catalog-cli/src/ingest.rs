//! Ingest command implementation for the catalog CLI.

use std::io::Write;
use std::time::Duration;

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use swift_catalog_core::{RetryPolicy, SqliteBranchStore};
use swift_catalog_data::ingest_snapshot;

use crate::{
    ARG_CONNECT_ATTEMPTS, ARG_CONNECT_DELAY_MS, ARG_DATABASE, ARG_SNAPSHOT, CliError,
    ENV_INGEST_SNAPSHOT, database_or_default, require_existing, write_json,
};

/// CLI arguments for the `ingest` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "ingest",
    long_about = "Parse the comma-separated SWIFT code snapshot and load its \
                 countries and branches into the catalog database. Existing \
                 rows are kept, so the command can be re-run safely. Paths \
                 can come from CLI flags, configuration files, or environment \
                 variables.",
    about = "Load a SWIFT code snapshot into the catalog"
)]
#[ortho_config(prefix = "SWIFT_CATALOG")]
pub(crate) struct IngestArgs {
    /// Path to the snapshot CSV file.
    #[arg(long = ARG_SNAPSHOT, value_name = "path")]
    #[serde(default)]
    pub(crate) snapshot: Option<Utf8PathBuf>,
    /// Path to the SQLite catalog database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
    /// Attempts made to open the database before giving up.
    #[arg(long = ARG_CONNECT_ATTEMPTS, value_name = "count")]
    #[serde(default)]
    pub(crate) connect_attempts: Option<u32>,
    /// Pause between attempts to open the database, in milliseconds.
    #[arg(long = ARG_CONNECT_DELAY_MS, value_name = "ms")]
    #[serde(default)]
    pub(crate) connect_delay_ms: Option<u64>,
}

impl IngestArgs {
    pub(crate) fn into_config(self) -> Result<IngestConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        IngestConfig::try_from(merged)
    }
}

/// Resolved `ingest` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct IngestConfig {
    pub(crate) snapshot: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
    pub(crate) retry: RetryPolicy,
}

impl IngestConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.snapshot, ARG_SNAPSHOT)
    }
}

impl TryFrom<IngestArgs> for IngestConfig {
    type Error = CliError;

    fn try_from(args: IngestArgs) -> Result<Self, Self::Error> {
        let snapshot = args.snapshot.ok_or(CliError::MissingArgument {
            field: ARG_SNAPSHOT,
            env: ENV_INGEST_SNAPSHOT,
        })?;
        let retry = RetryPolicy::new(
            args.connect_attempts
                .unwrap_or(RetryPolicy::DEFAULT_ATTEMPTS),
            args.connect_delay_ms
                .map_or(RetryPolicy::DEFAULT_DELAY, Duration::from_millis),
        );
        Ok(Self {
            snapshot,
            database: database_or_default(args.database),
            retry,
        })
    }
}

pub(crate) fn run_ingest_with(args: IngestArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    run_ingest_config(&config, writer)
}

pub(crate) fn run_ingest_config(
    config: &IngestConfig,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let store = SqliteBranchStore::open_with_retry(&config.database, config.retry)?;
    let report = ingest_snapshot(&store, &config.snapshot)?;
    write_json(writer, &report)?;
    if report.is_complete() {
        info!("catalog {} is up to date", config.database);
        Ok(())
    } else {
        Err(CliError::IngestIncomplete {
            failed: report.failures.len(),
        })
    }
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<IngestConfig, CliError> {
    let merged = IngestArgs::merge_from_layers(layers).map_err(CliError::from)?;
    IngestConfig::try_from(merged)
}
