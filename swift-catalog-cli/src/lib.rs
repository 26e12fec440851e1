//! Command-line interface for the SWIFT code catalog.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use serde::Serialize;

mod directory;
mod error;
mod ingest;

pub use error::CliError;

use directory::{CountryArgs, CreateArgs, DeleteArgs, LookupArgs};
use ingest::IngestArgs;

pub(crate) const ARG_SNAPSHOT: &str = "snapshot";
pub(crate) const ARG_DATABASE: &str = "database";
pub(crate) const ARG_CONNECT_ATTEMPTS: &str = "connect-attempts";
pub(crate) const ARG_CONNECT_DELAY_MS: &str = "connect-delay-ms";
pub(crate) const ARG_SWIFT_CODE: &str = "swift-code";
pub(crate) const ARG_COUNTRY_ISO2: &str = "country-iso2";
pub(crate) const ARG_REQUEST: &str = "request";
pub(crate) const ENV_INGEST_SNAPSHOT: &str = "SWIFT_CATALOG_CMDS_INGEST_SNAPSHOT";
pub(crate) const ENV_LOOKUP_SWIFT_CODE: &str = "SWIFT_CATALOG_CMDS_LOOKUP_SWIFT_CODE";
pub(crate) const ENV_COUNTRY_ISO2: &str = "SWIFT_CATALOG_CMDS_COUNTRY_COUNTRY_ISO2";
pub(crate) const ENV_CREATE_REQUEST: &str = "SWIFT_CATALOG_CMDS_CREATE_REQUEST_PATH";
pub(crate) const ENV_DELETE_SWIFT_CODE: &str = "SWIFT_CATALOG_CMDS_DELETE_SWIFT_CODE";

/// Database used when none is configured.
pub const DEFAULT_DATABASE: &str = "swift_codes.db";

/// Run the catalog CLI with the current process arguments and environment.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    run_with(cli.command, &mut stdout)
}

pub(crate) fn run_with(command: Command, writer: &mut dyn Write) -> Result<(), CliError> {
    match command {
        Command::Ingest(args) => ingest::run_ingest_with(args, writer),
        Command::Lookup(args) => directory::run_lookup_with(args, writer),
        Command::Country(args) => directory::run_country_with(args, writer),
        Command::Create(args) => directory::run_create_with(args, writer),
        Command::Delete(args) => directory::run_delete_with(args, writer),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "swift-catalog",
    about = "Load and query a catalog of bank SWIFT codes",
    version
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub(crate) command: Command,
}

#[derive(Debug, Subcommand)]
pub(crate) enum Command {
    /// Load a SWIFT code snapshot into the catalog.
    Ingest(IngestArgs),
    /// Show a branch, or a headquarter with its branches.
    Lookup(LookupArgs),
    /// List the SWIFT codes registered under a country.
    Country(CountryArgs),
    /// Add a branch described by a JSON request file.
    Create(CreateArgs),
    /// Remove a branch by SWIFT code.
    Delete(DeleteArgs),
}

/// Fall back to [`DEFAULT_DATABASE`] when no database path is configured.
pub(crate) fn database_or_default(database: Option<Utf8PathBuf>) -> Utf8PathBuf {
    database.unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASE))
}

/// Check that `path` names an existing regular file.
pub(crate) fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match swift_catalog_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `value` as pretty-printed JSON followed by a newline.
pub(crate) fn write_json<T>(writer: &mut dyn Write, value: &T) -> Result<(), CliError>
where
    T: Serialize + ?Sized,
{
    let payload = serde_json::to_string_pretty(value).map_err(CliError::SerialiseOutput)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteOutput)?;
    writer.write_all(b"\n").map_err(CliError::WriteOutput)
}

#[cfg(test)]
mod tests;
