//! Error types emitted by the catalog CLI.
//!
//! Keep this error type reasonably small, as every command helper returns
//! `Result<_, CliError>`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use swift_catalog_core::{DirectoryError, SqliteBranchStoreError};
use swift_catalog_data::SnapshotError;
use thiserror::Error;

/// Errors emitted by the catalog CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (set --{field} or {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// A referenced input path does not exist on disk.
    #[error("{field} path {path:?} does not exist")]
    MissingSourceFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path exists but is not a file.
    #[error("{field} path {path:?} exists but is not a file")]
    SourcePathNotFile {
        field: &'static str,
        path: Utf8PathBuf,
    },
    /// A referenced input path could not be inspected due to an IO error.
    #[error("failed to inspect {field} path {path:?}: {source}")]
    InspectSourcePath {
        field: &'static str,
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the catalog database failed.
    #[error(transparent)]
    OpenStore(#[from] SqliteBranchStoreError),
    /// The snapshot could not be parsed.
    #[error("failed to read snapshot: {0}")]
    Snapshot(#[from] SnapshotError),
    /// Some snapshot rows were rejected by the store.
    #[error("ingest stored the snapshot partially: {failed} rows failed")]
    IngestIncomplete { failed: usize },
    /// A directory operation failed.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// Opening the branch request file failed.
    #[error("failed to open branch request at {path:?}: {source}")]
    OpenBranchRequest {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Branch request JSON could not be decoded.
    #[error("failed to parse branch request JSON at {path:?}: {source}")]
    ParseBranchRequest {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// Serialising command output failed.
    #[error("failed to serialise output: {0}")]
    SerialiseOutput(#[source] serde_json::Error),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
