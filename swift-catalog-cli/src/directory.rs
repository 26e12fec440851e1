//! Lookup, country, create and delete commands for the catalog CLI.

use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use swift_catalog_core::{
    BranchView, MessageView, SqliteBranchStore, create_branch, delete_branch, resolve_by_country,
    resolve_by_swift,
};
use swift_catalog_fs::read_utf8_file;

use crate::{
    ARG_COUNTRY_ISO2, ARG_DATABASE, ARG_REQUEST, ARG_SWIFT_CODE, CliError, ENV_COUNTRY_ISO2,
    ENV_CREATE_REQUEST, ENV_DELETE_SWIFT_CODE, ENV_LOOKUP_SWIFT_CODE, database_or_default,
    require_existing, write_json,
};

pub(crate) const CREATED_MESSAGE: &str = "Successfully added branch to the catalog";
pub(crate) const DELETED_MESSAGE: &str = "Successfully deleted branch from the catalog";

/// CLI arguments for the `lookup` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "lookup",
    about = "Show a branch, or a headquarter with its branches"
)]
#[ortho_config(prefix = "SWIFT_CATALOG")]
pub(crate) struct LookupArgs {
    /// SWIFT code to resolve.
    #[arg(value_name = "code")]
    #[serde(default)]
    pub(crate) swift_code: Option<String>,
    /// Path to the SQLite catalog database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `country` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "country",
    about = "List the SWIFT codes registered under a country"
)]
#[ortho_config(prefix = "SWIFT_CATALOG")]
pub(crate) struct CountryArgs {
    /// Two-letter ISO country code.
    #[arg(value_name = "iso2")]
    #[serde(default)]
    pub(crate) country_iso2: Option<String>,
    /// Path to the SQLite catalog database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `create` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "create",
    long_about = "Add a branch to the catalog. The request file holds a JSON \
                 object with address, bankName, countryISO2, countryName, \
                 isHeadquarter and swiftCode fields; the country must already \
                 be registered.",
    about = "Add a branch described by a JSON request file"
)]
#[ortho_config(prefix = "SWIFT_CATALOG")]
pub(crate) struct CreateArgs {
    /// Path to a JSON file containing the branch request.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) request_path: Option<Utf8PathBuf>,
    /// Path to the SQLite catalog database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// CLI arguments for the `delete` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(name = "delete", about = "Remove a branch by SWIFT code")]
#[ortho_config(prefix = "SWIFT_CATALOG")]
pub(crate) struct DeleteArgs {
    /// SWIFT code to remove.
    #[arg(value_name = "code")]
    #[serde(default)]
    pub(crate) swift_code: Option<String>,
    /// Path to the SQLite catalog database.
    #[arg(long = ARG_DATABASE, value_name = "path")]
    #[serde(default)]
    pub(crate) database: Option<Utf8PathBuf>,
}

/// Resolved configuration for commands addressing one catalog key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct KeyConfig {
    pub(crate) key: String,
    pub(crate) database: Utf8PathBuf,
}

impl KeyConfig {
    fn resolve(
        key: Option<String>,
        database: Option<Utf8PathBuf>,
        field: &'static str,
        env: &'static str,
    ) -> Result<Self, CliError> {
        let key = key
            .filter(|value| !value.trim().is_empty())
            .ok_or(CliError::MissingArgument { field, env })?;
        Ok(Self {
            key,
            database: database_or_default(database),
        })
    }

    fn open_store(&self) -> Result<SqliteBranchStore, CliError> {
        SqliteBranchStore::open(&self.database).map_err(CliError::from)
    }
}

impl TryFrom<LookupArgs> for KeyConfig {
    type Error = CliError;

    fn try_from(args: LookupArgs) -> Result<Self, Self::Error> {
        Self::resolve(
            args.swift_code,
            args.database,
            ARG_SWIFT_CODE,
            ENV_LOOKUP_SWIFT_CODE,
        )
    }
}

impl TryFrom<CountryArgs> for KeyConfig {
    type Error = CliError;

    fn try_from(args: CountryArgs) -> Result<Self, Self::Error> {
        Self::resolve(
            args.country_iso2,
            args.database,
            ARG_COUNTRY_ISO2,
            ENV_COUNTRY_ISO2,
        )
    }
}

impl TryFrom<DeleteArgs> for KeyConfig {
    type Error = CliError;

    fn try_from(args: DeleteArgs) -> Result<Self, Self::Error> {
        Self::resolve(
            args.swift_code,
            args.database,
            ARG_SWIFT_CODE,
            ENV_DELETE_SWIFT_CODE,
        )
    }
}

/// Resolved `create` command configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CreateConfig {
    pub(crate) request_path: Utf8PathBuf,
    pub(crate) database: Utf8PathBuf,
}

impl TryFrom<CreateArgs> for CreateConfig {
    type Error = CliError;

    fn try_from(args: CreateArgs) -> Result<Self, Self::Error> {
        let request_path = args.request_path.ok_or(CliError::MissingArgument {
            field: ARG_REQUEST,
            env: ENV_CREATE_REQUEST,
        })?;
        Ok(Self {
            request_path,
            database: database_or_default(args.database),
        })
    }
}

pub(crate) fn run_lookup_with(args: LookupArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    lookup(&KeyConfig::try_from(merged)?, writer)
}

pub(crate) fn run_country_with(args: CountryArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    country(&KeyConfig::try_from(merged)?, writer)
}

pub(crate) fn run_create_with(args: CreateArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    create(&CreateConfig::try_from(merged)?, writer)
}

pub(crate) fn run_delete_with(args: DeleteArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    delete(&KeyConfig::try_from(merged)?, writer)
}

pub(crate) fn lookup(config: &KeyConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let view = resolve_by_swift(&config.open_store()?, &config.key)?;
    write_json(writer, &view)
}

pub(crate) fn country(config: &KeyConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    let view = resolve_by_country(&config.open_store()?, &config.key)?;
    write_json(writer, &view)
}

pub(crate) fn create(config: &CreateConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    require_existing(&config.request_path, ARG_REQUEST)?;
    let request = load_branch_request(&config.request_path)?;
    let store = SqliteBranchStore::open(&config.database)?;
    create_branch(&store, &request)?;
    write_json(writer, &MessageView::new(CREATED_MESSAGE))
}

pub(crate) fn delete(config: &KeyConfig, writer: &mut dyn Write) -> Result<(), CliError> {
    delete_branch(&config.open_store()?, &config.key)?;
    write_json(writer, &MessageView::new(DELETED_MESSAGE))
}

/// Loads a JSON-encoded [`BranchView`] from disk.
pub(crate) fn load_branch_request(path: &Utf8Path) -> Result<BranchView, CliError> {
    let body = read_utf8_file(path).map_err(|source| CliError::OpenBranchRequest {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| {
        CliError::ParseBranchRequest {
            path: path.to_path_buf(),
            source,
        }
    })
}
