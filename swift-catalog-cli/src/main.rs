//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use swift_catalog_cli::CliError;
use tracing_subscriber::EnvFilter;

fn main() {
    init_logging();
    match swift_catalog_cli::run() {
        Ok(()) => {}
        Err(CliError::ArgumentParsing(err)) => err.exit(),
        Err(err) => {
            eprintln!("swift-catalog: {err}");
            std::process::exit(1);
        }
    }
}

/// Send `log` records to stderr, filtered by `RUST_LOG` (default `info`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        eprintln!("swift-catalog: logging disabled: {err}");
    }
}
