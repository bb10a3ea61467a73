use std::fs::{self, File};

use anyhow::{Context, Result};
use bank_ledger::{
    bin_utils::{RowError, Service, fixture::Fixture},
    processor::TransactionProcessError,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let fixture_path = args
        .next()
        .context("Expected a fixture file name as the first argument")?;
    let operations_path = args
        .next()
        .context("Expected an operations file name as the second argument")?;

    let source = fs::read_to_string(&fixture_path)
        .with_context(|| format!("Failed to read `{fixture_path}`"))?;
    let fixture = Fixture::from_toml_str(&source)
        .with_context(|| format!("Failed to parse `{fixture_path}`"))?;
    let file = File::open(&operations_path)
        .with_context(|| format!("Failed to open `{operations_path}`"))?;

    let service = Service {
        fixture,
        input: file,
        output: &mut std::io::stdout(),
        error_printer: Box::new(|line, err| {
            match err {
                RowError::Process(err @ TransactionProcessError::ValidationErr(_)) => {
                    // rejected transactions are business outcomes, not failures of the tool
                    eprintln!("Rejected at line {line}: {err}")
                }
                err => eprintln!("Error at line {line}: {err}"),
            }
        }),
    };
    service.run()
}
