use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use soda_machine::csv::read_catalog;
use soda_machine::{ChangePolicy, Engine, Shell};
use tokio_stream::wrappers::ReceiverStream;
use tracing::{error, warn};
use tracing_subscriber::EnvFilter;

/// The original machine ran every session under the empty GUID.
const DEFAULT_USER: &str = "00000000-0000-0000-0000-000000000000";

/// Console soda machine
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Products csv file (`name,price`)
    #[arg(long, env = "SODA_PRODUCTS", default_value = "data/products.csv")]
    products: PathBuf,

    /// Change denominations csv file (`name,value`)
    #[arg(long, env = "SODA_DENOMINATIONS", default_value = "data/denominations.csv")]
    denominations: PathBuf,

    /// Identifier the session balance is kept under
    #[arg(long, env = "SODA_USER", default_value = DEFAULT_USER)]
    user: String,

    /// Behaviour when exact change cannot be made: `exact` or `best-effort`
    #[arg(long, env = "SODA_CHANGE_POLICY", default_value_t = ChangePolicy::Exact)]
    change_policy: ChangePolicy,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let catalog = match read_catalog(&cli.products, &cli.denominations) {
        Ok(catalog) => catalog,
        Err(e) => {
            error!("failed to load catalog: {e}");
            return ExitCode::FAILURE;
        }
    };

    let engine = Engine::with_policy(catalog, cli.change_policy);
    let (line_sender, line_receiver) = tokio::sync::mpsc::channel(16);

    // plain thread: a read blocked on stdin must not hold up shutdown
    std::thread::spawn(move || {
        for line in io::stdin().lines() {
            match line {
                Ok(line) => {
                    if line_sender.blocking_send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    warn!("failed to read input: {e}");
                    break;
                }
            }
        }
    });

    let mut shell = Shell::new(engine, cli.user, io::stdout());
    if let Err(e) = shell.run(ReceiverStream::new(line_receiver)).await {
        error!("failed to write output: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
