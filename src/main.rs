use clap::Parser;
use expense_ledger::args::{Args, Command};
use expense_ledger::handoff::LogHandoff;
use expense_ledger::{commands, Config, Result};
use std::process::ExitCode;
use tracing::{debug, error, trace};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let log_level = args.common().log_level();
    init_logger(log_level);
    debug!("Log level set to {}", log_level.to_string().to_lowercase());

    match main_inner(args).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Exiting with error: {e}");
            ExitCode::FAILURE
        }
    }
}

pub async fn main_inner(args: Args) -> Result<()> {
    trace!("{args:?}");
    let home = args.common().expenses_home().path();
    let handoff = LogHandoff;

    let _: () = match args.command() {
        Command::Init(init_args) => commands::init(home, init_args.destination())
            .await?
            .print(),

        Command::Add(add_args) => {
            let config = Config::load(home).await?;
            let out = commands::add_expense(&config, *add_args.clone(), &handoff).await;
            config.db().close().await;
            out?.print()
        }

        Command::List => {
            let config = Config::load(home).await?;
            let out = commands::list(&config).await;
            config.db().close().await;
            out?.print()
        }

        Command::Export => {
            let config = Config::load(home).await?;
            let out = commands::export(&config, &handoff).await;
            config.db().close().await;
            out?.print()
        }

        Command::Bill(bill_args) => {
            let config = Config::load(home).await?;
            let out = commands::view_bill(&config, bill_args.id(), &handoff).await;
            config.db().close().await;
            out?.print()
        }
    };
    Ok(())
}

/// Initializes the tracing subscriber.
pub fn init_logger(level: LevelFilter) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => {
            // RUST_LOG exists; use it.
            EnvFilter::from_default_env()
        }
        None => {
            // RUST_LOG does not exist; use default log level for this crate only.
            EnvFilter::new(format!(
                "{}={},{}={}",
                env!("CARGO_CRATE_NAME"),
                level,
                "expense_ledger",
                level
            ))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
