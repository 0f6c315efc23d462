mod backup;
mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use commands::amount_due::AmountDueArgs;
use commands::backup::BackupArgs;
use commands::certificate::CertificateArgs;
use commands::words::WordsArgs;

/// Prepayment certificate calculations
#[derive(Parser)]
#[command(
    name = "ppc",
    version,
    about = "Prepayment certificate calculations",
    long_about = "A CLI for preparing Prepayment Certificate figures for contract payments \
                  in naira. Computes the amount due per project from form fields, renders \
                  it in words, exports the calculated details rows and keeps local backups \
                  of form snapshots."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation breakdowns to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the amount due for one project
    AmountDue(AmountDueArgs),
    /// Render an amount in naira and kobo words
    Words(WordsArgs),
    /// Build a certificate for up to three projects
    Certificate(CertificateArgs),
    /// Save, list and restore form snapshots
    Backup(BackupArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::AmountDue(args) => commands::amount_due::run_amount_due(args),
        Commands::Words(args) => commands::words::run_words(args),
        Commands::Certificate(args) => commands::certificate::run_certificate(args),
        Commands::Backup(args) => commands::backup::run_backup(args),
        Commands::Version => {
            println!("ppc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
