use clap::{Args, Subcommand};
use serde_json::Value;
use std::path::PathBuf;

use prepayment_core::certificate::CertificateInput;

use crate::backup::BackupStore;

/// Arguments for managing saved form snapshots
#[derive(Args)]
pub struct BackupArgs {
    /// Directory holding backups.csv
    #[arg(long, env = "PPC_BACKUP_DIR", default_value = "backups", global = true)]
    pub backup_dir: PathBuf,

    #[command(subcommand)]
    pub action: BackupAction,
}

#[derive(Subcommand)]
pub enum BackupAction {
    /// Save a certificate snapshot (from --input or stdin)
    Save {
        /// Path to JSON/YAML certificate snapshot
        #[arg(long)]
        input: Option<String>,
    },
    /// List saved snapshots
    List {
        /// Only show snapshots whose contractor or project name contains this text
        #[arg(long)]
        search: Option<String>,
    },
    /// Print a saved snapshot so it can be edited or piped into `certificate`
    Show {
        /// Position in the listing (0-based)
        index: usize,
    },
}

pub fn run_backup(args: BackupArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let store = BackupStore::new(args.backup_dir);
    match args.action {
        BackupAction::Save { input } => {
            let snapshot: CertificateInput =
                crate::input::read_input(input.as_deref(), "backup save")?;
            let summary = store.save(&snapshot)?;
            Ok(serde_json::to_value(summary)?)
        }
        BackupAction::List { search } => {
            let summaries = store.list(search.as_deref())?;
            Ok(serde_json::to_value(summaries)?)
        }
        BackupAction::Show { index } => {
            let snapshot = store.load(index)?;
            Ok(serde_json::to_value(snapshot)?)
        }
    }
}
