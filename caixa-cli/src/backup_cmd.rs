use anyhow::{Context, Result};
use caixa_ledger::Snapshot;
use clap::Subcommand;
use std::fs;
use std::path::PathBuf;

use crate::CliLedger;

#[derive(Subcommand, Debug)]
pub enum BackupCommand {
    /// Write transactions, categories and rules to one JSON file
    Export {
        /// Output path (stdout when omitted)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Replace ledger data with the sections present in a backup file
    Restore { file: PathBuf },
}

pub fn run(ledger: &mut CliLedger, command: BackupCommand) -> Result<()> {
    match command {
        BackupCommand::Export { out } => {
            let json = ledger.export_snapshot().to_json().context("serialize backup")?;
            match out {
                Some(path) => {
                    fs::write(&path, json).with_context(|| format!("write {}", path.display()))?;
                    println!(
                        "Exported {} transactions to {}",
                        ledger.transaction_count(),
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }
        BackupCommand::Restore { file } => {
            let text =
                fs::read_to_string(&file).with_context(|| format!("read {}", file.display()))?;
            let snapshot = Snapshot::from_json(&text)
                .with_context(|| format!("parse backup {}", file.display()))?;

            let mut sections = Vec::new();
            if snapshot.transactions.is_some() {
                sections.push("transactions");
            }
            if snapshot.categories.is_some() {
                sections.push("categories");
            }
            if snapshot.categorization_rules.is_some() {
                sections.push("rules");
            }

            ledger.import_snapshot(snapshot);
            if sections.is_empty() {
                println!("Backup had no sections; nothing changed.");
            } else {
                println!("Restored {} from {}", sections.join(", "), file.display());
            }
        }
    }
    Ok(())
}
