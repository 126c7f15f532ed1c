use anyhow::Result;
use caixa_core::SystemClock;
use caixa_ledger::{JsonFileStore, Ledger};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod backup_cmd;
mod config;
mod ledger_cmd;
mod report_cmd;
mod rules_cmd;
mod state;

use backup_cmd::BackupCommand;
use config::{Config, ConfigCommand};
use rules_cmd::{CategoriesCommand, RulesCommand};
use state::CaixaDirs;

pub type CliLedger = Ledger<JsonFileStore, SystemClock>;

#[derive(Parser, Debug)]
#[command(name = "caixa", version, about = "Personal cash ledger: import bank statements, categorize, report")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Import an OFX statement into the ledger
    Import {
        file: PathBuf,

        /// Parse and summarize only; store nothing
        #[arg(long, default_value_t = false)]
        dry_run: bool,
    },

    /// Record a transaction by hand
    Add {
        description: String,

        /// Signed amount: negative for expenses
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<String>,

        /// Category (default: classified from the description)
        #[arg(long)]
        category: Option<String>,
    },

    /// List transactions, newest first
    List {
        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        /// Category name, or "Todas" for all
        #[arg(long)]
        category: Option<String>,

        /// income|expense (receita|despesa)
        #[arg(long)]
        kind: Option<String>,

        #[arg(long)]
        limit: Option<usize>,

        /// Write CSV to stdout
        #[arg(long, default_value_t = false)]
        csv: bool,
    },

    /// Balance, this month's figures and the latest transactions
    Summary,

    /// Totals, top categories and monthly series over a period
    Report {
        /// last-month | last-3-months | last-year | custom
        #[arg(long, default_value = "last-month")]
        period: String,

        /// Start date for a custom period
        #[arg(long)]
        from: Option<String>,

        /// End date for a custom period
        #[arg(long)]
        to: Option<String>,

        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Manage the category list
    Categories {
        #[command(subcommand)]
        command: CategoriesCommand,
    },

    /// Manage keyword rules used when adding transactions by hand
    Rules {
        #[command(subcommand)]
        command: RulesCommand,
    },

    /// Export or restore all ledger data
    Backup {
        #[command(subcommand)]
        command: BackupCommand,
    },

    /// Delete every transaction (categories and rules are kept)
    Clear {
        #[arg(long, default_value_t = false)]
        yes: bool,
    },

    /// Inspect or create ~/.caixa/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let dirs = CaixaDirs::from_home()?;
    let cfg = Config::load(&dirs.config_file())?;
    setup_logging(&cfg);

    match cli.command {
        Command::Config { command } => config::run(&dirs, &cfg, command)?,

        Command::Import { file, dry_run } => {
            let mut ledger = open_ledger(&dirs, &cfg)?;
            ledger_cmd::import(&mut ledger, &file, dry_run)?;
        }

        Command::Add {
            description,
            amount,
            date,
            category,
        } => {
            let mut ledger = open_ledger(&dirs, &cfg)?;
            ledger_cmd::add(
                &mut ledger,
                ledger_cmd::AddArgs {
                    date,
                    description,
                    amount,
                    category,
                },
            )?;
        }

        Command::List {
            from,
            to,
            category,
            kind,
            limit,
            csv,
        } => {
            let ledger = open_ledger(&dirs, &cfg)?;
            ledger_cmd::list(
                &ledger,
                ledger_cmd::ListArgs {
                    from,
                    to,
                    category,
                    kind,
                    limit,
                    csv,
                },
            )?;
        }

        Command::Summary => {
            let ledger = open_ledger(&dirs, &cfg)?;
            ledger_cmd::summary(&ledger)?;
        }

        Command::Report {
            period,
            from,
            to,
            json,
        } => {
            let ledger = open_ledger(&dirs, &cfg)?;
            report_cmd::run(
                &ledger,
                report_cmd::ReportArgs {
                    period,
                    from,
                    to,
                    json,
                },
            )?;
        }

        Command::Categories { command } => {
            let mut ledger = open_ledger(&dirs, &cfg)?;
            rules_cmd::categories(&mut ledger, command)?;
        }

        Command::Rules { command } => {
            let mut ledger = open_ledger(&dirs, &cfg)?;
            rules_cmd::rules(&mut ledger, command)?;
        }

        Command::Backup { command } => {
            let mut ledger = open_ledger(&dirs, &cfg)?;
            backup_cmd::run(&mut ledger, command)?;
        }

        Command::Clear { yes } => {
            let mut ledger = open_ledger(&dirs, &cfg)?;
            ledger_cmd::clear(&mut ledger, yes)?;
        }
    }

    Ok(())
}

fn open_ledger(dirs: &CaixaDirs, cfg: &Config) -> Result<CliLedger> {
    let dir = cfg.data_dir(dirs);
    tracing::debug!(data_dir = %dir.display(), timezone = %cfg.timezone, "opening ledger");
    Ok(Ledger::open(JsonFileStore::new(dir), cfg.clock()?))
}

fn setup_logging(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
