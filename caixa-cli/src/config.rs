use anyhow::{Context, Result};
use caixa_core::SystemClock;
use clap::Subcommand;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::CaixaDirs;

pub const DEFAULT_TIMEZONE: &str = "America/Sao_Paulo";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Write a default config if none exists
    Init,

    /// Print the effective configuration
    Show,
}

/// Contents of `config.toml`. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    /// IANA zone that decides what "today" is
    pub timezone: String,
    /// Tracing filter used when RUST_LOG is unset
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            timezone: DEFAULT_TIMEZONE.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    /// A missing file is not an error: defaults apply.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parse {}", path.display()))
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        let text = toml::to_string_pretty(self).context("serialize config")?;
        fs::write(path, text).with_context(|| format!("write {}", path.display()))
    }

    pub fn data_dir(&self, dirs: &CaixaDirs) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| dirs.default_data_dir())
    }

    pub fn clock(&self) -> Result<SystemClock> {
        SystemClock::new(&self.timezone)
            .with_context(|| format!("config timezone {:?}", self.timezone))
    }
}

/// Write a config with every default spelled out. Returns `false` and leaves
/// the file alone when one is already there.
pub fn init(dirs: &CaixaDirs) -> Result<bool> {
    let path = dirs.config_file();
    if path.exists() {
        return Ok(false);
    }
    let cfg = Config {
        data_dir: Some(dirs.default_data_dir()),
        ..Config::default()
    };
    cfg.write(&path)?;
    Ok(true)
}

pub fn run(dirs: &CaixaDirs, cfg: &Config, command: ConfigCommand) -> Result<()> {
    let path = dirs.config_file();
    match command {
        ConfigCommand::Init => {
            if init(dirs)? {
                println!("Wrote {}", path.display());
            } else {
                println!("Config already exists: {}", path.display());
            }
        }
        ConfigCommand::Show => {
            println!("home:      {}", dirs.root().display());
            println!("config:    {}", path.display());
            println!("data_dir:  {}", cfg.data_dir(dirs).display());
            println!("timezone:  {}", cfg.timezone);
            println!("log_level: {}", cfg.log_level);
        }
    }
    Ok(())
}
