use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Layout of the caixa home directory (`$HOME/.caixa` unless told otherwise).
#[derive(Debug, Clone)]
pub struct CaixaDirs {
    root: PathBuf,
}

impl CaixaDirs {
    pub fn from_home() -> Result<Self> {
        let home = std::env::var_os("HOME").context("HOME is not set")?;
        Ok(Self::at(PathBuf::from(home).join(".caixa")))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.toml")
    }

    /// Ledger JSON files, unless the config points elsewhere
    pub fn default_data_dir(&self) -> PathBuf {
        self.root.join("data")
    }
}
