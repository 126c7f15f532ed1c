//! Persistence collaborators for the ledger.
//!
//! A store loads and saves whole collections. There is no locking or
//! versioning: every save overwrites what was there, so the last writer wins.

use std::fs;
use std::path::{Path, PathBuf};

use caixa_core::{CategoryRules, TransactionRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Errors raised by a [`Store`]. The ledger logs these and carries on.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("could not access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid data in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Used by stores that are not backed by files.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Load/save pair for each persisted collection.
///
/// `Ok(None)` from a load means nothing has been saved yet.
pub trait Store {
    fn load_transactions(&self) -> Result<Option<Vec<TransactionRecord>>, StoreError>;
    fn save_transactions(&mut self, records: &[TransactionRecord]) -> Result<(), StoreError>;

    fn load_categories(&self) -> Result<Option<Vec<String>>, StoreError>;
    fn save_categories(&mut self, categories: &[String]) -> Result<(), StoreError>;

    fn load_rules(&self) -> Result<Option<CategoryRules>, StoreError>;
    fn save_rules(&mut self, rules: &CategoryRules) -> Result<(), StoreError>;
}

/// Pretty-printed JSON files in one directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    pub const TRANSACTIONS_FILE: &'static str = "transactions.json";
    pub const CATEGORIES_FILE: &'static str = "categories.json";
    pub const RULES_FILE: &'static str = "categorization_rules.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn read<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, StoreError> {
        let path = self.dir.join(file);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Json { path, source })
    }

    fn write<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let path = self.dir.join(file);
        let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, json).map_err(|source| StoreError::Io { path, source })
    }
}

impl Store for JsonFileStore {
    fn load_transactions(&self) -> Result<Option<Vec<TransactionRecord>>, StoreError> {
        self.read(Self::TRANSACTIONS_FILE)
    }

    fn save_transactions(&mut self, records: &[TransactionRecord]) -> Result<(), StoreError> {
        self.write(Self::TRANSACTIONS_FILE, records)
    }

    fn load_categories(&self) -> Result<Option<Vec<String>>, StoreError> {
        self.read(Self::CATEGORIES_FILE)
    }

    fn save_categories(&mut self, categories: &[String]) -> Result<(), StoreError> {
        self.write(Self::CATEGORIES_FILE, categories)
    }

    fn load_rules(&self) -> Result<Option<CategoryRules>, StoreError> {
        self.read(Self::RULES_FILE)
    }

    fn save_rules(&mut self, rules: &CategoryRules) -> Result<(), StoreError> {
        self.write(Self::RULES_FILE, rules)
    }
}

/// Keeps the last saved collections in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub transactions: Option<Vec<TransactionRecord>>,
    pub categories: Option<Vec<String>>,
    pub rules: Option<CategoryRules>,
    /// Number of successful saves of any collection
    pub saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn load_transactions(&self) -> Result<Option<Vec<TransactionRecord>>, StoreError> {
        Ok(self.transactions.clone())
    }

    fn save_transactions(&mut self, records: &[TransactionRecord]) -> Result<(), StoreError> {
        self.transactions = Some(records.to_vec());
        self.saves += 1;
        Ok(())
    }

    fn load_categories(&self) -> Result<Option<Vec<String>>, StoreError> {
        Ok(self.categories.clone())
    }

    fn save_categories(&mut self, categories: &[String]) -> Result<(), StoreError> {
        self.categories = Some(categories.to_vec());
        self.saves += 1;
        Ok(())
    }

    fn load_rules(&self) -> Result<Option<CategoryRules>, StoreError> {
        Ok(self.rules.clone())
    }

    fn save_rules(&mut self, rules: &CategoryRules) -> Result<(), StoreError> {
        self.rules = Some(rules.clone());
        self.saves += 1;
        Ok(())
    }
}
