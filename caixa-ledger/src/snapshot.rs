//! Whole-ledger backup format.

use caixa_core::{CategoryRules, TransactionRecord};
use serde::{Deserialize, Serialize};

/// Everything the ledger persists, in one document.
///
/// On import each section is optional; only sections present replace the
/// ledger's current data.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transactions: Option<Vec<TransactionRecord>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categorization_rules: Option<CategoryRules>,
}

impl Snapshot {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
