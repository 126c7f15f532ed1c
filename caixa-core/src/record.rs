//! Transaction record types shared by the parser, the ledger and reports

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder stored in place of an empty description.
pub const NO_DESCRIPTION: &str = "Transação sem descrição";

/// Direction of a money movement, always derived from the sign of the amount
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Kind {
    Income,
    Expense,
}

impl Kind {
    /// `amount > 0` is income; everything else, zero included, is an expense.
    pub fn from_amount(amount: Decimal) -> Self {
        if amount > Decimal::ZERO {
            Kind::Income
        } else {
            Kind::Expense
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Kind::Income => "Income",
            Kind::Expense => "Expense",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Kind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" | "receita" => Ok(Kind::Income),
            "expense" | "despesa" => Ok(Kind::Expense),
            other => Err(anyhow::anyhow!("unknown transaction kind: {other}")),
        }
    }
}

/// Where a record came from. Display/audit only.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Origin {
    #[serde(alias = "OFX")]
    Imported,
    #[default]
    Manual,
}

/// One money movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "StoredRecord", from = "StoredRecord")]
pub struct TransactionRecord {
    /// Calendar date (time of day is dropped at parse time)
    pub date: NaiveDate,
    pub description: String,
    /// Positive = income, negative = expense
    pub amount: Decimal,
    pub category: String,
    pub origin: Origin,
}

impl TransactionRecord {
    pub fn new(
        date: NaiveDate,
        description: impl Into<String>,
        amount: Decimal,
        category: impl Into<String>,
        origin: Origin,
    ) -> Self {
        Self {
            date,
            description: normalize_description(description.into()),
            amount,
            category: category.into(),
            origin,
        }
    }

    pub fn kind(&self) -> Kind {
        Kind::from_amount(self.amount)
    }

    pub fn is_income(&self) -> bool {
        self.kind() == Kind::Income
    }

    pub fn is_expense(&self) -> bool {
        self.kind() == Kind::Expense
    }

    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}

/// Input for a ledger insertion: category and origin may be left for the
/// ledger to fill in.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
    pub category: Option<String>,
    pub origin: Option<Origin>,
}

impl NewTransaction {
    pub fn new(date: NaiveDate, description: impl Into<String>, amount: Decimal) -> Self {
        Self {
            date,
            description: description.into(),
            amount,
            category: None,
            origin: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = Some(origin);
        self
    }
}

impl From<TransactionRecord> for NewTransaction {
    fn from(record: TransactionRecord) -> Self {
        Self {
            date: record.date,
            description: record.description,
            amount: record.amount,
            category: Some(record.category),
            origin: Some(record.origin),
        }
    }
}

fn normalize_description(description: String) -> String {
    if description.trim().is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        description
    }
}

/// On-disk shape. `kind` is written for readers of the file but ignored on
/// load.
#[derive(Serialize, Deserialize)]
struct StoredRecord {
    date: NaiveDate,
    #[serde(default)]
    description: String,
    /// Written as a JSON number with every digit kept
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    amount: Decimal,
    #[serde(default)]
    category: String,
    #[serde(default, skip_deserializing)]
    kind: Option<Kind>,
    #[serde(default)]
    origin: Origin,
}

impl From<TransactionRecord> for StoredRecord {
    fn from(record: TransactionRecord) -> Self {
        let kind = Some(record.kind());
        Self {
            date: record.date,
            description: record.description,
            amount: record.amount,
            category: record.category,
            kind,
            origin: record.origin,
        }
    }
}

impl From<StoredRecord> for TransactionRecord {
    fn from(stored: StoredRecord) -> Self {
        TransactionRecord::new(
            stored.date,
            stored.description,
            stored.amount,
            stored.category,
            stored.origin,
        )
    }
}
