//! In-memory transaction ledger backed by a [`Store`].
//!
//! Every mutation re-saves the whole affected collection. Persistence
//! failures are logged and the in-memory state stays authoritative.

use caixa_core::{
    ALL_CATEGORIES, CategoryRules, Clock, Kind, NewTransaction, Origin, TransactionRecord,
    classify, default_categories, sum_amounts,
};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::report::{CategoryTotal, rank_expense_categories};
use crate::snapshot::Snapshot;
use crate::store::{Store, StoreError};

/// Criteria for [`Ledger::filter`]. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    /// Inclusive lower bound
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper bound
    pub date_to: Option<NaiveDate>,
    /// Exact category name; [`ALL_CATEGORIES`] disables the check
    pub category: Option<String>,
    pub kind: Option<Kind>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn between(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        Self {
            date_from: from,
            date_to: to,
            ..Self::default()
        }
    }

    pub fn since(mut self, date: NaiveDate) -> Self {
        self.date_from = Some(date);
        self
    }

    pub fn until(mut self, date: NaiveDate) -> Self {
        self.date_to = Some(date);
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn kind(mut self, kind: Kind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn matches(&self, record: &TransactionRecord) -> bool {
        if self.date_from.is_some_and(|from| record.date < from) {
            return false;
        }
        if self.date_to.is_some_and(|to| record.date > to) {
            return false;
        }
        if let Some(category) = self.category.as_deref() {
            if category != ALL_CATEGORIES && record.category != category {
                return false;
            }
        }
        if self.kind.is_some_and(|kind| record.kind() != kind) {
            return false;
        }
        true
    }
}

/// The collection of all known transactions plus the user's categories and
/// rules.
pub struct Ledger<S: Store, C: Clock> {
    store: S,
    clock: C,
    records: Vec<TransactionRecord>,
    categories: Vec<String>,
    rules: CategoryRules,
}

impl<S: Store, C: Clock> Ledger<S, C> {
    /// Load everything from `store`. Missing or unreadable collections fall
    /// back to defaults.
    pub fn open(store: S, clock: C) -> Self {
        let records = load_or_default(store.load_transactions(), "transactions", Vec::new);
        let categories = load_or_default(store.load_categories(), "categories", default_categories);
        let rules = load_or_default(store.load_rules(), "categorization rules", CategoryRules::new);

        tracing::debug!(
            transactions = records.len(),
            categories = categories.len(),
            rules = rules.len(),
            "ledger opened"
        );

        Self {
            store,
            clock,
            records,
            categories,
            rules,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// All records in insertion order
    pub fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    pub fn transaction_count(&self) -> usize {
        self.records.len()
    }

    /// Insert one transaction. A missing category is filled from the user's
    /// rules and the built-in taxonomy; a missing origin becomes `Manual`.
    pub fn add(&mut self, txn: NewTransaction) -> &TransactionRecord {
        let category = match txn.category {
            Some(c) if !c.trim().is_empty() => c,
            _ => classify(&txn.description, &self.rules).to_string(),
        };
        let origin = txn.origin.unwrap_or(Origin::Manual);

        let record = TransactionRecord::new(txn.date, txn.description, txn.amount, category, origin);
        self.records.push(record);
        self.persist_transactions();

        &self.records[self.records.len() - 1]
    }

    /// Insert transactions one by one, saving after each. Not atomic.
    pub fn add_all<I>(&mut self, txns: I) -> usize
    where
        I: IntoIterator,
        I::Item: Into<NewTransaction>,
    {
        let mut added = 0;
        for txn in txns {
            self.add(txn.into());
            added += 1;
        }
        added
    }

    /// Matching records, newest first. Records on the same date keep their
    /// insertion order.
    pub fn filter(&self, filter: &TransactionFilter) -> Vec<&TransactionRecord> {
        let mut out: Vec<&TransactionRecord> =
            self.records.iter().filter(|r| filter.matches(r)).collect();
        out.sort_by(|a, b| b.date.cmp(&a.date));
        out
    }

    /// The newest `limit` records.
    pub fn recent_transactions(&self, limit: usize) -> Vec<&TransactionRecord> {
        let mut out = self.filter(&TransactionFilter::default());
        out.truncate(limit);
        out
    }

    /// Sum of every stored amount
    pub fn current_balance(&self) -> Decimal {
        sum_amounts(self.records.iter().map(|r| r.amount))
    }

    /// Net change over the current calendar month.
    ///
    /// "Current" is read from the clock on every call.
    pub fn balance_change_this_month(&self) -> Decimal {
        sum_amounts(self.this_month().map(|r| r.amount))
    }

    pub fn monthly_income(&self) -> Decimal {
        sum_amounts(
            self.this_month()
                .filter(|r| r.amount > Decimal::ZERO)
                .map(|r| r.amount),
        )
    }

    /// Current-month expenses as a positive magnitude
    pub fn monthly_expenses(&self) -> Decimal {
        sum_amounts(
            self.this_month()
                .filter(|r| r.amount < Decimal::ZERO)
                .map(|r| r.amount.abs()),
        )
    }

    fn this_month(&self) -> impl Iterator<Item = &TransactionRecord> {
        let today = self.clock.today();
        self.records
            .iter()
            .filter(move |r| r.date.year() == today.year() && r.date.month() == today.month())
    }

    /// Expense magnitude per category over the whole ledger, largest first.
    pub fn expenses_by_category(&self) -> Vec<CategoryTotal> {
        rank_expense_categories(&self.records)
    }

    /// Drop every record and save the empty collection.
    pub fn clear(&mut self) {
        self.records.clear();
        self.persist_transactions();
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Returns `false` if the name is empty or already known.
    pub fn add_category(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.categories.iter().any(|c| c == name) {
            return false;
        }
        self.categories.push(name.to_string());
        self.persist_categories();
        true
    }

    pub fn rules(&self) -> &CategoryRules {
        &self.rules
    }

    /// Add or retarget a keyword rule. Existing records are not touched.
    pub fn add_rule(&mut self, keyword: &str, category: &str) -> bool {
        if !self.rules.insert(keyword, category) {
            return false;
        }
        self.persist_rules();
        true
    }

    pub fn remove_rule(&mut self, keyword: &str) -> Option<String> {
        let removed = self.rules.remove(keyword)?;
        self.persist_rules();
        Some(removed)
    }

    pub fn export_snapshot(&self) -> Snapshot {
        Snapshot {
            transactions: Some(self.records.clone()),
            categories: Some(self.categories.clone()),
            categorization_rules: Some(self.rules.clone()),
        }
    }

    /// Replace each section present in `snapshot` and save it.
    pub fn import_snapshot(&mut self, snapshot: Snapshot) {
        if let Some(transactions) = snapshot.transactions {
            self.records = transactions;
            self.persist_transactions();
        }
        if let Some(categories) = snapshot.categories {
            self.categories = categories;
            self.persist_categories();
        }
        if let Some(rules) = snapshot.categorization_rules {
            self.rules = rules;
            self.persist_rules();
        }
    }

    fn persist_transactions(&mut self) {
        if let Err(e) = self.store.save_transactions(&self.records) {
            tracing::error!("could not save transactions: {e}");
        }
    }

    fn persist_categories(&mut self) {
        if let Err(e) = self.store.save_categories(&self.categories) {
            tracing::error!("could not save categories: {e}");
        }
    }

    fn persist_rules(&mut self) {
        if let Err(e) = self.store.save_rules(&self.rules) {
            tracing::error!("could not save categorization rules: {e}");
        }
    }
}

fn load_or_default<T>(
    loaded: Result<Option<T>, StoreError>,
    what: &str,
    default: impl FnOnce() -> T,
) -> T {
    match loaded {
        Ok(Some(value)) => value,
        Ok(None) => default(),
        Err(e) => {
            tracing::warn!("could not load {what}, starting from defaults: {e}");
            default()
        }
    }
}
