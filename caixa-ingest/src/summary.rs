//! Statistics reported back after parsing a statement, before anything is
//! stored.

use std::collections::BTreeMap;

use caixa_core::{TransactionRecord, add_amounts};
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategoryStats {
    pub count: usize,
    /// Sum of absolute amounts
    pub total: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportSummary {
    pub total_transactions: usize,
    pub total_income: Decimal,
    /// Magnitude of all negative amounts
    pub total_expenses: Decimal,
    pub balance: Decimal,
    /// Keyed by category name
    pub categories: BTreeMap<String, CategoryStats>,
}

impl ImportSummary {
    pub fn from_records(records: &[TransactionRecord]) -> Self {
        let mut summary = ImportSummary {
            total_transactions: records.len(),
            ..Default::default()
        };

        for record in records {
            if record.amount > Decimal::ZERO {
                summary.total_income = add_amounts(summary.total_income, record.amount);
            } else if record.amount < Decimal::ZERO {
                summary.total_expenses = add_amounts(summary.total_expenses, record.amount.abs());
            }

            let stats = summary.categories.entry(record.category.clone()).or_default();
            stats.count += 1;
            stats.total = add_amounts(stats.total, record.abs_amount());
        }

        summary.balance = summary.total_income - summary.total_expenses;
        summary
    }

    pub fn is_empty(&self) -> bool {
        self.total_transactions == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caixa_core::Origin;
    use chrono::NaiveDate;

    fn record(amount: &str, category: &str) -> TransactionRecord {
        TransactionRecord::new(
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            "x",
            Decimal::from_str_exact(amount).unwrap(),
            category,
            Origin::Imported,
        )
    }

    #[test]
    fn test_summary_totals() {
        let records = vec![
            record("2500.00", "Outros"),
            record("-45.90", "Alimentação"),
            record("-10.10", "Alimentação"),
            record("-30.00", "Transporte"),
            record("0", "Outros"),
        ];
        let s = ImportSummary::from_records(&records);
        assert_eq!(s.total_transactions, 5);
        assert_eq!(s.total_income, Decimal::from_str_exact("2500.00").unwrap());
        assert_eq!(s.total_expenses, Decimal::from_str_exact("86.00").unwrap());
        assert_eq!(s.balance, Decimal::from_str_exact("2414.00").unwrap());

        let food = &s.categories["Alimentação"];
        assert_eq!(food.count, 2);
        assert_eq!(food.total, Decimal::from_str_exact("56.00").unwrap());
        assert_eq!(s.categories["Outros"].count, 2);

        let names: Vec<&str> = s.categories.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Alimentação", "Outros", "Transporte"]);
    }

    #[test]
    fn test_empty_summary() {
        let s = ImportSummary::from_records(&[]);
        assert!(s.is_empty());
        assert_eq!(s.balance, Decimal::ZERO);
    }

    #[test]
    fn test_summary_of_huge_amounts_saturates() {
        let max = Decimal::MAX.to_string();
        let records = vec![record(&max, "Outros"), record(&max, "Outros")];
        let s = ImportSummary::from_records(&records);
        assert_eq!(s.total_income, Decimal::MAX);
        assert_eq!(s.categories["Outros"].total, Decimal::MAX);
    }
}
