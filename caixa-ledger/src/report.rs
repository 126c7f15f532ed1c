//! Period reports and chart series derived from a ledger.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use caixa_core::{Clock, TransactionRecord, add_amounts, month_start, sum_amounts};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::ledger::{Ledger, TransactionFilter};
use crate::store::Store;

/// How many categories a report ranks.
pub const TOP_CATEGORIES: usize = 5;

/// Reporting window. Named periods count back from today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Period {
    /// Last 30 days
    LastMonth,
    /// Last 90 days
    LastThreeMonths,
    /// Last 365 days
    LastYear,
    /// Caller-supplied bounds; a missing bound is open
    Custom {
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    },
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("unknown report period: {0}")]
pub struct UnknownPeriod(pub String);

impl Period {
    /// Parse a period name and attach custom bounds when the period is
    /// `Custom`. Bounds are ignored for named periods.
    pub fn parse(
        name: &str,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Self, UnknownPeriod> {
        match name.parse::<Period>()? {
            Period::Custom { .. } => Ok(Period::Custom { from, to }),
            named => Ok(named),
        }
    }

    /// Concrete inclusive bounds relative to `today`.
    pub fn bounds(&self, today: NaiveDate) -> (Option<NaiveDate>, Option<NaiveDate>) {
        let back = |days: u64| Some(today - Days::new(days));
        match *self {
            Period::LastMonth => (back(30), Some(today)),
            Period::LastThreeMonths => (back(90), Some(today)),
            Period::LastYear => (back(365), Some(today)),
            Period::Custom { from, to } => (from, to),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Period::LastMonth => "Last Month",
            Period::LastThreeMonths => "Last 3 Months",
            Period::LastYear => "Last Year",
            Period::Custom { .. } => "Custom",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Period {
    type Err = UnknownPeriod;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_lowercase().replace(['-', '_'], " ");
        match key.as_str() {
            "last month" | "último mês" | "ultimo mes" => Ok(Period::LastMonth),
            "last 3 months" | "últimos 3 meses" | "ultimos 3 meses" => Ok(Period::LastThreeMonths),
            "last year" | "último ano" | "ultimo ano" => Ok(Period::LastYear),
            "custom" | "personalizado" => Ok(Period::Custom { from: None, to: None }),
            _ => Err(UnknownPeriod(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    /// Expense magnitude
    pub total: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    /// First day of the month
    pub month: NaiveDate,
    /// Net signed amount
    pub total: Decimal,
}

impl MonthlyTotal {
    /// `YYYY-MM`
    pub fn label(&self) -> String {
        self.month.format("%Y-%m").to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyBalance {
    pub date: NaiveDate,
    /// Net amount on this day
    pub net: Decimal,
    /// Running total from the first day of the window
    pub cumulative: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub period: Period,
    pub date_from: Option<NaiveDate>,
    pub date_to: Option<NaiveDate>,
    pub total_income: Decimal,
    /// Magnitude of all negative amounts
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`
    pub balance: Decimal,
    pub transaction_count: usize,
    /// The [`TOP_CATEGORIES`] largest expense categories
    pub top_categories: Vec<CategoryTotal>,
    /// Every category with expenses, largest first
    pub expenses_by_category: Vec<CategoryTotal>,
    /// Net amount per calendar month, oldest first
    pub monthly_series: Vec<MonthlyTotal>,
}

/// Builds reports from a ledger's current contents.
pub struct ReportBuilder;

impl ReportBuilder {
    /// Report over `period`, or `None` when no record falls inside it.
    pub fn build<S: Store, C: Clock>(ledger: &Ledger<S, C>, period: &Period) -> Option<Report> {
        let (date_from, date_to) = period.bounds(ledger.today());
        let records = ledger.filter(&TransactionFilter::between(date_from, date_to));
        let report = Self::from_records(*period, date_from, date_to, &records);
        if report.is_none() {
            tracing::debug!("no transactions for {period} ({date_from:?}..{date_to:?})");
        }
        report
    }

    /// Summarize records that are already restricted to the period.
    pub fn from_records(
        period: Period,
        date_from: Option<NaiveDate>,
        date_to: Option<NaiveDate>,
        records: &[&TransactionRecord],
    ) -> Option<Report> {
        if records.is_empty() {
            return None;
        }

        let total_income = sum_amounts(
            records
                .iter()
                .filter(|r| r.amount > Decimal::ZERO)
                .map(|r| r.amount),
        );
        let total_expenses = sum_amounts(
            records
                .iter()
                .filter(|r| r.amount < Decimal::ZERO)
                .map(|r| r.amount.abs()),
        );

        let expenses_by_category = rank_expense_categories(records.iter().copied());
        let top_categories = expenses_by_category
            .iter()
            .take(TOP_CATEGORIES)
            .cloned()
            .collect();

        Some(Report {
            period,
            date_from,
            date_to,
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
            transaction_count: records.len(),
            top_categories,
            expenses_by_category,
            monthly_series: monthly_series(records.iter().copied()),
        })
    }

    /// Day-by-day net amounts and running balance over the last `days` days,
    /// today included.
    pub fn cashflow<S: Store, C: Clock>(ledger: &Ledger<S, C>, days: u64) -> Vec<DailyBalance> {
        let today = ledger.today();
        let filter = TransactionFilter::between(Some(today - Days::new(days)), Some(today));

        let mut per_day: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
        for record in ledger.filter(&filter) {
            let net = per_day.entry(record.date).or_insert(Decimal::ZERO);
            *net = add_amounts(*net, record.amount);
        }

        let mut cumulative = Decimal::ZERO;
        per_day
            .into_iter()
            .map(|(date, net)| {
                cumulative = add_amounts(cumulative, net);
                DailyBalance {
                    date,
                    net,
                    cumulative,
                }
            })
            .collect()
    }
}

/// Expense magnitude per category, largest first; equal totals are ordered
/// by category name.
pub fn rank_expense_categories<'a>(
    records: impl IntoIterator<Item = &'a TransactionRecord>,
) -> Vec<CategoryTotal> {
    let mut totals: HashMap<&str, Decimal> = HashMap::new();
    for record in records.into_iter().filter(|r| r.amount < Decimal::ZERO) {
        let total = totals.entry(record.category.as_str()).or_insert(Decimal::ZERO);
        *total = add_amounts(*total, record.amount.abs());
    }

    let mut ranked: Vec<CategoryTotal> = totals
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    ranked
}

/// Net signed amount per calendar month, oldest first.
pub fn monthly_series<'a>(
    records: impl IntoIterator<Item = &'a TransactionRecord>,
) -> Vec<MonthlyTotal> {
    let mut totals: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for record in records {
        let total = totals.entry(month_start(record.date)).or_insert(Decimal::ZERO);
        *total = add_amounts(*total, record.amount);
    }
    totals
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect()
}
