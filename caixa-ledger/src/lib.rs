//! caixa-ledger: transaction ledger, persistence collaborators and reports

pub mod ledger;
pub mod report;
pub mod snapshot;
pub mod store;

pub use ledger::{Ledger, TransactionFilter};
pub use report::{
    CategoryTotal, DailyBalance, MonthlyTotal, Period, Report, ReportBuilder, UnknownPeriod,
    monthly_series, rank_expense_categories,
};
pub use snapshot::Snapshot;
pub use store::{JsonFileStore, MemoryStore, Store, StoreError};
