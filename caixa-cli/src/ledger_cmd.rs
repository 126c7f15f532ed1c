use anyhow::{Context, Result, bail};
use caixa_core::{Kind, NewTransaction, Origin, TransactionRecord};
use caixa_ingest::{ImportSummary, parse_ofx_file_with_fallback};
use caixa_ledger::TransactionFilter;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::io;
use std::path::Path;
use std::str::FromStr;

use crate::CliLedger;

/// How many records `summary` lists.
const RECENT_LIMIT: usize = 10;

pub fn money(amount: Decimal) -> String {
    format!("R$ {:.2}", amount)
}

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date {s:?} (expected YYYY-MM-DD)"))
}

pub fn import(ledger: &mut CliLedger, file: &Path, dry_run: bool) -> Result<()> {
    if !file.exists() {
        bail!("statement not found: {}", file.display());
    }

    let records = parse_ofx_file_with_fallback(file, ledger.today());
    let summary = ImportSummary::from_records(&records);
    if summary.is_empty() {
        println!("No transactions found in {}", file.display());
        return Ok(());
    }

    print_import_summary(&summary);

    if dry_run {
        println!("\nDry run: nothing stored.");
        return Ok(());
    }

    let added = ledger.add_all(records);
    tracing::info!(added, file = %file.display(), "statement imported");
    println!("\nImported {added} transactions. Ledger now holds {}.", ledger.transaction_count());
    Ok(())
}

fn print_import_summary(summary: &ImportSummary) {
    println!("Transactions: {}", summary.total_transactions);
    println!("Income:       {}", money(summary.total_income));
    println!("Expenses:     {}", money(summary.total_expenses));
    println!("Balance:      {}", money(summary.balance));
    println!();
    for (category, stats) in &summary.categories {
        println!("  {:<16} {:>4}  {}", category, stats.count, money(stats.total));
    }
}

pub struct AddArgs {
    pub date: Option<String>,
    pub description: String,
    pub amount: String,
    pub category: Option<String>,
}

pub fn add(ledger: &mut CliLedger, args: AddArgs) -> Result<()> {
    let date = match args.date.as_deref() {
        Some(s) => parse_date(s)?,
        None => ledger.today(),
    };
    let amount = Decimal::from_str(args.amount.trim()).with_context(|| format!("invalid amount {:?}", args.amount))?;

    let mut txn = NewTransaction::new(date, args.description, amount).with_origin(Origin::Manual);
    if let Some(category) = args.category {
        txn = txn.with_category(category);
    }

    let record = ledger.add(txn);
    println!(
        "Added {} {} {} [{}]",
        record.date,
        record.description,
        money(record.amount),
        record.category
    );
    Ok(())
}

pub struct ListArgs {
    pub from: Option<String>,
    pub to: Option<String>,
    pub category: Option<String>,
    pub kind: Option<String>,
    pub limit: Option<usize>,
    pub csv: bool,
}

pub fn list(ledger: &CliLedger, args: ListArgs) -> Result<()> {
    let from = args.from.as_deref().map(parse_date).transpose()?;
    let to = args.to.as_deref().map(parse_date).transpose()?;

    let mut filter = TransactionFilter::between(from, to);
    if let Some(category) = args.category {
        filter = filter.category(category);
    }
    if let Some(kind) = args.kind.as_deref() {
        filter = filter.kind(kind.parse::<Kind>()?);
    }

    let mut records = ledger.filter(&filter);
    if let Some(limit) = args.limit {
        records.truncate(limit);
    }

    if args.csv {
        return write_csv(&records);
    }

    if records.is_empty() {
        println!("No transactions.");
        return Ok(());
    }
    print_records(&records);
    Ok(())
}

fn print_records(records: &[&TransactionRecord]) {
    for r in records {
        println!(
            "{}  {:>14}  {:<14} {:<8} {}",
            r.date,
            money(r.amount),
            r.category,
            r.kind().as_str(),
            r.description
        );
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    date: NaiveDate,
    description: &'a str,
    amount: String,
    category: &'a str,
    kind: &'static str,
    origin: Origin,
}

fn write_csv(records: &[&TransactionRecord]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(io::stdout());
    for r in records {
        wtr.serialize(CsvRow {
            date: r.date,
            description: &r.description,
            amount: format!("{:.2}", r.amount),
            category: &r.category,
            kind: r.kind().as_str(),
            origin: r.origin,
        })
        .context("write csv row")?;
    }
    wtr.flush().context("flush csv")?;
    Ok(())
}

pub fn summary(ledger: &CliLedger) -> Result<()> {
    println!("Today:               {}", ledger.today());
    println!("Current balance:     {}", money(ledger.current_balance()));
    println!("Change this month:   {}", money(ledger.balance_change_this_month()));
    println!("Income this month:   {}", money(ledger.monthly_income()));
    println!("Expenses this month: {}", money(ledger.monthly_expenses()));
    println!("Transactions:        {}", ledger.transaction_count());

    let recent = ledger.recent_transactions(RECENT_LIMIT);
    if !recent.is_empty() {
        println!("\nRecent:");
        print_records(&recent);
    }
    Ok(())
}

pub fn clear(ledger: &mut CliLedger, yes: bool) -> Result<()> {
    if !yes {
        bail!(
            "refusing to delete {} transactions without --yes",
            ledger.transaction_count()
        );
    }
    let count = ledger.transaction_count();
    ledger.clear();
    println!("Removed {count} transactions.");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-05").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap()
        );
        assert!(parse_date("05/03/2024").is_err());
    }

    #[test]
    fn test_money_format() {
        assert_eq!(money(Decimal::from_str("-45.9").unwrap()), "R$ -45.90");
        assert_eq!(money(Decimal::ZERO), "R$ 0.00");
    }

    #[test]
    fn test_import_dates_undated_blocks_with_ledger_today() {
        let dir = tempfile::tempdir().unwrap();
        let statement = dir.path().join("stmt.ofx");
        std::fs::write(
            &statement,
            "<STMTTRN><TRNAMT>-12.00</TRNAMT><MEMO>PADARIA</MEMO></STMTTRN>",
        )
        .unwrap();

        let clock = caixa_core::SystemClock::new("Pacific/Kiritimati").unwrap();
        let mut ledger = CliLedger::open(caixa_ledger::JsonFileStore::new(dir.path().join("data")), clock);
        import(&mut ledger, &statement, false).unwrap();

        assert_eq!(ledger.transaction_count(), 1);
        assert_eq!(ledger.records()[0].date, ledger.today());
    }
}
