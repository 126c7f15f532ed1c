use anyhow::{Context, Result};
use caixa_ledger::{Period, Report, ReportBuilder};

use crate::CliLedger;
use crate::ledger_cmd::{money, parse_date};

pub struct ReportArgs {
    pub period: String,
    pub from: Option<String>,
    pub to: Option<String>,
    pub json: bool,
}

pub fn run(ledger: &CliLedger, args: ReportArgs) -> Result<()> {
    let from = args.from.as_deref().map(parse_date).transpose()?;
    let to = args.to.as_deref().map(parse_date).transpose()?;
    let period = Period::parse(&args.period, from, to)?;

    let Some(report) = ReportBuilder::build(ledger, &period) else {
        println!("No transactions for {period}.");
        return Ok(());
    };

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        print_report(&report);
    }
    Ok(())
}

fn print_report(report: &Report) {
    let bound = |d: Option<chrono::NaiveDate>| d.map_or_else(|| "open".to_string(), |d| d.to_string());
    println!(
        "# {} ({} to {})\n",
        report.period,
        bound(report.date_from),
        bound(report.date_to)
    );
    println!("Transactions: {}", report.transaction_count);
    println!("Income:       {}", money(report.total_income));
    println!("Expenses:     {}", money(report.total_expenses));
    println!("Balance:      {}", money(report.balance));

    println!("\n## Top categories\n");
    for c in &report.top_categories {
        println!("  {:<16} {}", c.category, money(c.total));
    }

    println!("\n## Monthly\n");
    for m in &report.monthly_series {
        println!("  {}  {}", m.label(), money(m.total));
    }
}
