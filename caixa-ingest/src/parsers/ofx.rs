//! OFX statement parser (text)
//!
//! Transactions live in `<STMTTRN>...</STMTTRN>` containers:
//!   <STMTTRN>
//!     <TRNTYPE>DEBIT</TRNTYPE>
//!     <DTPOSTED>20240115103000[-3:EST]</DTPOSTED>
//!     <TRNAMT>-45.90</TRNAMT>
//!     <MEMO>SUPERMERCADO BOM PRECO</MEMO>
//!   </STMTTRN>
//!
//! Leaf tags may also appear unclosed (SGML-style OFX 1.x), in which case the
//! value runs to the next `<` or end of line.
//!
//! Parsing never fails: bad sub-fields fall back to defaults and an unreadable
//! file gives an empty result.

use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use caixa_core::{Origin, TransactionRecord, classify_builtin};
use chrono::{Local, NaiveDate, NaiveTime};
use regex::Regex;
use rust_decimal::Decimal;

use crate::types::StatementBlock;

struct TagPattern {
    paired: Regex,
    open_only: Regex,
}

impl TagPattern {
    fn new(tag: &str) -> Result<Self> {
        Ok(Self {
            paired: Regex::new(&format!(r"(?s)<{tag}>(.*?)</{tag}>"))?,
            open_only: Regex::new(&format!(r"<{tag}>([^<\r\n]*)"))?,
        })
    }

    fn extract(&self, block: &str) -> Option<String> {
        self.paired
            .captures(block)
            .or_else(|| self.open_only.captures(block))
            .map(|caps| caps[1].trim().to_string())
    }
}

/// Split statement text into raw transaction blocks, in order of appearance.
pub fn extract_blocks(text: &str) -> Result<Vec<StatementBlock>> {
    let container_re = Regex::new(r"(?s)<STMTTRN>(.*?)</STMTTRN>")?;
    let trn_type = TagPattern::new("TRNTYPE")?;
    let posted = TagPattern::new("DTPOSTED")?;
    let amount = TagPattern::new("TRNAMT")?;
    let memo = TagPattern::new("MEMO")?;

    Ok(container_re
        .captures_iter(text)
        .map(|caps| {
            let body = &caps[1];
            StatementBlock {
                trn_type: trn_type.extract(body),
                posted: posted.extract(body),
                amount: amount.extract(body),
                memo: memo.extract(body),
            }
        })
        .collect())
}

/// Parse statement text; undated or badly dated blocks get today's local date.
pub fn parse_ofx_text(text: &str) -> Vec<TransactionRecord> {
    parse_ofx_text_with_fallback(text, Local::now().date_naive())
}

/// Parse statement text, using `fallback_date` for blocks whose posted date
/// is missing or unparseable.
pub fn parse_ofx_text_with_fallback(text: &str, fallback_date: NaiveDate) -> Vec<TransactionRecord> {
    match extract_blocks(text) {
        Ok(blocks) => {
            let records: Vec<_> = blocks
                .iter()
                .map(|block| block_to_record(block, fallback_date))
                .collect();
            tracing::debug!("parsed {} transactions from statement", records.len());
            records
        }
        Err(e) => {
            tracing::warn!("could not scan statement text: {e:#}");
            Vec::new()
        }
    }
}

/// Read and parse a statement file. Read failures are logged and yield no
/// transactions.
pub fn parse_ofx_file(path: impl AsRef<Path>) -> Vec<TransactionRecord> {
    parse_ofx_file_with_fallback(path, Local::now().date_naive())
}

/// [`parse_ofx_file`] with an explicit date for undated blocks.
pub fn parse_ofx_file_with_fallback(
    path: impl AsRef<Path>,
    fallback_date: NaiveDate,
) -> Vec<TransactionRecord> {
    match read_statement(path.as_ref()) {
        Ok(text) => parse_ofx_text_with_fallback(&text, fallback_date),
        Err(e) => {
            tracing::warn!("could not read statement: {e:#}");
            Vec::new()
        }
    }
}

fn read_statement(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Normalize one raw block into a record categorized by the built-in
/// taxonomy.
pub fn block_to_record(block: &StatementBlock, fallback_date: NaiveDate) -> TransactionRecord {
    let date = match block.posted.as_deref().and_then(parse_posted_date) {
        Some(d) => d,
        None => {
            tracing::debug!(
                posted = ?block.posted,
                "unparseable DTPOSTED, using {fallback_date}"
            );
            fallback_date
        }
    };

    let amount = block
        .amount
        .as_deref()
        .and_then(|raw| Decimal::from_str(raw).ok())
        .unwrap_or(Decimal::ZERO);

    let memo = block.memo.as_deref().unwrap_or("");
    let category = classify_builtin(memo);

    tracing::debug!(
        trn_type = block.trn_type.as_deref().unwrap_or(""),
        %date,
        %amount,
        category,
        "statement transaction"
    );

    TransactionRecord::new(date, memo, amount, category, Origin::Imported)
}

/// `YYYYMMDDhhmmss` with an optional bracketed timezone suffix, e.g.
/// `20240115103000[-3:EST]`. The suffix is dropped and so is the time.
fn parse_posted_date(raw: &str) -> Option<NaiveDate> {
    let zone_re = Regex::new(r"\[[^\]]*\]").ok()?;
    let s = zone_re.replace_all(raw, "");
    let s = s.trim();
    if s.len() != 14 || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let num = |from: usize, to: usize| s[from..to].parse::<u32>().ok();
    let year: i32 = s[0..4].parse().ok()?;
    let date = NaiveDate::from_ymd_opt(year, num(4, 6)?, num(6, 8)?)?;
    // A bad time-of-day rejects the whole timestamp.
    NaiveTime::from_hms_opt(num(8, 10)?, num(10, 12)?, num(12, 14)?)?;
    Some(date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caixa_core::{Kind, NO_DESCRIPTION, OTHER, category};
    use std::io::Write;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn money(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn fallback() -> NaiveDate {
        date(2030, 6, 1)
    }

    #[test]
    fn test_parse_debit_block() {
        let text = r#"
<OFX><BANKTRANLIST>
<STMTTRN>
<TRNTYPE>DEBIT</TRNTYPE>
<DTPOSTED>20240115103000[-3:EST]</DTPOSTED>
<TRNAMT>-45.90</TRNAMT>
<MEMO>SUPERMERCADO BOM PRECO</MEMO>
</STMTTRN>
</BANKTRANLIST></OFX>
"#;
        let txns = parse_ofx_text_with_fallback(text, fallback());
        assert_eq!(txns.len(), 1);
        let t = &txns[0];
        assert_eq!(t.date, date(2024, 1, 15));
        assert_eq!(t.amount, money("-45.90"));
        assert_eq!(t.kind(), Kind::Expense);
        assert_eq!(t.category, category::FOOD);
        assert_eq!(t.description, "SUPERMERCADO BOM PRECO");
        assert_eq!(t.origin, Origin::Imported);
    }

    #[test]
    fn test_empty_memo_credit() {
        let text = "<STMTTRN><TRNTYPE>CREDIT</TRNTYPE><DTPOSTED>20240201090000</DTPOSTED>\
                    <TRNAMT>120.00</TRNAMT><MEMO></MEMO></STMTTRN>";
        let txns = parse_ofx_text_with_fallback(text, fallback());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].category, OTHER);
        assert_eq!(txns[0].description, NO_DESCRIPTION);
        assert_eq!(txns[0].kind(), Kind::Income);
        assert_eq!(txns[0].date, date(2024, 2, 1));
    }

    #[test]
    fn test_missing_subfields_use_defaults() {
        let text = "<STMTTRN><TRNTYPE>OTHER</TRNTYPE></STMTTRN>";
        let txns = parse_ofx_text_with_fallback(text, fallback());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, fallback());
        assert_eq!(txns[0].amount, Decimal::ZERO);
        // Zero is an expense
        assert_eq!(txns[0].kind(), Kind::Expense);
        assert_eq!(txns[0].description, NO_DESCRIPTION);
    }

    #[test]
    fn test_bad_date_and_amount_fall_back() {
        let text = "<STMTTRN><DTPOSTED>2024-01-15</DTPOSTED><TRNAMT>abc</TRNAMT>\
                    <MEMO>UBER TRIP</MEMO></STMTTRN>\
                    <STMTTRN><DTPOSTED>20240230120000</DTPOSTED><TRNAMT>-1</TRNAMT>\
                    <MEMO>X</MEMO></STMTTRN>";
        let txns = parse_ofx_text_with_fallback(text, fallback());
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].date, fallback());
        assert_eq!(txns[0].amount, Decimal::ZERO);
        assert_eq!(txns[0].category, category::TRANSPORT);
        // Feb 30 does not exist
        assert_eq!(txns[1].date, fallback());
    }

    #[test]
    fn test_invalid_time_of_day_rejects_date() {
        assert_eq!(parse_posted_date("20240115250000"), None);
        assert_eq!(parse_posted_date("20240115235959[0:GMT]"), Some(date(2024, 1, 15)));
        assert_eq!(parse_posted_date("20240115"), None);
    }

    #[test]
    fn test_blocks_keep_order() {
        let text = "<STMTTRN><DTPOSTED>20240310000000</DTPOSTED><TRNAMT>-10</TRNAMT><MEMO>PADARIA</MEMO></STMTTRN>\
                    <STMTTRN><DTPOSTED>20240101000000</DTPOSTED><TRNAMT>2500</TRNAMT><MEMO>SALARIO</MEMO></STMTTRN>\
                    <STMTTRN><DTPOSTED>20240205000000</DTPOSTED><TRNAMT>-30</TRNAMT><MEMO>FARMÁCIA SAO JOAO</MEMO></STMTTRN>";
        let txns = parse_ofx_text_with_fallback(text, fallback());
        let descs: Vec<&str> = txns.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["PADARIA", "SALARIO", "FARMÁCIA SAO JOAO"]);
        assert_eq!(txns[2].category, category::HEALTH);
    }

    #[test]
    fn test_unclosed_sgml_tags() {
        let text = "<STMTTRN>\n<TRNTYPE>DEBIT\n<DTPOSTED>20240115103000[-3:BRT]\n<TRNAMT>-89.90\n<MEMO>NETFLIX.COM\n</STMTTRN>";
        let blocks = extract_blocks(text).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].trn_type.as_deref(), Some("DEBIT"));
        assert_eq!(blocks[0].memo.as_deref(), Some("NETFLIX.COM"));

        let txns = parse_ofx_text_with_fallback(text, fallback());
        assert_eq!(txns[0].amount, money("-89.90"));
        assert_eq!(txns[0].category, category::SERVICES);
        assert_eq!(txns[0].date, date(2024, 1, 15));
    }

    #[test]
    fn test_no_transactions() {
        assert!(parse_ofx_text_with_fallback("", fallback()).is_empty());
        assert!(parse_ofx_text_with_fallback("not a statement at all", fallback()).is_empty());
        // Unterminated container is not a match
        assert!(parse_ofx_text_with_fallback("<STMTTRN><TRNAMT>5</TRNAMT>", fallback()).is_empty());
    }

    #[test]
    fn test_output_never_exceeds_container_count() {
        let text = "<STMTTRN></STMTTRN><STMTTRN><TRNAMT>1</TRNAMT></STMTTRN><STMTTRN>";
        let containers = text.matches("</STMTTRN>").count();
        assert!(parse_ofx_text_with_fallback(text, fallback()).len() <= containers);
    }

    #[test]
    fn test_parse_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "<STMTTRN><DTPOSTED>20240115103000</DTPOSTED><TRNAMT>-5.50</TRNAMT><MEMO>PADARIA</MEMO></STMTTRN>"
        )
        .unwrap();
        let txns = parse_ofx_file(file.path());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].amount, money("-5.50"));
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(parse_ofx_file(dir.path().join("nope.ofx")).is_empty());
    }

    #[test]
    fn test_posted_date_zone_suffix() {
        assert_eq!(parse_posted_date("20240115103000[-3:EST]"), Some(date(2024, 1, 15)));
        assert_eq!(parse_posted_date("20240115103000[-3]  "), Some(date(2024, 1, 15)));
        // An unterminated suffix is left in place, so the stamp is rejected
        assert_eq!(parse_posted_date("20240115103000[-3"), None);
    }

    #[test]
    fn test_parse_file_with_fallback_date() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            "<STMTTRN><DTPOSTED>garbage</DTPOSTED><TRNAMT>-5.50</TRNAMT><MEMO>PADARIA</MEMO></STMTTRN>"
        )
        .unwrap();
        let txns = parse_ofx_file_with_fallback(file.path(), fallback());
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].date, fallback());
    }
}
