use serde::{Deserialize, Serialize};

/// Raw sub-fields of one `<STMTTRN>` block, before normalization.
///
/// A missing tag is `None`; values are trimmed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementBlock {
    /// `TRNTYPE`, e.g. DEBIT, CREDIT, PAYMENT
    pub trn_type: Option<String>,
    /// `DTPOSTED`, `YYYYMMDDhhmmss` with an optional `[offset:TZ]` suffix
    pub posted: Option<String>,
    /// `TRNAMT`, signed decimal
    pub amount: Option<String>,
    /// `MEMO`, free text
    pub memo: Option<String>,
}
