//! caixa-ingest: statement parsing and import statistics

pub mod parsers;
pub mod summary;
pub mod types;

pub use parsers::ofx::{
    block_to_record, extract_blocks, parse_ofx_file, parse_ofx_file_with_fallback, parse_ofx_text,
    parse_ofx_text_with_fallback,
};
pub use summary::{CategoryStats, ImportSummary};
pub use types::StatementBlock;
