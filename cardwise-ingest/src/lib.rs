//! cardwise-ingest: quick-add and OCR parsers, tolerant decoding and
//! normalization of extraction-service payloads.

pub mod normalize;
pub mod parsers;
pub mod payload;
pub mod types;

pub use normalize::{
    coerce_date, normalize_category, normalize_receipt, normalize_transactions,
    NormalizationReport, RejectedLine,
};
pub use parsers::{guess_amount, guess_merchant, parse_purchase_text};
pub use payload::{decode_receipt, decode_transactions, extract_first_json};
pub use types::{
    ExtractedTransaction, NormalizedTransaction, ParsedPurchase, ReceiptAnalysis, UNKNOWN_MERCHANT,
};
