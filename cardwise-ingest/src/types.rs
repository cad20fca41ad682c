use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Merchant used when an extraction carries no usable merchant name.
pub const UNKNOWN_MERCHANT: &str = "Unknown";

/// One line item as reported by the extraction service. Untrusted: the
/// category is free text and the amount may be zero when nothing parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedTransaction {
    pub merchant: String,
    pub amount: f64,
    pub category: Option<String>,
    /// Raw date text as sent; see [`crate::normalize::coerce_date`].
    pub date: Option<String>,
    pub tags: Vec<String>,
}

/// Single-receipt analysis as reported by the extraction service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReceiptAnalysis {
    pub merchant: Option<String>,
    pub total: Option<f64>,
    pub category: Option<String>,
    pub recommended_card: Option<String>,
    pub tags: Vec<String>,
}

/// A line item that passed normalization: positive amount, category from
/// the allowed set (or unresolved), strict calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub merchant: String,
    pub amount: f64,
    pub category: Option<String>,
    pub date: Option<NaiveDate>,
    pub tags: Vec<String>,
}

/// Result of a tentative parse of one free-text purchase description.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParsedPurchase {
    pub merchant: Option<String>,
    pub amount: Option<f64>,
    pub notes: Option<String>,
}
