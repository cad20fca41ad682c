//! Normalization of decoded extraction output against the user's category set.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::types::{ExtractedTransaction, NormalizedTransaction, ReceiptAnalysis};

const OTHER: &str = "Other";

/// Ordered synonym table: the first target whose keywords hit decides.
/// Dining carries no bare "food" keyword; "Whole Foods" must reach Groceries.
const SYNONYMS: &[(&str, &[&str])] = &[
    (
        "Dining",
        &[
            "restaurant", "fast food", "cafe", "coffee", "bar", "deli", "pizza", "sushi",
            "burrito", "taco", "wing", "bbq",
        ],
    ),
    (
        "Groceries",
        &[
            "grocery", "grocer", "supermarket", "market", "whole foods", "trader joe", "aldi",
            "kroger", "safeway", "stop & shop", "wegmans", "publix", "costco", "fairway",
        ],
    ),
    (
        "Travel",
        &[
            "hotel", "airline", "flight", "delta", "united", "american airlines", "frontier",
            "jetblue", "airbnb", "resort", "motel", "car rental", "hertz", "avis", "budget",
        ],
    ),
    (
        "Transit",
        &[
            "uber", "lyft", "subway", "metro", "bus", "train", "amtrak", "ferry", "mta", "bart",
        ],
    ),
    ("Gas", &["shell", "exxon", "chevron", "bp", "mobil", "gas"]),
];

static ISO_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

fn find_allowed<'a, S: AsRef<str>>(allowed: &'a [S], name: &str) -> Option<&'a str> {
    let name = name.to_lowercase();
    allowed
        .iter()
        .map(AsRef::as_ref)
        .find(|a| a.to_lowercase() == name)
}

/// Map a free-text category onto one of `allowed`, in `allowed`'s casing.
///
/// A synonym hit whose target is missing from `allowed` ends the synonym
/// scan; later entries are not consulted.
pub fn normalize_category<S: AsRef<str>>(candidate: Option<&str>, allowed: &[S]) -> Option<String> {
    let candidate = candidate.filter(|c| !c.is_empty())?.trim();

    if let Some(exact) = find_allowed(allowed, candidate) {
        return Some(exact.to_string());
    }

    let lower = candidate.to_lowercase();
    if let Some((target, _)) = SYNONYMS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| lower.contains(k)))
    {
        if let Some(hit) = find_allowed(allowed, target) {
            tracing::debug!(candidate, category = hit, "category matched by synonym");
            return Some(hit.to_string());
        }
    }

    find_allowed(allowed, OTHER).map(str::to_string)
}

/// Strict `YYYY-MM-DD`; anything else, including impossible dates, is absent.
pub fn coerce_date(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?.trim();
    if !ISO_DATE_RE.is_match(raw) {
        return None;
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

/// A line dropped during normalization.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedLine {
    /// Position in the decoded payload.
    pub index: usize,
    pub merchant: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationReport {
    pub valid: Vec<NormalizedTransaction>,
    pub rejected: Vec<RejectedLine>,
}

fn normalize_one<S: AsRef<str>>(
    txn: &ExtractedTransaction,
    allowed: &[S],
) -> Result<NormalizedTransaction, String> {
    if !txn.amount.is_finite() || txn.amount <= 0.0 {
        return Err(format!("amount {} is not positive", txn.amount));
    }
    Ok(NormalizedTransaction {
        merchant: txn.merchant.clone(),
        amount: txn.amount,
        category: normalize_category(txn.category.as_deref(), allowed),
        date: coerce_date(txn.date.as_deref()),
        tags: txn.tags.clone(),
    })
}

/// Normalize every decoded line; one bad line never costs the good ones.
pub fn normalize_transactions<S: AsRef<str>>(
    transactions: &[ExtractedTransaction],
    allowed: &[S],
) -> NormalizationReport {
    let mut report = NormalizationReport::default();
    for (index, txn) in transactions.iter().enumerate() {
        match normalize_one(txn, allowed) {
            Ok(valid) => report.valid.push(valid),
            Err(reason) => {
                tracing::warn!(index, merchant = %txn.merchant, %reason, "rejecting transaction line");
                report.rejected.push(RejectedLine {
                    index,
                    merchant: txn.merchant.clone(),
                    reason,
                });
            }
        }
    }
    report
}

/// Normalize a single-receipt analysis: category mapped onto `allowed`,
/// non-positive totals dropped, blank merchant and card names cleared.
pub fn normalize_receipt<S: AsRef<str>>(analysis: &ReceiptAnalysis, allowed: &[S]) -> ReceiptAnalysis {
    let non_blank = |s: &Option<String>| {
        s.as_deref()
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };
    ReceiptAnalysis {
        merchant: non_blank(&analysis.merchant),
        total: analysis.total.filter(|t| t.is_finite() && *t > 0.0),
        category: normalize_category(analysis.category.as_deref(), allowed),
        recommended_card: non_blank(&analysis.recommended_card),
        tags: analysis.tags.clone(),
    }
}
