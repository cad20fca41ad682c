//! Quick-add parser for one-line purchase descriptions.
//!
//! Expected shape (everything optional):
//!   $60 at Olive Garden for dinner
//!   ^amount ^merchant (3 words) ^notes
//!
//! The amount is the FIRST number in the text. OCR receipts use the opposite
//! policy (see `ocr_receipt`); the two must stay separate.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::ParsedPurchase;

static AMOUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$?(\d+(?:\.\d{2})?)").expect("valid amount regex"));
static AT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) at ").expect("valid at regex"));
static FOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i) for ").expect("valid for regex"));

const MERCHANT_WORDS: usize = 3;

/// Tentatively extract amount, merchant and notes. Blank input yields an all-`None` result.
pub fn parse_purchase_text(text: &str) -> ParsedPurchase {
    if text.trim().is_empty() {
        return ParsedPurchase::default();
    }

    ParsedPurchase {
        merchant: parse_merchant(text),
        amount: parse_amount(text),
        notes: parse_notes(text),
    }
}

fn parse_amount(text: &str) -> Option<f64> {
    AMOUNT_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

fn parse_merchant(text: &str) -> Option<String> {
    let merchant = match AT_RE.find(text) {
        Some(at) => {
            text[at.end()..]
                .split_whitespace()
                .take(MERCHANT_WORDS)
                .collect::<Vec<_>>()
                .join(" ")
        }
        None => text.split_whitespace().next().unwrap_or_default().to_string(),
    };
    if merchant.is_empty() { None } else { Some(merchant) }
}

fn parse_notes(text: &str) -> Option<String> {
    let f = FOR_RE.find(text)?;
    let notes = text[f.end()..].trim();
    if notes.is_empty() {
        None
    } else {
        Some(notes.to_string())
    }
}
