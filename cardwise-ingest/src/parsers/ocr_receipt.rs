//! Heuristics over raw OCR text from a receipt photo.
//!
//! OCR output has no structure guaranteed. Receipts usually print the header
//! (store name) first and the grand total last, so:
//! - amount: prefer the last number on the last line mentioning "total",
//!   otherwise the last number anywhere
//! - merchant: the first line carrying neither a date nor a number

use once_cell::sync::Lazy;
use regex::Regex;

static NUMBER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$?\s*([0-9]+(?:\.[0-9]{1,2})?)").expect("valid number regex")
});
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9]{1,2}/[0-9]{1,2}").expect("valid date regex"));

const MIN_MERCHANT_CHARS: usize = 3;

fn last_number(text: &str) -> Option<f64> {
    NUMBER_RE
        .captures_iter(text)
        .last()
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Best guess at the amount paid.
pub fn guess_amount(ocr_text: &str) -> Option<f64> {
    let lower = ocr_text.to_lowercase();
    let from_total_line = lower
        .lines()
        .filter(|line| line.contains("total"))
        .filter_map(last_number)
        .last();
    from_total_line.or_else(|| last_number(&lower))
}

/// Best guess at the store name.
pub fn guess_merchant(ocr_text: &str) -> Option<String> {
    ocr_text
        .lines()
        .filter(|line| !DATE_RE.is_match(line) && !NUMBER_RE.is_match(line))
        .map(str::trim)
        .find(|line| line.chars().count() >= MIN_MERCHANT_CHARS)
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECEIPT: &str = r#"
  TRADER JOE'S
  #552 Brooklyn NY
  08/07/2025 14:22
  BANANAS              0.99
  GREEK YOGURT         5.49
  SUBTOTAL             6.48
  TAX                  0.00
  TOTAL               $6.48
  VISA              XXXX1234
  THANK YOU
"#;

    #[test]
    fn test_guess_amount_prefers_total_line() {
        assert_eq!(guess_amount(RECEIPT), Some(6.48));
    }

    #[test]
    fn test_guess_amount_falls_back_to_last_number() {
        assert_eq!(guess_amount("coffee 4.50\nmuffin 3.25"), Some(3.25));
        assert_eq!(guess_amount("no digits here"), None);
    }

    #[test]
    fn test_guess_merchant_skips_numeric_lines() {
        assert_eq!(guess_merchant(RECEIPT).as_deref(), Some("TRADER JOE'S"));
        assert_eq!(
            guess_merchant("12/01\n$4.00\nab\n  Blue Bottle  \n").as_deref(),
            Some("Blue Bottle")
        );
        assert_eq!(guess_merchant("1\n2\n"), None);
    }
}
