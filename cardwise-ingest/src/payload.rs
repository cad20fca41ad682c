//! Tolerant decoding of extraction-service payloads.
//!
//! Providers disagree on field names (`amount` vs `total`), send numbers as
//! strings, send a single tag instead of a list, and wrap JSON in markdown
//! fences. Nothing here fails: every field is tried through an ordered list
//! of extractors and degrades to a default when none succeeds.

use serde_json::{Map, Value};

use crate::types::{ExtractedTransaction, ReceiptAnalysis, UNKNOWN_MERCHANT};

type Object = Map<String, Value>;
type Extractor = fn(&Object, &str) -> Option<f64>;

/// Pull the first balanced JSON object or array out of model output,
/// whichever opens first. Markdown code fences and surrounding prose are dropped.
pub fn extract_first_json(content: &str) -> &str {
    let mut text = content.trim();
    if let Some(after) = text.strip_prefix("```") {
        if let Some(end) = after.find("```") {
            text = after[..end].trim();
            // Drop a language hint such as ```json
            if let Some(rest) = text.strip_prefix("json") {
                text = rest.trim_start();
            }
        }
    }
    let array_first = match (text.find('['), text.find('{')) {
        (Some(arr), Some(obj)) => arr < obj,
        (Some(_), None) => true,
        _ => false,
    };
    let (first, second) = if array_first {
        (('[', ']'), ('{', '}'))
    } else {
        (('{', '}'), ('[', ']'))
    };
    balanced(text, first.0, first.1)
        .or_else(|| balanced(text, second.0, second.1))
        .unwrap_or(text)
}

fn balanced(text: &str, open: char, close: char) -> Option<&str> {
    let start = text.find(open)?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        if ch == '"' {
            in_string = true;
        } else if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                let end = start + offset + ch.len_utf8();
                return Some(&text[start..end]);
            }
        }
    }
    None
}

fn parse_value(content: &str) -> Option<Value> {
    let json = extract_first_json(content);
    match serde_json::from_str(json) {
        Ok(value) => Some(value),
        Err(err) => {
            tracing::warn!(error = %err, "extraction payload is not valid JSON");
            None
        }
    }
}

/// Keep only digits, `.` and `-`, then parse.
fn numeric_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn number_field(obj: &Object, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

fn numeric_string_field(obj: &Object, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_str).and_then(numeric_text)
}

/// Amount under `primary`, else `alternate`: numbers first, then numeric strings.
pub fn coerce_amount(obj: &Object, primary: &str, alternate: &str) -> Option<f64> {
    let extractors: [(Extractor, &str); 4] = [
        (number_field, primary),
        (number_field, alternate),
        (numeric_string_field, primary),
        (numeric_string_field, alternate),
    ];
    extractors
        .iter()
        .find_map(|(extract, key)| extract(obj, key))
}

/// A list of strings, or a single string wrapped into a list. Anything else is empty.
pub fn coerce_tags(obj: &Object) -> Vec<String> {
    match obj.get("tags") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::to_string)
            .collect(),
        Some(Value::String(single)) => vec![single.clone()],
        _ => Vec::new(),
    }
}

fn string_field(obj: &Object, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn merchant_field(obj: &Object) -> String {
    string_field(obj, "merchant")
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| UNKNOWN_MERCHANT.to_string())
}

/// Decode one statement line. Missing or unparseable amounts become `0.0`.
pub fn decode_transaction(obj: &Object) -> ExtractedTransaction {
    ExtractedTransaction {
        merchant: merchant_field(obj),
        amount: coerce_amount(obj, "amount", "total").unwrap_or(0.0),
        category: string_field(obj, "category"),
        date: string_field(obj, "date"),
        tags: coerce_tags(obj),
    }
}

/// Decode a multi-transaction payload: `{"transactions": [...]}`, else a bare array.
pub fn decode_transactions(content: &str) -> Vec<ExtractedTransaction> {
    let Some(value) = parse_value(content) else {
        return Vec::new();
    };

    let lines = match &value {
        Value::Object(obj) => match obj.get("transactions") {
            Some(Value::Array(items)) => items,
            _ => {
                tracing::warn!("payload object has no transactions array");
                return Vec::new();
            }
        },
        Value::Array(items) => items,
        _ => {
            tracing::warn!("payload is neither an object nor an array");
            return Vec::new();
        }
    };

    lines
        .iter()
        .filter_map(|line| match line {
            Value::Object(obj) => Some(decode_transaction(obj)),
            other => {
                tracing::warn!(line = %other, "skipping non-object transaction line");
                None
            }
        })
        .collect()
}

/// Decode a single-receipt analysis. Non-JSON content yields an empty analysis.
pub fn decode_receipt(content: &str) -> ReceiptAnalysis {
    let Some(Value::Object(obj)) = parse_value(content) else {
        return ReceiptAnalysis::default();
    };
    ReceiptAnalysis {
        merchant: string_field(&obj, "merchant"),
        total: coerce_amount(&obj, "total", "amount"),
        category: string_field(&obj, "category"),
        recommended_card: string_field(&obj, "recommended_card"),
        tags: coerce_tags(&obj),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Object {
        match value {
            Value::Object(o) => o,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_extract_first_json_strips_fences_and_prose() {
        assert_eq!(extract_first_json("```json\n{\"a\": 1}\n```"), "{\"a\": 1}");
        assert_eq!(extract_first_json("Here you go: {\"a\": {\"b\": 2}} thanks"), "{\"a\": {\"b\": 2}}");
        assert_eq!(extract_first_json("[1, [2]] trailing"), "[1, [2]]");
        assert_eq!(extract_first_json("{\"m\": \"a}b\"}"), "{\"m\": \"a}b\"}");
        assert_eq!(extract_first_json("nothing"), "nothing");
        assert_eq!(extract_first_json("[{\"a\": 1}, {\"a\": 2}]"), "[{\"a\": 1}, {\"a\": 2}]");
        assert_eq!(extract_first_json("Result: {\"xs\": [1]}"), "{\"xs\": [1]}");
        assert_eq!(extract_first_json("```json\n[{\"a\": 1}]\n```"), "[{\"a\": 1}]");
    }

    #[test]
    fn test_bare_array_keeps_every_line() {
        let payload = r#"[{"merchant":"Lyft","amount":18.2},{"merchant":"Kroger","amount":52.1}]"#;
        let txns = decode_transactions(payload);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].merchant, "Lyft");
        assert_eq!(txns[1].merchant, "Kroger");
        assert_eq!(txns[1].amount, 52.1);
    }

    #[test]
    fn test_amount_extractor_order() {
        assert_eq!(coerce_amount(&obj(json!({"amount": 5.5, "total": 9})), "amount", "total"), Some(5.5));
        assert_eq!(coerce_amount(&obj(json!({"total": 9})), "amount", "total"), Some(9.0));
        // A numeric alternate beats a textual primary.
        assert_eq!(coerce_amount(&obj(json!({"amount": "$3", "total": 7})), "amount", "total"), Some(7.0));
        assert_eq!(coerce_amount(&obj(json!({"amount": "$1,204.10"})), "amount", "total"), Some(1204.1));
        assert_eq!(coerce_amount(&obj(json!({"total": "USD 12"})), "amount", "total"), Some(12.0));
        assert_eq!(coerce_amount(&obj(json!({"amount": "n/a"})), "amount", "total"), None);
        assert_eq!(coerce_amount(&obj(json!({})), "amount", "total"), None);
    }

    #[test]
    fn test_tags_scalar_or_list() {
        assert_eq!(coerce_tags(&obj(json!({"tags": ["work", "travel"]}))), vec!["work", "travel"]);
        assert_eq!(coerce_tags(&obj(json!({"tags": "work"}))), vec!["work"]);
        assert!(coerce_tags(&obj(json!({"tags": null}))).is_empty());
        assert!(coerce_tags(&obj(json!({}))).is_empty());
    }

    #[test]
    fn test_decode_transactions_wrapper_and_bare_array() {
        let wrapped = r#"{"transactions": [{"merchant": "Shell", "amount": 40, "category": "gas"}]}"#;
        let txns = decode_transactions(wrapped);
        assert_eq!(txns.len(), 1);
        assert_eq!(txns[0].merchant, "Shell");
        assert_eq!(txns[0].amount, 40.0);
        assert_eq!(txns[0].category.as_deref(), Some("gas"));

        let bare = r#"[{"merchant": "Lyft", "total": "18.20", "date": "2025-08-07", "tags": "work"}]"#;
        let txns = decode_transactions(bare);
        assert_eq!(txns[0].amount, 18.2);
        assert_eq!(txns[0].date.as_deref(), Some("2025-08-07"));
        assert_eq!(txns[0].tags, vec!["work"]);
    }

    #[test]
    fn test_decode_transactions_degrades() {
        assert!(decode_transactions("not json at all").is_empty());
        assert!(decode_transactions(r#"{"items": []}"#).is_empty());

        let mixed = r#"{"transactions": [42, {"amount": "abc"}, {"merchant": "  ", "amount": 3}]}"#;
        let txns = decode_transactions(mixed);
        assert_eq!(txns.len(), 2);
        assert_eq!(txns[0].merchant, UNKNOWN_MERCHANT);
        assert_eq!(txns[0].amount, 0.0);
        assert_eq!(txns[1].merchant, UNKNOWN_MERCHANT);
        assert_eq!(txns[1].amount, 3.0);
    }

    #[test]
    fn test_decode_receipt() {
        let content = "```json\n{\"merchant\": \"Olive Garden\", \"total\": \"60.00\", \"category\": \"restaurant\", \"recommended_card\": \"Savor Max\", \"tags\": [\"family\"]}\n```";
        let receipt = decode_receipt(content);
        assert_eq!(receipt.merchant.as_deref(), Some("Olive Garden"));
        assert_eq!(receipt.total, Some(60.0));
        assert_eq!(receipt.category.as_deref(), Some("restaurant"));
        assert_eq!(receipt.recommended_card.as_deref(), Some("Savor Max"));
        assert_eq!(receipt.tags, vec!["family"]);

        assert_eq!(decode_receipt("[1,2]"), ReceiptAnalysis::default());
        assert_eq!(decode_receipt(""), ReceiptAnalysis::default());
    }
}
