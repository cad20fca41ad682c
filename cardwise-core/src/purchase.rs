//! Purchase records and the drafts they are built from.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Merchant recorded when a purchase is saved without one.
pub const UNKNOWN_MERCHANT: &str = "Unknown";

/// Parse user- or model-supplied amount text, keeping only digits, `.` and `-`.
///
/// `"$1,234.50"` → `Some(1234.5)`; text with nothing numeric → `None`.
pub fn parse_amount_text(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// A persisted purchase.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Purchase {
    pub id: Uuid,
    pub date: NaiveDate,
    pub merchant: String,
    /// Always > 0 for purchases built through [`PurchaseDraft::finalize`].
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
    #[serde(default)]
    pub tag_ids: Vec<Uuid>,
}

impl Purchase {
    pub fn new(
        date: NaiveDate,
        merchant: impl Into<String>,
        amount: f64,
        category_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            merchant: merchant.into(),
            amount,
            category_id,
            notes: None,
            ocr_text: None,
            tag_ids: Vec::new(),
        }
    }
}

/// A purchase under construction. Not persisted until [`PurchaseDraft::finalize`] accepts it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PurchaseDraft {
    pub merchant: String,
    pub amount: f64,
    pub category_id: Option<Uuid>,
    pub notes: String,
    pub date: NaiveDate,
    pub tag_ids: Vec<Uuid>,
    /// Tag names suggested by an import that have no tag yet. The caller
    /// decides whether to create them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pending_tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ocr_text: Option<String>,
}

impl PurchaseDraft {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            merchant: String::new(),
            amount: 0.0,
            category_id: None,
            notes: String::new(),
            date,
            tag_ids: Vec::new(),
            pending_tags: Vec::new(),
            ocr_text: None,
        }
    }

    /// Set the amount from free text; unparseable text zeroes it.
    pub fn set_amount_text(&mut self, text: &str) {
        self.amount = parse_amount_text(text).unwrap_or(0.0);
    }

    pub fn is_valid(&self) -> bool {
        self.amount > 0.0
    }

    /// Turn the draft into a purchase, refusing drafts without a positive amount.
    pub fn finalize(self) -> CoreResult<Purchase> {
        if !self.is_valid() {
            return Err(CoreError::InvalidAmount(self.amount));
        }
        let merchant = self.merchant.trim();
        let notes = self.notes.trim();
        Ok(Purchase {
            id: Uuid::new_v4(),
            date: self.date,
            merchant: if merchant.is_empty() {
                UNKNOWN_MERCHANT.to_string()
            } else {
                merchant.to_string()
            },
            amount: self.amount,
            category_id: self.category_id,
            notes: if notes.is_empty() { None } else { Some(notes.to_string()) },
            ocr_text: self.ocr_text,
            tag_ids: self.tag_ids,
        })
    }
}
