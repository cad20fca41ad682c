//! Turning parsed input into purchase drafts against a book snapshot.

use cardwise_core::{classify, BudgetBook, PurchaseDraft};
use cardwise_ingest::{guess_amount, guess_merchant, parse_purchase_text, NormalizedTransaction};
use chrono::NaiveDate;

/// Draft from a one-line description such as "$60 at Olive Garden for dinner".
pub fn draft_from_text(text: &str, book: &BudgetBook, today: NaiveDate) -> PurchaseDraft {
    let parsed = parse_purchase_text(text);
    let category = classify(parsed.merchant.as_deref(), Some(text), &book.memory, &book.categories);

    let mut draft = PurchaseDraft::new(today);
    draft.merchant = parsed.merchant.unwrap_or_default();
    draft.amount = parsed.amount.unwrap_or(0.0);
    draft.notes = parsed.notes.unwrap_or_default();
    draft.category_id = book.categories.id_of(&category);
    draft
}

/// Draft from OCR text of a receipt photo. The raw text is kept on the draft.
pub fn draft_from_ocr(ocr_text: &str, book: &BudgetBook, today: NaiveDate) -> PurchaseDraft {
    let merchant = guess_merchant(ocr_text);
    let category = classify(merchant.as_deref(), Some(ocr_text), &book.memory, &book.categories);

    let mut draft = PurchaseDraft::new(today);
    draft.merchant = merchant.unwrap_or_default();
    draft.amount = guess_amount(ocr_text).unwrap_or(0.0);
    draft.category_id = book.categories.id_of(&category);
    draft.ocr_text = Some(ocr_text.to_string());
    draft
}

/// Drafts for normalized statement lines.
///
/// Unknown categories land in "Other" (else the first category). Tag names
/// with no tag yet are parked in `pending_tags`; lines without a date use `today`.
pub fn drafts_from_transactions(
    transactions: &[NormalizedTransaction],
    book: &BudgetBook,
    today: NaiveDate,
) -> Vec<PurchaseDraft> {
    transactions
        .iter()
        .map(|txn| {
            let tags = book.tags.resolve(&txn.tags);
            let mut draft = PurchaseDraft::new(txn.date.unwrap_or(today));
            draft.merchant = txn.merchant.clone();
            draft.amount = txn.amount;
            draft.category_id = book.categories.resolve(txn.category.as_deref()).map(|c| c.id);
            draft.tag_ids = tags.known;
            draft.pending_tags = tags.unknown;
            draft
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 7).unwrap()
    }

    #[test]
    fn test_draft_from_text() {
        let book = BudgetBook::default();
        let draft = draft_from_text("$60 at Olive Garden for dinner", &book, today());
        assert_eq!(draft.amount, 60.0);
        assert_eq!(draft.merchant, "Olive Garden for");
        assert_eq!(draft.notes, "dinner");
        assert_eq!(draft.category_id, book.categories.id_of("Dining"));
        assert_eq!(draft.date, today());
        assert!(draft.is_valid());
    }

    #[test]
    fn test_draft_from_text_uses_memory() {
        let mut book = BudgetBook::default();
        book.memory.remember("Olive Garden", "Entertainment");
        let draft = draft_from_text("$60 at Olive Garden", &book, today());
        assert_eq!(draft.merchant, "Olive Garden");
        assert_eq!(draft.category_id, book.categories.id_of("Entertainment"));
    }

    #[test]
    fn test_draft_from_text_without_amount_is_invalid() {
        let book = BudgetBook::default();
        let draft = draft_from_text("lunch at Chipotle", &book, today());
        assert!(!draft.is_valid());
        assert_eq!(draft.merchant, "Chipotle");
    }

    #[test]
    fn test_draft_from_ocr() {
        let book = BudgetBook::default();
        let ocr = "TRADER JOE'S\n08/07/2025\nBANANAS 0.99\nTOTAL $6.48\n";
        let draft = draft_from_ocr(ocr, &book, today());
        assert_eq!(draft.merchant, "TRADER JOE'S");
        assert_eq!(draft.amount, 6.48);
        assert_eq!(draft.category_id, book.categories.id_of("Groceries"));
        assert_eq!(draft.ocr_text.as_deref(), Some(ocr));
        assert!(draft.notes.is_empty());
    }

    #[test]
    fn test_drafts_from_transactions() {
        let mut book = BudgetBook::default();
        let work = book.tags.add_tag("Work");
        let txns = vec![
            NormalizedTransaction {
                merchant: "Lyft".into(),
                amount: 18.2,
                category: Some("Transit".into()),
                date: NaiveDate::from_ymd_opt(2025, 8, 1),
                tags: vec!["work".into(), "Client X".into()],
            },
            NormalizedTransaction {
                merchant: "Acme".into(),
                amount: 5.0,
                category: None,
                date: None,
                tags: vec![],
            },
        ];
        let drafts = drafts_from_transactions(&txns, &book, today());

        assert_eq!(drafts[0].category_id, book.categories.id_of("Transit"));
        assert_eq!(drafts[0].date, NaiveDate::from_ymd_opt(2025, 8, 1).unwrap());
        assert_eq!(drafts[0].tag_ids, vec![work.id]);
        assert_eq!(drafts[0].pending_tags, vec!["Client X"]);

        assert_eq!(drafts[1].category_id, book.categories.id_of("Other"));
        assert_eq!(drafts[1].date, today());
        assert!(book.tags.find("Client X").is_none());
    }
}
