use cardwise_core::{summarize, BudgetBook, Purchase};
use cardwise_finance::{import_statement, DuplicatePolicy, Resolution};
use chrono::NaiveDate;

const STATEMENT: &str = r#"Here are the transactions I found:
```json
{
  "transactions": [
    {"merchant": "Whole Foods", "amount": 82.14, "category": "Whole Foods", "date": "2025-08-02", "tags": ["family"]},
    {"merchant": "SHELL OIL 5734", "amount": "$40.00", "category": "gas station", "date": "2025-08-05"},
    {"merchant": "Blue Bottle", "total": 6.5, "category": "coffee", "date": "08/06/2025", "tags": "Work"},
    {"merchant": "Refund?", "amount": "n/a", "category": "Other"},
    {"merchant": "Acme Corp", "amount": 19.99, "category": "widgets", "date": "2025-08-06"}
  ]
}
```"#;

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
}

fn seeded_book() -> BudgetBook {
    let mut book = BudgetBook::default();
    book.tags.add_tag("Work");
    let gas = book.categories.id_of("Gas");
    book.add_purchase(Purchase::new(day(5), "Shell", 40.0, gas));
    book
}

#[test]
fn test_statement_import_end_to_end() {
    let mut book = seeded_book();
    let outcome = import_statement(STATEMENT, &book, day(7), &DuplicatePolicy::default());

    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].index, 3);
    assert_eq!(outcome.duplicates.len(), 1);
    assert_eq!(outcome.duplicates[0].new.merchant, "SHELL OIL 5734");
    assert_eq!(outcome.ready.len(), 3);

    let groceries = &outcome.ready[0];
    assert_eq!(groceries.category_id, book.categories.id_of("Groceries"));
    assert_eq!(groceries.pending_tags, vec!["family"]);

    let coffee = &outcome.ready[1];
    assert_eq!(coffee.category_id, book.categories.id_of("Dining"));
    assert_eq!(coffee.date, day(7), "non-ISO date falls back to today");
    assert_eq!(coffee.tag_ids, vec![book.tags.tag_id("work").unwrap()]);

    let acme = &outcome.ready[2];
    assert_eq!(acme.category_id, book.categories.id_of("Other"));

    // Reading never writes.
    assert_eq!(book.purchases.len(), 1);
    assert!(book.tags.find("family").is_none());

    let (saved, mut review) = outcome.commit(&mut book);
    assert_eq!(saved.len(), 3);
    assert_eq!(book.purchases.len(), 4);
    assert!(book.tags.find("family").is_some());
    assert_eq!(book.memory.lookup("whole foods"), Some("Groceries"));

    let id = review.pending()[0].id;
    review.resolve(id, Resolution::Ignore, &mut book).unwrap();
    assert!(review.is_empty());
    assert_eq!(book.purchases.len(), 4);

    let summary = summarize(&book, 2025, 8);
    let total = 82.14 + 40.0 + 6.5 + 19.99;
    assert!((summary.total_spent - total).abs() < 1e-9);
}

#[test]
fn test_reimporting_flags_everything() {
    let mut book = BudgetBook::default();
    let payload = r#"[{"merchant": "Kroger", "amount": 52.1, "category": "grocery", "date": "2025-08-01"}]"#;

    let first = import_statement(payload, &book, day(7), &DuplicatePolicy::default());
    let (saved, review) = first.commit(&mut book);
    assert_eq!(saved.len(), 1);
    assert!(review.is_empty());

    let second = import_statement(payload, &book, day(7), &DuplicatePolicy::default());
    assert!(second.ready.is_empty());
    assert_eq!(second.duplicates.len(), 1);

    let (_, mut review) = second.commit(&mut book);
    assert_eq!(review.add_all(&mut book).len(), 1);
    assert_eq!(book.purchases.len(), 2);
}

#[test]
fn test_non_json_payload_imports_nothing() {
    let book = BudgetBook::default();
    let outcome = import_statement(
        "I could not find any transactions.",
        &book,
        day(7),
        &DuplicatePolicy::default(),
    );
    assert!(outcome.is_empty());
    assert!(outcome.rejected.is_empty());
}
