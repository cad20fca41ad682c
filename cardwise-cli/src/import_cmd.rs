use anyhow::{Context, Result};
use cardwise_core::BudgetBook;
use cardwise_finance::{import_statement, ImportOutcome};
use cardwise_ingest::{
    decode_receipt, decode_transactions, normalize_receipt, normalize_transactions,
};
use std::io;

use crate::review::run_review;
use crate::Workspace;

/// Normalized view of a payload against the book's categories, pretty-printed.
pub fn normalize_json(payload: &str, book: &BudgetBook, receipt: bool) -> Result<String> {
    let allowed = book.categories.names();
    let json = if receipt {
        serde_json::to_string_pretty(&normalize_receipt(&decode_receipt(payload), &allowed))
    } else {
        serde_json::to_string_pretty(&normalize_transactions(&decode_transactions(payload), &allowed))
    };
    json.context("serialize normalized payload")
}

pub fn import(ws: &Workspace, payload: &str, commit: bool) -> Result<()> {
    let mut book = ws.load_book()?;
    let outcome = import_statement(payload, &book, ws.today()?, &ws.config.duplicates);
    print_outcome(&book, &outcome);

    if !commit {
        if !outcome.is_empty() {
            println!("\nDry run. Re-run with --commit to save.");
        }
        return Ok(());
    }

    let (saved, review) = outcome.commit(&mut book);
    let tally = if review.is_empty() {
        Default::default()
    } else {
        let stdin = io::stdin();
        run_review(review, &mut book, stdin.lock(), &mut io::stdout())?
    };
    ws.save_book(&book)?;

    println!(
        "\nSaved {} purchase(s); {} duplicate(s) added, {} ignored.",
        saved.len() + tally.added,
        tally.added,
        tally.ignored
    );
    Ok(())
}

fn print_outcome(book: &BudgetBook, outcome: &ImportOutcome) {
    println!("Ready ({}):", outcome.ready.len());
    for d in &outcome.ready {
        let mut line = format!(
            "  {}  {:<24} ${:>8.2}  {}",
            d.date,
            d.merchant,
            d.amount,
            book.categories.name_of(d.category_id)
        );
        if !d.pending_tags.is_empty() {
            line.push_str(&format!("  new tags: {}", d.pending_tags.join(", ")));
        }
        println!("{}", line);
    }

    if !outcome.duplicates.is_empty() {
        println!("Possible duplicates ({}):", outcome.duplicates.len());
        for m in &outcome.duplicates {
            println!(
                "  {}  {:<24} ${:>8.2}  (matches {} on {})",
                m.new.date, m.new.merchant, m.new.amount, m.existing.merchant, m.existing.date
            );
        }
    }

    if !outcome.rejected.is_empty() {
        println!("Rejected ({}):", outcome.rejected.len());
        for r in &outcome.rejected {
            println!("  line {}: {} ({})", r.index + 1, r.merchant, r.reason);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_json_statement() {
        let book = BudgetBook::default();
        let json = normalize_json(
            r#"[{"merchant": "Lyft", "amount": 12, "category": "uber"}, {"merchant": "?", "amount": 0}]"#,
            &book,
            false,
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["valid"][0]["category"], "Transit");
        assert_eq!(value["rejected"][0]["index"], 1);
    }

    #[test]
    fn test_normalize_json_receipt() {
        let book = BudgetBook::default();
        let json = normalize_json(r#"{"merchant": "Hilton", "total": 210.5, "category": "hotel"}"#, &book, true)
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["category"], "Travel");
        assert_eq!(value["total"], 210.5);
    }
}
