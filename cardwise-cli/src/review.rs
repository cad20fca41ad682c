//! Interactive duplicate review for `cardwise import --commit`.

use anyhow::Result;
use cardwise_core::BudgetBook;
use cardwise_finance::{DuplicateReview, Resolution};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Choice {
    One(Resolution),
    AddAll,
    IgnoreAll,
}

fn parse_choice(input: &str) -> Option<Choice> {
    match input.trim().to_lowercase().as_str() {
        "a" | "add" => Some(Choice::One(Resolution::AddToBudget)),
        "i" | "ignore" => Some(Choice::One(Resolution::Ignore)),
        "all" | "add-all" => Some(Choice::AddAll),
        "none" | "ignore-all" => Some(Choice::IgnoreAll),
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewTally {
    pub added: usize,
    pub ignored: usize,
}

/// Ask about each pending duplicate. End of input ignores whatever is left.
pub fn run_review<R: BufRead, W: Write>(
    mut review: DuplicateReview,
    book: &mut BudgetBook,
    mut input: R,
    out: &mut W,
) -> Result<ReviewTally> {
    let mut tally = ReviewTally::default();

    while let Some(m) = review.pending().first() {
        let id = m.id;
        writeln!(out, "\nPossible duplicate:")?;
        writeln!(
            out,
            "  saved:    {}  {:<24} ${:.2}",
            m.existing.date, m.existing.merchant, m.existing.amount
        )?;
        writeln!(
            out,
            "  incoming: {}  {:<24} ${:.2}",
            m.new.date, m.new.merchant, m.new.amount
        )?;
        write!(out, "[a]dd / [i]gnore / all / none: ")?;
        out.flush().ok();

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            tally.ignored += review.ignore_all();
            break;
        }

        match parse_choice(&line) {
            Some(Choice::One(resolution)) => {
                if review.resolve(id, resolution, book)?.is_some() {
                    tally.added += 1;
                } else {
                    tally.ignored += 1;
                }
            }
            Some(Choice::AddAll) => {
                let pending = review.pending().len();
                let added = review.add_all(book).len();
                tally.added += added;
                tally.ignored += pending - added;
            }
            Some(Choice::IgnoreAll) => tally.ignored += review.ignore_all(),
            None => writeln!(out, "Please answer a, i, all or none.")?,
        }
    }

    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardwise_core::{Purchase, PurchaseDraft};
    use cardwise_finance::{find_duplicates, DuplicatePolicy};
    use chrono::NaiveDate;
    use std::io::Cursor;

    fn setup() -> (BudgetBook, DuplicateReview) {
        let date = NaiveDate::from_ymd_opt(2025, 8, 5).unwrap();
        let mut book = BudgetBook::default();
        book.add_purchase(Purchase::new(date, "Shell", 40.0, None));
        book.add_purchase(Purchase::new(date, "Kroger", 52.1, None));

        let incoming: Vec<PurchaseDraft> = [("SHELL OIL", 40.0), ("Kroger #12", 52.1)]
            .into_iter()
            .map(|(merchant, amount)| {
                let mut d = PurchaseDraft::new(date);
                d.merchant = merchant.to_string();
                d.amount = amount;
                d
            })
            .collect();
        let matches = find_duplicates(&book.purchases, &incoming, &DuplicatePolicy::default());
        assert_eq!(matches.len(), 2);
        (book, DuplicateReview::new(matches))
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice(" A \n"), Some(Choice::One(Resolution::AddToBudget)));
        assert_eq!(parse_choice("ignore"), Some(Choice::One(Resolution::Ignore)));
        assert_eq!(parse_choice("ALL"), Some(Choice::AddAll));
        assert_eq!(parse_choice("none"), Some(Choice::IgnoreAll));
        assert_eq!(parse_choice("maybe"), None);
    }

    #[test]
    fn test_one_by_one_with_retry() {
        let (mut book, review) = setup();
        let mut out = Vec::new();
        let tally = run_review(review, &mut book, Cursor::new("x\na\ni\n"), &mut out).unwrap();
        assert_eq!(tally, ReviewTally { added: 1, ignored: 1 });
        assert_eq!(book.purchases.len(), 3);
        assert!(String::from_utf8(out).unwrap().contains("Please answer"));
    }

    #[test]
    fn test_add_all() {
        let (mut book, review) = setup();
        let tally = run_review(review, &mut book, Cursor::new("all\n"), &mut Vec::new()).unwrap();
        assert_eq!(tally, ReviewTally { added: 2, ignored: 0 });
        assert_eq!(book.purchases.len(), 4);
    }

    #[test]
    fn test_eof_ignores_the_rest() {
        let (mut book, review) = setup();
        let tally = run_review(review, &mut book, Cursor::new("a\n"), &mut Vec::new()).unwrap();
        assert_eq!(tally, ReviewTally { added: 1, ignored: 1 });
        assert_eq!(book.purchases.len(), 3);
    }
}
