//! Duplicate detection for imported purchases.
//!
//! A flagged pair is only a suggestion. Nothing is merged or dropped until a
//! person resolves it through [`DuplicateReview`].

use cardwise_core::{BudgetBook, CoreResult, Purchase, PurchaseDraft};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How close two purchases must be to count as the same one.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DuplicatePolicy {
    /// Maximum distance between the two dates, in days.
    pub date_tolerance_days: i64,
    /// Minimum normalized Levenshtein similarity of the merchant names (0..=1).
    pub merchant_similarity: f64,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self {
            date_tolerance_days: 1,
            merchant_similarity: 0.8,
        }
    }
}

/// An incoming draft that looks like a purchase already in the book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateMatch {
    pub id: Uuid,
    pub existing: Purchase,
    pub new: PurchaseDraft,
}

fn merchant_key(merchant: &str) -> String {
    merchant
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Similarity of two merchant names in `0.0..=1.0`. Containment of one
/// normalized name in the other counts as a full match ("SHELL OIL 123" vs "Shell").
pub fn merchant_similarity(a: &str, b: &str) -> f64 {
    let (a, b) = (merchant_key(a), merchant_key(b));
    if a.is_empty() || b.is_empty() {
        return if a == b { 1.0 } else { 0.0 };
    }
    if a.contains(&b) || b.contains(&a) {
        return 1.0;
    }
    strsim::normalized_levenshtein(&a, &b)
}

fn same_cents(a: f64, b: f64) -> bool {
    (a * 100.0).round() == (b * 100.0).round()
}

/// Day distance and merchant similarity, when the pair qualifies.
fn closeness(existing: &Purchase, new: &PurchaseDraft, policy: &DuplicatePolicy) -> Option<(i64, f64)> {
    let days = (existing.date - new.date).num_days().abs();
    if days > policy.date_tolerance_days || !same_cents(existing.amount, new.amount) {
        return None;
    }
    let similarity = merchant_similarity(&existing.merchant, &new.merchant);
    (similarity >= policy.merchant_similarity).then_some((days, similarity))
}

fn closest<'a>(
    existing: &'a [Purchase],
    new: &PurchaseDraft,
    policy: &DuplicatePolicy,
) -> Option<&'a Purchase> {
    existing
        .iter()
        .filter_map(|p| closeness(p, new, policy).map(|score| (p, score)))
        // Nearest date first, then the most similar name; earlier entries win ties.
        .reduce(|best, cand| {
            let (bd, bs) = best.1;
            let (cd, cs) = cand.1;
            if cd < bd || (cd == bd && cs > bs) { cand } else { best }
        })
        .map(|(p, _)| p)
}

/// Pair each incoming draft with at most one existing purchase it likely duplicates.
pub fn find_duplicates(
    existing: &[Purchase],
    incoming: &[PurchaseDraft],
    policy: &DuplicatePolicy,
) -> Vec<DuplicateMatch> {
    incoming
        .iter()
        .filter_map(|new| {
            closest(existing, new, policy).map(|p| DuplicateMatch {
                id: Uuid::new_v4(),
                existing: p.clone(),
                new: new.clone(),
            })
        })
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScreenResult {
    pub clean: Vec<PurchaseDraft>,
    pub flagged: Vec<DuplicateMatch>,
}

/// Split incoming drafts into those safe to save and those needing review.
pub fn screen(existing: &[Purchase], incoming: Vec<PurchaseDraft>, policy: &DuplicatePolicy) -> ScreenResult {
    let mut result = ScreenResult::default();
    for new in incoming {
        match closest(existing, &new, policy) {
            Some(p) => {
                tracing::debug!(
                    merchant = %new.merchant,
                    amount = new.amount,
                    existing = %p.id,
                    "flagged possible duplicate"
                );
                result.flagged.push(DuplicateMatch {
                    id: Uuid::new_v4(),
                    existing: p.clone(),
                    new,
                });
            }
            None => result.clean.push(new),
        }
    }
    result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    /// Save the incoming purchase alongside the existing one.
    AddToBudget,
    /// Drop the incoming purchase.
    Ignore,
}

/// Pending duplicate decisions. Each match is resolved exactly once.
#[derive(Debug, Clone, Default)]
pub struct DuplicateReview {
    pending: Vec<DuplicateMatch>,
}

impl DuplicateReview {
    pub fn new(matches: Vec<DuplicateMatch>) -> Self {
        Self { pending: matches }
    }

    pub fn pending(&self) -> &[DuplicateMatch] {
        &self.pending
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Resolve one match. Unknown ids are a no-op returning `Ok(None)`.
    pub fn resolve(
        &mut self,
        id: Uuid,
        resolution: Resolution,
        book: &mut BudgetBook,
    ) -> CoreResult<Option<Purchase>> {
        let Some(idx) = self.pending.iter().position(|m| m.id == id) else {
            return Ok(None);
        };
        let m = self.pending.remove(idx);
        match resolution {
            Resolution::AddToBudget => book.commit_draft(m.new).map(Some),
            Resolution::Ignore => {
                tracing::debug!(merchant = %m.new.merchant, "ignored duplicate");
                Ok(None)
            }
        }
    }

    /// Save every pending draft. Invalid drafts are skipped.
    pub fn add_all(&mut self, book: &mut BudgetBook) -> Vec<Purchase> {
        let drafts = self.pending.drain(..).map(|m| m.new).collect();
        book.commit_drafts(drafts)
    }

    pub fn ignore_all(&mut self) -> usize {
        let n = self.pending.len();
        self.pending.clear();
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, d).unwrap()
    }

    fn draft(d: u32, merchant: &str, amount: f64) -> PurchaseDraft {
        let mut draft = PurchaseDraft::new(day(d));
        draft.merchant = merchant.to_string();
        draft.amount = amount;
        draft
    }

    fn existing() -> Vec<Purchase> {
        vec![
            Purchase::new(day(5), "Shell", 40.0, None),
            Purchase::new(day(6), "Olive Garden", 60.0, None),
            Purchase::new(day(7), "Olive Garden", 60.0, None),
        ]
    }

    #[test]
    fn test_merchant_similarity() {
        assert_eq!(merchant_similarity("SHELL OIL 5734", "Shell"), 1.0);
        assert_eq!(merchant_similarity("Trader Joe's", "trader joes"), 1.0);
        assert!(merchant_similarity("Starbuck", "Starbucks #12") >= 0.8);
        assert!(merchant_similarity("Lyft", "Shell") < 0.8);
        assert_eq!(merchant_similarity("", ""), 1.0);
        assert_eq!(merchant_similarity("", "Shell"), 0.0);
    }

    #[test]
    fn test_matches_within_tolerance() {
        let existing = existing();
        let incoming = vec![
            draft(6, "SHELL OIL", 40.0),
            draft(8, "Shell", 40.0),
            draft(5, "Shell", 40.01),
            draft(5, "Lyft", 40.0),
        ];
        let matches = find_duplicates(&existing, &incoming, &DuplicatePolicy::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].existing.merchant, "Shell");
        assert_eq!(matches[0].new.merchant, "SHELL OIL");
    }

    #[test]
    fn test_pairs_with_closest_existing() {
        let existing = existing();
        let incoming = vec![draft(7, "Olive Garden", 60.0)];
        let matches = find_duplicates(&existing, &incoming, &DuplicatePolicy::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].existing.date, day(7));
    }

    #[test]
    fn test_policy_widens_window() {
        let existing = existing();
        let incoming = vec![draft(8, "Shell", 40.0)];
        let policy = DuplicatePolicy {
            date_tolerance_days: 3,
            ..DuplicatePolicy::default()
        };
        assert_eq!(find_duplicates(&existing, &incoming, &policy).len(), 1);
    }

    #[test]
    fn test_screen_splits_clean_and_flagged() {
        let existing = existing();
        let result = screen(
            &existing,
            vec![draft(5, "Shell", 40.0), draft(5, "Kroger", 52.0)],
            &DuplicatePolicy::default(),
        );
        assert_eq!(result.clean.len(), 1);
        assert_eq!(result.clean[0].merchant, "Kroger");
        assert_eq!(result.flagged.len(), 1);
    }

    #[test]
    fn test_review_resolves_one_by_one() {
        let mut book = BudgetBook::default();
        book.purchases = existing();
        let gas = book.categories.id_of("Gas");

        let mut incoming = draft(5, "Shell", 40.0);
        incoming.category_id = gas;
        let flagged = screen(
            &book.purchases,
            vec![incoming, draft(6, "Olive Garden", 60.0)],
            &DuplicatePolicy::default(),
        )
        .flagged;
        assert_eq!(flagged.len(), 2);
        let (first, second) = (flagged[0].id, flagged[1].id);

        let mut review = DuplicateReview::new(flagged);
        let saved = review.resolve(first, Resolution::AddToBudget, &mut book).unwrap();
        assert_eq!(saved.unwrap().merchant, "Shell");
        assert_eq!(book.purchases.len(), 4);
        assert_eq!(book.memory.lookup("shell"), Some("Gas"));

        assert_eq!(review.resolve(second, Resolution::Ignore, &mut book).unwrap(), None);
        assert_eq!(book.purchases.len(), 4);
        assert!(review.is_empty());

        // Already resolved.
        assert_eq!(review.resolve(first, Resolution::AddToBudget, &mut book).unwrap(), None);
    }

    #[test]
    fn test_review_bulk_actions() {
        let mut book = BudgetBook::default();
        book.purchases = existing();
        let flagged = find_duplicates(
            &book.purchases,
            &[draft(5, "Shell", 40.0), draft(7, "Olive Garden", 60.0)],
            &DuplicatePolicy::default(),
        );

        let mut review = DuplicateReview::new(flagged.clone());
        assert_eq!(review.add_all(&mut book).len(), 2);
        assert_eq!(book.purchases.len(), 5);
        assert!(review.is_empty());

        let mut review = DuplicateReview::new(flagged);
        assert_eq!(review.ignore_all(), 2);
        assert_eq!(book.purchases.len(), 5);
    }
}
