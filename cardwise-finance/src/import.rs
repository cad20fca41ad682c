//! Import pipeline for extraction-service payloads.
//!
//! statement: decode -> normalize -> drafts -> duplicate screen
//! receipt:   decode -> normalize -> draft -> card recommendation
//!
//! Both only read the book. Saving is a separate, explicit step.

use cardwise_core::{classify, BudgetBook, Purchase, PurchaseDraft};
use cardwise_ingest::{
    decode_receipt, decode_transactions, normalize_receipt, normalize_transactions, RejectedLine,
};
use chrono::NaiveDate;
use serde::Serialize;

use crate::drafts::drafts_from_transactions;
use crate::duplicates::{screen, DuplicateMatch, DuplicatePolicy, DuplicateReview};
use crate::rewards::{recommend, Recommendation};

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportOutcome {
    /// Drafts with no likely duplicate in the book.
    pub ready: Vec<PurchaseDraft>,
    /// Drafts that need a decision before they are saved.
    pub duplicates: Vec<DuplicateMatch>,
    pub rejected: Vec<RejectedLine>,
}

impl ImportOutcome {
    pub fn is_empty(&self) -> bool {
        self.ready.is_empty() && self.duplicates.is_empty()
    }

    /// Create every pending tag, save the ready drafts, and hand back the
    /// duplicates for review.
    pub fn commit(mut self, book: &mut BudgetBook) -> (Vec<Purchase>, DuplicateReview) {
        for draft in self
            .ready
            .iter_mut()
            .chain(self.duplicates.iter_mut().map(|m| &mut m.new))
        {
            book.create_pending_tags(draft);
        }
        let saved = book.commit_drafts(self.ready);
        tracing::info!(
            saved = saved.len(),
            pending_review = self.duplicates.len(),
            "import committed"
        );
        (saved, DuplicateReview::new(self.duplicates))
    }
}

/// Run a multi-transaction payload through the whole pipeline.
pub fn import_statement(
    payload: &str,
    book: &BudgetBook,
    today: NaiveDate,
    policy: &DuplicatePolicy,
) -> ImportOutcome {
    let decoded = decode_transactions(payload);
    let report = normalize_transactions(&decoded, &book.categories.names());
    let drafts = drafts_from_transactions(&report.valid, book, today);
    let screened = screen(&book.purchases, drafts, policy);

    tracing::info!(
        decoded = decoded.len(),
        ready = screened.clean.len(),
        duplicates = screened.flagged.len(),
        rejected = report.rejected.len(),
        "statement imported"
    );

    ImportOutcome {
        ready: screened.clean,
        duplicates: screened.flagged,
        rejected: report.rejected,
    }
}

/// A receipt draft with the best card for it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReceiptImport<'a> {
    pub draft: PurchaseDraft,
    pub recommendation: Recommendation<'a>,
    /// Card the extraction service suggested, when it named one.
    pub suggested_card: Option<String>,
}

/// Run a single-receipt payload through the pipeline.
///
/// A category the service left out (or that normalized to nothing) is
/// classified locally from the merchant name.
pub fn import_receipt<'a>(payload: &str, book: &'a BudgetBook, today: NaiveDate) -> ReceiptImport<'a> {
    let analysis = normalize_receipt(&decode_receipt(payload), &book.categories.names());
    let category = analysis.category.clone().unwrap_or_else(|| {
        classify(analysis.merchant.as_deref(), None, &book.memory, &book.categories)
    });

    let tags = book.tags.resolve(&analysis.tags);
    let mut draft = PurchaseDraft::new(today);
    draft.merchant = analysis.merchant.unwrap_or_default();
    draft.amount = analysis.total.unwrap_or(0.0);
    draft.category_id = book.categories.resolve(Some(category.as_str())).map(|c| c.id);
    draft.tag_ids = tags.known;
    draft.pending_tags = tags.unknown;

    let category_name = book.categories.name_of(draft.category_id);
    let recommendation = recommend(category_name, draft.amount, &book.wallet);

    ReceiptImport {
        draft,
        recommendation,
        suggested_card: analysis.recommended_card,
    }
}
