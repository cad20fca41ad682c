//! cardwise-finance: card recommendations, duplicate screening, and the import pipeline

pub mod drafts;
pub mod duplicates;
pub mod import;
pub mod rewards;

pub use drafts::{draft_from_ocr, draft_from_text, drafts_from_transactions};
pub use duplicates::{
    find_duplicates, merchant_similarity, screen, DuplicateMatch, DuplicatePolicy,
    DuplicateReview, Resolution, ScreenResult,
};
pub use import::{import_receipt, import_statement, ImportOutcome, ReceiptImport};
pub use rewards::{best_instrument, compare, recommend, Recommendation, RewardError};
