//! cardwise-core: budget catalogs, purchases, and the category classifier

pub mod book;
pub mod budget;
pub mod catalog;
pub mod classifier;
pub mod error;
pub mod instrument;
pub mod merchant_memory;
pub mod purchase;
pub mod tags;

pub use book::{BudgetBook, BudgetEnvelope};
pub use budget::{summarize, BudgetSummary, CategorySpend};
pub use catalog::{Category, CategoryCatalog, OTHER, UNCATEGORIZED};
pub use classifier::{classify, classify_detailed, Classification, ClassificationSource};
pub use error::{CoreError, CoreResult};
pub use instrument::{PaymentInstrument, Wallet};
pub use merchant_memory::{normalize_merchant, MerchantMemory};
pub use purchase::{parse_amount_text, Purchase, PurchaseDraft, UNKNOWN_MERCHANT};
pub use tags::{Tag, TagRegistry, TagResolution};
