//! The budget book: every catalog, the merchant memory and the purchases,
//! as one snapshot owned by the persistence layer.
//!
//! Read-only engine code borrows the pieces it needs. All writes go through
//! the explicit methods here and either apply fully or not at all.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::CategoryCatalog;
use crate::error::{CoreError, CoreResult};
use crate::instrument::Wallet;
use crate::merchant_memory::MerchantMemory;
use crate::purchase::{Purchase, PurchaseDraft};
use crate::tags::TagRegistry;

/// Overall monthly spending envelope across all categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BudgetEnvelope {
    pub overall_limit: f64,
}

impl Default for BudgetEnvelope {
    fn default() -> Self {
        Self {
            overall_limit: 2000.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BudgetBook {
    #[serde(default = "CategoryCatalog::with_defaults")]
    pub categories: CategoryCatalog,
    #[serde(default)]
    pub tags: TagRegistry,
    #[serde(default)]
    pub memory: MerchantMemory,
    #[serde(default)]
    pub wallet: Wallet,
    /// Newest first.
    #[serde(default)]
    pub purchases: Vec<Purchase>,
    #[serde(default)]
    pub budget: BudgetEnvelope,
}

impl Default for BudgetBook {
    fn default() -> Self {
        Self {
            categories: CategoryCatalog::with_defaults(),
            tags: TagRegistry::new(),
            memory: MerchantMemory::new(),
            wallet: Wallet::default(),
            purchases: Vec::new(),
            budget: BudgetEnvelope::default(),
        }
    }
}

impl BudgetBook {
    pub fn add_purchase(&mut self, purchase: Purchase) {
        self.purchases.insert(0, purchase);
    }

    pub fn delete_purchase(&mut self, id: Uuid) -> CoreResult<Purchase> {
        let idx = self
            .purchases
            .iter()
            .position(|p| p.id == id)
            .ok_or(CoreError::PurchaseNotFound(id))?;
        Ok(self.purchases.remove(idx))
    }

    /// Record a purchase that came through duplicate review (or any other
    /// already-built purchase) and learn its merchant's category.
    pub fn accept_purchase(&mut self, purchase: Purchase) {
        self.learn_merchant(&purchase);
        self.add_purchase(purchase);
    }

    /// Save a draft: validate, store, and teach the merchant memory.
    pub fn commit_draft(&mut self, draft: PurchaseDraft) -> CoreResult<Purchase> {
        let had_merchant = !draft.merchant.trim().is_empty();
        let purchase = draft.finalize()?;
        if had_merchant {
            self.learn_merchant(&purchase);
        }
        tracing::debug!(
            merchant = %purchase.merchant,
            amount = purchase.amount,
            category = self.categories.name_of(purchase.category_id),
            "committed purchase"
        );
        self.add_purchase(purchase.clone());
        Ok(purchase)
    }

    /// Commit every valid draft; invalid ones are skipped. Returns what was saved.
    pub fn commit_drafts(&mut self, drafts: Vec<PurchaseDraft>) -> Vec<Purchase> {
        drafts
            .into_iter()
            .filter(PurchaseDraft::is_valid)
            .filter_map(|d| self.commit_draft(d).ok())
            .collect()
    }

    /// Create the tags a draft is waiting on and attach them to it.
    pub fn create_pending_tags(&mut self, draft: &mut PurchaseDraft) {
        for name in std::mem::take(&mut draft.pending_tags) {
            let tag = self.tags.add_tag(&name);
            if !draft.tag_ids.contains(&tag.id) {
                draft.tag_ids.push(tag.id);
            }
        }
    }

    /// Rename a category and carry the new name into memory and card multipliers.
    pub fn rename_category(&mut self, id: Uuid, name: &str) -> CoreResult<()> {
        let old = self.categories.rename(id, name)?;
        let new = self.categories.name_of(Some(id)).to_string();
        self.memory.retarget(&old, &new);
        self.wallet.retarget_category(&old, &new);
        Ok(())
    }

    /// Clear purchases, memory and budgets back to defaults. Tags and cards survive.
    pub fn reset(&mut self) {
        self.purchases.clear();
        self.budget = BudgetEnvelope::default();
        self.categories = CategoryCatalog::with_defaults();
        self.memory = MerchantMemory::new();
    }

    fn learn_merchant(&mut self, purchase: &Purchase) {
        if let Some(cat) = purchase.category_id.and_then(|id| self.categories.get(id)) {
            self.memory.remember(&purchase.merchant, &cat.name);
        }
    }
}
