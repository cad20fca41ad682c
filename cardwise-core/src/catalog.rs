//! Budget categories: the closed, ordered set every purchase is assigned to.
//!
//! A category's name is the join key used by the classifier, the payload
//! normalizer and the reward optimizer, so lookups are always
//! case-insensitive and names are never duplicated inside one catalog.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};

/// Name of the catch-all category used whenever nothing better applies.
pub const OTHER: &str = "Other";

/// Label shown for purchases whose category is missing from the catalog.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// A budget category with a monthly spending limit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub limit: f64,
}

impl Category {
    pub fn new(name: impl Into<String>, limit: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            limit,
        }
    }

    /// Case-insensitive comparison against this category's name.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.trim().to_lowercase()
    }
}

/// Ordered set of categories. Order is user-controlled (see [`CategoryCatalog::move_category`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The starter catalog a fresh book is seeded with.
    pub fn with_defaults() -> Self {
        let defaults = [
            ("Groceries", 400.0),
            ("Dining", 250.0),
            ("Travel", 300.0),
            ("Gas", 150.0),
            ("Transit", 100.0),
            ("Entertainment", 150.0),
            ("Online Shopping", 200.0),
            ("Bills", 400.0),
            ("Health", 120.0),
            ("Home", 200.0),
            (OTHER, 100.0),
        ];
        Self {
            categories: defaults
                .iter()
                .map(|(name, limit)| Category::new(*name, *limit))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn as_slice(&self) -> &[Category] {
        &self.categories
    }

    /// Category names in catalog order, as handed to the extraction service.
    pub fn names(&self) -> Vec<String> {
        self.categories.iter().map(|c| c.name.clone()).collect()
    }

    pub fn first(&self) -> Option<&Category> {
        self.categories.first()
    }

    pub fn get(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Case-insensitive lookup by name.
    pub fn find(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.is_named(name))
    }

    pub fn id_of(&self, name: &str) -> Option<Uuid> {
        self.find(name).map(|c| c.id)
    }

    /// Display name for a category reference; unknown or missing ids read as "Uncategorized".
    pub fn name_of(&self, id: Option<Uuid>) -> &str {
        id.and_then(|id| self.get(id))
            .map(|c| c.name.as_str())
            .unwrap_or(UNCATEGORIZED)
    }

    pub fn other(&self) -> Option<&Category> {
        self.find(OTHER)
    }

    /// Where unresolved purchases land: "Other", else the first category.
    pub fn fallback(&self) -> Option<&Category> {
        self.other().or_else(|| self.first())
    }

    /// Resolve a name to a catalog entry, falling back when it is unknown.
    pub fn resolve(&self, name: Option<&str>) -> Option<&Category> {
        name.and_then(|n| self.find(n)).or_else(|| self.fallback())
    }

    pub fn add(&mut self, name: &str, limit: f64) -> CoreResult<&Category> {
        let name = self.validate_name(name, None)?;
        validate_limit(limit)?;
        self.categories.push(Category::new(name, limit));
        let idx = self.categories.len() - 1;
        Ok(&self.categories[idx])
    }

    /// Rename a category. Returns the previous name so callers can retarget
    /// anything keyed by it (merchant memory, instrument multipliers).
    pub fn rename(&mut self, id: Uuid, name: &str) -> CoreResult<String> {
        let name = self.validate_name(name, Some(id))?;
        let cat = self.get_mut(id)?;
        Ok(std::mem::replace(&mut cat.name, name))
    }

    pub fn relimit(&mut self, id: Uuid, limit: f64) -> CoreResult<()> {
        validate_limit(limit)?;
        self.get_mut(id)?.limit = limit;
        Ok(())
    }

    pub fn remove(&mut self, id: Uuid) -> CoreResult<Category> {
        let idx = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(CoreError::CategoryNotFound(id))?;
        Ok(self.categories.remove(idx))
    }

    /// Move the category at `from` so it ends up at index `to` (clamped).
    pub fn move_category(&mut self, from: usize, to: usize) {
        if from >= self.categories.len() {
            return;
        }
        let cat = self.categories.remove(from);
        let to = to.min(self.categories.len());
        self.categories.insert(to, cat);
    }

    fn get_mut(&mut self, id: Uuid) -> CoreResult<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(CoreError::CategoryNotFound(id))
    }

    fn validate_name(&self, name: &str, except: Option<Uuid>) -> CoreResult<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CoreError::EmptyCategoryName);
        }
        let clash = self
            .categories
            .iter()
            .any(|c| Some(c.id) != except && c.is_named(trimmed));
        if clash {
            return Err(CoreError::DuplicateCategory(trimmed.to_string()));
        }
        Ok(trimmed.to_string())
    }
}

fn validate_limit(limit: f64) -> CoreResult<()> {
    if limit.is_finite() && limit >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::InvalidLimit(limit))
    }
}
