//! Free-form purchase tags.
//!
//! Tags never create budgets; they only label purchases. Creation is
//! idempotent under case-folding: asking for "WORK" when "Work" exists hands
//! back the existing tag.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder used for blank tag names and dangling tag ids.
pub const UNNAMED_TAG: &str = "Tag";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct TagRegistry {
    tags: Vec<Tag>,
}

/// Outcome of matching free-text tag names against the registry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TagResolution {
    /// Ids of names that matched an existing tag, in input order, deduplicated.
    pub known: Vec<Uuid>,
    /// Names with no matching tag, trimmed and deduplicated case-insensitively.
    pub unknown: Vec<String>,
}

impl TagRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tag> {
        self.tags.iter()
    }

    pub fn names(&self) -> Vec<String> {
        self.tags.iter().map(|t| t.name.clone()).collect()
    }

    /// Return the tag matching `name` (case-insensitive), creating it if needed.
    pub fn add_tag(&mut self, name: &str) -> Tag {
        let trimmed = match name.trim() {
            "" => UNNAMED_TAG,
            t => t,
        };
        if let Some(existing) = self.find(trimmed) {
            return existing.clone();
        }
        let tag = Tag::new(trimmed);
        tracing::debug!(tag = %tag.name, "created tag");
        self.tags.push(tag.clone());
        tag
    }

    pub fn find(&self, name: &str) -> Option<&Tag> {
        let needle = name.trim().to_lowercase();
        self.tags.iter().find(|t| t.name.to_lowercase() == needle)
    }

    pub fn tag_id(&self, name: &str) -> Option<Uuid> {
        self.find(name).map(|t| t.id)
    }

    pub fn tag_name(&self, id: Uuid) -> &str {
        self.tags
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.name.as_str())
            .unwrap_or(UNNAMED_TAG)
    }

    /// Match names against existing tags without creating anything.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> TagResolution {
        let mut out = TagResolution::default();
        for raw in names {
            let name = raw.as_ref().trim();
            if name.is_empty() {
                continue;
            }
            match self.tag_id(name) {
                Some(id) => {
                    if !out.known.contains(&id) {
                        out.known.push(id);
                    }
                }
                None => {
                    let lower = name.to_lowercase();
                    if !out.unknown.iter().any(|u| u.to_lowercase() == lower) {
                        out.unknown.push(name.to_string());
                    }
                }
            }
        }
        out
    }
}
