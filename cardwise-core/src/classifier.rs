//! Best-guess category for a purchase.
//!
//! Resolution order:
//! 1) merchant memory (exact normalized merchant hit)
//! 2) ordered keyword table over merchant + free text
//! 3) a few terminal keywords that only apply when the table found nothing
//! 4) fallback: "Other", else the first category, else the literal "Other"
//!
//! Every input yields a category name; nothing here fails.

use crate::catalog::{CategoryCatalog, OTHER};
use crate::merchant_memory::MerchantMemory;

/// Keyword table scanned in order. The first category with a substring hit
/// wins, so earlier rows take priority over later ones.
const CATEGORY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "Groceries",
        &[
            "grocery", "grocer", "supermarket", "market", "whole foods", "trader joe",
            "aldi", "kroger", "safeway", "wegmans", "publix", "costco", "h-e-b",
        ],
    ),
    (
        "Dining",
        &[
            "restaurant", "cafe", "coffee", "starbucks", "pizza", "sushi", "burger",
            "taco", "diner", "bakery", "grill", "bistro", "olive garden", "mcdonald",
            "chipotle", "dinner", "lunch", "breakfast", "brunch",
        ],
    ),
    (
        "Gas",
        &["gas station", "fuel", "shell", "exxon", "chevron", "mobil", "sunoco", "gasoline"],
    ),
    (
        "Transit",
        &["uber", "lyft", "metro", "transit", "amtrak", "train", "bus fare", "ferry", "parking", "toll"],
    ),
    (
        "Travel",
        &[
            "hotel", "motel", "airline", "airlines", "flight", "airbnb", "resort",
            "expedia", "car rental", "hertz", "avis",
        ],
    ),
    (
        "Online Shopping",
        &["amazon", "ebay", "etsy", "online", "shopify", "aliexpress"],
    ),
    (
        "Entertainment",
        &["movie", "cinema", "theater", "theatre", "concert", "netflix", "spotify", "hulu", "steam"],
    ),
    (
        "Health",
        &["doctor", "dentist", "dental", "clinic", "hospital", "cvs", "walgreens", "gym", "optometrist"],
    ),
    (
        "Bills",
        &["electric", "internet", "phone bill", "insurance", "rent", "comcast", "verizon", "water bill"],
    ),
    (
        "Home",
        &["home depot", "ikea", "lowe's", "furniture", "hardware", "wayfair"],
    ),
];

/// Checked only when the keyword table has no hit.
const TERMINAL_KEYWORDS: &[(&str, &str)] = &[
    ("ticket", "Entertainment"),
    ("pharmacy", "Health"),
    ("utility", "Bills"),
];

/// How a classification was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationSource {
    Memory,
    Keyword,
    Terminal,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: String,
    pub source: ClassificationSource,
}

/// Resolve a category name for a merchant and/or free text.
pub fn classify(
    merchant: Option<&str>,
    free_text: Option<&str>,
    memory: &MerchantMemory,
    catalog: &CategoryCatalog,
) -> String {
    classify_detailed(merchant, free_text, memory, catalog).category
}

/// Same as [`classify`], reporting which rule produced the answer.
pub fn classify_detailed(
    merchant: Option<&str>,
    free_text: Option<&str>,
    memory: &MerchantMemory,
    catalog: &CategoryCatalog,
) -> Classification {
    let merchant = merchant.map(str::trim).filter(|m| !m.is_empty());

    if let Some(m) = merchant {
        if let Some(remembered) = memory.lookup(m) {
            // Memory entries for deleted categories are ignored.
            if let Some(cat) = catalog.find(remembered) {
                tracing::debug!(merchant = m, category = %cat.name, "classified from memory");
                return hit(&cat.name, ClassificationSource::Memory);
            }
        }
    }

    let haystack = format!(
        "{} {}",
        merchant.unwrap_or_default(),
        free_text.unwrap_or_default()
    )
    .to_lowercase();

    if !haystack.trim().is_empty() {
        for (category, keywords) in CATEGORY_KEYWORDS {
            if !keywords.iter().any(|k| haystack.contains(k)) {
                continue;
            }
            if let Some(cat) = catalog.find(category) {
                return hit(&cat.name, ClassificationSource::Keyword);
            }
        }

        for (keyword, category) in TERMINAL_KEYWORDS {
            if haystack.contains(keyword) {
                if let Some(cat) = catalog.find(category) {
                    return hit(&cat.name, ClassificationSource::Terminal);
                }
            }
        }
    }

    let fallback = catalog
        .fallback()
        .map(|c| c.name.as_str())
        .unwrap_or(OTHER);
    hit(fallback, ClassificationSource::Fallback)
}

fn hit(category: &str, source: ClassificationSource) -> Classification {
    Classification {
        category: category.to_string(),
        source,
    }
}
