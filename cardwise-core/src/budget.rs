//! Monthly spend against category limits and the overall envelope.

use chrono::Datelike;
use serde::Serialize;
use uuid::Uuid;

use crate::book::BudgetBook;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CategorySpend {
    pub category_id: Uuid,
    pub name: String,
    pub limit: f64,
    pub spent: f64,
    pub remaining: f64,
    pub over_limit: bool,
}

impl CategorySpend {
    /// Share of the limit used, 0.0..; a zero limit with any spend reads as 1.0+.
    pub fn utilization(&self) -> f64 {
        if self.limit > 0.0 {
            self.spent / self.limit
        } else if self.spent > 0.0 {
            1.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BudgetSummary {
    pub year: i32,
    pub month: u32,
    pub categories: Vec<CategorySpend>,
    /// Spend whose category is unset or no longer in the catalog.
    pub uncategorized_spent: f64,
    pub total_spent: f64,
    pub overall_limit: f64,
    pub remaining: f64,
}

/// Summarize purchases dated in `year`/`month`, in catalog order.
pub fn summarize(book: &BudgetBook, year: i32, month: u32) -> BudgetSummary {
    let in_month: Vec<_> = book
        .purchases
        .iter()
        .filter(|p| p.date.year() == year && p.date.month() == month)
        .collect();

    let categories: Vec<CategorySpend> = book
        .categories
        .iter()
        .map(|cat| {
            let spent: f64 = in_month
                .iter()
                .filter(|p| p.category_id == Some(cat.id))
                .map(|p| p.amount)
                .sum();
            CategorySpend {
                category_id: cat.id,
                name: cat.name.clone(),
                limit: cat.limit,
                spent,
                remaining: cat.limit - spent,
                over_limit: spent > cat.limit,
            }
        })
        .collect();

    let total_spent: f64 = in_month.iter().map(|p| p.amount).sum();
    let categorized: f64 = categories.iter().map(|c| c.spent).sum();

    BudgetSummary {
        year,
        month,
        categories,
        uncategorized_spent: total_spent - categorized,
        total_spent,
        overall_limit: book.budget.overall_limit,
        remaining: book.budget.overall_limit - total_spent,
    }
}
