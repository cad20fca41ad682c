use anyhow::{bail, Context, Result};
use cardwise_core::BudgetBook;
use clap::Subcommand;

use crate::{category_id, Workspace};

#[derive(Subcommand, Debug)]
pub enum TagCommand {
    /// Create a tag (no-op when one with the same name exists)
    Add { name: String },
    /// List tags
    List,
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    /// List categories with their monthly limits
    List,
    /// Add a category
    Add {
        name: String,

        /// Monthly limit in dollars
        #[arg(long, default_value_t = 0.0)]
        limit: f64,
    },
    /// Rename a category; remembered merchants and card multipliers follow
    Rename { from: String, to: String },
    /// Set a category's monthly limit
    Limit { name: String, limit: f64 },
}

pub fn run_tag(ws: &Workspace, command: TagCommand) -> Result<()> {
    let mut book = ws.load_book()?;
    match command {
        TagCommand::Add { name } => {
            let before = book.tags.len();
            let tag = book.tags.add_tag(&name);
            if book.tags.len() == before {
                println!("Tag exists: {}", tag.name);
            } else {
                ws.save_book(&book)?;
                println!("Added tag: {}", tag.name);
            }
        }
        TagCommand::List => {
            if book.tags.is_empty() {
                println!("(no tags)");
            }
            for name in book.tags.names() {
                println!("- {}", name);
            }
        }
    }
    Ok(())
}

pub fn run_category(ws: &Workspace, command: CategoryCommand) -> Result<()> {
    let mut book = ws.load_book()?;
    match command {
        CategoryCommand::List => {
            for c in book.categories.iter() {
                println!("{:<18} ${:>9.2}", c.name, c.limit);
            }
        }
        CategoryCommand::Add { name, limit } => {
            let added = book
                .categories
                .add(&name, limit)
                .with_context(|| format!("add category {:?}", name))?
                .name
                .clone();
            ws.save_book(&book)?;
            println!("Added category: {}", added);
        }
        CategoryCommand::Rename { from, to } => {
            let id = category_id(&book, &from)?;
            book.rename_category(id, &to)
                .with_context(|| format!("rename {:?} to {:?}", from, to))?;
            ws.save_book(&book)?;
            println!("Renamed {} -> {}", from, book.categories.name_of(Some(id)));
        }
        CategoryCommand::Limit { name, limit } => {
            let id = category_id(&book, &name)?;
            book.categories
                .relimit(id, limit)
                .with_context(|| format!("set limit for {:?}", name))?;
            ws.save_book(&book)?;
            println!("{}: ${:.2}/month", book.categories.name_of(Some(id)), limit);
        }
    }
    Ok(())
}

pub fn remember(ws: &Workspace, merchant: &str, category: &str) -> Result<()> {
    let mut book = ws.load_book()?;
    let name = canonical_category(&book, category)?;
    if !book.memory.remember(merchant, &name) {
        bail!("merchant name is empty");
    }
    ws.save_book(&book)?;
    println!("{} -> {}", merchant.trim(), name);
    Ok(())
}

fn canonical_category(book: &BudgetBook, name: &str) -> Result<String> {
    let id = category_id(book, name)?;
    Ok(book.categories.name_of(Some(id)).to_string())
}
