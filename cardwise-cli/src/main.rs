use anyhow::{bail, Context, Result};
use cardwise_core::{classify_detailed, summarize, BudgetBook};
use cardwise_finance::{compare, draft_from_ocr, draft_from_text, recommend};
use chrono::{Datelike, NaiveDate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod book_cmd;
mod config;
mod import_cmd;
mod logging;
mod review;
mod state;

use book_cmd::{CategoryCommand, TagCommand};
use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "cardwise",
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("CARDWISE_BUILD_SHA"), ")"),
    about = "Categorize purchases and pick the best card for them"
)]
struct Cli {
    /// Data directory (default: $CARDWISE_HOME, else ~/.cardwise)
    #[arg(long, global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create the data directory with a default config and book
    Init,

    /// Show which category a merchant or description lands in
    Classify {
        #[arg(long)]
        merchant: Option<String>,

        /// Free text such as notes or a receipt line
        #[arg(long)]
        text: Option<String>,
    },

    /// Parse a quick-add line, e.g. "$60 at Olive Garden for dinner"
    Parse {
        text: String,

        /// Save the purchase to the book
        #[arg(long, default_value_t = false)]
        save: bool,
    },

    /// Build a purchase from OCR text of a receipt ("-" reads stdin)
    Ocr {
        file: PathBuf,

        #[arg(long, default_value_t = false)]
        save: bool,
    },

    /// Print the normalized form of an extraction payload as JSON
    Normalize {
        file: PathBuf,

        /// Treat the payload as a single receipt instead of a statement
        #[arg(long, default_value_t = false)]
        receipt: bool,
    },

    /// Best card for a purchase
    Recommend {
        category: String,
        amount: f64,

        /// List every card instead of only the best one
        #[arg(long, default_value_t = false)]
        all: bool,
    },

    /// Import a statement payload; prints a preview unless --commit
    Import {
        file: PathBuf,

        /// Save ready purchases and review duplicates interactively
        #[arg(long, default_value_t = false)]
        commit: bool,
    },

    /// Spending against limits for a month (YYYY-MM, default: this month)
    Summary {
        #[arg(long)]
        month: Option<String>,
    },

    /// Tag commands
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },

    /// Category commands
    Category {
        #[command(subcommand)]
        command: CategoryCommand,
    },

    /// Always file a merchant under a category
    Remember { merchant: String, category: String },

    /// Config commands
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config.toml if none exists
    Init,
    /// Print the effective config
    Show,
}

/// Data directory plus the config loaded from it.
pub struct Workspace {
    pub home: PathBuf,
    pub config: Config,
}

impl Workspace {
    fn open(home: Option<PathBuf>) -> Result<Self> {
        let home = match home {
            Some(h) => h,
            None => state::cardwise_home()?,
        };
        let config = config::load_config(&home)?;
        Ok(Self { home, config })
    }

    pub fn book_path(&self) -> PathBuf {
        state::book_path(&self.home)
    }

    pub fn load_book(&self) -> Result<BudgetBook> {
        state::load_book(&self.book_path())
    }

    pub fn save_book(&self, book: &BudgetBook) -> Result<()> {
        state::save_book(&self.book_path(), book)
    }

    pub fn today(&self) -> Result<NaiveDate> {
        self.config.locale.today()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let ws = Workspace::open(cli.home)?;
    logging::init_tracing(&ws.config.logging.filter);

    match cli.command {
        Command::Init => init(&ws)?,

        Command::Classify { merchant, text } => {
            if merchant.is_none() && text.is_none() {
                bail!("pass --merchant and/or --text");
            }
            let book = ws.load_book()?;
            let c = classify_detailed(
                merchant.as_deref(),
                text.as_deref(),
                &book.memory,
                &book.categories,
            );
            println!("{} ({:?})", c.category, c.source);
        }

        Command::Parse { text, save } => {
            let mut book = ws.load_book()?;
            let draft = draft_from_text(&text, &book, ws.today()?);
            print_draft(&book, &draft);
            if save {
                save_draft(&ws, &mut book, draft)?;
            }
        }

        Command::Ocr { file, save } => {
            let ocr = state::read_input(&file)?;
            let mut book = ws.load_book()?;
            let draft = draft_from_ocr(&ocr, &book, ws.today()?);
            print_draft(&book, &draft);
            if save {
                save_draft(&ws, &mut book, draft)?;
            }
        }

        Command::Normalize { file, receipt } => {
            let payload = state::read_input(&file)?;
            let book = ws.load_book()?;
            println!("{}", import_cmd::normalize_json(&payload, &book, receipt)?);
        }

        Command::Recommend { category, amount, all } => {
            if !amount.is_finite() || amount < 0.0 {
                bail!("amount must be a non-negative number");
            }
            let book = ws.load_book()?;
            let category = book
                .categories
                .find(&category)
                .map(|c| c.name.clone())
                .unwrap_or(category);
            if all {
                for r in compare(&category, amount, &book.wallet) {
                    println!(
                        "{:<20} {:>5.1}x  ${:.2}",
                        r.instrument.name, r.rate, r.estimated_reward
                    );
                }
            } else {
                let r = recommend(&category, amount, &book.wallet);
                println!(
                    "Use {} for {}: {:.1}x, about ${:.2} back",
                    r.instrument.name, category, r.rate, r.estimated_reward
                );
                if let Some(note) = &r.instrument.note {
                    println!("Note: {}", note);
                }
            }
        }

        Command::Import { file, commit } => {
            let payload = state::read_input(&file)?;
            import_cmd::import(&ws, &payload, commit)?;
        }

        Command::Summary { month } => {
            let book = ws.load_book()?;
            let (year, month) = match month {
                Some(m) => parse_month(&m)?,
                None => {
                    let today = ws.today()?;
                    (today.year(), today.month())
                }
            };
            print_summary(&book, year, month);
        }

        Command::Tag { command } => book_cmd::run_tag(&ws, command)?,

        Command::Category { command } => book_cmd::run_category(&ws, command)?,

        Command::Remember { merchant, category } => {
            book_cmd::remember(&ws, &merchant, &category)?;
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => {
                std::fs::create_dir_all(&ws.home)
                    .with_context(|| format!("create {}", ws.home.display()))?;
                let path = config::config_path(&ws.home);
                if config::init_config(&ws.home)? {
                    println!("Wrote {}", path.display());
                } else {
                    println!("Config already exists: {}", path.display());
                }
            }
            ConfigCommand::Show => {
                print!(
                    "{}",
                    toml::to_string_pretty(&ws.config).context("serialize config")?
                );
            }
        },
    }

    Ok(())
}

fn init(ws: &Workspace) -> Result<()> {
    std::fs::create_dir_all(&ws.home).with_context(|| format!("create {}", ws.home.display()))?;
    if config::init_config(&ws.home)? {
        println!("Wrote {}", config::config_path(&ws.home).display());
    }
    let book_path = ws.book_path();
    if book_path.exists() {
        println!("Book already exists: {}", book_path.display());
    } else {
        ws.save_book(&BudgetBook::default())?;
        println!("Wrote {}", book_path.display());
    }
    Ok(())
}

fn print_draft(book: &BudgetBook, draft: &cardwise_core::PurchaseDraft) {
    let category = book.categories.name_of(draft.category_id);
    println!("Merchant: {}", display_or(&draft.merchant, "(none)"));
    println!("Amount:   ${:.2}", draft.amount);
    println!("Category: {}", category);
    println!("Date:     {}", draft.date);
    if !draft.notes.is_empty() {
        println!("Notes:    {}", draft.notes);
    }
    if draft.is_valid() {
        let r = recommend(category, draft.amount, &book.wallet);
        println!("Card:     {} ({:.1}x, ${:.2})", r.instrument.name, r.rate, r.estimated_reward);
    } else {
        println!("(no amount found; not saveable)");
    }
}

fn save_draft(ws: &Workspace, book: &mut BudgetBook, draft: cardwise_core::PurchaseDraft) -> Result<()> {
    let purchase = book.commit_draft(draft).context("save purchase")?;
    ws.save_book(book)?;
    println!("Saved {} (${:.2})", purchase.merchant, purchase.amount);
    Ok(())
}

fn display_or<'a>(s: &'a str, fallback: &'a str) -> &'a str {
    if s.trim().is_empty() { fallback } else { s }
}

fn parse_month(s: &str) -> Result<(i32, u32)> {
    let first = NaiveDate::parse_from_str(&format!("{}-01", s.trim()), "%Y-%m-%d")
        .with_context(|| format!("month must look like 2025-08, got {:?}", s))?;
    Ok((first.year(), first.month()))
}

fn print_summary(book: &BudgetBook, year: i32, month: u32) {
    let summary = summarize(book, year, month);
    println!("# {}-{:02}\n", summary.year, summary.month);
    for c in &summary.categories {
        let flag = if c.over_limit { "  OVER" } else { "" };
        println!(
            "{:<18} ${:>9.2} / ${:>9.2}  ({:>3.0}%){}",
            c.name,
            c.spent,
            c.limit,
            c.utilization() * 100.0,
            flag
        );
    }
    if summary.uncategorized_spent > 0.0 {
        println!("{:<18} ${:>9.2}", cardwise_core::UNCATEGORIZED, summary.uncategorized_spent);
    }
    println!(
        "\nTotal ${:.2} of ${:.2} ({} ${:.2})",
        summary.total_spent,
        summary.overall_limit,
        if summary.remaining < 0.0 { "over by" } else { "remaining" },
        summary.remaining.abs()
    );
}

/// Resolve a category argument against the book, case-insensitively.
pub fn category_id(book: &BudgetBook, name: &str) -> Result<uuid::Uuid> {
    match book.categories.id_of(name) {
        Some(id) => Ok(id),
        None => bail!(
            "unknown category {:?} (known: {})",
            name,
            book.categories.names().join(", ")
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2025-08").unwrap(), (2025, 8));
        assert_eq!(parse_month(" 2024-12 ").unwrap(), (2024, 12));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("August").is_err());
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::parse_from(["cardwise", "recommend", "Dining", "60", "--all"]);
        match cli.command {
            Command::Recommend { category, amount, all } => {
                assert_eq!(category, "Dining");
                assert_eq!(amount, 60.0);
                assert!(all);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_workspace_uses_explicit_home() {
        let dir = tempfile::tempdir().unwrap();
        let ws = Workspace::open(Some(dir.path().to_path_buf())).unwrap();
        assert_eq!(ws.book_path(), dir.path().join("book.json"));
        assert_eq!(ws.config, Config::default());
        assert!(ws.load_book().unwrap().purchases.is_empty());
    }
}
