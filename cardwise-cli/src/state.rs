//! Where cardwise keeps its files, and loading/saving the book snapshot.

use anyhow::{Context, Result};
use cardwise_core::BudgetBook;
use std::fs;
use std::path::{Path, PathBuf};

/// `$CARDWISE_HOME`, else `$HOME/.cardwise`.
pub fn cardwise_home() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CARDWISE_HOME") {
        if !dir.trim().is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".cardwise"))
}

pub fn book_path(home: &Path) -> PathBuf {
    home.join("book.json")
}

/// Read the book, or a fresh default book when none was saved yet.
pub fn load_book(path: &Path) -> Result<BudgetBook> {
    if !path.exists() {
        return Ok(BudgetBook::default());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

/// Write the book through a temp file so a failed write never truncates it.
pub fn save_book(path: &Path, book: &BudgetBook) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let json = serde_json::to_string_pretty(book).context("serialize book")?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| format!("replace {}", path.display()))?;
    Ok(())
}

/// Read a text input argument: `-` means stdin, anything else is a path.
pub fn read_input(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut s = String::new();
        std::io::Read::read_to_string(&mut std::io::stdin(), &mut s).context("read stdin")?;
        return Ok(s);
    }
    fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardwise_core::Purchase;
    use chrono::NaiveDate;

    #[test]
    fn test_missing_book_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let book = load_book(&book_path(dir.path())).unwrap();
        assert_eq!(book.categories.len(), 11);
        assert_eq!(book.wallet.len(), 5);
        assert!(book.purchases.is_empty());
    }

    #[test]
    fn test_book_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = book_path(&dir.path().join("nested"));

        let mut book = BudgetBook::default();
        let dining = book.categories.id_of("Dining");
        let date = NaiveDate::from_ymd_opt(2025, 8, 7).unwrap();
        book.accept_purchase(Purchase::new(date, "Olive Garden", 60.0, dining));
        book.tags.add_tag("Family");
        save_book(&path, &book).unwrap();

        let loaded = load_book(&path).unwrap();
        assert_eq!(loaded, book);
        assert_eq!(loaded.memory.lookup("olive garden"), Some("Dining"));
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_corrupt_book_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = book_path(dir.path());
        fs::write(&path, "{not json").unwrap();
        let err = load_book(&path).unwrap_err();
        assert!(format!("{err:#}").contains("parse"));
    }

    #[test]
    fn test_read_input_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("receipt.txt");
        fs::write(&path, "TOTAL 6.48").unwrap();
        assert_eq!(read_input(&path).unwrap(), "TOTAL 6.48");
    }
}
