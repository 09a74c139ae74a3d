use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{KmyError, Result};
use crate::models::Ledger;
use crate::tags::TagIndex;

pub fn parse(content: &str) -> Result<Ledger> {
    let ledger: Ledger = serde_json::from_str(content)?;
    validate(&ledger)?;
    Ok(ledger)
}

pub fn load(path: &Path) -> Result<Ledger> {
    let content = std::fs::read_to_string(path)?;
    let ledger = parse(&content)?;
    info!(
        path = %path.display(),
        accounts = ledger.accounts.len(),
        payees = ledger.payees.len(),
        tags = ledger.tags.len(),
        transactions = ledger.transactions.len(),
        "loaded document"
    );
    Ok(ledger)
}

pub fn save(ledger: &Ledger, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(ledger)?;
    std::fs::write(path, format!("{json}\n"))?;
    info!(path = %path.display(), "saved document");
    Ok(())
}

/// `books.json` -> `books_fixed.json` next to the input.
pub fn default_output_path(input: &Path, suffix: &str) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_default();
    let name = match input.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    input.with_file_name(name)
}

/// Every id a record points at must exist, and tag names must be unique.
fn validate(ledger: &Ledger) -> Result<()> {
    for (id, account) in &ledger.accounts {
        if let Some(parent) = &account.parent {
            if !ledger.accounts.contains_key(parent) {
                return Err(KmyError::CycleOrMissingParent(id.clone()));
            }
        }
    }
    TagIndex::from_ledger(ledger)?;

    for txn in &ledger.transactions {
        for split in &txn.splits {
            ledger.account(&split.account)?;
            ledger.payee_name(split.payee.as_deref())?;
            if let Some(tag) = split.tags.iter().find(|t| !ledger.tags.contains_key(*t)) {
                return Err(KmyError::UnknownTag(tag.clone()));
            }
        }
    }
    Ok(())
}
