use std::collections::HashSet;

use crate::error::{KmyError, Result};
use crate::models::Ledger;

pub const ASSETS_ROOT: &str = "Assets";
pub const EXPENSES_ROOT: &str = "Expenses";

/// Top-level accounts are exported with singular names; qualified names use the plural.
fn root_display_name(name: &str) -> &str {
    match name {
        "Asset" => "Assets",
        "Liability" => "Liabilities",
        "Expense" => "Expenses",
        other => other,
    }
}

/// Colon-joined path from the hierarchy root down to `account_id`.
pub fn qualified_name(ledger: &Ledger, account_id: &str) -> Result<String> {
    ledger.account(account_id)?;

    let mut names: Vec<&str> = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = account_id;
    loop {
        if !visited.insert(current) {
            return Err(KmyError::CycleOrMissingParent(account_id.to_string()));
        }
        let account = ledger
            .accounts
            .get(current)
            .ok_or_else(|| KmyError::CycleOrMissingParent(account_id.to_string()))?;
        match account.parent.as_deref() {
            Some(parent) => {
                names.push(&account.name);
                current = parent;
            }
            None => {
                names.push(root_display_name(&account.name));
                break;
            }
        }
    }
    names.reverse();
    Ok(names.join(":"))
}

/// First account (in id order) whose qualified name contains `query`.
/// Further matches are not reported.
pub fn find_account_by_substring(ledger: &Ledger, query: &str) -> Result<String> {
    for id in ledger.accounts.keys() {
        if qualified_name(ledger, id)?.contains(query) {
            return Ok(id.clone());
        }
    }
    Err(KmyError::AccountNotFound(query.to_string()))
}

/// Direct children of the `Assets` root, in id order.
pub fn asset_top_level(ledger: &Ledger) -> Result<Vec<String>> {
    let mut ids = Vec::new();
    for (id, account) in &ledger.accounts {
        let Some(parent) = account.parent.as_deref() else {
            continue;
        };
        let parent_account = ledger
            .accounts
            .get(parent)
            .ok_or_else(|| KmyError::CycleOrMissingParent(id.clone()))?;
        if parent_account.parent.is_none() && root_display_name(&parent_account.name) == ASSETS_ROOT {
            ids.push(id.clone());
        }
    }
    Ok(ids)
}
