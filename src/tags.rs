//! Tag rules for categorized transactions.
//!
//! By convention split 0 is the source split. For a two-split transaction the
//! source split carries the transaction's tags; once a transaction has more
//! than two splits each destination split carries its own.

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, warn};

use crate::error::{KmyError, Result};
use crate::models::{Account, Ledger, Split};

/// Bidirectional tag name <-> id lookup.
#[derive(Debug, Clone, Default)]
pub struct TagIndex {
    by_name: HashMap<String, String>,
    by_id: HashMap<String, String>,
}

impl TagIndex {
    pub fn from_ledger(ledger: &Ledger) -> Result<Self> {
        let mut index = TagIndex::default();
        for (id, tag) in &ledger.tags {
            if index.by_name.insert(tag.name.clone(), id.clone()).is_some() {
                return Err(KmyError::DuplicateTag(tag.name.clone()));
            }
            index.by_id.insert(id.clone(), tag.name.clone());
        }
        Ok(index)
    }

    pub fn id_of(&self, name: &str) -> Result<&str> {
        self.by_name
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| KmyError::UnknownTag(name.to_string()))
    }

    pub fn name_of(&self, id: &str) -> Result<&str> {
        self.by_id
            .get(id)
            .map(String::as_str)
            .ok_or_else(|| KmyError::UnknownTag(id.to_string()))
    }
}

fn is_category(accounts: &BTreeMap<String, Account>, account_id: &str) -> Result<bool> {
    accounts
        .get(account_id)
        .map(|a| a.account_type.is_category())
        .ok_or_else(|| KmyError::UnknownAccount(account_id.to_string()))
}

/// Swaps `old_id` for `new_id` in place. A split never ends up holding
/// `new_id` twice: if it already carries it, `old_id` is just dropped.
fn replace_in(split: &mut Split, old_id: &str, new_id: &str) -> bool {
    if old_id == new_id {
        return false;
    }
    let Some(pos) = split.tags.iter().position(|t| t == old_id) else {
        return false;
    };
    if split.has_tag(new_id) {
        split.tags.remove(pos);
    } else {
        split.tags[pos] = new_id.to_string();
    }
    true
}

pub struct TagEngine {
    index: TagIndex,
}

impl TagEngine {
    pub fn new(ledger: &Ledger) -> Result<Self> {
        Ok(Self {
            index: TagIndex::from_ledger(ledger)?,
        })
    }

    /// Tags income/expense postings that carry none of `excluded` (nor the
    /// default tag itself). Returns the number of tag references attached.
    ///
    /// Two-split transactions are skipped if any split carries an excluded tag.
    /// Larger transactions are judged split by split.
    pub fn add_default_tag(&self, ledger: &mut Ledger, default_tag: &str, excluded: &[String]) -> Result<usize> {
        let default_id = self.index.id_of(default_tag)?.to_string();
        let mut excluded_ids = vec![default_id.clone()];
        for name in excluded {
            match self.index.id_of(name) {
                Ok(id) => excluded_ids.push(id.to_string()),
                Err(_) => warn!(tag = %name, "excluded tag not in document, ignoring"),
            }
        }

        let Ledger {
            accounts,
            transactions,
            ..
        } = ledger;
        let mut attached = 0usize;
        for txn in transactions.iter_mut() {
            let n = txn.splits.len();
            if n == 2 {
                if txn.splits.iter().any(|s| s.has_any_tag(excluded_ids.iter())) {
                    continue;
                }
                if is_category(accounts, &txn.splits[1].account)? {
                    txn.splits[0].tags.push(default_id.clone());
                    attached += 1;
                    debug!(txn = %txn.id, "default tag on source split");
                }
            } else if n > 2 {
                for split in txn.splits.iter_mut().skip(1) {
                    if split.has_any_tag(excluded_ids.iter()) {
                        continue;
                    }
                    if is_category(accounts, &split.account)? {
                        split.tags.push(default_id.clone());
                        attached += 1;
                        debug!(txn = %txn.id, account = %split.account, "default tag on destination split");
                    }
                }
            }
        }
        Ok(attached)
    }

    /// Swaps `old_tag` for `new_tag` wherever the tag of a posting to
    /// `account_id` is stored. Returns the number of splits changed.
    pub fn replace_tag_in_account(
        &self,
        ledger: &mut Ledger,
        account_id: &str,
        old_tag: &str,
        new_tag: &str,
    ) -> Result<usize> {
        let old_id = self.index.id_of(old_tag)?;
        let new_id = self.index.id_of(new_tag)?;

        let mut changed = 0usize;
        for txn in ledger.transactions.iter_mut() {
            let n = txn.splits.len();
            if n == 2 {
                if txn.splits[1].account == account_id && replace_in(&mut txn.splits[0], old_id, new_id) {
                    changed += 1;
                    debug!(txn = %txn.id, "replaced tag on source split");
                }
            } else if n > 2 {
                for split in txn.splits.iter_mut().skip(1) {
                    if split.account == account_id && replace_in(split, old_id, new_id) {
                        changed += 1;
                        debug!(txn = %txn.id, "replaced tag on destination split");
                    }
                }
            }
        }
        Ok(changed)
    }

    /// For transactions with more than two splits: when every income/expense
    /// destination split carries `tag`, the tag moves to split 0. A
    /// transaction with no income/expense destination also counts as "every".
    /// Returns the number of transactions promoted.
    pub fn move_split_tag_to_transaction(&self, ledger: &mut Ledger, tag: &str) -> Result<usize> {
        let tag_id = self.index.id_of(tag)?;

        let Ledger {
            accounts,
            transactions,
            ..
        } = ledger;
        let mut promoted = 0usize;
        for txn in transactions.iter_mut() {
            if txn.splits.len() <= 2 {
                continue;
            }
            let mut qualifying = Vec::new();
            for (i, split) in txn.splits.iter().enumerate().skip(1) {
                if is_category(accounts, &split.account)? {
                    qualifying.push(i);
                }
            }
            let carrying = qualifying
                .iter()
                .filter(|&&i| txn.splits[i].has_tag(tag_id))
                .count();
            if carrying != qualifying.len() {
                continue;
            }

            if !txn.splits[0].has_tag(tag_id) {
                txn.splits[0].tags.push(tag_id.to_string());
            }
            for i in qualifying {
                txn.splits[i].tags.retain(|t| t != tag_id);
            }
            promoted += 1;
            debug!(txn = %txn.id, "moved tag to source split");
        }
        Ok(promoted)
    }

    /// Sorts each split's tag references by tag name. Returns the number of
    /// splits whose order changed.
    pub fn reorder_tags(&self, ledger: &mut Ledger) -> Result<usize> {
        let mut reordered = 0usize;
        for split in ledger.transactions.iter_mut().flat_map(|t| t.splits.iter_mut()) {
            let mut keyed = split
                .tags
                .iter()
                .map(|id| -> Result<(String, String)> { Ok((self.index.name_of(id)?.to_string(), id.clone())) })
                .collect::<Result<Vec<_>>>()?;
            keyed.sort_by(|a, b| a.0.cmp(&b.0));
            let sorted: Vec<String> = keyed.into_iter().map(|(_, id)| id).collect();
            if sorted != split.tags {
                split.tags = sorted;
                reordered += 1;
            }
        }
        Ok(reordered)
    }
}
