use tracing::debug;

use crate::error::Result;
use crate::hierarchy::qualified_name;
use crate::models::{AccountType, Ledger, Split};

/// Which transactions the detector inspects, by exact split count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitMode {
    Single,
    Pair,
}

impl SplitMode {
    pub fn split_count(self) -> usize {
        match self {
            SplitMode::Single => 1,
            SplitMode::Pair => 2,
        }
    }
}

/// One side of a reported transaction, with every reference resolved.
#[derive(Debug, Clone)]
pub struct SplitSide {
    pub payee_id: String,
    pub payee_name: String,
    pub account_name: String,
    pub account_type: AccountType,
    pub amount: f64,
    pub currency: String,
    pub memo: String,
}

#[derive(Debug, Clone)]
pub struct MismatchReport {
    pub txn_id: String,
    pub post_date: String,
    pub source: SplitSide,
    /// `None` for single-split transactions.
    pub destination: Option<SplitSide>,
}

#[derive(Debug, Clone)]
pub struct MismatchSummary {
    pub mode: SplitMode,
    pub reports: Vec<MismatchReport>,
    /// Pair mode: mismatches whose destination payee was empty.
    pub empty_destinations: usize,
    pub fixed: bool,
}

impl MismatchSummary {
    pub fn count(&self) -> usize {
        self.reports.len()
    }
}

fn describe_split(ledger: &Ledger, split: &Split) -> Result<SplitSide> {
    let account = ledger.account(&split.account)?;
    Ok(SplitSide {
        payee_id: split.payee.clone().unwrap_or_default(),
        payee_name: ledger.payee_name(split.payee.as_deref())?,
        account_name: qualified_name(ledger, &split.account)?,
        account_type: account.account_type,
        amount: split.amount()?,
        currency: account.currency.clone(),
        memo: split.memo.clone(),
    })
}

/// Reports transactions with exactly `mode.split_count()` splits that look
/// inconsistent. In pair mode an empty destination payee is filled from the
/// source split when `fix` is set.
pub fn find_mismatches(ledger: &mut Ledger, mode: SplitMode, fix: bool) -> Result<MismatchSummary> {
    let mut reports = Vec::new();
    let mut empty_destinations = 0usize;

    for i in 0..ledger.transactions.len() {
        let txn = &ledger.transactions[i];
        if txn.splits.len() != mode.split_count() {
            continue;
        }

        let repair = match mode {
            SplitMode::Single => {
                reports.push(MismatchReport {
                    txn_id: txn.id.clone(),
                    post_date: txn.post_date.clone(),
                    source: describe_split(ledger, &txn.splits[0])?,
                    destination: None,
                });
                None
            }
            SplitMode::Pair => {
                let (src, dst) = (&txn.splits[0], &txn.splits[1]);
                if src.payee == dst.payee {
                    continue;
                }
                reports.push(MismatchReport {
                    txn_id: txn.id.clone(),
                    post_date: txn.post_date.clone(),
                    source: describe_split(ledger, src)?,
                    destination: Some(describe_split(ledger, dst)?),
                });
                if dst.payee.is_none() {
                    empty_destinations += 1;
                    src.payee.clone()
                } else {
                    None
                }
            }
        };

        if let (true, Some(payee)) = (fix, repair) {
            let txn = &mut ledger.transactions[i];
            debug!(txn = %txn.id, payee = %payee, "filled empty destination payee");
            txn.splits[1].payee = Some(payee);
        }
    }

    Ok(MismatchSummary {
        mode,
        reports,
        empty_destinations,
        fixed: fix,
    })
}
