use std::fmt;

use tracing::info;

use crate::bulk::{erase_numbers, set_reconcile_flag};
use crate::currency::set_expense_currency;
use crate::error::Result;
use crate::hierarchy::{asset_top_level, find_account_by_substring, qualified_name};
use crate::mismatch::{find_mismatches, MismatchSummary, SplitMode};
use crate::models::{Ledger, ReconcileFlag};
use crate::numbering::assign_numbers;
use crate::tags::TagEngine;

#[derive(Debug, Clone, PartialEq)]
pub struct MismatchRequest {
    pub mode: SplitMode,
    /// When false the mismatches are only reported.
    pub fix: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DefaultTagRequest {
    pub tag: String,
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplaceTagRequest {
    /// Matched against qualified account names; the first hit is used.
    pub account: String,
    pub old_tag: String,
    pub new_tag: String,
}

/// Everything one run may do. Steps always execute in field order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    pub mismatch: Option<MismatchRequest>,
    pub erase_numbers: bool,
    pub reconcile_flag: Option<ReconcileFlag>,
    pub assign_numbers: bool,
    pub expense_currency: Option<String>,
    pub default_tag: Option<DefaultTagRequest>,
    pub replace_tag: Option<ReplaceTagRequest>,
    pub move_tag: Option<String>,
    pub reorder_tags: bool,
}

impl Request {
    pub fn is_empty(&self) -> bool {
        *self == Request::default()
    }

    fn uses_tags(&self) -> bool {
        self.default_tag.is_some() || self.replace_tag.is_some() || self.move_tag.is_some() || self.reorder_tags
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    EraseNumbers,
    ReconcileFlag(ReconcileFlag),
    AssignNumbers(String),
    ExpenseCurrency(String),
    DefaultTag(String),
    ReplaceTag(String),
    MoveTag(String),
    ReorderTags,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::EraseNumbers => write!(f, "Erased split numbers"),
            Step::ReconcileFlag(flag) => write!(f, "Set reconcile flag {flag}"),
            Step::AssignNumbers(account) => write!(f, "Numbered {account}"),
            Step::ExpenseCurrency(code) => write!(f, "Expense accounts set to {code}"),
            Step::DefaultTag(tag) => write!(f, "Default tag '{tag}' attached"),
            Step::ReplaceTag(account) => write!(f, "Tags replaced in {account}"),
            Step::MoveTag(tag) => write!(f, "Tag '{tag}' moved to transaction level"),
            Step::ReorderTags => write!(f, "Tag lists reordered"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepOutcome {
    pub step: Step,
    pub changed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub mismatches: Option<MismatchSummary>,
    pub outcomes: Vec<StepOutcome>,
}

impl RunSummary {
    fn record(&mut self, step: Step, changed: usize) {
        info!(step = %step, changed, "step finished");
        self.outcomes.push(StepOutcome { step, changed });
    }
}

/// Runs the requested steps over `ledger` in their fixed order. The mismatch
/// summary is handed to `on_mismatches` as soon as detection finishes.
pub fn run(
    ledger: &mut Ledger,
    request: &Request,
    mut on_mismatches: impl FnMut(&MismatchSummary),
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();

    if let Some(mismatch) = &request.mismatch {
        info!(mode = ?mismatch.mode, fix = mismatch.fix, "checking splits");
        let found = find_mismatches(ledger, mismatch.mode, mismatch.fix)?;
        on_mismatches(&found);
        summary.mismatches = Some(found);
    }

    if request.erase_numbers {
        let changed = erase_numbers(ledger);
        summary.record(Step::EraseNumbers, changed);
    }
    if let Some(flag) = request.reconcile_flag {
        let changed = set_reconcile_flag(ledger, flag);
        summary.record(Step::ReconcileFlag(flag), changed);
    }

    if request.assign_numbers {
        for account_id in asset_top_level(ledger)? {
            let name = qualified_name(ledger, &account_id)?;
            let changed = assign_numbers(ledger, &account_id);
            summary.record(Step::AssignNumbers(name), changed);
        }
    }

    if let Some(code) = &request.expense_currency {
        let changed = set_expense_currency(ledger, code)?;
        summary.record(Step::ExpenseCurrency(code.clone()), changed);
    }

    if !request.uses_tags() {
        return Ok(summary);
    }
    let tags = TagEngine::new(ledger)?;

    if let Some(default) = &request.default_tag {
        let changed = tags.add_default_tag(ledger, &default.tag, &default.excluded)?;
        summary.record(Step::DefaultTag(default.tag.clone()), changed);
    }
    if let Some(replace) = &request.replace_tag {
        let account_id = find_account_by_substring(ledger, &replace.account)?;
        let name = qualified_name(ledger, &account_id)?;
        let changed = tags.replace_tag_in_account(ledger, &account_id, &replace.old_tag, &replace.new_tag)?;
        summary.record(Step::ReplaceTag(name), changed);
    }
    if let Some(tag) = &request.move_tag {
        let changed = tags.move_split_tag_to_transaction(ledger, tag)?;
        summary.record(Step::MoveTag(tag.clone()), changed);
    }
    if request.reorder_tags {
        let changed = tags.reorder_tags(ledger)?;
        summary.record(Step::ReorderTags, changed);
    }

    Ok(summary)
}
