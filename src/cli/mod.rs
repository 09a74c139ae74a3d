pub mod fix;
pub mod report;

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::mismatch::SplitMode;
use crate::models::ReconcileFlag;
use crate::pipeline::{DefaultTagRequest, MismatchRequest, ReplaceTagRequest, Request};
use crate::settings::Settings;

fn parse_split_mode(s: &str) -> Result<SplitMode, String> {
    match s {
        "1" => Ok(SplitMode::Single),
        "2" => Ok(SplitMode::Pair),
        other => Err(format!("expected 1 or 2, got {other:?}")),
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "kmyfix",
    version,
    about = "Batch repair for KMyMoney bookkeeping exports.",
    after_help = "Steps run in a fixed order: split check, number erase / reconcile flag, \
                  number assignment, expense currency, default tag, tag replace, tag move, tag reorder."
)]
pub struct Cli {
    /// Input document (JSON export)
    pub input: PathBuf,

    /// Output file (default: <input>_fixed.<ext>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// 2: report split pairs whose payees differ and fill an empty second payee
    /// from the first. 1: report transactions that have a single split.
    #[arg(short = 's', long = "fix-splits-with-count", value_name = "COUNT", value_parser = parse_split_mode)]
    pub split_mode: Option<SplitMode>,

    /// Report split mismatches without repairing them
    #[arg(long = "report-only", requires = "split_mode")]
    pub report_only: bool,

    /// Erase all split numbers
    #[arg(short = 'e', long = "erase-txn-numbers")]
    pub erase_numbers: bool,

    /// Set every split's reconcile flag: -1 (unknown), 0 (not reconciled),
    /// 1 (cleared), 2 (reconciled), 3 (frozen)
    #[arg(short = 'r', long = "reconcile-flag", value_name = "FLAG", allow_hyphen_values = true)]
    pub reconcile_flag: Option<ReconcileFlag>,

    /// Number the splits of each top-level asset account 1..N by post date
    #[arg(short = 'n', long = "assign-txn-numbers")]
    pub assign_numbers: bool,

    /// Currency code for every account below Expenses
    #[arg(short = 'c', long = "expense-currency", value_name = "CODE")]
    pub expense_currency: Option<String>,

    /// Tag income/expense postings that carry none of the excluded tags
    #[arg(long = "add-default-tag", value_name = "TAG")]
    pub default_tag: Option<String>,

    /// Tags that keep a posting from receiving the default tag
    #[arg(long = "exclude-tags", value_name = "TAG,...", value_delimiter = ',', requires = "default_tag")]
    pub exclude_tags: Vec<String>,

    /// Replace OLD with NEW on postings to the first account whose name contains ACCOUNT
    #[arg(long = "replace-tag", num_args = 3, value_names = ["ACCOUNT", "OLD", "NEW"])]
    pub replace_tag: Option<Vec<String>>,

    /// Move a tag carried by every income/expense split up to the transaction
    #[arg(long = "move-tag", value_name = "TAG")]
    pub move_tag: Option<String>,

    /// Sort each split's tags alphabetically
    #[arg(long = "reorder-tags")]
    pub reorder_tags: bool,

    /// Settings file (default: ~/.config/kmyfix/settings.json)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn request(&self, settings: &Settings) -> Request {
        let default_tag = self.default_tag.as_ref().map(|tag| {
            let mut excluded = settings.excluded_tags.clone();
            for name in &self.exclude_tags {
                if !excluded.contains(name) {
                    excluded.push(name.clone());
                }
            }
            DefaultTagRequest {
                tag: tag.clone(),
                excluded,
            }
        });

        let replace_tag = match self.replace_tag.as_deref() {
            Some([account, old_tag, new_tag]) => Some(ReplaceTagRequest {
                account: account.clone(),
                old_tag: old_tag.clone(),
                new_tag: new_tag.clone(),
            }),
            _ => None,
        };

        Request {
            mismatch: self.split_mode.map(|mode| MismatchRequest {
                mode,
                fix: !self.report_only,
            }),
            erase_numbers: self.erase_numbers,
            reconcile_flag: self.reconcile_flag,
            assign_numbers: self.assign_numbers,
            expense_currency: self.expense_currency.clone(),
            default_tag,
            replace_tag,
            move_tag: self.move_tag.clone(),
            reorder_tags: self.reorder_tags,
        }
    }

    /// Log filter directive: `-v` flags win over the settings file.
    pub fn log_level(&self, settings: &Settings) -> String {
        match self.verbose {
            0 => settings.log_level.clone(),
            1 => "info".to_string(),
            _ => "debug".to_string(),
        }
    }
}
