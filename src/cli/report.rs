use std::fmt::Write;

use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::fmt::amount;
use crate::mismatch::{MismatchReport, MismatchSummary, SplitMode, SplitSide};
use crate::pipeline::StepOutcome;

fn side_rows(side: &SplitSide) -> [String; 6] {
    [
        side.payee_id.clone(),
        side.payee_name.clone(),
        side.account_name.clone(),
        side.account_type.to_string(),
        amount(side.amount, &side.currency),
        side.memo.clone(),
    ]
}

const ROW_LABELS: [&str; 6] = ["Payee ID", "Payee", "Account", "Account type", "Amount", "Memo"];

fn render_one(report: &MismatchReport) -> String {
    let headline = match report.destination {
        Some(_) => "Source and destination payee mismatch".yellow(),
        None => "No second split".yellow(),
    };

    let mut table = Table::new();
    let source = side_rows(&report.source);
    match &report.destination {
        Some(dst) => {
            table.set_header(vec!["", "Source", "Destination"]);
            let destination = side_rows(dst);
            for (i, label) in ROW_LABELS.iter().enumerate() {
                table.add_row(vec![
                    Cell::new(label),
                    Cell::new(&source[i]),
                    Cell::new(&destination[i]),
                ]);
            }
        }
        None => {
            table.set_header(vec!["", "Source"]);
            for (i, label) in ROW_LABELS.iter().enumerate() {
                table.add_row(vec![Cell::new(label), Cell::new(&source[i])]);
            }
        }
    }

    format!(
        "{} {}  {}\n{headline}\n{table}\n",
        "Transaction".bold(),
        report.txn_id,
        report.post_date
    )
}

pub fn render_mismatches(summary: &MismatchSummary) -> String {
    let mut out = String::new();
    for report in &summary.reports {
        out.push_str(&render_one(report));
        out.push('\n');
    }

    match summary.mode {
        SplitMode::Pair => {
            let _ = writeln!(
                out,
                "Count of mismatching source and destination splits: {}",
                summary.count()
            );
            let state = if summary.fixed { "filled from source" } else { "left empty" };
            let _ = writeln!(
                out,
                "Count of transactions with an empty destination payee: {} ({state})",
                summary.empty_destinations
            );
        }
        SplitMode::Single => {
            let _ = writeln!(out, "Count of transactions with a single split: {}", summary.count());
        }
    }
    out
}

pub fn render_outcomes(outcomes: &[StepOutcome]) -> String {
    let mut table = Table::new();
    table.set_header(vec!["Step", "Changed"]);
    for outcome in outcomes {
        table.add_row(vec![Cell::new(outcome.step.to_string()), Cell::new(outcome.changed)]);
    }
    format!("Summary\n{table}")
}
