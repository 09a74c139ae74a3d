use tracing::{info, warn};

use crate::cli::report::{render_mismatches, render_outcomes};
use crate::cli::Cli;
use crate::document::{default_output_path, load, save};
use crate::error::Result;
use crate::pipeline;
use crate::settings::Settings;

pub fn run(cli: &Cli, settings: &Settings) -> Result<()> {
    let output = cli
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&cli.input, &settings.output_suffix));

    let mut ledger = load(&cli.input)?;
    let request = cli.request(settings);
    if request.is_empty() {
        warn!("no operation selected, the document is rewritten unchanged");
    }

    let summary = pipeline::run(&mut ledger, &request, |mismatches| {
        print!("{}", render_mismatches(mismatches));
    })?;
    if let Some(mismatches) = &summary.mismatches {
        info!(reported = mismatches.count(), "split check done");
    }
    if !summary.outcomes.is_empty() {
        println!("{}", render_outcomes(&summary.outcomes));
    }

    save(&ledger, &output)?;
    println!("Wrote {}", output.display());
    Ok(())
}
