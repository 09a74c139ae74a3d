mod bulk;
mod cli;
mod currency;
mod document;
mod error;
mod fmt;
mod hierarchy;
mod mismatch;
mod models;
mod numbering;
mod pipeline;
mod settings;
mod tags;
#[cfg(test)]
mod testutil;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = Cli::parse();

    let result = match &cli.config {
        Some(path) => settings::load_explicit_settings(path),
        None => Ok(settings::load_settings()),
    }
    .and_then(|settings| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("kmyfix={}", cli.log_level(&settings))));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
        cli::fix::run(&cli, &settings)
    });

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
