mod cli;
mod config;
mod documents;
mod errors;
mod llm_client;
mod matching;
mod output;
mod scoring;
mod skills;
mod text;

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::Cli;
use crate::config::Config;
use crate::errors::MatchError;

/// Exit status for usage errors and anything outside the matcher taxonomy.
const USAGE_EXIT_CODE: u8 = 1;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = Config::from_env();

    // Logs go to stderr; stdout carries the result.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("resume_matcher={}", &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Starting resume-matcher v{}", env!("CARGO_PKG_VERSION"));

    match cli::execute(cli, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e}");
            let code = e
                .downcast_ref::<MatchError>()
                .map(|m| m.exit_code() as u8)
                .unwrap_or(USAGE_EXIT_CODE);
            ExitCode::from(code)
        }
    }
}
