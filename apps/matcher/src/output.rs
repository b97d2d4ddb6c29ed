//! Result persistence: the ranked CSV and the append-only run log beside it.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{Local, SecondsFormat};
use tracing::debug;

use crate::errors::MatchError;
use crate::matching::models::MatchResult;

const HEADER: [&str; 7] = [
    "Rank",
    "Candidate",
    "Score",
    "Strengths",
    "Weaknesses",
    "Explanation",
    "File",
];

const RUN_LOG_FILE: &str = "run_log.txt";

/// `outputs/results.csv` when no path (or a blank one) was given.
pub fn resolve_out_path(out_path: Option<&Path>) -> PathBuf {
    match out_path {
        Some(path) if !path.as_os_str().is_empty() => path.to_path_buf(),
        _ => Path::new("outputs").join("results.csv"),
    }
}

/// Writes the results CSV, creating parent directories as needed.
pub fn write_results_csv(path: &Path, results: &[MatchResult]) -> Result<(), MatchError> {
    write_csv(path, results).map_err(MatchError::WriteResults)
}

fn write_csv(path: &Path, results: &[MatchResult]) -> Result<(), csv::Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(HEADER)?;
    for r in results {
        writer.write_record([
            r.rank.to_string(),
            r.candidate.clone(),
            format!("{:.2}", r.score),
            r.strengths.clone(),
            r.weaknesses.clone(),
            r.explanation.clone(),
            r.file.display().to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Appends `<timestamp> | Scored <total> resumes | <out_path>` to the run log
/// next to the output file. Failures are logged and otherwise ignored.
pub fn append_run_log(out_path: &Path, total: usize) {
    let log_path = out_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(RUN_LOG_FILE);
    let line = format!(
        "{} | Scored {total} resumes | {}\n",
        Local::now().to_rfc3339_opts(SecondsFormat::Secs, false),
        out_path.display()
    );

    let appended = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .and_then(|mut file| file.write_all(line.as_bytes()));
    if let Err(e) = appended {
        debug!("Could not append to {}: {e}", log_path.display());
    }
}
