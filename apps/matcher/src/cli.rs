use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};

use crate::config::Config;
use crate::matching::{evaluate_candidate, run, MatchInput, PipelineMode};

#[derive(Parser, Debug)]
#[command(
    name = "resume-matcher",
    about = "Rank resumes against a job description and explain the shortlist",
    version,
    args_conflicts_with_subcommands = true
)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    rank: RankArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Evaluate a single resume against a job description (requires OPENAI_API_KEY)
    Evaluate(EvaluateArgs),
}

#[derive(Args, Debug, Default)]
struct RankArgs {
    /// Path to the job description file
    #[arg(long)]
    jd: Option<PathBuf>,
    /// Folder searched recursively for resumes
    #[arg(long)]
    resumes: Option<PathBuf>,
    /// Keep only the top N results (0 keeps all)
    #[arg(long = "top-n", alias = "topn", default_value_t = 0)]
    top_n: usize,
    /// Output CSV path [default: outputs/results.csv]
    #[arg(long)]
    out: Option<PathBuf>,
    /// Always use the heuristic pipeline, even when an API key is configured
    #[arg(long)]
    heuristic: bool,
    /// Print the full result as JSON instead of "Done"
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct EvaluateArgs {
    /// Path to the job description file
    #[arg(long)]
    jd: PathBuf,
    /// Path to the resume file
    #[arg(long)]
    resume: PathBuf,
}

pub(crate) async fn execute(cli: Cli, config: &Config) -> Result<()> {
    match cli.command {
        Some(Command::Evaluate(args)) => {
            let analysis = evaluate_candidate(config, &args.jd, &args.resume).await?;
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        None => rank(cli.rank, config).await?,
    }
    Ok(())
}

async fn rank(args: RankArgs, config: &Config) -> Result<()> {
    let (Some(jd_path), Some(resumes_dir)) = (args.jd, args.resumes) else {
        bail!("provide both --jd and --resumes");
    };

    let input = MatchInput {
        jd_path,
        resumes_dir,
        top_n: args.top_n,
        out_path: args.out,
    };
    let mode = if args.heuristic {
        PipelineMode::HeuristicOnly
    } else {
        PipelineMode::Auto
    };

    let output = run(&input, config, mode).await?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("Done");
    }
    Ok(())
}
