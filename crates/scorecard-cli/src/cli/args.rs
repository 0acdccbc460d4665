use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "scorecard",
    version,
    about = "Cloud evaluation pipeline for LLM agent responses"
)]
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the full evaluation pipeline against the remote project
    Run(RunArgs),
    /// Validate the eval spec and dataset locally (no network calls)
    Validate(ValidateArgs),
    Version,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    #[arg(long, default_value = "eval.yaml")]
    pub config: PathBuf,

    /// Plain-text summary written on every invocation, including failures
    #[arg(long, default_value = "evaluation_results.txt")]
    pub results: PathBuf,

    /// Remote project endpoint
    #[arg(long, env = "PROJECT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// API key for the project endpoint
    #[arg(long, env = "PROJECT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Judge model deployment used by the built-in evaluators
    #[arg(long, env = "MODEL_NAME", default_value = "gpt-4.1")]
    pub model: String,

    /// Seconds between run status checks
    #[arg(long, default_value_t = 10)]
    pub poll_interval_secs: u64,

    /// Name given to the remote run
    #[arg(long, default_value = "baseline-eval")]
    pub run_name: String,
}

#[derive(Parser, Clone)]
pub struct ValidateArgs {
    #[arg(long, default_value = "eval.yaml")]
    pub config: PathBuf,
}
