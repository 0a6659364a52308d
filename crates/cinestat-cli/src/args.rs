use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use cinestat_core::config::DB_ENV_VAR;

#[derive(Parser, Debug)]
#[command(
    name = "cinestat",
    about = "Generate a synthetic movie ratings store and analyze it",
    version,
    after_help = "Examples:\n  cinestat generate --seed 42\n  cinestat analyze --all --rows 10\n  cinestat analyze --format json > analyses.json\n  cinestat report --output out/report.html\n  cinestat charts --db sqlite://data/movies.db --out-dir charts"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Recreate the store and fill it with a synthetic dataset
    Generate(GenerateArgs),

    /// Run the analytics queries and print the first rows of each
    Analyze(AnalyzeArgs),

    /// Write the HTML analysis report
    Report(ReportArgs),

    /// Render the five analysis charts as PNG files
    Charts(ChartsArgs),
}

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    /// Store URL (sqlite://path) or file path.
    /// Falls back to CINESTAT_DB, .env, cinestat.toml, then sqlite://movies.db
    #[arg(long, env = DB_ENV_VAR)]
    pub db: Option<String>,

    /// Random seed for reproducible generation (defaults to the clock)
    #[arg(long)]
    pub seed: Option<u64>,
}

#[derive(Parser, Debug)]
pub struct AnalyzeArgs {
    /// Store URL
    #[arg(long, env = DB_ENV_VAR)]
    pub db: Option<String>,

    /// Number of rows to print per analysis
    #[arg(long, default_value = "5")]
    pub rows: usize,

    /// Output format
    #[arg(long, default_value = "table")]
    pub format: AnalyzeFormat,

    /// Print all six analyses instead of genre, director and rating only
    #[arg(long)]
    pub all: bool,
}

#[derive(Parser, Debug)]
pub struct ReportArgs {
    /// Store URL
    #[arg(long, env = DB_ENV_VAR)]
    pub db: Option<String>,

    /// Report file path (default: movie_analysis_report.html)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug)]
pub struct ChartsArgs {
    /// Store URL
    #[arg(long, env = DB_ENV_VAR)]
    pub db: Option<String>,

    /// Directory to write the PNG files into (default: current directory)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum AnalyzeFormat {
    Table,
    Json,
    Csv,
}
