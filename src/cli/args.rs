use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kira-nanoqc",
    version,
    about = "QC report for nanopore sequencing_summary.txt files"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    Run(RunArgs),
}

#[derive(Parser)]
pub struct RunArgs {
    /// Basecaller sequencing summary (tab-separated, optionally gzipped)
    pub summary: PathBuf,

    #[arg(long)]
    pub out: PathBuf,

    /// Only analyse reads from this run id
    #[arg(long)]
    pub run_id: Option<String>,

    /// Drop reads with sequence length 0
    #[arg(long, default_value_t = false)]
    pub filter_zero_len: bool,

    #[arg(long)]
    pub sample_name: Option<String>,

    /// Threads for BGZF/MGZIP decompression
    #[arg(long, default_value_t = num_cpus::get())]
    pub threads: usize,

    /// Seed for every subsampling step
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Reads kept for distributions and the length/quality table (0 = all)
    #[arg(long, default_value_t = 100_000)]
    pub sample: usize,

    /// Window size in hours for the over-time tables
    #[arg(long, default_value_t = 0.25)]
    pub time_window: f64,

    #[arg(long, default_value_t = false)]
    pub cumulative: bool,

    #[arg(long, value_enum, default_value_t = LevelArg::Reads)]
    pub level: LevelArg,

    #[arg(long, default_value_t = false)]
    pub no_zip: bool,

    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LevelArg {
    #[value(name = "reads")]
    Reads,
    #[value(name = "bases")]
    Bases,
    #[value(name = "events")]
    Events,
}
