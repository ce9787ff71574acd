use crate::cli::args::{Cli, Commands, LevelArg, RunArgs};
use crate::core::engine::{self, RunConfig, fmt_dur, log_stage, stats_enabled};
use crate::core::metrics::{MIN_TIME_WINDOW_H, MetricParams};
use crate::core::model::Level;
use crate::report;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::fs;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

pub fn entry() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => {
            init_tracing(args.verbose);
            run(args)
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub fn run(args: RunArgs) -> Result<()> {
    let stats = stats_enabled();
    let t0 = Instant::now();

    stage(stats, "preflight", || {
        if args.summary.as_os_str() == "-" {
            bail!("stdin is not supported; provide a sequencing summary file path");
        }
        if !args.summary.is_file() {
            bail!("input file not found: {}", args.summary.display());
        }
        if args.threads == 0 {
            bail!("--threads must be >= 1");
        }
        if !(args.time_window >= MIN_TIME_WINDOW_H && args.time_window.is_finite()) {
            bail!(
                "--time-window must be a finite number of hours >= {:.4} (one minute)",
                MIN_TIME_WINDOW_H
            );
        }
        Ok(())
    })?;

    let sample_name = match args.sample_name {
        Some(s) => s,
        None => default_sample_name(&args.summary)?,
    };

    let level = match args.level {
        LevelArg::Reads => Level::Reads,
        LevelArg::Bases => Level::Bases,
        LevelArg::Events => Level::Events,
    };

    let t_out = Instant::now();
    let out_dir = args.out.join(report::zip::report_dir_name(&sample_name));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create output dir {}", out_dir.display()))?;
    log_stage(stats, "mkdir", t_out);

    let config = RunConfig {
        summary: args.summary.clone(),
        sample_name: sample_name.clone(),
        threads: args.threads,
        run_id: args.run_id.clone(),
        filter_zero_len: args.filter_zero_len,
        metrics: MetricParams {
            level,
            time_window_h: args.time_window,
            cumulative: args.cumulative,
            sample: args.sample,
            seed: args.seed,
        },
    };

    let t_engine = Instant::now();
    let output = engine::run(config)?;
    log_stage(stats, "engine", t_engine);

    let data_path = out_dir.join("nanoqc_data.txt");
    let summary_path = out_dir.join("summary.txt");
    let points_path = out_dir.join("length_vs_quality.tsv");

    let t_data = Instant::now();
    report::nanoqc_txt::write(&data_path, &output)
        .with_context(|| format!("failed to write {}", data_path.display()))?;
    log_stage(stats, "nanoqc_data", t_data);

    let t_summary = Instant::now();
    report::summary_txt::write(&summary_path, &output)
        .with_context(|| format!("failed to write {}", summary_path.display()))?;
    log_stage(stats, "summary", t_summary);

    let t_points = Instant::now();
    report::points_tsv::write(&points_path, &output)
        .with_context(|| format!("failed to write {}", points_path.display()))?;
    log_stage(stats, "length_vs_quality", t_points);

    if !args.no_zip {
        let t_zip = Instant::now();
        report::zip::write_zip(&args.out, &sample_name)
            .with_context(|| "failed to create zip output")?;
        log_stage(stats, "zip", t_zip);
    }

    if stats {
        eprintln!("KIRA_STATS output_dir={}", out_dir.display());
        eprintln!("KIRA_STATS total={}", fmt_dur(t0.elapsed()));
    }

    Ok(())
}

/// `sequencing_summary.txt.gz` -> `sequencing_summary`.
fn default_sample_name(path: &std::path::Path) -> Result<String> {
    let name = path
        .file_name()
        .and_then(|s| s.to_str())
        .context("failed to determine sample name from input file")?;
    let name = name.strip_suffix(".gz").unwrap_or(name);
    let stem = match name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => name,
    };
    Ok(stem.to_string())
}

fn stage<F>(stats: bool, name: &str, f: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    let t = Instant::now();
    let res = f();
    log_stage(stats, name, t);
    res
}
