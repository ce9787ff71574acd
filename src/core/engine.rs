use crate::core::ingest::{self, IngestOptions, Ingested};
use crate::core::io::{InputKind, SummarySource};
use crate::core::metrics::{self, FinalMetrics, MetricParams};
use crate::core::model::FinalizeContext;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::info;

pub struct RunConfig {
    pub summary: PathBuf,
    pub sample_name: String,
    pub threads: usize,
    pub run_id: Option<String>,
    pub filter_zero_len: bool,
    pub metrics: MetricParams,
}

#[derive(Debug)]
pub struct RunOutput {
    pub ingested: Ingested,
    pub metrics: FinalMetrics,
    pub ctx: FinalizeContext,
    pub input_kind: InputKind,
}

pub fn run(cfg: RunConfig) -> Result<RunOutput> {
    let stats = stats_enabled();
    let t_total = Instant::now();

    let file_name = cfg
        .summary
        .file_name()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .context("failed to determine input filename")?;

    let t_load = Instant::now();
    let (source, input_kind) = SummarySource::load(&cfg.summary, cfg.threads)?;
    log_stage(stats, "engine.load", t_load);
    info!(
        file = %cfg.summary.display(),
        bytes = source.len(),
        gzip = input_kind == InputKind::Gzip,
        "importing sequencing summary"
    );

    let opts = IngestOptions {
        run_id_filter: cfg.run_id.clone(),
        drop_zero_length: cfg.filter_zero_len,
    };
    let t_ingest = Instant::now();
    let ingested = ingest::ingest(source.bytes(), &opts)
        .with_context(|| format!("failed to ingest {}", cfg.summary.display()))?;
    log_stage(stats, "engine.ingest", t_ingest);
    drop(source);

    let t_metrics = Instant::now();
    let metrics = metrics::compute(&ingested.table, &cfg.metrics)
        .with_context(|| format!("failed to compute metrics for {}", cfg.summary.display()))?;
    log_stage(stats, "engine.metrics", t_metrics);

    if stats {
        eprintln!(
            "KIRA_STATS reads={} incomplete={} zero_length={} filtered={} run_ids={}",
            ingested.counts.total_reads,
            ingested.counts.discarded_incomplete,
            ingested.counts.discarded_zero_length,
            ingested.counts.discarded_filtered,
            ingested.run_id_counts.len()
        );
    }
    log_stage(stats, "engine.total", t_total);

    Ok(RunOutput {
        ingested,
        metrics,
        ctx: FinalizeContext {
            file_name,
            sample_name: cfg.sample_name,
            run_id_filter: cfg.run_id,
            filter_zero_len: cfg.filter_zero_len,
        },
        input_kind,
    })
}

pub(crate) fn stats_enabled() -> bool {
    matches!(std::env::var("KIRA_STATS").as_deref(), Ok("1"))
}

pub(crate) fn log_stage(stats: bool, name: &str, t: Instant) {
    if stats {
        eprintln!("KIRA_STATS stage={} time={}", name, fmt_dur(t.elapsed()));
    }
}

pub(crate) fn fmt_dur(d: Duration) -> String {
    if d.as_secs_f64() < 1.0 {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.3}s", d.as_secs_f64())
    }
}
