use flate2::Compression;
use flate2::write::GzEncoder;
use kira_nanoqc::cli::args::{LevelArg, RunArgs};
use kira_nanoqc::core::engine::{self, RunConfig};
use kira_nanoqc::core::metrics::{GRID_COLS, GRID_ROWS, MAX_HIST_BINS, MetricParams};
use kira_nanoqc::{IngestError, IngestOptions, MetricsError, RunType, ingest};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

const ONE_D: &str = "read_id\trun_id\tchannel\tstart_time\tduration\tnum_events\tsequence_length_template\tmean_qscore_template\n\
A\tr1\t5\t0\t2\t180\t100\t9.0\n\
B\tr1\t5\t10\t1\t0\t0\t8.0\n\
C\tr2\t10\t20\t4\t360\t200\t10.0\n";

fn synthetic_summary(reads: usize) -> String {
    let mut s = String::from(
        "filename\tread_id\trun_id\tchannel\tstart_time\tduration\tnum_events\tsequence_length_template\tmean_qscore_template\n",
    );
    for i in 0..reads {
        let run = if i % 3 == 0 { "runB" } else { "runA" };
        let channel = i % 512 + 1;
        let start = (i * 37) as f64;
        let len = (i * 97) % 5000;
        let q = 4.0 + (i % 90) as f64 / 10.0;
        s.push_str(&format!(
            "f{i}.fast5\tread{i}\t{run}\t{channel}\t{start}\t{:.2}\t{}\t{len}\t{q}\n",
            len as f64 / 450.0,
            len * 2
        ));
    }
    s
}

fn write_file(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn run_args(summary: PathBuf, out: PathBuf) -> RunArgs {
    RunArgs {
        summary,
        out,
        run_id: None,
        filter_zero_len: false,
        sample_name: Some("sample".into()),
        threads: 1,
        seed: 7,
        sample: 1000,
        time_window: 0.25,
        cumulative: false,
        level: LevelArg::Reads,
        no_zip: false,
        verbose: false,
    }
}

#[test]
fn zero_length_scenario_through_public_api() {
    let opts = IngestOptions {
        drop_zero_length: true,
        ..Default::default()
    };
    let out = ingest(ONE_D.as_bytes(), &opts).unwrap();
    assert_eq!(out.table.len(), 2);
    assert!(out.table.get("B").is_none());
    assert_eq!(out.counts.discarded_zero_length, 1);
    let counts: Vec<(&str, u64)> = out
        .run_id_counts
        .iter()
        .map(|c| (c.run_id.as_str(), c.count))
        .collect();
    assert_eq!(counts, vec![("r1", 1), ("r2", 1)]);
}

#[test]
fn two_d_scenario_through_public_api() {
    let src = "read_id\trun_id\tchannel\tstart_time\tsequence_length_2d\tmean_qscore_2d\n\
Z\tr\t1\t0\t900\t12.0\n";
    let out = ingest(src.as_bytes(), &IngestOptions::default()).unwrap();
    assert_eq!(out.run_type(), RunType::TwoD);
    let z = out.table.get("Z").unwrap();
    assert_eq!(z.duration, 2.0);
    assert_eq!(z.num_events, 1620.0);
}

#[test]
fn unknown_layout_is_a_schema_error() {
    let err = ingest(b"read_id\tlength\nA\t1\n", &IngestOptions::default()).unwrap_err();
    assert!(matches!(err, IngestError::Schema { .. }));
}

#[test]
fn counters_conserve_rows_for_every_filter_combination() {
    let body = synthetic_summary(600);
    for drop_zero_length in [false, true] {
        for run_id_filter in [None, Some("runA".to_string())] {
            let opts = IngestOptions {
                run_id_filter: run_id_filter.clone(),
                drop_zero_length,
            };
            let out = ingest(body.as_bytes(), &opts).unwrap();
            assert_eq!(out.counts.source_rows(), 600);
            if drop_zero_length {
                assert!(out.table.iter().all(|r| r.sequence_length > 0));
            }
            if let Some(id) = &run_id_filter {
                assert!(out.table.iter().all(|r| &r.run_id == id));
                assert_eq!(out.run_id_counts.len(), 1);
                assert_eq!(out.run_id_counts[0].count, out.counts.total_reads);
            }
        }
    }
}

#[test]
fn gzip_input_matches_plain_input() {
    let dir = tempdir().unwrap();
    let body = synthetic_summary(300);
    let plain = write_file(dir.path(), "summary.txt", &body);
    let gz_path = dir.path().join("summary.txt.gz");
    let mut enc = GzEncoder::new(fs::File::create(&gz_path).unwrap(), Compression::default());
    enc.write_all(body.as_bytes()).unwrap();
    enc.finish().unwrap();

    let config = |summary: PathBuf| RunConfig {
        summary,
        sample_name: "s".into(),
        threads: 1,
        run_id: None,
        filter_zero_len: true,
        metrics: MetricParams::default(),
    };
    let a = engine::run(config(plain)).unwrap();
    let b = engine::run(config(gz_path)).unwrap();
    assert_eq!(a.ingested.table.records(), b.ingested.table.records());
    assert_eq!(a.ingested.counts, b.ingested.counts);
}

#[test]
fn channel_grid_totals_match_overview() {
    let dir = tempdir().unwrap();
    let path = write_file(dir.path(), "summary.txt", &synthetic_summary(1200));
    let out = engine::run(RunConfig {
        summary: path,
        sample_name: "s".into(),
        threads: 1,
        run_id: None,
        filter_zero_len: false,
        metrics: MetricParams::default(),
    })
    .unwrap();
    let m = &out.metrics;
    assert_eq!(m.channels.total() as u64, m.overview.reads);
    assert_eq!(m.channels.active(), m.overview.active_channels);
    let windows: u64 = m.output_over_time.iter().map(|w| w.reads).sum();
    assert_eq!(windows, m.overview.reads);
    let binned: u64 = m.length_bins.iter().map(|b| b.count).sum();
    assert_eq!(binned, m.overview.reads);
    assert_eq!(GRID_ROWS * GRID_COLS, 512);
}

#[test]
fn run_writes_report_directory_and_zip() {
    let dir = tempdir().unwrap();
    let summary = write_file(dir.path(), "sequencing_summary.txt", &synthetic_summary(500));
    let out = dir.path().join("out");
    kira_nanoqc::cli::run::run(run_args(summary, out.clone())).unwrap();

    let report_dir = out.join("sample_nanoqc");
    let data = fs::read_to_string(report_dir.join("nanoqc_data.txt")).unwrap();
    assert!(data.starts_with(">>Basic Statistics\n"));
    assert!(data.contains("Run type\t1D\n"));
    assert!(data.contains("Reads\t500\n"));
    assert!(data.contains(">>Run ID Counts\n#Run ID\tCount\nrunA\t333\nrunB\t167\n"));
    assert!(data.contains(">>Channel Activity\treads\n"));
    let sections = data
        .lines()
        .filter(|l| l.starts_with(">>") && *l != ">>END_MODULE")
        .count();
    assert_eq!(sections, 10);
    assert_eq!(data.matches(">>END_MODULE\n").count(), sections);

    let summary = fs::read_to_string(report_dir.join("summary.txt")).unwrap();
    assert!(summary.starts_with("total_reads\t500\tsequencing_summary.txt\n"));

    let points = fs::read_to_string(report_dir.join("length_vs_quality.tsv")).unwrap();
    assert_eq!(points.lines().count(), 501);

    assert!(out.join("sample_nanoqc.zip").is_file());
    assert!(!out.join("sample_nanoqc.zip.tmp").exists());
}

#[test]
fn run_surfaces_empty_filter_result() {
    let dir = tempdir().unwrap();
    let summary = write_file(dir.path(), "s.txt", ONE_D);
    let mut args = run_args(summary, dir.path().join("out"));
    args.run_id = Some("missing".into());
    let err = kira_nanoqc::cli::run::run(args).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<IngestError>(),
        Some(IngestError::EmptyResult { total_rows: 3 })
    ));
}

fn config(summary: PathBuf) -> RunConfig {
    RunConfig {
        summary,
        sample_name: "s".into(),
        threads: 1,
        run_id: None,
        filter_zero_len: false,
        metrics: MetricParams::default(),
    }
}

#[test]
fn extreme_lengths_do_not_break_metrics() {
    let dir = tempdir().unwrap();
    let body = format!(
        "{}A\tr\t1\t0\t1\t10\t{}\t9.0\nB\tr\t2\t5\t1\t10\t10\t8.0\n",
        &ONE_D[..ONE_D.find('\n').unwrap() + 1],
        u64::MAX
    );
    let path = write_file(dir.path(), "huge.txt", &body);
    let out = engine::run(config(path)).unwrap();
    let m = &out.metrics;
    assert_eq!(m.overview.reads, 2);
    assert_eq!(m.overview.bases, u64::MAX);
    assert_eq!(m.output_over_time[0].bases, u64::MAX);
    assert!(m.length_dist.bins.len() <= MAX_HIST_BINS + 1);
}

#[test]
fn far_future_end_time_fails_the_run() {
    let dir = tempdir().unwrap();
    let body = format!(
        "{}A\tr\t1\t1e300\t1\t10\t100\t9.0\n",
        &ONE_D[..ONE_D.find('\n').unwrap() + 1]
    );
    let path = write_file(dir.path(), "late.txt", &body);
    let err = engine::run(config(path)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MetricsError>(),
        Some(MetricsError::TooManyWindows { .. })
    ));
}

#[test]
fn run_rejects_sub_minute_time_window() {
    let dir = tempdir().unwrap();
    let summary = write_file(dir.path(), "s.txt", ONE_D);
    let mut args = run_args(summary, dir.path().join("out"));
    args.time_window = 1e-12;
    let err = kira_nanoqc::cli::run::run(args).unwrap_err();
    assert!(err.to_string().contains("--time-window"));
    assert!(!dir.path().join("out").exists());
}
