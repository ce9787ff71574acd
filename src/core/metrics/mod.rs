use crate::core::error::MetricsError;
use crate::core::model::{Level, ReadTable};

mod bins;
mod channels;
mod distribution;
mod joint;
mod over_time;
mod overview;
mod sample;

pub use bins::{BinRow, LENGTH_BINS, QUAL_BINS, cut_counts};
pub use channels::{ChannelGrid, GRID_COLS, GRID_ROWS, channel_activity};
pub use distribution::{
    DistParams, Distribution, HistBin, KDE_GRID, MAX_HIST_BINS, distribution, gaussian_kde,
};
pub use joint::{JointParams, JointPoint, length_vs_quality};
pub use over_time::{
    MAX_WINDOWS, MIN_TIME_WINDOW_H, OutputWindow, QualitySpread, QualityWindow, output_over_time,
    quality_over_time,
};
pub use overview::{DESCRIBE_PERCENTILES, Describe, Overview, describe, overview};
pub use sample::{sample, sample_indices};

#[derive(Clone, Debug)]
pub struct MetricParams {
    pub level: Level,
    pub time_window_h: f64,
    pub cumulative: bool,
    pub sample: usize,
    pub seed: u64,
}

impl Default for MetricParams {
    fn default() -> Self {
        Self {
            level: Level::Reads,
            time_window_h: 0.25,
            cumulative: false,
            sample: 100_000,
            seed: 42,
        }
    }
}

#[derive(Clone, Debug)]
pub struct FinalMetrics {
    pub overview: Overview,
    pub qscore: Option<Describe>,
    pub length: Option<Describe>,
    pub length_bins: Vec<BinRow>,
    pub qual_bins: Vec<BinRow>,
    pub channels: ChannelGrid,
    pub length_dist: Distribution,
    pub qual_dist: Distribution,
    pub output_over_time: Vec<OutputWindow>,
    pub quality_over_time: Vec<QualityWindow>,
    pub length_vs_quality: Vec<JointPoint>,
}

pub fn compute(table: &ReadTable, params: &MetricParams) -> Result<FinalMetrics, MetricsError> {
    let qscores: Vec<f64> = table.iter().map(|r| r.mean_qscore).collect();
    let lengths: Vec<f64> = table.iter().map(|r| r.sequence_length as f64).collect();

    Ok(FinalMetrics {
        overview: overview(table),
        qscore: describe(&qscores),
        length: describe(&lengths),
        length_bins: cut_counts(lengths.iter().copied(), &LENGTH_BINS),
        qual_bins: cut_counts(qscores.iter().copied(), &QUAL_BINS),
        channels: channel_activity(table, params.level),
        length_dist: distribution(&lengths, &DistParams::length(params.sample, params.seed)),
        qual_dist: distribution(&qscores, &DistParams::quality(params.sample, params.seed)),
        output_over_time: output_over_time(table, params.time_window_h, params.cumulative)?,
        quality_over_time: quality_over_time(table, params.time_window_h)?,
        length_vs_quality: length_vs_quality(
            table,
            &JointParams {
                sample: params.sample,
                seed: params.seed,
                ..Default::default()
            },
        ),
    })
}
