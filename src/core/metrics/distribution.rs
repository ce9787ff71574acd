use crate::core::metrics::sample::sample;
use crate::core::model::sort_f64;

pub const KDE_GRID: usize = 500;
/// Histograms never get more bins than this; the window widens instead.
pub const MAX_HIST_BINS: usize = 10_000;

#[derive(Clone, Debug)]
pub struct DistParams {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub win_size: f64,
    pub sample: usize,
    pub seed: u64,
    pub kde: bool,
}

impl DistParams {
    pub fn length(sample: usize, seed: u64) -> Self {
        Self {
            min: None,
            max: None,
            win_size: 250.0,
            sample,
            seed,
            kde: true,
        }
    }

    pub fn quality(sample: usize, seed: u64) -> Self {
        Self {
            min: None,
            max: None,
            win_size: 0.1,
            sample,
            seed,
            kde: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct HistBin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
    pub density: f64,
}

#[derive(Clone, Debug)]
pub struct Distribution {
    pub min: f64,
    pub max: f64,
    pub win_size: f64,
    /// Values left after cut-offs and sampling.
    pub n: usize,
    pub bins: Vec<HistBin>,
    pub kde: Vec<(f64, f64)>,
}

/// Density histogram over `[min, max]` with an optional Gaussian KDE.
pub fn distribution(values: &[f64], params: &DistParams) -> Distribution {
    let min = params.min.unwrap_or(0.0);
    let selected: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| *v >= min && params.max.is_none_or(|m| *v <= m))
        .collect();
    let max = params
        .max
        .unwrap_or_else(|| selected.iter().copied().fold(min, f64::max));
    let selected = sample(&selected, params.sample, params.seed);

    let span = max - min;
    let mut win_size = if span < params.win_size {
        span
    } else {
        params.win_size
    };
    if span / win_size > MAX_HIST_BINS as f64 {
        win_size = span / MAX_HIST_BINS as f64;
    }

    let bins = histogram(&selected, min, max, win_size);
    let kde = if params.kde {
        gaussian_kde(&selected, min, max)
    } else {
        Vec::new()
    };
    Distribution {
        min,
        max,
        win_size,
        n: selected.len(),
        bins,
        kde,
    }
}

fn histogram(values: &[f64], min: f64, max: f64, win_size: f64) -> Vec<HistBin> {
    let mut edges = Vec::new();
    if win_size > 0.0 && win_size.is_finite() {
        for k in 0..=MAX_HIST_BINS {
            let e = min + k as f64 * win_size;
            if e >= max {
                break;
            }
            edges.push(e);
        }
    } else {
        edges.push(min);
    }
    edges.push(max);
    if edges.len() < 2 {
        return Vec::new();
    }

    let nbins = edges.len() - 1;
    let mut counts = vec![0u64; nbins];
    for &v in values {
        if v < min || v > max {
            continue;
        }
        // Half-open bins except the last, which also takes `max`.
        let idx = edges.partition_point(|&e| e <= v).saturating_sub(1).min(nbins - 1);
        counts[idx] += 1;
    }
    let total: u64 = counts.iter().sum();
    edges
        .windows(2)
        .zip(counts)
        .map(|(w, count)| {
            let width = w[1] - w[0];
            let density = if total == 0 || width <= 0.0 {
                0.0
            } else {
                count as f64 / (total as f64 * width)
            };
            HistBin {
                lower: w[0],
                upper: w[1],
                count,
                density,
            }
        })
        .collect()
}

/// Gaussian KDE with Scott's bandwidth, evaluated on `KDE_GRID` points.
/// Empty when the data has no spread.
pub fn gaussian_kde(values: &[f64], min: f64, max: f64) -> Vec<(f64, f64)> {
    if values.len() < 2 || max <= min {
        return Vec::new();
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
    let bw = var.sqrt() * n.powf(-0.2);
    if bw <= 0.0 || !bw.is_finite() {
        return Vec::new();
    }
    let mut sorted = values.to_vec();
    sort_f64(&mut sorted);
    let norm = 1.0 / (n * bw * (2.0 * std::f64::consts::PI).sqrt());
    let reach = 8.0 * bw;
    let step = (max - min) / (KDE_GRID - 1) as f64;
    (0..KDE_GRID)
        .map(|i| {
            let x = min + i as f64 * step;
            let lo = sorted.partition_point(|&v| v < x - reach);
            let hi = sorted.partition_point(|&v| v <= x + reach);
            let sum: f64 = sorted[lo..hi]
                .iter()
                .map(|v| {
                    let z = (x - v) / bw;
                    (-0.5 * z * z).exp()
                })
                .sum();
            (x, sum * norm)
        })
        .collect()
}
