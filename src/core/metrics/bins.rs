pub const LENGTH_BINS: [f64; 11] = [
    -1.0,
    0.0,
    25.0,
    50.0,
    100.0,
    500.0,
    1_000.0,
    5_000.0,
    10_000.0,
    100_000.0,
    10_000_000.0,
];

pub const QUAL_BINS: [f64; 13] = [
    -1.0, 0.0, 2.0, 4.0, 6.0, 8.0, 10.0, 12.0, 14.0, 16.0, 18.0, 20.0, 40.0,
];

#[derive(Clone, Debug, PartialEq)]
pub struct BinRow {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

impl BinRow {
    pub fn label(&self) -> String {
        format!("({}, {}]", self.lower, self.upper)
    }
}

/// Counts values per right-closed interval `(edges[i], edges[i + 1]]`.
/// Values outside every interval are ignored. `edges` must be ascending.
pub fn cut_counts<I>(values: I, edges: &[f64]) -> Vec<BinRow>
where
    I: IntoIterator<Item = f64>,
{
    if edges.len() < 2 {
        return Vec::new();
    }
    let mut counts = vec![0u64; edges.len() - 1];
    for v in values {
        let idx = edges.partition_point(|&e| e < v);
        if idx == 0 || idx == edges.len() {
            continue;
        }
        counts[idx - 1] += 1;
    }
    edges
        .windows(2)
        .zip(counts)
        .map(|(w, count)| BinRow {
            lower: w[0],
            upper: w[1],
            count,
        })
        .collect()
}
