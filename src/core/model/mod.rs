use std::collections::HashMap;

pub const MAX_CHANNEL: u16 = 512;

/// Bases per second assumed when a summary table carries no `duration`.
pub const BASES_PER_SECOND: f64 = 450.0;
/// Events per base assumed when a summary table carries no `num_events`.
pub const EVENTS_PER_BASE: f64 = 1.8;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunType {
    OneD,
    TwoD,
}

impl RunType {
    pub fn as_str(self) -> &'static str {
        match self {
            RunType::OneD => "1D",
            RunType::TwoD => "2D",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Level {
    Reads,
    Bases,
    Events,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Reads => "reads",
            Level::Bases => "bases",
            Level::Events => "events",
        }
    }
}

/// One row of the canonical table.
#[derive(Clone, Debug, PartialEq)]
pub struct ReadRecord {
    pub read_id: String,
    pub run_id: String,
    pub channel: u16,
    pub start_time: f64,
    pub duration: f64,
    pub num_events: f64,
    pub sequence_length: u64,
    pub mean_qscore: f64,
}

impl ReadRecord {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }
}

/// Normalized reads in source order, indexed by `read_id`.
#[derive(Clone, Debug)]
pub struct ReadTable {
    run_type: RunType,
    records: Vec<ReadRecord>,
    index: HashMap<String, usize>,
}

impl ReadTable {
    /// Builds the table, returning the first repeated `read_id` on conflict.
    pub(crate) fn build(run_type: RunType, records: Vec<ReadRecord>) -> Result<Self, String> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, rec) in records.iter().enumerate() {
            if index.insert(rec.read_id.clone(), i).is_some() {
                return Err(rec.read_id.clone());
            }
        }
        Ok(Self {
            run_type,
            records,
            index,
        })
    }

    pub fn run_type(&self) -> RunType {
        self.run_type
    }

    pub fn records(&self) -> &[ReadRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, read_id: &str) -> Option<&ReadRecord> {
        self.index.get(read_id).map(|&i| &self.records[i])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ReadRecord> {
        self.records.iter()
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunIdCount {
    pub run_id: String,
    pub count: u64,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct IngestCounts {
    pub total_reads: u64,
    pub discarded_incomplete: u64,
    pub discarded_zero_length: u64,
    pub discarded_filtered: u64,
}

impl IngestCounts {
    pub fn source_rows(&self) -> u64 {
        self.total_reads
            + self.discarded_incomplete
            + self.discarded_zero_length
            + self.discarded_filtered
    }
}

#[derive(Debug)]
pub struct FinalizeContext {
    pub file_name: String,
    pub sample_name: String,
    pub run_id_filter: Option<String>,
    pub filter_zero_len: bool,
}

/// Linear interpolation between order statistics; `sorted` must be ascending.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

pub fn sort_f64(values: &mut [f64]) {
    values.sort_by(|a, b| a.total_cmp(b));
}
