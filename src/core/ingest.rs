use crate::core::error::IngestError;
use crate::core::model::{IngestCounts, MAX_CHANNEL, ReadRecord, ReadTable, RunIdCount, RunType};
use crate::core::schema::{self, ResolvedSchema, ResolvedSource};
use crate::core::tsv::{self, TsvRow};
use std::collections::HashMap;
use tracing::{debug, info};

/// Markers treated as a missing value, on top of the empty field.
const NA_VALUES: [&str; 17] = [
    "NA", "N/A", "n/a", "#N/A", "#NA", "<NA>", "NaN", "nan", "-NaN", "-nan", "NULL", "null",
    "None", "1.#IND", "-1.#IND", "1.#QNAN", "-1.#QNAN",
];

#[derive(Clone, Debug, Default)]
pub struct IngestOptions {
    pub run_id_filter: Option<String>,
    pub drop_zero_length: bool,
}

#[derive(Clone, Debug)]
pub struct Ingested {
    pub table: ReadTable,
    pub run_id_counts: Vec<RunIdCount>,
    pub counts: IngestCounts,
}

impl Ingested {
    pub fn run_type(&self) -> RunType {
        self.table.run_type()
    }
}

/// Parses a sequencing summary and normalizes it into the canonical read table.
///
/// Rows with a missing or unparseable required value are dropped and counted.
/// Zero-length reads are removed before the run id filter, so a row matching
/// both is counted as zero-length.
pub fn ingest(source: &[u8], opts: &IngestOptions) -> Result<Ingested, IngestError> {
    let table = tsv::parse(source)?;
    let source_rows = table.rows.len() as u64;
    info!(rows = source_rows, "reads found in initial file");

    let schema = schema::detect(&table)?;
    info!(run_type = schema.run_type.as_str(), "all required columns found");

    let mut records = Vec::with_capacity(table.rows.len());
    for row in &table.rows {
        match normalize_row(row, &schema) {
            Some(rec) => records.push(rec),
            None => debug!(line = row.line, "dropping incomplete row"),
        }
    }
    let discarded_incomplete = source_rows - records.len() as u64;
    if discarded_incomplete > 0 {
        info!(discarded = discarded_incomplete, "incomplete rows dropped");
    }

    let mut discarded_zero_length = 0;
    if opts.drop_zero_length {
        let (kept, removed) = drop_zero_length(records);
        records = kept;
        discarded_zero_length = removed;
        info!(discarded = removed, "zero length reads filtered out");
    }

    let mut discarded_filtered = 0;
    if let Some(run_id) = opts.run_id_filter.as_deref() {
        let (kept, removed) = keep_run_id(records, run_id);
        records = kept;
        discarded_filtered = removed;
        info!(run_id, discarded = removed, "selected reads by run id");
    }

    let run_id_counts = count_run_ids(&records);
    info!(run_ids = run_id_counts.len(), "counted reads per run id");

    let table = ReadTable::build(schema.run_type, records)
        .map_err(|read_id| IngestError::DuplicateKey { read_id })?;
    if table.is_empty() {
        return Err(IngestError::EmptyResult {
            total_rows: source_rows,
        });
    }
    info!(reads = table.len(), "total valid reads");

    Ok(Ingested {
        counts: IngestCounts {
            total_reads: table.len() as u64,
            discarded_incomplete,
            discarded_zero_length,
            discarded_filtered,
        },
        table,
        run_id_counts,
    })
}

pub fn drop_zero_length(records: Vec<ReadRecord>) -> (Vec<ReadRecord>, u64) {
    let before = records.len();
    let kept: Vec<ReadRecord> = records
        .into_iter()
        .filter(|r| r.sequence_length > 0)
        .collect();
    let removed = (before - kept.len()) as u64;
    (kept, removed)
}

pub fn keep_run_id(records: Vec<ReadRecord>, run_id: &str) -> (Vec<ReadRecord>, u64) {
    let before = records.len();
    let kept: Vec<ReadRecord> = records
        .into_iter()
        .filter(|r| r.run_id == run_id)
        .collect();
    let removed = (before - kept.len()) as u64;
    (kept, removed)
}

/// Reads per run id, most frequent first; ties keep first-seen order.
pub fn count_run_ids(records: &[ReadRecord]) -> Vec<RunIdCount> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<RunIdCount> = Vec::new();
    for rec in records {
        let i = *slots.entry(rec.run_id.as_str()).or_insert_with(|| {
            out.push(RunIdCount {
                run_id: rec.run_id.clone(),
                count: 0,
            });
            out.len() - 1
        });
        out[i].count += 1;
    }
    out.sort_by(|a, b| b.count.cmp(&a.count));
    out
}

fn normalize_row(row: &TsvRow<'_>, schema: &ResolvedSchema) -> Option<ReadRecord> {
    let read_id = value(row, schema.read_id)?;
    let run_id = value(row, schema.run_id)?;
    let channel = parse_channel(value(row, schema.channel)?)?;
    let start_time = parse_non_negative(value(row, schema.start_time)?)?;
    let sequence_length = parse_length(value(row, schema.length)?)?;
    let mean_qscore = parse_finite(value(row, schema.qscore)?)?;
    let duration = derived(row, schema.duration, sequence_length)?;
    let num_events = derived(row, schema.num_events, sequence_length)?;
    Some(ReadRecord {
        read_id: read_id.to_string(),
        run_id: run_id.to_string(),
        channel,
        start_time,
        duration,
        num_events,
        sequence_length,
        mean_qscore,
    })
}

fn value<'a>(row: &TsvRow<'a>, col: usize) -> Option<&'a str> {
    let v = row.get(col)?.trim();
    if v.is_empty() || NA_VALUES.contains(&v) {
        None
    } else {
        Some(v)
    }
}

fn derived(row: &TsvRow<'_>, source: ResolvedSource, length: u64) -> Option<f64> {
    match source {
        ResolvedSource::Column(c) => parse_non_negative(value(row, c)?),
        ResolvedSource::LengthDividedBy(k) => Some(length as f64 / k),
        ResolvedSource::LengthTimes(k) => Some(length as f64 * k),
    }
}

fn parse_finite(v: &str) -> Option<f64> {
    v.parse::<f64>().ok().filter(|x| x.is_finite())
}

fn parse_non_negative(v: &str) -> Option<f64> {
    parse_finite(v).filter(|x| *x >= 0.0)
}

fn parse_channel(v: &str) -> Option<u16> {
    let c = v.parse::<u16>().ok().or_else(|| integral(v)?.try_into().ok())?;
    (1..=MAX_CHANNEL).contains(&c).then_some(c)
}

fn parse_length(v: &str) -> Option<u64> {
    v.parse::<u64>().ok().or_else(|| integral(v))
}

/// Accepts integral floats such as `100.0`.
fn integral(v: &str) -> Option<u64> {
    let x = parse_non_negative(v)?;
    (x.fract() == 0.0 && x <= u64::MAX as f64).then_some(x as u64)
}
