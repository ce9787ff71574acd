use crate::core::error::IngestError;
use crate::core::model::{BASES_PER_SECOND, EVENTS_PER_BASE, RunType};
use crate::core::tsv::TsvTable;

pub const KEY_COLUMN: &str = "read_id";

/// Where a canonical numeric field comes from for a given schema.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldSource {
    Column(&'static str),
    LengthDividedBy(f64),
    LengthTimes(f64),
}

#[derive(Clone, Copy, Debug)]
pub struct SchemaMatcher {
    pub run_type: RunType,
    pub required: &'static [&'static str],
    pub length: &'static str,
    pub qscore: &'static str,
    pub duration: FieldSource,
    pub num_events: FieldSource,
}

pub const ONE_D: SchemaMatcher = SchemaMatcher {
    run_type: RunType::OneD,
    required: &[
        "run_id",
        "channel",
        "start_time",
        "duration",
        "num_events",
        "sequence_length_template",
        "mean_qscore_template",
    ],
    length: "sequence_length_template",
    qscore: "mean_qscore_template",
    duration: FieldSource::Column("duration"),
    num_events: FieldSource::Column("num_events"),
};

pub const TWO_D: SchemaMatcher = SchemaMatcher {
    run_type: RunType::TwoD,
    required: &[
        "run_id",
        "channel",
        "start_time",
        "sequence_length_2d",
        "mean_qscore_2d",
    ],
    length: "sequence_length_2d",
    qscore: "mean_qscore_2d",
    duration: FieldSource::LengthDividedBy(BASES_PER_SECOND),
    num_events: FieldSource::LengthTimes(EVENTS_PER_BASE),
};

/// Tried in order; the first complete match wins.
pub const SCHEMAS: [SchemaMatcher; 2] = [ONE_D, TWO_D];

#[derive(Clone, Copy, Debug)]
pub enum ResolvedSource {
    Column(usize),
    LengthDividedBy(f64),
    LengthTimes(f64),
}

/// Column positions of the canonical fields in one concrete header.
#[derive(Clone, Copy, Debug)]
pub struct ResolvedSchema {
    pub run_type: RunType,
    pub read_id: usize,
    pub run_id: usize,
    pub channel: usize,
    pub start_time: usize,
    pub length: usize,
    pub qscore: usize,
    pub duration: ResolvedSource,
    pub num_events: ResolvedSource,
}

impl SchemaMatcher {
    pub fn first_missing(&self, table: &TsvTable<'_>) -> Option<&'static str> {
        self.required
            .iter()
            .copied()
            .find(|name| table.column(name).is_none())
    }

    fn resolve(&self, table: &TsvTable<'_>, read_id: usize) -> Option<ResolvedSchema> {
        let source = |s: FieldSource| -> Option<ResolvedSource> {
            Some(match s {
                FieldSource::Column(name) => ResolvedSource::Column(table.column(name)?),
                FieldSource::LengthDividedBy(k) => ResolvedSource::LengthDividedBy(k),
                FieldSource::LengthTimes(k) => ResolvedSource::LengthTimes(k),
            })
        };
        Some(ResolvedSchema {
            run_type: self.run_type,
            read_id,
            run_id: table.column("run_id")?,
            channel: table.column("channel")?,
            start_time: table.column("start_time")?,
            length: table.column(self.length)?,
            qscore: table.column(self.qscore)?,
            duration: source(self.duration)?,
            num_events: source(self.num_events)?,
        })
    }
}

pub fn detect(table: &TsvTable<'_>) -> Result<ResolvedSchema, IngestError> {
    let Some(matcher) = SCHEMAS.iter().find(|m| m.first_missing(table).is_none()) else {
        let missing = SCHEMAS[0].first_missing(table).unwrap_or(KEY_COLUMN);
        return Err(IngestError::Schema { missing });
    };
    let read_id = table.column(KEY_COLUMN).ok_or(IngestError::Schema {
        missing: KEY_COLUMN,
    })?;
    matcher.resolve(table, read_id).ok_or(IngestError::Schema {
        missing: matcher.required[0],
    })
}
