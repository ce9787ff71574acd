pub mod cli;
pub mod core;
pub mod report;

pub use crate::core::error::{IngestError, MetricsError};
pub use crate::core::ingest::{IngestOptions, Ingested, ingest};
pub use crate::core::model::{IngestCounts, ReadRecord, ReadTable, RunIdCount, RunType};
