pub mod engine;
pub mod error;
pub mod ingest;
pub mod io;
pub mod metrics;
pub mod model;
pub mod schema;
pub mod tsv;
