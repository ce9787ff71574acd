use crate::core::engine::RunOutput;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write(path: &Path, output: &RunOutput) -> Result<()> {
    let mut w = BufWriter::new(File::create(path).with_context(|| "create summary.txt failed")?);
    let counts = &output.ingested.counts;
    let file = &output.ctx.file_name;

    writeln!(w, "{}\t{}\t{}", "total_reads", counts.total_reads, file)?;
    writeln!(
        w,
        "{}\t{}\t{}",
        "discarded_incomplete", counts.discarded_incomplete, file
    )?;
    writeln!(
        w,
        "{}\t{}\t{}",
        "discarded_zero_length", counts.discarded_zero_length, file
    )?;
    writeln!(
        w,
        "{}\t{}\t{}",
        "discarded_filtered", counts.discarded_filtered, file
    )?;
    writeln!(
        w,
        "{}\t{}\t{}",
        "run_type",
        output.ingested.run_type().as_str(),
        file
    )?;
    writeln!(
        w,
        "{}\t{}\t{}",
        "run_ids",
        output.ingested.run_id_counts.len(),
        file
    )?;
    w.flush()?;
    Ok(())
}
