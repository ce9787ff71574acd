use crate::core::engine::RunOutput;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Sampled read length / mean quality pairs, one read per line.
pub fn write(path: &Path, output: &RunOutput) -> Result<()> {
    let mut w = BufWriter::new(
        File::create(path).with_context(|| "create length_vs_quality.tsv failed")?,
    );
    writeln!(w, "read_id\tsequence_length\tmean_qscore")?;
    for p in &output.metrics.length_vs_quality {
        writeln!(w, "{}\t{}\t{}", p.read_id, p.length, p.qscore)?;
    }
    w.flush()?;
    Ok(())
}
