use crate::core::engine::RunOutput;
use crate::core::metrics::{
    BinRow, DESCRIBE_PERCENTILES, Distribution, FinalMetrics, GRID_COLS, GRID_ROWS,
};
use crate::core::model::Level;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub fn write(path: &Path, output: &RunOutput) -> Result<()> {
    let mut w =
        BufWriter::new(File::create(path).with_context(|| "create nanoqc_data.txt failed")?);
    write_to(&mut w, output)?;
    w.flush()?;
    Ok(())
}

pub fn write_to(w: &mut dyn Write, output: &RunOutput) -> Result<()> {
    let metrics = &output.metrics;
    write_basic(w, output)?;
    write_run_ids(w, output)?;
    write_describe(w, metrics)?;
    write_bins(w, "Read Length Bins", "Sequence length range", &metrics.length_bins)?;
    write_bins(w, "Read Quality Bins", "Sequence quality range", &metrics.qual_bins)?;
    write_channels(w, metrics)?;
    write_distribution(w, "Read Length Distribution", &metrics.length_dist)?;
    write_distribution(w, "Read Quality Distribution", &metrics.qual_dist)?;
    write_output_over_time(w, metrics)?;
    write_quality_over_time(w, metrics)?;
    Ok(())
}

fn write_basic(w: &mut dyn Write, output: &RunOutput) -> Result<()> {
    let counts = &output.ingested.counts;
    let ov = &output.metrics.overview;
    writeln!(w, ">>Basic Statistics")?;
    writeln!(w, "#Measure\tValue")?;
    writeln!(w, "Filename\t{}", output.ctx.file_name)?;
    writeln!(w, "Run type\t{}", output.ingested.run_type().as_str())?;
    writeln!(
        w,
        "Run ID filter\t{}",
        output.ctx.run_id_filter.as_deref().unwrap_or("none")
    )?;
    writeln!(w, "Zero length filter\t{}", output.ctx.filter_zero_len)?;
    writeln!(w, "Rows in source\t{}", counts.source_rows())?;
    writeln!(w, "Discarded incomplete\t{}", counts.discarded_incomplete)?;
    writeln!(w, "Discarded zero length\t{}", counts.discarded_zero_length)?;
    writeln!(w, "Discarded run ID\t{}", counts.discarded_filtered)?;
    writeln!(w, "Reads\t{}", ov.reads)?;
    writeln!(w, "Bases\t{}", ov.bases)?;
    writeln!(w, "Events\t{}", fmt_num(ov.events))?;
    writeln!(w, "Active Channels\t{}", ov.active_channels)?;
    writeln!(w, "Run Duration (h)\t{:.3}", ov.run_duration_h)?;
    writeln!(w, ">>END_MODULE")?;
    Ok(())
}

fn write_run_ids(w: &mut dyn Write, output: &RunOutput) -> Result<()> {
    writeln!(w, ">>Run ID Counts")?;
    writeln!(w, "#Run ID\tCount")?;
    for row in &output.ingested.run_id_counts {
        writeln!(w, "{}\t{}", row.run_id, row.count)?;
    }
    writeln!(w, ">>END_MODULE")?;
    Ok(())
}

fn write_describe(w: &mut dyn Write, metrics: &FinalMetrics) -> Result<()> {
    writeln!(w, ">>Read Quality and Length Summary")?;
    writeln!(
        w,
        "#Statistic\tQuality score distribution\tRead length distribution"
    )?;
    let (Some(q), Some(l)) = (&metrics.qscore, &metrics.length) else {
        writeln!(w, ">>END_MODULE")?;
        return Ok(());
    };
    writeln!(w, "count\t{}\t{}", q.count, l.count)?;
    stat_row(w, "mean", q.mean, l.mean)?;
    stat_row(w, "std", q.std, l.std)?;
    stat_row(w, "min", q.min, l.min)?;
    for (i, p) in DESCRIBE_PERCENTILES.iter().enumerate() {
        stat_row(
            w,
            &format!("{:.0}%", p * 100.0),
            q.percentiles[i],
            l.percentiles[i],
        )?;
    }
    stat_row(w, "max", q.max, l.max)?;
    writeln!(w, ">>END_MODULE")?;
    Ok(())
}

fn stat_row(w: &mut dyn Write, name: &str, q: f64, l: f64) -> Result<()> {
    writeln!(w, "{}\t{:.3}\t{:.3}", name, q, l)?;
    Ok(())
}

fn write_bins(w: &mut dyn Write, title: &str, label: &str, rows: &[BinRow]) -> Result<()> {
    writeln!(w, ">>{}", title)?;
    writeln!(w, "#{}\tCount", label)?;
    for row in rows {
        writeln!(w, "{}\t{}", row.label(), row.count)?;
    }
    writeln!(w, ">>END_MODULE")?;
    Ok(())
}

fn write_channels(w: &mut dyn Write, metrics: &FinalMetrics) -> Result<()> {
    let grid = &metrics.channels;
    let title = match grid.level {
        Level::Reads => "Reads per channel",
        Level::Bases => "Bases per channel",
        Level::Events => "Events per channel",
    };
    writeln!(w, ">>Channel Activity\t{}", grid.level.as_str())?;
    writeln!(w, "#{} ({}x{} grid, channel 1 top left)", title, GRID_ROWS, GRID_COLS)?;
    for r in 0..GRID_ROWS {
        let line: Vec<String> = grid.row(r).iter().map(|v| fmt_num(*v)).collect();
        writeln!(w, "{}", line.join("\t"))?;
    }
    writeln!(w, ">>END_MODULE")?;
    Ok(())
}

fn write_distribution(w: &mut dyn Write, title: &str, dist: &Distribution) -> Result<()> {
    writeln!(
        w,
        ">>{}\tmin={}\tmax={}\twin_size={}\tn={}",
        title,
        fmt_num(dist.min),
        fmt_num(dist.max),
        fmt_num(dist.win_size),
        dist.n
    )?;
    writeln!(w, "#Lower\tUpper\tCount\tDensity")?;
    for b in &dist.bins {
        writeln!(
            w,
            "{}\t{}\t{}\t{:.6e}",
            fmt_num(b.lower),
            fmt_num(b.upper),
            b.count,
            b.density
        )?;
    }
    if !dist.kde.is_empty() {
        writeln!(w, "#KDE x\tDensity")?;
        for (x, y) in &dist.kde {
            writeln!(w, "{:.4}\t{:.6e}", x, y)?;
        }
    }
    writeln!(w, ">>END_MODULE")?;
    Ok(())
}

fn write_output_over_time(w: &mut dyn Write, metrics: &FinalMetrics) -> Result<()> {
    writeln!(w, ">>Output Over Time")?;
    writeln!(w, "#Experiment time (h)\tReads\tBases\tEvents")?;
    for row in &metrics.output_over_time {
        writeln!(
            w,
            "{}\t{}\t{}\t{}",
            fmt_num(row.start_h),
            row.reads,
            row.bases,
            fmt_num(row.events)
        )?;
    }
    writeln!(w, ">>END_MODULE")?;
    Ok(())
}

fn write_quality_over_time(w: &mut dyn Write, metrics: &FinalMetrics) -> Result<()> {
    writeln!(w, ">>Quality Over Time")?;
    writeln!(w, "#Experiment time (h)\tReads\tMedian\tMin\tMax\tQ1\tQ3")?;
    for row in &metrics.quality_over_time {
        match &row.spread {
            Some(s) => writeln!(
                w,
                "{}\t{}\t{:.3}\t{:.3}\t{:.3}\t{:.3}\t{:.3}",
                fmt_num(row.start_h),
                row.reads,
                s.median,
                s.min,
                s.max,
                s.q1,
                s.q3
            )?,
            None => writeln!(w, "{}\t0\tNA\tNA\tNA\tNA\tNA", fmt_num(row.start_h))?,
        }
    }
    writeln!(w, ">>END_MODULE")?;
    Ok(())
}

fn fmt_num(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{}", v as i64)
    } else {
        let s = format!("{:.4}", v);
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::fmt_num;

    #[test]
    fn numbers_are_compact() {
        assert_eq!(fmt_num(3.0), "3");
        assert_eq!(fmt_num(0.25), "0.25");
        assert_eq!(fmt_num(1620.0), "1620");
        assert_eq!(fmt_num(2.0 / 3.0), "0.6667");
    }
}
