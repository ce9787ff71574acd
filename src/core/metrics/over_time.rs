use crate::core::error::MetricsError;
use crate::core::model::{ReadTable, quantile_sorted, sort_f64};

/// Upper bound on the number of windows in one over-time table.
pub const MAX_WINDOWS: usize = 100_000;
/// Smallest window size accepted on the command line (one minute).
pub const MIN_TIME_WINDOW_H: f64 = 1.0 / 60.0;

#[derive(Clone, Debug, PartialEq)]
pub struct OutputWindow {
    pub start_h: f64,
    pub reads: u64,
    pub bases: u64,
    pub events: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QualitySpread {
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub q1: f64,
    pub q3: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct QualityWindow {
    pub start_h: f64,
    pub reads: u64,
    /// `None` when no read ended inside the window.
    pub spread: Option<QualitySpread>,
}

/// Window index of every read by end time in hours. Windows start at 0 and the
/// last one contains the latest end time.
fn window_slots(
    table: &ReadTable,
    win_size_h: f64,
) -> Result<Option<(usize, Vec<usize>)>, MetricsError> {
    if !(win_size_h > 0.0 && win_size_h.is_finite()) || table.is_empty() {
        return Ok(None);
    }
    let slot = |end_s: f64| (end_s / 3600.0 / win_size_h).floor();
    let last = table
        .iter()
        .map(|r| slot(r.end_time()))
        .fold(0.0, f64::max);
    let windows = last + 1.0;
    if !windows.is_finite() || windows > MAX_WINDOWS as f64 {
        return Err(MetricsError::TooManyWindows {
            window_h: win_size_h,
            windows,
            max: MAX_WINDOWS,
        });
    }
    let slots = table.iter().map(|r| slot(r.end_time()) as usize).collect();
    Ok(Some((windows as usize, slots)))
}

pub fn output_over_time(
    table: &ReadTable,
    win_size_h: f64,
    cumulative: bool,
) -> Result<Vec<OutputWindow>, MetricsError> {
    let Some((windows, slots)) = window_slots(table, win_size_h)? else {
        return Ok(Vec::new());
    };
    let mut out: Vec<OutputWindow> = (0..windows)
        .map(|k| OutputWindow {
            start_h: k as f64 * win_size_h,
            reads: 0,
            bases: 0,
            events: 0.0,
        })
        .collect();
    for (r, slot) in table.iter().zip(slots) {
        let w = &mut out[slot];
        w.reads += 1;
        w.bases = w.bases.saturating_add(r.sequence_length);
        w.events += r.num_events;
    }
    if cumulative {
        for k in 1..out.len() {
            let (prev, rest) = out.split_at_mut(k);
            let p = &prev[k - 1];
            rest[0].reads += p.reads;
            rest[0].bases = rest[0].bases.saturating_add(p.bases);
            rest[0].events += p.events;
        }
    }
    Ok(out)
}

pub fn quality_over_time(
    table: &ReadTable,
    win_size_h: f64,
) -> Result<Vec<QualityWindow>, MetricsError> {
    let Some((windows, slots)) = window_slots(table, win_size_h)? else {
        return Ok(Vec::new());
    };
    let mut buckets: Vec<Vec<f64>> = vec![Vec::new(); windows];
    for (r, slot) in table.iter().zip(slots) {
        buckets[slot].push(r.mean_qscore);
    }
    Ok(buckets
        .into_iter()
        .enumerate()
        .map(|(k, mut q)| {
            sort_f64(&mut q);
            let spread = (!q.is_empty()).then(|| QualitySpread {
                median: quantile_sorted(&q, 0.5).unwrap_or(f64::NAN),
                min: q[0],
                max: q[q.len() - 1],
                q1: quantile_sorted(&q, 0.25).unwrap_or(f64::NAN),
                q3: quantile_sorted(&q, 0.75).unwrap_or(f64::NAN),
            });
            QualityWindow {
                start_h: k as f64 * win_size_h,
                reads: q.len() as u64,
                spread,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ingest::{IngestOptions, ingest};

    fn table() -> ReadTable {
        // end times: 0.1h, 0.2h, 0.6h, 0.6h
        let src = b"read_id\trun_id\tchannel\tstart_time\tduration\tnum_events\tsequence_length_template\tmean_qscore_template\n\
a\tr\t1\t300\t60\t10\t100\t8\n\
b\tr\t2\t700\t20\t20\t200\t10\n\
c\tr\t3\t2000\t160\t30\t300\t12\n\
d\tr\t4\t2100\t60\t40\t400\t6\n";
        ingest(src, &IngestOptions::default()).unwrap().table
    }

    #[test]
    fn windows_conserve_reads() {
        let t = table();
        let w = output_over_time(&t, 0.25, false).unwrap();
        assert_eq!(w.len(), 3);
        assert_eq!(w[0].reads, 2);
        assert_eq!(w[1].reads, 0);
        assert_eq!(w[2].reads, 2);
        assert_eq!(w[2].bases, 700);
        assert_eq!(w.iter().map(|x| x.reads).sum::<u64>(), t.len() as u64);
    }

    #[test]
    fn cumulative_windows_accumulate() {
        let w = output_over_time(&table(), 0.25, true).unwrap();
        assert_eq!(w.iter().map(|x| x.reads).collect::<Vec<_>>(), vec![2, 2, 4]);
        assert_eq!(w[2].events, 100.0);
    }

    #[test]
    fn quality_windows_report_spread() {
        let w = quality_over_time(&table(), 0.25).unwrap();
        assert_eq!(w.len(), 3);
        let first = w[0].spread.as_ref().unwrap();
        assert_eq!(first.median, 9.0);
        assert_eq!(first.min, 8.0);
        assert_eq!(first.max, 10.0);
        assert!(w[1].spread.is_none());
        assert_eq!(w[2].spread.as_ref().unwrap().q1, 7.5);
    }

    #[test]
    fn bad_window_size_yields_nothing() {
        assert!(output_over_time(&table(), 0.0, false).unwrap().is_empty());
        assert!(quality_over_time(&table(), f64::NAN).unwrap().is_empty());
    }

    fn late_read(start_time: &str, length: &str) -> ReadTable {
        let src = format!(
            "read_id\trun_id\tchannel\tstart_time\tduration\tnum_events\tsequence_length_template\tmean_qscore_template\n\
a\tr\t1\t0\t1\t10\t{length}\t8\n\
b\tr\t2\t{start_time}\t1\t10\t{length}\t9\n"
        );
        ingest(src.as_bytes(), &IngestOptions::default()).unwrap().table
    }

    #[test]
    fn huge_end_time_is_an_error() {
        let t = late_read("1e300", "100");
        let err = output_over_time(&t, 0.25, false).unwrap_err();
        assert!(matches!(err, MetricsError::TooManyWindows { max: MAX_WINDOWS, .. }));
        assert!(quality_over_time(&t, 0.25).is_err());
    }

    #[test]
    fn tiny_window_is_an_error() {
        // 48 h run
        let t = late_read("172800", "100");
        assert!(output_over_time(&t, 1e-12, false).is_err());
        let w = output_over_time(&t, MIN_TIME_WINDOW_H, false).unwrap();
        assert_eq!(w.len(), 48 * 60 + 1);
        assert_eq!(w.iter().map(|x| x.reads).sum::<u64>(), 2);
    }

    #[test]
    fn window_bases_saturate() {
        let t = late_read("100", "18446744073709551615");
        let w = output_over_time(&t, 0.25, true).unwrap();
        assert_eq!(w.len(), 1);
        assert_eq!(w[0].bases, u64::MAX);
    }
}
