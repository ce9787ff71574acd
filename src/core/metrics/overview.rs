use crate::core::model::{ReadTable, quantile_sorted, sort_f64};
use std::collections::HashSet;

pub const DESCRIBE_PERCENTILES: [f64; 5] = [0.10, 0.25, 0.50, 0.75, 0.90];

#[derive(Clone, Debug, PartialEq)]
pub struct Overview {
    pub reads: u64,
    pub bases: u64,
    pub events: f64,
    pub active_channels: usize,
    pub run_duration_h: f64,
}

pub fn overview(table: &ReadTable) -> Overview {
    let mut bases = 0u64;
    let mut events = 0.0;
    let mut channels = HashSet::new();
    let mut first_start = f64::INFINITY;
    let mut last_end = f64::NEG_INFINITY;
    for r in table.iter() {
        bases = bases.saturating_add(r.sequence_length);
        events += r.num_events;
        channels.insert(r.channel);
        first_start = first_start.min(r.start_time);
        last_end = last_end.max(r.end_time());
    }
    let run_duration_h = if table.is_empty() {
        0.0
    } else {
        (last_end - first_start) / 3600.0
    };
    Overview {
        reads: table.len() as u64,
        bases,
        events,
        active_channels: channels.len(),
        run_duration_h,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Describe {
    pub count: u64,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    /// Values at `DESCRIBE_PERCENTILES`.
    pub percentiles: [f64; 5],
    pub max: f64,
}

pub fn describe(values: &[f64]) -> Option<Describe> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sort_f64(&mut sorted);
    let n = sorted.len() as f64;
    let mean = sorted.iter().sum::<f64>() / n;
    let std = if sorted.len() > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean) * (v - mean)).sum();
        (ss / (n - 1.0)).sqrt()
    } else {
        0.0
    };
    let mut percentiles = [0.0; 5];
    for (slot, q) in percentiles.iter_mut().zip(DESCRIBE_PERCENTILES) {
        *slot = quantile_sorted(&sorted, q)?;
    }
    Some(Describe {
        count: sorted.len() as u64,
        mean,
        std,
        min: sorted[0],
        percentiles,
        max: sorted[sorted.len() - 1],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_matches_hand_computed() {
        let d = describe(&[4.0, 1.0, 3.0, 2.0, 5.0]).unwrap();
        assert_eq!(d.count, 5);
        assert_eq!(d.mean, 3.0);
        assert!((d.std - 2.5f64.sqrt()).abs() < 1e-12);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.max, 5.0);
        assert_eq!(d.percentiles[2], 3.0);
        assert!((d.percentiles[0] - 1.4).abs() < 1e-12);
    }

    #[test]
    fn base_total_saturates() {
        let src = b"read_id\trun_id\tchannel\tstart_time\tduration\tnum_events\tsequence_length_template\tmean_qscore_template\n\
a\tr\t1\t0\t1\t10\t18446744073709551615\t8\n\
b\tr\t2\t0\t1\t10\t10\t9\n";
        let table = crate::core::ingest::ingest(src, &Default::default()).unwrap().table;
        let ov = overview(&table);
        assert_eq!(ov.reads, 2);
        assert_eq!(ov.bases, u64::MAX);
    }

    #[test]
    fn describe_single_value_has_zero_std() {
        let d = describe(&[7.0]).unwrap();
        assert_eq!(d.std, 0.0);
        assert_eq!(d.percentiles, [7.0; 5]);
        assert!(describe(&[]).is_none());
    }
}
