use crate::core::metrics::sample::sample_indices;
use crate::core::model::ReadTable;

#[derive(Clone, Debug, Default)]
pub struct JointParams {
    pub min_len: Option<u64>,
    pub max_len: Option<u64>,
    pub min_qual: Option<f64>,
    pub max_qual: Option<f64>,
    pub sample: usize,
    pub seed: u64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct JointPoint {
    pub read_id: String,
    pub length: u64,
    pub qscore: f64,
}

/// Length and mean quality pairs within the cut-offs, seeded-subsampled in
/// table order.
pub fn length_vs_quality(table: &ReadTable, params: &JointParams) -> Vec<JointPoint> {
    let kept: Vec<usize> = table
        .iter()
        .enumerate()
        .filter(|(_, r)| {
            params.min_len.is_none_or(|m| r.sequence_length >= m)
                && params.max_len.is_none_or(|m| r.sequence_length <= m)
                && params.min_qual.is_none_or(|m| r.mean_qscore >= m)
                && params.max_qual.is_none_or(|m| r.mean_qscore <= m)
        })
        .map(|(i, _)| i)
        .collect();
    let records = table.records();
    sample_indices(kept.len(), params.sample, params.seed)
        .into_iter()
        .map(|i| {
            let r = &records[kept[i]];
            JointPoint {
                read_id: r.read_id.clone(),
                length: r.sequence_length,
                qscore: r.mean_qscore,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ingest::{IngestOptions, ingest};

    #[test]
    fn cutoffs_and_sampling() {
        let mut src = String::from(
            "read_id\trun_id\tchannel\tstart_time\tduration\tnum_events\tsequence_length_template\tmean_qscore_template\n",
        );
        for i in 0..50 {
            src.push_str(&format!("r{i}\tx\t1\t0\t1\t1\t{}\t{}\n", i * 10, i % 15));
        }
        let table = ingest(src.as_bytes(), &IngestOptions::default())
            .unwrap()
            .table;

        let params = JointParams {
            min_len: Some(100),
            max_qual: Some(10.0),
            ..Default::default()
        };
        let all = length_vs_quality(&table, &params);
        assert!(all.iter().all(|p| p.length >= 100 && p.qscore <= 10.0));
        assert_eq!(all[0].read_id, "r10");

        let sampled = length_vs_quality(
            &table,
            &JointParams {
                sample: 5,
                seed: 3,
                ..params.clone()
            },
        );
        assert_eq!(sampled.len(), 5);
        assert!(sampled.iter().all(|p| all.contains(p)));
    }
}
