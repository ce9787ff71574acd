use crate::core::model::{Level, MAX_CHANNEL, ReadTable};

pub const GRID_ROWS: usize = 16;
pub const GRID_COLS: usize = 32;

/// Per-channel output laid out row-major, channel 1 first. The layout is not the
/// physical flowcell layout.
#[derive(Clone, Debug)]
pub struct ChannelGrid {
    pub level: Level,
    values: Vec<f64>,
}

impl ChannelGrid {
    pub fn value(&self, channel: u16) -> Option<f64> {
        let idx = usize::from(channel).checked_sub(1)?;
        self.values.get(idx).copied()
    }

    pub fn row(&self, r: usize) -> &[f64] {
        &self.values[r * GRID_COLS..(r + 1) * GRID_COLS]
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn active(&self) -> usize {
        self.values.iter().filter(|v| **v > 0.0).count()
    }
}

pub fn channel_activity(table: &ReadTable, level: Level) -> ChannelGrid {
    let mut values = vec![0.0; usize::from(MAX_CHANNEL)];
    for r in table.iter() {
        let slot = &mut values[usize::from(r.channel) - 1];
        *slot += match level {
            Level::Reads => 1.0,
            Level::Bases => r.sequence_length as f64,
            Level::Events => r.num_events,
        };
    }
    ChannelGrid { level, values }
}
