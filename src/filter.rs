use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::capture::frame_number;
use crate::metadata::HalfPeriod;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamStats {
    pub lines_read: usize,
    pub lines_kept: usize,
}

#[derive(Debug, Clone)]
pub struct HalfFilter {
    halves: [HalfPeriod; 2],
    active: bool,
}

impl HalfFilter {
    pub fn new(halves: [HalfPeriod; 2]) -> Self {
        Self {
            halves,
            active: false,
        }
    }

    /// Returns true when the frame belongs to active play. A start frame opens
    /// a half and is kept; an end frame closes it and is dropped.
    pub fn accept(&mut self, frame: u64) -> bool {
        if !self.active {
            if self.halves.iter().any(|half| half.start == frame) {
                self.active = true;
                return true;
            }
            return false;
        }
        if self.halves.iter().any(|half| half.end == frame) {
            self.active = false;
            return false;
        }
        true
    }
}

pub fn filter_in_play<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    halves: [HalfPeriod; 2],
) -> Result<StreamStats> {
    let mut filter = HalfFilter::new(halves);
    let mut stats = StreamStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read capture line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        stats.lines_read += 1;
        let frame = frame_number(&line).with_context(|| format!("capture line {}", idx + 1))?;
        if filter.accept(frame) {
            writeln!(writer, "{line}").context("write in-play line")?;
            stats.lines_kept += 1;
        }
    }
    writer.flush().context("flush in-play output")?;
    Ok(stats)
}
