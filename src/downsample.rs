use std::io::{BufRead, Write};

use anyhow::{Context, Result, bail};

use crate::capture::CAPTURE_FPS;
use crate::filter::StreamStats;

pub fn stride(seconds: u32) -> usize {
    (seconds as usize) * (CAPTURE_FPS as usize)
}

/// Keeps line `i` (0-indexed) when `i` is a multiple of the stride.
pub fn downsample<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    seconds: u32,
) -> Result<StreamStats> {
    let n = stride(seconds);
    if n == 0 {
        bail!("sampling period must be at least one second");
    }

    let mut stats = StreamStats::default();
    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read in-play line {}", idx + 1))?;
        stats.lines_read += 1;
        if idx % n == 0 {
            writeln!(writer, "{line}").context("write sampled line")?;
            stats.lines_kept += 1;
        }
    }
    writer.flush().context("flush sampled output")?;
    Ok(stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_second_keeps_every_25th_line() {
        let input = (0..120).map(|i| format!("{}\n", 1000 + i)).collect::<String>();
        let mut out = Vec::new();
        let stats = downsample(input.as_bytes(), &mut out, 1).unwrap();
        let kept = String::from_utf8(out).unwrap();
        let kept = kept.lines().collect::<Vec<_>>();
        assert_eq!(kept, vec!["1000", "1025", "1050", "1075", "1100"]);
        assert_eq!(stats.lines_read, 120);
        assert_eq!(stats.lines_kept, 5);
    }

    #[test]
    fn zero_seconds_is_rejected() {
        let mut out = Vec::new();
        assert!(downsample("1\n".as_bytes(), &mut out, 0).is_err());
    }
}
