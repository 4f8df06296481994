use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tables::{BallRecord, PlayerRecord};

pub trait Positioned {
    fn position(&self) -> (f64, f64);
}

impl Positioned for PlayerRecord {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Positioned for BallRecord {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}

impl Positioned for (f64, f64) {
    fn position(&self) -> (f64, f64) {
        *self
    }
}

impl<T: Positioned + ?Sized> Positioned for &T {
    fn position(&self) -> (f64, f64) {
        (**self).position()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "metres", rename_all = "snake_case")]
pub enum Distance {
    Computed(f64),
    Undefined,
}

impl Distance {
    pub fn value(self) -> Option<f64> {
        match self {
            Distance::Computed(metres) => Some(metres),
            Distance::Undefined => None,
        }
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Distance::Computed(metres) => write!(f, "{metres:.2}"),
            Distance::Undefined => write!(f, "Undefined"),
        }
    }
}

pub fn row_intervals(minutes: u32) -> usize {
    minutes as usize * 60
}

/// Reduces `rows` to at most `intervals` points. Sets longer than `intervals`
/// are cut into `intervals` buckets of `len / intervals` rows and each bucket
/// is averaged; remainder rows past the last bucket are not used.
pub fn bucket_positions<P: Positioned>(rows: &[P], intervals: usize) -> Vec<(f64, f64)> {
    if intervals == 0 || rows.len() <= intervals {
        return rows.iter().map(Positioned::position).collect();
    }
    let size = rows.len() / intervals;
    rows.chunks_exact(size)
        .take(intervals)
        .map(mean_position)
        .collect()
}

pub fn mean_position<P: Positioned>(rows: &[P]) -> (f64, f64) {
    let n = rows.len() as f64;
    let (sx, sy) = rows.iter().fold((0.0, 0.0), |(sx, sy), row| {
        let (x, y) = row.position();
        (sx + x, sy + y)
    });
    (sx / n, sy / n)
}

pub fn distance_estimate<A: Positioned, B: Positioned>(
    set1: &[A],
    set2: &[B],
    minutes: u32,
) -> Distance {
    if set1.is_empty() || set2.is_empty() {
        return Distance::Undefined;
    }
    let intervals = row_intervals(minutes);
    let p1 = bucket_positions(set1, intervals);
    let p2 = bucket_positions(set2, intervals);

    let pairs = intervals.min(p1.len()).min(p2.len());
    if pairs == 0 {
        return Distance::Undefined;
    }
    let total = p1
        .iter()
        .zip(&p2)
        .take(pairs)
        .map(|(a, b)| (a.0 - b.0).hypot(a.1 - b.1))
        .sum::<f64>();
    Distance::Computed(round2(total / pairs as f64))
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sets_are_undefined() {
        let empty: [(f64, f64); 0] = [];
        assert_eq!(distance_estimate(&empty, &empty, 1), Distance::Undefined);
        assert_eq!(distance_estimate(&[(1.0, 1.0)], &empty, 1), Distance::Undefined);
        assert_eq!(Distance::Undefined.to_string(), "Undefined");
    }

    #[test]
    fn three_four_five() {
        let d = distance_estimate(&[(0.0, 0.0)], &[(3.0, 4.0)], 1);
        assert_eq!(d, Distance::Computed(5.0));
        assert_eq!(d.to_string(), "5.00");
    }

    #[test]
    fn buckets_large_sets_into_exact_interval_count() {
        // 125 rows over a one-minute window: 60 buckets of 2 rows, 5 left over.
        let rows = (0..125).map(|i| (i as f64, 0.0)).collect::<Vec<_>>();
        let buckets = bucket_positions(&rows, row_intervals(1));
        assert_eq!(buckets.len(), 60);
        assert_eq!(buckets[0], (0.5, 0.0));
        assert_eq!(buckets[59], (118.5, 0.0));
    }

    #[test]
    fn short_sets_use_raw_rows() {
        let rows = [(1.0, 2.0), (3.0, 4.0)];
        assert_eq!(bucket_positions(&rows, 60), vec![(1.0, 2.0), (3.0, 4.0)]);
    }

    #[test]
    fn group_average_is_compared_with_single_player() {
        // Two players side by side every second average to (5, 0).
        let group = (0..120)
            .map(|i| if i % 2 == 0 { (0.0, 0.0) } else { (10.0, 0.0) })
            .collect::<Vec<_>>();
        let single = vec![(5.0, 3.0); 60];
        assert_eq!(distance_estimate(&group, &single, 1), Distance::Computed(3.0));
    }

    #[test]
    fn pairs_stop_at_shorter_set_and_round() {
        let a = [(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)];
        let b = [(1.0, 1.0), (2.0, 0.0)];
        // (sqrt(2) + 2) / 2 = 1.7071...
        assert_eq!(distance_estimate(&a, &b, 1), Distance::Computed(1.71));
    }
}
