use std::io::BufRead;

use anyhow::{Context, Result};
use tracing::debug;

use crate::capture::{RawBall, RawPlayer, parse_frame};
use crate::metadata::{PitchDimensions, TrackingArea};
use crate::tables::{BallRecord, PlayerRecord, Tables};

/// Maps tracking centimetres (centred on the tracking area) to pitch metres
/// with the origin on a pitch corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PitchTransform {
    pitch: PitchDimensions,
    max_x: f64,
    max_y: f64,
}

impl PitchTransform {
    pub fn new(pitch: PitchDimensions, tracking: TrackingArea) -> Self {
        let excess_x = (tracking.width - pitch.width) * 50.0;
        let excess_y = (tracking.height - pitch.height) * 50.0;
        Self {
            pitch,
            max_x: tracking.width * 50.0 - excess_x,
            max_y: tracking.height * 50.0 - excess_y,
        }
    }

    pub fn pitch(&self) -> PitchDimensions {
        self.pitch
    }

    pub fn to_pitch(&self, x: i64, y: i64) -> (f64, f64) {
        ((x as f64 + self.max_x) / 100.0, (y as f64 + self.max_y) / 100.0)
    }

    pub fn to_raw(&self, x: f64, y: f64) -> (i64, i64) {
        (
            (x * 100.0 - self.max_x).round() as i64,
            (y * 100.0 - self.max_y).round() as i64,
        )
    }

    /// Both bounds are exclusive: a point on the touchline is dropped.
    pub fn in_bounds(&self, x: f64, y: f64) -> bool {
        x > 0.0 && x < self.pitch.width && y > 0.0 && y < self.pitch.height
    }

    pub fn player(&self, frame_num: u64, raw: &RawPlayer) -> Option<PlayerRecord> {
        let (x, y) = self.to_pitch(raw.x, raw.y);
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(PlayerRecord {
            frame_num,
            team_id: raw.team_id,
            player_id: raw.player_id,
            squad_num: raw.squad_num,
            x,
            y,
            speed: raw.speed,
        })
    }

    pub fn ball(&self, frame_num: u64, raw: &RawBall) -> Option<BallRecord> {
        let (x, y) = self.to_pitch(raw.x, raw.y);
        if !self.in_bounds(x, y) {
            return None;
        }
        Some(BallRecord {
            frame_num,
            x,
            y,
            z: raw.z,
            speed: raw.speed,
            possession: raw.possession.clone(),
            in_play: raw.in_play.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorizeStats {
    pub frames: usize,
    pub players_kept: usize,
    pub players_dropped: usize,
    pub balls_kept: usize,
    pub balls_dropped: usize,
}

pub fn categorize<R: BufRead>(
    reader: R,
    transform: &PitchTransform,
) -> Result<(Tables, CategorizeStats)> {
    let mut tables = Tables::default();
    let mut stats = CategorizeStats::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("read sampled line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        let frame = parse_frame(&line).with_context(|| format!("sampled line {}", idx + 1))?;
        stats.frames += 1;

        match transform.ball(frame.frame_num, &frame.ball) {
            Some(ball) => {
                tables.ball.push(ball);
                stats.balls_kept += 1;
            }
            None => stats.balls_dropped += 1,
        }

        for raw in &frame.players {
            match transform.player(frame.frame_num, raw) {
                Some(player) => {
                    tables.players.push(player);
                    stats.players_kept += 1;
                }
                None => stats.players_dropped += 1,
            }
        }
    }

    debug!(
        frames = stats.frames,
        players_dropped = stats.players_dropped,
        balls_dropped = stats.balls_dropped,
        "categorized capture"
    );
    Ok((tables, stats))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform() -> PitchTransform {
        PitchTransform::new(
            PitchDimensions {
                width: 105.0,
                height: 68.0,
            },
            TrackingArea {
                width: 111.0,
                height: 88.0,
            },
        )
    }

    #[test]
    fn centre_spot_maps_to_pitch_centre() {
        assert_eq!(transform().to_pitch(0, 0), (52.5, 34.0));
    }

    #[test]
    fn rescale_round_trips_without_bounds_filter() {
        let t = transform();
        for &(x, y) in &[(0, 0), (-5250, -3400), (1234, -987), (-6000, 4400), (17, 3)] {
            let (px, py) = t.to_pitch(x, y);
            assert_eq!(t.to_raw(px, py), (x, y));
        }
    }

    #[test]
    fn touchlines_are_out_of_bounds() {
        let t = transform();
        assert!(!t.in_bounds(0.0, 10.0));
        assert!(!t.in_bounds(105.0, 10.0));
        assert!(!t.in_bounds(10.0, 0.0));
        assert!(!t.in_bounds(10.0, 68.0));
        assert!(t.in_bounds(0.01, 67.99));
    }

    #[test]
    fn drops_records_per_record_not_per_frame() {
        // x=-5250 lands exactly on the goal line; ball sits at the corner.
        let input = "7:1,1,9,-5250,0,1.0;0,2,4,100,100,2.0;:-5250,-3400,0,0,A,Dead;\n\
                     8:1,1,9,-5249,0,1.0;:0,0,0,5.5,H,Alive;\n";
        let (tables, stats) = categorize(input.as_bytes(), &transform()).unwrap();

        assert_eq!(stats.frames, 2);
        assert_eq!(stats.players_dropped, 1);
        assert_eq!(stats.balls_dropped, 1);
        assert_eq!(tables.players.len(), 2);
        assert_eq!(tables.players[0].squad_num, 4);
        assert_eq!(tables.players[0].x, 53.5);
        assert_eq!(tables.players[1].frame_num, 8);
        assert_eq!(tables.ball.len(), 1);
        assert_eq!(tables.ball[0].frame_num, 8);
        assert_eq!(tables.ball[0].in_play, "Alive");
    }
}
