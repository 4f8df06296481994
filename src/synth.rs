use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::capture::{RawBall, RawFrame, RawPlayer, format_frame};
use crate::metadata::{HalfPeriod, MatchMetadata, PitchDimensions, TrackingArea};

#[derive(Debug, Clone, Copy)]
pub struct SynthSpec {
    pub pitch: PitchDimensions,
    pub tracking_area: TrackingArea,
    pub first_frame: u64,
    /// Frames captured before kick-off, during the break and after full time.
    pub idle_frames: u64,
    pub frames_per_half: u64,
    pub players_per_team: u32,
    pub seed: u64,
}

impl Default for SynthSpec {
    fn default() -> Self {
        Self {
            pitch: PitchDimensions {
                width: 105.0,
                height: 68.0,
            },
            tracking_area: TrackingArea {
                width: 111.0,
                height: 88.0,
            },
            first_frame: 1_000,
            idle_frames: 250,
            frames_per_half: 25 * 60 * 12,
            players_per_team: 11,
            seed: 7,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SynthMatch {
    pub metadata: MatchMetadata,
    pub frames: Vec<RawFrame>,
}

impl SynthMatch {
    pub fn metadata_xml(&self) -> String {
        metadata_xml(&self.metadata)
    }

    pub fn capture_text(&self) -> String {
        let mut out = String::new();
        for frame in &self.frames {
            out.push_str(&format_frame(frame));
            out.push('\n');
        }
        out
    }
}

pub fn metadata_xml(meta: &MatchMetadata) -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<TracabMetaData sVersion="1.0">
  <match iId="1" iFrameRateFps="25" fPitchXSizeMeters="{:.2}" fPitchYSizeMeters="{:.2}" fTrackingAreaXSizeMeters="{:.2}" fTrackingAreaYSizeMeters="{:.2}">
    <period iId="1" iStartFrame="{}" iEndFrame="{}"/>
    <period iId="2" iStartFrame="{}" iEndFrame="{}"/>
    <period iId="3" iStartFrame="0" iEndFrame="0"/>
    <period iId="4" iStartFrame="0" iEndFrame="0"/>
  </match>
</TracabMetaData>
"#,
        meta.pitch.width,
        meta.pitch.height,
        meta.tracking_area.width,
        meta.tracking_area.height,
        meta.first_half.start,
        meta.first_half.end,
        meta.second_half.start,
        meta.second_half.end,
    )
}

struct Walker {
    x: f64,
    y: f64,
}

impl Walker {
    /// Random walk clamped to `[-half_w, half_w] x [-half_h, half_h]` centimetres.
    fn step(&mut self, rng: &mut StdRng, half_w: f64, half_h: f64, max_step: f64) -> f64 {
        let dx = rng.gen_range(-max_step..=max_step);
        let dy = rng.gen_range(-max_step..=max_step);
        self.x = (self.x + dx).clamp(-half_w, half_w);
        self.y = (self.y + dy).clamp(-half_h, half_h);
        // cm per frame to m/s
        dx.hypot(dy) * 25.0 / 100.0
    }
}

pub fn generate(spec: &SynthSpec) -> SynthMatch {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let half_w = spec.tracking_area.width * 50.0;
    let half_h = spec.tracking_area.height * 50.0;
    // Players stay half a metre inside the lines; only the ball leaves the pitch.
    let pitch_w = spec.pitch.width * 50.0 - 50.0;
    let pitch_h = spec.pitch.height * 50.0 - 50.0;

    let first_start = spec.first_frame + spec.idle_frames;
    let first_half = HalfPeriod {
        start: first_start,
        end: first_start + spec.frames_per_half,
    };
    let second_start = first_half.end + spec.idle_frames;
    let second_half = HalfPeriod {
        start: second_start,
        end: second_start + spec.frames_per_half,
    };
    let last_frame = second_half.end + spec.idle_frames;

    let mut walkers = (0..spec.players_per_team * 2)
        .map(|_| Walker {
            x: rng.gen_range(-pitch_w * 0.8..pitch_w * 0.8),
            y: rng.gen_range(-pitch_h * 0.8..pitch_h * 0.8),
        })
        .collect::<Vec<_>>();
    let mut ball = Walker { x: 0.0, y: 0.0 };

    let mut frames = Vec::with_capacity((last_frame - spec.first_frame) as usize);
    for frame_num in spec.first_frame..last_frame {
        let players = walkers
            .iter_mut()
            .enumerate()
            .map(|(idx, walker)| {
                let idx = idx as u32;
                let team = idx / spec.players_per_team;
                let speed = walker.step(&mut rng, pitch_w, pitch_h, 12.0);
                RawPlayer {
                    team_id: if team == 0 { 1 } else { 0 },
                    player_id: i64::from(idx) + 1,
                    squad_num: (idx % spec.players_per_team) as i32 + 1,
                    x: walker.x.round() as i64,
                    y: walker.y.round() as i64,
                    speed,
                }
            })
            .collect();
        let ball_speed = ball.step(&mut rng, half_w, half_h, 40.0);
        let live = first_half.start <= frame_num && frame_num < first_half.end
            || second_half.start <= frame_num && frame_num < second_half.end;
        frames.push(RawFrame {
            frame_num,
            players,
            ball: RawBall {
                x: ball.x.round() as i64,
                y: ball.y.round() as i64,
                z: rng.gen_range(0.0..150.0_f64).round(),
                speed: ball_speed,
                possession: if rng.gen_bool(0.5) { "H" } else { "A" }.to_string(),
                in_play: if live { "Alive" } else { "Dead" }.to_string(),
            },
        });
    }

    SynthMatch {
        metadata: MatchMetadata {
            pitch: spec.pitch,
            tracking_area: spec.tracking_area,
            first_half,
            second_half,
        },
        frames,
    }
}

pub fn write_match(dir: &Path, synth: &SynthMatch) -> Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let metadata_path = dir.join("metadata.xml");
    let capture_path = dir.join("capture.dat");
    fs::write(&metadata_path, synth.metadata_xml())
        .with_context(|| format!("write {}", metadata_path.display()))?;
    fs::write(&capture_path, synth.capture_text())
        .with_context(|| format!("write {}", capture_path.display()))?;
    Ok((metadata_path, capture_path))
}
