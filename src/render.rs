use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ComparisonConfig;
use crate::distance::{Distance, distance_estimate, mean_position, row_intervals};
use crate::entity::{Entity, Selection};
use crate::figure::{WindowFigure, save_window_figure};
use crate::heatmap::smoothed_heatmap;
use crate::metadata::PitchDimensions;
use crate::tables::PlayerRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start_s: usize,
    pub end_s: usize,
}

impl Window {
    pub fn start_minute(&self) -> usize {
        self.start_s / 60
    }

    pub fn end_minute(&self) -> usize {
        self.end_s / 60
    }

    pub fn label(&self) -> String {
        format!("{} - {}", self.start_minute(), self.end_minute())
    }
}

/// Windows ending every `minutes`, strictly before `max_minutes`.
pub fn windows(minutes: u32, max_minutes: u32) -> Vec<Window> {
    let step = row_intervals(minutes);
    let cap = max_minutes as usize * 60;
    if step == 0 {
        return Vec::new();
    }
    (step..cap)
        .step_by(step)
        .map(|end_s| Window {
            start_s: end_s - step,
            end_s,
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedWindow {
    pub window: Window,
    pub distance: Distance,
    pub annotation: String,
    pub image: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedWindow {
    pub window: Window,
    pub distance: Distance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderReport {
    pub generated_at: String,
    pub rendered: Vec<RenderedWindow>,
    pub skipped: Vec<SkippedWindow>,
    pub halted_at: Option<Window>,
}

impl RenderReport {
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(self).context("serialize render summary")?;
        fs::write(&tmp, json).context("write render summary")?;
        fs::rename(&tmp, path).context("swap render summary")?;
        Ok(())
    }
}

pub fn clear_output_dir(dir: &Path) -> Result<usize> {
    fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    let mut removed = 0usize;
    for entry in fs::read_dir(dir).with_context(|| format!("list {}", dir.display()))? {
        let path = entry?.path();
        let outcome = if path.is_dir() {
            fs::remove_dir_all(&path)
        } else {
            fs::remove_file(&path)
        };
        outcome.with_context(|| format!("remove {}", path.display()))?;
        removed += 1;
    }
    Ok(removed)
}

pub fn figure_path(dir: &Path, window: &Window) -> PathBuf {
    dir.join(format!("playermap{}.png", window.end_minute()))
}

/// Bottom panel title. Average coordinates round half to even.
pub fn distance_title(
    entity1: &Entity,
    avg1: (f64, f64),
    entity2: &Entity,
    avg2: (f64, f64),
    distance: Distance,
) -> String {
    format!(
        "Distance between avg pos of player{} ({}, {}) and player{} ({}, {}) = {}m",
        entity1,
        avg1.0.round_ties_even(),
        avg1.1.round_ties_even(),
        entity2,
        avg2.0.round_ties_even(),
        avg2.1.round_ties_even(),
        distance
    )
}

/// Renders one figure per window comparing the two configured entities.
///
/// The output directory is emptied first. Iteration stops at the first window
/// where either entity has no rows; windows failing the distance filter are
/// skipped without stopping.
pub fn render_comparison(
    players: &[PlayerRecord],
    pitch: PitchDimensions,
    cmp: &ComparisonConfig,
    out_dir: &Path,
) -> Result<RenderReport> {
    let removed = clear_output_dir(out_dir)?;
    debug!(removed, dir = %out_dir.display(), "cleared figures");

    let first = Selection::new(players, &cmp.entity1, cmp.team1);
    let second = Selection::new(players, &cmp.entity2, cmp.team2);
    info!(
        entity1 = %cmp.entity1,
        rows1 = first.rows.len(),
        entity2 = %cmp.entity2,
        rows2 = second.rows.len(),
        "selected players"
    );

    let mut report = RenderReport {
        generated_at: Utc::now().to_rfc3339(),
        rendered: Vec::new(),
        skipped: Vec::new(),
        halted_at: None,
    };

    for window in windows(cmp.minutes, cmp.max_minutes) {
        let p1 = first.window(window.start_s, window.end_s);
        let p2 = second.window(window.start_s, window.end_s);

        if p1.is_empty() || p2.is_empty() {
            info!(
                "Data ends for one of the players in the comparison from minutes {}",
                window.label()
            );
            report.halted_at = Some(window);
            break;
        }

        let distance = distance_estimate(p1, p2, cmp.minutes);
        let filter = cmp.distance_filter;
        if filter.is_active() && !distance.value().is_some_and(|d| filter.passes(d)) {
            debug!(window = %window.label(), %distance, "window filtered out");
            report.skipped.push(SkippedWindow { window, distance });
            continue;
        }

        let avg1 = mean_position(p1);
        let avg2 = mean_position(p2);
        let annotation = distance_title(&cmp.entity1, avg1, &cmp.entity2, avg2, distance);
        let figure = WindowFigure {
            left_title: format!("Player {} at minutes {}", cmp.entity1, window.label()),
            right_title: format!("Player {} at minutes {}", cmp.entity2, window.label()),
            bottom_title: annotation.clone(),
            left_heat: smoothed_heatmap(p1, pitch),
            right_heat: smoothed_heatmap(p2, pitch),
            left_avg: avg1,
            right_avg: avg2,
            left_label: cmp.entity1.to_string(),
            right_label: cmp.entity2.to_string(),
        };

        let path = figure_path(out_dir, &window);
        save_window_figure(&figure, pitch, &path)?;
        info!(window = %window.label(), %distance, path = %path.display(), "rendered heatmap");
        report.rendered.push(RenderedWindow {
            window,
            distance,
            annotation,
            image: path,
        });
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn windows_end_before_cap() {
        let ws = windows(5, 100);
        assert_eq!(ws.len(), 19);
        assert_eq!(ws[0], Window { start_s: 0, end_s: 300 });
        assert_eq!(ws.last().unwrap().end_minute(), 95);
        assert_eq!(ws[1].label(), "5 - 10");
    }

    #[test]
    fn cap_is_configurable() {
        assert_eq!(windows(1, 3).len(), 2);
        assert!(windows(5, 5).is_empty());
    }

    #[test]
    fn title_rounds_half_to_even() {
        let title = distance_title(
            &Entity::group([9, 18]),
            (52.5, 33.5),
            &Entity::Single(4),
            (10.4, 0.5),
            Distance::Computed(42.0),
        );
        assert_eq!(
            title,
            "Distance between avg pos of player[9, 18] (52, 34) and player4 (10, 0) = 42.00m"
        );
    }

    #[test]
    fn clear_removes_everything() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("old.png"), b"x").unwrap();
        fs::write(dir.path().join("notes.txt"), b"x").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        assert_eq!(clear_output_dir(dir.path()).unwrap(), 3);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
