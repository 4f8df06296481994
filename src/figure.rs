use std::path::Path;

use anyhow::{Context, Result, anyhow};
use plotters::coord::Shift;
use plotters::prelude::*;

use crate::glyphs::{Canvas, GLYPH_H};
use crate::heatmap::{BinGrid, hot_color};
use crate::metadata::PitchDimensions;

pub const FIG_W: u32 = 1400;
pub const FIG_H: u32 = 1400;
// Top row : bottom row = 1.5 : 1.
const TOP_H: u32 = 840;
const TITLE_BAND: u32 = 60;
const PANEL_PAD: u32 = 24;
const TEXT_SCALE: usize = 3;
const LABEL_OFFSET_M: f64 = 4.0;

const PITCH_BG: RGBColor = RGBColor(0x22, 0x31, 0x2b);
const PITCH_LINE: RGBColor = RGBColor(0xef, 0xef, 0xef);
const GRASS_DARK: RGBColor = RGBColor(0x2d, 0x7a, 0x3a);
const GRASS_LIGHT: RGBColor = RGBColor(0x36, 0x8c, 0x44);
const LINK_COLOR: RGBColor = RGBColor(0xff, 0x00, 0x00);
const TEXT_COLOR: [u8; 3] = [0, 0, 0];

type Panel<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

#[derive(Debug, Clone)]
pub struct WindowFigure {
    pub left_title: String,
    pub right_title: String,
    pub bottom_title: String,
    pub left_heat: BinGrid,
    pub right_heat: BinGrid,
    pub left_avg: (f64, f64),
    pub right_avg: (f64, f64),
    pub left_label: String,
    pub right_label: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: u32,
    y: u32,
    w: u32,
    h: u32,
}

impl Rect {
    fn pitch_box(&self, pitch: PitchDimensions) -> Rect {
        let avail_w = self.w.saturating_sub(2 * PANEL_PAD).max(1);
        let avail_h = self.h.saturating_sub(TITLE_BAND + PANEL_PAD).max(1);
        let aspect = pitch.width / pitch.height;
        let (w, h) = if avail_w as f64 / avail_h as f64 > aspect {
            ((avail_h as f64 * aspect) as u32, avail_h)
        } else {
            (avail_w, (avail_w as f64 / aspect) as u32)
        };
        Rect {
            x: self.x + (self.w - w) / 2,
            y: self.y + TITLE_BAND,
            w: w.max(1),
            h: h.max(1),
        }
    }

    fn local_to(&self, outer: Rect) -> (u32, u32) {
        (self.x - outer.x, self.y - outer.y)
    }

    fn to_pixel(&self, pitch: PitchDimensions, (x, y): (f64, f64)) -> (usize, usize) {
        let px = self.x as f64 + x / pitch.width * self.w as f64;
        let py = self.y as f64 + (1.0 - y / pitch.height) * self.h as f64;
        (px.max(0.0) as usize, py.max(0.0) as usize)
    }
}

fn plot_err<E: std::fmt::Debug>(err: E) -> anyhow::Error {
    anyhow!("plot render failed: {err:?}")
}

pub fn save_window_figure(fig: &WindowFigure, pitch: PitchDimensions, path: &Path) -> Result<()> {
    let left = Rect {
        x: 0,
        y: 0,
        w: FIG_W / 2,
        h: TOP_H,
    };
    let right = Rect {
        x: FIG_W / 2,
        y: 0,
        w: FIG_W - FIG_W / 2,
        h: TOP_H,
    };
    let bottom = Rect {
        x: 0,
        y: TOP_H,
        w: FIG_W,
        h: FIG_H - TOP_H,
    };

    let mut buffer = vec![255u8; (FIG_W * FIG_H * 3) as usize];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (FIG_W, FIG_H)).into_drawing_area();
        root.fill(&WHITE).map_err(plot_err)?;
        let (top_area, bottom_area) = root.split_vertically(TOP_H);
        let (left_area, right_area) = top_area.split_horizontally(FIG_W / 2);

        draw_heat_panel(&left_area, left, pitch, &fig.left_heat)?;
        draw_heat_panel(&right_area, right, pitch, &fig.right_heat)?;
        draw_distance_panel(&bottom_area, bottom, pitch, fig.left_avg, fig.right_avg)?;
        root.present().map_err(plot_err)?;
    }

    let mut canvas = Canvas {
        buffer: &mut buffer,
        width: FIG_W as usize,
        height: FIG_H as usize,
    };
    draw_titles(&mut canvas, fig, pitch, left, right, bottom);

    let image = image::RgbImage::from_raw(FIG_W, FIG_H, buffer)
        .ok_or_else(|| anyhow!("figure buffer does not match {FIG_W}x{FIG_H}"))?;
    image
        .save(path)
        .with_context(|| format!("failed writing figure to {}", path.display()))?;
    Ok(())
}

fn pitch_area<'a>(area: &Panel<'a>, panel: Rect, pitch: PitchDimensions) -> Panel<'a> {
    let inner = panel.pitch_box(pitch);
    let offset = inner.local_to(panel);
    area.clone().shrink(offset, (inner.w, inner.h))
}

fn draw_heat_panel(area: &Panel<'_>, panel: Rect, pitch: PitchDimensions, grid: &BinGrid) -> Result<()> {
    let inner = pitch_area(area, panel, pitch);
    inner.fill(&PITCH_BG).map_err(plot_err)?;
    let mut chart = ChartBuilder::on(&inner)
        .build_cartesian_2d(0.0..pitch.width, 0.0..pitch.height)
        .map_err(plot_err)?;

    let (lo, hi) = grid.range();
    let span = hi - lo;
    let cell_w = pitch.width / grid.nx as f64;
    let cell_h = pitch.height / grid.ny as f64;
    let mut cells = Vec::with_capacity(grid.nx * grid.ny);
    for iy in 0..grid.ny {
        for ix in 0..grid.nx {
            let t = if span > 0.0 {
                (grid.get(ix, iy) - lo) / span
            } else {
                0.0
            };
            let (r, g, b) = hot_color(t);
            let corners = [
                (ix as f64 * cell_w, iy as f64 * cell_h),
                ((ix + 1) as f64 * cell_w, (iy + 1) as f64 * cell_h),
            ];
            cells.push(Rectangle::new(corners, RGBColor(r, g, b).filled()));
            cells.push(Rectangle::new(corners, PITCH_BG.stroke_width(1)));
        }
    }
    chart.draw_series(cells).map_err(plot_err)?;
    draw_markings(&mut chart, pitch)?;
    Ok(())
}

fn draw_distance_panel(
    area: &Panel<'_>,
    panel: Rect,
    pitch: PitchDimensions,
    a: (f64, f64),
    b: (f64, f64),
) -> Result<()> {
    let inner = pitch_area(area, panel, pitch);
    let mut chart = ChartBuilder::on(&inner)
        .build_cartesian_2d(0.0..pitch.width, 0.0..pitch.height)
        .map_err(plot_err)?;

    let stripes = 12;
    let stripe_w = pitch.width / stripes as f64;
    chart
        .draw_series((0..stripes).map(|i| {
            let color = if i % 2 == 0 { GRASS_DARK } else { GRASS_LIGHT };
            Rectangle::new(
                [
                    (i as f64 * stripe_w, 0.0),
                    ((i + 1) as f64 * stripe_w, pitch.height),
                ],
                color.filled(),
            )
        }))
        .map_err(plot_err)?;
    draw_markings(&mut chart, pitch)?;

    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![a, b],
            LINK_COLOR.stroke_width(5),
        )))
        .map_err(plot_err)?;
    chart
        .draw_series([a, b].into_iter().map(|p| Circle::new(p, 6, BLACK.filled())))
        .map_err(plot_err)?;
    Ok(())
}

type PitchChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<plotters::coord::types::RangedCoordf64, plotters::coord::types::RangedCoordf64>>;

fn draw_markings(chart: &mut PitchChart<'_, '_>, pitch: PitchDimensions) -> Result<()> {
    let (w, h) = (pitch.width, pitch.height);
    let mid_y = h / 2.0;
    let style = PITCH_LINE.stroke_width(2);

    let mut lines: Vec<Vec<(f64, f64)>> = vec![
        vec![(0.0, 0.0), (w, 0.0), (w, h), (0.0, h), (0.0, 0.0)],
        vec![(w / 2.0, 0.0), (w / 2.0, h)],
        circle_points((w / 2.0, mid_y), 9.15, 64),
    ];
    for &(depth, span) in &[(16.5, 40.32), (5.5, 18.32)] {
        let span = f64::min(span, h);
        let (y0, y1) = (mid_y - span / 2.0, mid_y + span / 2.0);
        lines.push(vec![(0.0, y0), (depth, y0), (depth, y1), (0.0, y1)]);
        lines.push(vec![(w, y0), (w - depth, y0), (w - depth, y1), (w, y1)]);
    }
    chart
        .draw_series(lines.into_iter().map(|pts| PathElement::new(pts, style)))
        .map_err(plot_err)?;

    let spots = [(w / 2.0, mid_y), (11.0, mid_y), (w - 11.0, mid_y)];
    chart
        .draw_series(spots.into_iter().map(|p| Circle::new(p, 3, PITCH_LINE.filled())))
        .map_err(plot_err)?;
    Ok(())
}

fn circle_points(center: (f64, f64), radius: f64, segments: usize) -> Vec<(f64, f64)> {
    (0..=segments)
        .map(|i| {
            let angle = i as f64 / segments as f64 * std::f64::consts::TAU;
            (center.0 + radius * angle.cos(), center.1 + radius * angle.sin())
        })
        .collect()
}

fn draw_titles(
    canvas: &mut Canvas<'_>,
    fig: &WindowFigure,
    pitch: PitchDimensions,
    left: Rect,
    right: Rect,
    bottom: Rect,
) {
    let title_y = |panel: Rect| panel.y as usize + (TITLE_BAND as usize - GLYPH_H * TEXT_SCALE) / 2;
    let centre_x = |panel: Rect| (panel.x + panel.w / 2) as usize;

    canvas.draw_text_centered(centre_x(left), title_y(left), &fig.left_title, TEXT_SCALE, TEXT_COLOR);
    canvas.draw_text_centered(centre_x(right), title_y(right), &fig.right_title, TEXT_SCALE, TEXT_COLOR);
    canvas.draw_text_centered(
        centre_x(bottom),
        title_y(bottom),
        &fig.bottom_title,
        TEXT_SCALE,
        TEXT_COLOR,
    );

    // Labels sit on opposite sides of the two points so they never overlap.
    let inner = bottom.pitch_box(pitch);
    let (a, b) = (fig.left_avg, fig.right_avg);
    let (a_dy, b_dy) = if a.1 < b.1 {
        (-LABEL_OFFSET_M, LABEL_OFFSET_M)
    } else {
        (LABEL_OFFSET_M, -LABEL_OFFSET_M)
    };
    let half_glyph = GLYPH_H * TEXT_SCALE / 2;
    for (pos, dy, label) in [(a, a_dy, &fig.left_label), (b, b_dy, &fig.right_label)] {
        let (px, py) = inner.to_pixel(pitch, (pos.0, pos.1 + dy));
        canvas.draw_text_centered(px, py.saturating_sub(half_glyph), label, TEXT_SCALE, TEXT_COLOR);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pitch_box_keeps_aspect_and_fits() {
        let pitch = PitchDimensions {
            width: 105.0,
            height: 68.0,
        };
        let panel = Rect {
            x: 0,
            y: TOP_H,
            w: FIG_W,
            h: FIG_H - TOP_H,
        };
        let inner = panel.pitch_box(pitch);
        assert!(inner.x + inner.w <= panel.x + panel.w);
        assert!(inner.y + inner.h <= panel.y + panel.h);
        let aspect = inner.w as f64 / inner.h as f64;
        assert!((aspect - 105.0 / 68.0).abs() < 0.02);
    }

    #[test]
    fn pixel_mapping_flips_y() {
        let pitch = PitchDimensions {
            width: 100.0,
            height: 50.0,
        };
        let rect = Rect {
            x: 10,
            y: 20,
            w: 200,
            h: 100,
        };
        assert_eq!(rect.to_pixel(pitch, (0.0, 50.0)), (10, 20));
        assert_eq!(rect.to_pixel(pitch, (100.0, 0.0)), (210, 120));
    }
}
