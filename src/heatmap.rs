use crate::distance::Positioned;
use crate::metadata::PitchDimensions;

pub const HEATMAP_BINS: usize = 25;
pub const SMOOTHING_SIGMA: f64 = 1.0;
const TRUNCATE: f64 = 4.0;

/// Row-major 2D grid; row `iy` covers pitch y, column `ix` covers pitch x.
#[derive(Debug, Clone, PartialEq)]
pub struct BinGrid {
    pub nx: usize,
    pub ny: usize,
    pub values: Vec<f64>,
}

impl BinGrid {
    pub fn zeros(nx: usize, ny: usize) -> Self {
        Self {
            nx,
            ny,
            values: vec![0.0; nx * ny],
        }
    }

    pub fn get(&self, ix: usize, iy: usize) -> f64 {
        self.values[iy * self.nx + ix]
    }

    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn range(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(*v), hi.max(*v))
            })
    }
}

/// Counts samples per cell over the whole pitch. The far edges belong to the
/// last cell; samples off the pitch are ignored.
pub fn bin_counts<P: Positioned>(
    rows: &[P],
    pitch: PitchDimensions,
    nx: usize,
    ny: usize,
) -> BinGrid {
    let mut grid = BinGrid::zeros(nx, ny);
    for row in rows {
        let (x, y) = row.position();
        let (Some(ix), Some(iy)) = (
            bin_index(x, pitch.width, nx),
            bin_index(y, pitch.height, ny),
        ) else {
            continue;
        };
        grid.values[iy * nx + ix] += 1.0;
    }
    grid
}

fn bin_index(value: f64, extent: f64, bins: usize) -> Option<usize> {
    if !(0.0..=extent).contains(&value) || bins == 0 {
        return None;
    }
    let idx = (value / extent * bins as f64).floor() as usize;
    Some(idx.min(bins - 1))
}

/// Separable Gaussian blur with mirrored edges (`d c b a | a b c d`),
/// kernel cut off at four sigma.
pub fn gaussian_filter(grid: &BinGrid, sigma: f64) -> BinGrid {
    if sigma <= 0.0 {
        return grid.clone();
    }
    let kernel = gaussian_kernel(sigma);
    let radius = (kernel.len() / 2) as isize;

    let mut along_x = BinGrid::zeros(grid.nx, grid.ny);
    for iy in 0..grid.ny {
        for ix in 0..grid.nx {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let src = reflect(ix as isize + k as isize - radius, grid.nx);
                acc += weight * grid.get(src, iy);
            }
            along_x.values[iy * grid.nx + ix] = acc;
        }
    }

    let mut out = BinGrid::zeros(grid.nx, grid.ny);
    for iy in 0..grid.ny {
        for ix in 0..grid.nx {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let src = reflect(iy as isize + k as isize - radius, grid.ny);
                acc += weight * along_x.get(ix, src);
            }
            out.values[iy * grid.nx + ix] = acc;
        }
    }
    out
}

pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as isize;
    let raw = (-radius..=radius)
        .map(|i| (-0.5 * (i as f64 / sigma).powi(2)).exp())
        .collect::<Vec<_>>();
    let sum = raw.iter().sum::<f64>();
    raw.into_iter().map(|w| w / sum).collect()
}

fn reflect(mut idx: isize, len: usize) -> usize {
    let n = len as isize;
    loop {
        if idx < 0 {
            idx = -idx - 1;
        } else if idx >= n {
            idx = 2 * n - idx - 1;
        } else {
            return idx as usize;
        }
    }
}

pub fn smoothed_heatmap<P: Positioned>(rows: &[P], pitch: PitchDimensions) -> BinGrid {
    let counts = bin_counts(rows, pitch, HEATMAP_BINS, HEATMAP_BINS);
    gaussian_filter(&counts, SMOOTHING_SIGMA)
}

pub fn hot_color(t: f64) -> (u8, u8, u8) {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let r = (t / 0.365).clamp(0.0, 1.0);
    let g = ((t - 0.365) / 0.381).clamp(0.0, 1.0);
    let b = ((t - 0.746) / 0.254).clamp(0.0, 1.0);
    (
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const PITCH: PitchDimensions = PitchDimensions {
        width: 100.0,
        height: 50.0,
    };

    #[test]
    fn bins_cover_pitch_edges() {
        let rows = [(0.0, 0.0), (100.0, 50.0), (99.9, 0.1), (50.0, 25.0), (-1.0, 3.0)];
        let grid = bin_counts(&rows, PITCH, 25, 25);
        assert_eq!(grid.total(), 4.0);
        assert_eq!(grid.get(0, 0), 1.0);
        assert_eq!(grid.get(24, 24), 1.0);
        assert_eq!(grid.get(24, 0), 1.0);
        assert_eq!(grid.get(12, 12), 1.0);
    }

    #[test]
    fn kernel_is_normalised_with_radius_four() {
        let kernel = gaussian_kernel(1.0);
        assert_eq!(kernel.len(), 9);
        assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        assert!(kernel[4] > kernel[3]);
    }

    #[test]
    fn smoothing_preserves_mass_with_reflected_edges() {
        let rows = [(1.0, 1.0), (1.0, 1.0), (52.0, 26.0), (99.0, 49.0)];
        let counts = bin_counts(&rows, PITCH, 25, 25);
        let smooth = gaussian_filter(&counts, 1.0);
        assert!((smooth.total() - counts.total()).abs() < 1e-9);
        assert!(smooth.get(0, 0) < 2.0);
        assert!(smooth.get(1, 1) > 0.0);
    }

    #[test]
    fn reflect_mirrors_including_edge() {
        assert_eq!(reflect(-1, 5), 0);
        assert_eq!(reflect(-2, 5), 1);
        assert_eq!(reflect(5, 5), 4);
        assert_eq!(reflect(6, 5), 3);
    }

    #[test]
    fn hot_ramp_endpoints() {
        assert_eq!(hot_color(0.0), (0, 0, 0));
        assert_eq!(hot_color(1.0), (255, 255, 255));
        let (r, g, b) = hot_color(0.5);
        assert_eq!(r, 255);
        assert!(g > 0 && b == 0);
    }
}
