use core::ops::Range;

use emfield_geom::LocalFrame;
use emfield_model::{GeoBounds, GridSize};

/// Rectangular index window `[cols] x [rows]` worth evaluating for one emitter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellWindow {
    pub cols: Range<usize>,
    pub rows: Range<usize>,
}

impl CellWindow {
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.cols.is_empty() || self.rows.is_empty()
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.cols.len() * self.rows.len()
    }
}

/// `n` evenly spaced values from `start` to `stop` inclusive; the last one is exactly `stop`.
pub fn linspace(start: f64, stop: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (n - 1) as f64;
            let mut out: Vec<f64> = (0..n).map(|k| start + k as f64 * step).collect();
            out[n - 1] = stop;
            out
        }
    }
}

/// Window along one axis. `center` and `radius` are in cells.
///
/// Indices are truncated toward zero before clipping to `[0, n)`.
pub fn axis_window(center: f64, radius: f64, n: usize) -> Range<usize> {
    let lo = (center - radius).trunc().max(0.0);
    let hi = ((center + radius).trunc() + 1.0).min(n as f64);
    if !(hi > lo) {
        return 0..0;
    }
    (lo as usize)..(hi as usize)
}

/// Local frame and sample layout of one tile at one resolution.
#[derive(Clone, Debug)]
pub struct TileLayout {
    frame: LocalFrame,
    size: GridSize,
    min_x: f64,
    min_y: f64,
    cell_width: f64,
    cell_height: f64,
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl TileLayout {
    pub fn new(bounds: &GeoBounds, size: GridSize) -> Self {
        let (olon, olat) = bounds.centroid();
        let frame = LocalFrame::new(olon, olat);
        let (min_x, min_y) = frame.project(bounds.lon_min, bounds.lat_min);
        let (max_x, max_y) = frame.project(bounds.lon_max, bounds.lat_max);
        let cell_width = if size.width > 0 {
            (max_x - min_x) / size.width as f64
        } else {
            0.0
        };
        let cell_height = if size.height > 0 {
            (max_y - min_y) / size.height as f64
        } else {
            0.0
        };
        // Equirectangular: x depends only on longitude and y only on latitude.
        let xs = linspace(bounds.lon_min, bounds.lon_max, size.width)
            .into_iter()
            .map(|lon| frame.project(lon, olat).0)
            .collect();
        let ys = linspace(bounds.lat_min, bounds.lat_max, size.height)
            .into_iter()
            .map(|lat| frame.project(olon, lat).1)
            .collect();
        Self {
            frame,
            size,
            min_x,
            min_y,
            cell_width,
            cell_height,
            xs,
            ys,
        }
    }

    #[inline]
    pub fn frame(&self) -> &LocalFrame {
        &self.frame
    }

    /// Physical cell size `(width, height)` in metres.
    #[inline]
    pub fn cell_size(&self) -> (f64, f64) {
        (self.cell_width, self.cell_height)
    }

    /// Local x of sample column `i`.
    #[inline]
    pub fn sample_x(&self, i: usize) -> f64 {
        self.xs[i]
    }

    /// Local y of sample row `j`.
    #[inline]
    pub fn sample_y(&self, j: usize) -> f64 {
        self.ys[j]
    }

    /// Cells that can hold a value above threshold for a source at local `(x, y)` with
    /// influence radius `radius` metres. A zero-sized axis (in metres or cells) spans the
    /// whole grid along that axis.
    pub fn window(&self, x: f64, y: f64, radius: f64) -> CellWindow {
        let (ci, ri) = axis_cells(x - self.min_x, radius, self.cell_width, self.size.width);
        let (cj, rj) = axis_cells(y - self.min_y, radius, self.cell_height, self.size.height);
        CellWindow {
            cols: axis_window(ci, ri, self.size.width),
            rows: axis_window(cj, rj, self.size.height),
        }
    }
}

#[inline]
fn axis_cells(offset: f64, radius: f64, cell: f64, n: usize) -> (f64, f64) {
    if cell > 0.0 {
        (offset / cell, radius / cell)
    } else {
        (0.0, n as f64)
    }
}
