use emfield_model::GridSize;

/// Dense row-major hazard grid.
///
/// Row `j` is the `j`-th latitude sample (row 0 at `lat_min`), column `i` the `i`-th longitude
/// sample. Cells hold `0.0` where no emitter reaches, a finite magnitude, or `f64::INFINITY`
/// on top of an emitter.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldGrid {
    size: GridSize,
    values: Vec<f64>,
}

/// Aggregate view of a grid for reporting.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GridSummary {
    pub max_finite: f64,
    pub infinite_cells: usize,
    pub above_threshold: usize,
    pub nonzero_cells: usize,
}

impl FieldGrid {
    pub fn zeros(size: GridSize) -> Self {
        Self {
            size,
            values: vec![0.0; size.cells()],
        }
    }

    #[inline]
    pub fn size(&self) -> GridSize {
        self.size
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    #[inline]
    fn idx(&self, i: usize, j: usize) -> usize {
        j * self.size.width + i
    }

    /// Value at column `i`, row `j`. Panics when out of range.
    #[inline]
    pub fn value(&self, i: usize, j: usize) -> f64 {
        assert!(i < self.size.width && j < self.size.height, "cell ({i}, {j}) out of grid");
        self.values[self.idx(i, j)]
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i < self.size.width && j < self.size.height {
            Some(self.values[self.idx(i, j)])
        } else {
            None
        }
    }

    pub fn row(&self, j: usize) -> &[f64] {
        let start = j * self.size.width;
        &self.values[start..start + self.size.width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        // A zero-width grid holds no values, so the clamped chunk size yields nothing.
        self.values.chunks(self.size.width.max(1))
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Fold `value` into cell `(i, j)` keeping the larger magnitude.
    #[inline]
    pub(crate) fn merge_max(&mut self, i: usize, j: usize, value: f64) {
        let k = self.idx(i, j);
        let cell = &mut self.values[k];
        if value > *cell {
            *cell = value;
        }
    }

    pub fn summary(&self, threshold: f64) -> GridSummary {
        let mut s = GridSummary::default();
        for &v in &self.values {
            if v.is_infinite() {
                s.infinite_cells += 1;
            } else if v > s.max_finite {
                s.max_finite = v;
            }
            if v >= threshold {
                s.above_threshold += 1;
            }
            if v != 0.0 {
                s.nonzero_cells += 1;
            }
        }
        s
    }
}
