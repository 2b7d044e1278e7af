//! Worst-case field intensity over a geographic tile.
//!
//! One call projects the tile into a local metre frame, prunes each emitter to the cells its
//! influence radius can reach, evaluates an inverse-square field with box occlusion for every
//! cell in that window and keeps the per-cell maximum. No state survives between calls.
#![forbid(unsafe_code)]

use std::fmt;

use emfield_geom::{Aabb, Vec3};
use emfield_model::{Emitter, GeoBounds, GridSize, Obstacle};
use thiserror::Error;

pub mod field;
mod grid;
mod params;
pub mod prune;

pub use field::{COINCIDENT_DISTANCE_SQ, FIELD_CONSTANT, evaluate, field_strength};
pub use grid::{FieldGrid, GridSummary};
pub use params::FieldParams;
pub use prune::{CellWindow, TileLayout};

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("tile bounds are not finite: {0:?}")]
    NonFiniteBounds(GeoBounds),
    #[error("inverted {axis} bounds: min {min} > max {max}")]
    InvertedBounds {
        axis: &'static str,
        min: f64,
        max: f64,
    },
    #[error("sample altitude is not finite: {0}")]
    NonFiniteAltitude(f64),
    #[error("invalid model parameter {name}: {value}")]
    InvalidParams { name: &'static str, value: f64 },
}

/// Emitter left out of a calculation, with the reason.
#[derive(Clone, Debug, PartialEq)]
pub enum Diagnostic {
    /// Power was zero, negative or NaN.
    NonPositivePower { id: String, power: f64 },
    /// The pruned window does not overlap the grid.
    OutsideTile { id: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::NonPositivePower { id, power } => {
                write!(f, "emitter {id} skipped: non-positive power {power} W")
            }
            Diagnostic::OutsideTile { id } => {
                write!(f, "emitter {id} skipped: influence area misses the tile")
            }
        }
    }
}

/// Read-only inputs of one calculation.
#[derive(Clone, Copy, Debug)]
pub struct FieldRequest<'a> {
    pub emitters: &'a [Emitter],
    pub obstacles: &'a [Obstacle],
    /// Altitude (m) of every sample point.
    pub altitude: f64,
    pub bounds: GeoBounds,
    pub size: GridSize,
}

#[derive(Clone, Debug)]
pub struct FieldOutcome {
    pub grid: FieldGrid,
    pub diagnostics: Vec<Diagnostic>,
    /// Number of (emitter, cell) evaluations performed.
    pub evaluations: usize,
}

fn validate(req: &FieldRequest<'_>, params: &FieldParams) -> Result<(), FieldError> {
    params.validate()?;
    let b = &req.bounds;
    if !b.is_finite() {
        return Err(FieldError::NonFiniteBounds(*b));
    }
    if b.lat_min > b.lat_max {
        return Err(FieldError::InvertedBounds {
            axis: "latitude",
            min: b.lat_min,
            max: b.lat_max,
        });
    }
    if b.lon_min > b.lon_max {
        return Err(FieldError::InvertedBounds {
            axis: "longitude",
            min: b.lon_min,
            max: b.lon_max,
        });
    }
    if !req.altitude.is_finite() {
        return Err(FieldError::NonFiniteAltitude(req.altitude));
    }
    Ok(())
}

/// Compute the hazard grid for `req`.
///
/// Every call allocates a fresh zeroed grid and runs to completion on the calling thread.
pub fn compute_field(
    req: &FieldRequest<'_>,
    params: &FieldParams,
) -> Result<FieldOutcome, FieldError> {
    validate(req, params)?;
    let layout = TileLayout::new(&req.bounds, req.size);
    let frame = layout.frame();
    log::debug!(
        target: "field",
        "computing {}x{} grid: {} emitter(s), {} obstacle(s), origin={:?}, cell={:?} m",
        req.size.width,
        req.size.height,
        req.emitters.len(),
        req.obstacles.len(),
        frame.origin(),
        layout.cell_size()
    );

    let blockers: Vec<Aabb> = req
        .obstacles
        .iter()
        .map(|o| {
            let (cx, cy) = frame.project(o.lon, o.lat);
            Aabb::grounded(cx, cy, o.length, o.width, o.height)
        })
        .collect();

    let mut grid = FieldGrid::zeros(req.size);
    let mut diagnostics = Vec::new();
    let mut evaluations = 0usize;
    if req.size.cells() == 0 {
        log::debug!(target: "field", "empty grid; nothing to evaluate");
        return Ok(FieldOutcome {
            grid,
            diagnostics,
            evaluations,
        });
    }

    for emitter in req.emitters {
        if !(emitter.power > 0.0) {
            log::warn!(target: "field", "emitter {} has power {} W; skipped", emitter.id, emitter.power);
            diagnostics.push(Diagnostic::NonPositivePower {
                id: emitter.id.clone(),
                power: emitter.power,
            });
            continue;
        }
        let (ex, ey) = frame.project(emitter.lon, emitter.lat);
        let source = Vec3::new(ex, ey, emitter.height);
        let radius = params.influence_radius(emitter.power);
        let window = layout.window(ex, ey, radius);
        log::trace!(
            target: "field",
            "emitter {} at ({:.1}, {:.1}, {:.1}) d_max={:.1} m window cols={:?} rows={:?}",
            emitter.id, ex, ey, emitter.height, radius, window.cols, window.rows
        );
        if window.is_empty() {
            log::warn!(target: "field", "emitter {} does not reach the tile; skipped", emitter.id);
            diagnostics.push(Diagnostic::OutsideTile {
                id: emitter.id.clone(),
            });
            continue;
        }

        for j in window.rows.clone() {
            let y = layout.sample_y(j);
            for i in window.cols.clone() {
                let sample = Vec3::new(layout.sample_x(i), y, req.altitude);
                let value = evaluate(source, sample, emitter.power, &blockers);
                grid.merge_max(i, j, value);
            }
        }
        evaluations += window.cells();
    }

    log::debug!(target: "field", "done: {} evaluation(s), {} diagnostic(s)", evaluations, diagnostics.len());
    Ok(FieldOutcome {
        grid,
        diagnostics,
        evaluations,
    })
}

/// [`compute_field`] with default parameters, returning only the grid.
pub fn compute_field_grid(
    emitters: &[Emitter],
    obstacles: &[Obstacle],
    altitude: f64,
    bounds: GeoBounds,
    size: GridSize,
) -> Result<FieldGrid, FieldError> {
    let req = FieldRequest {
        emitters,
        obstacles,
        altitude,
        bounds,
        size,
    };
    compute_field(&req, &FieldParams::default()).map(|o| o.grid)
}
