//! Plain-text hazard report: scene tables plus a grid summary.

use std::fmt::Write;

use emfield_kernel::{FieldOutcome, TileLayout};

use crate::scenario::Scenario;

pub fn render_report(scenario: &Scenario, outcome: &FieldOutcome) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write_report(&mut out, scenario, outcome);
    out
}

fn write_report(out: &mut String, scenario: &Scenario, outcome: &FieldOutcome) -> std::fmt::Result {
    let b = &scenario.bounds;
    let layout = TileLayout::new(b, scenario.size);
    let (cw, ch) = layout.cell_size();
    let threshold = scenario.params.detection_threshold;

    writeln!(out, "EM hazard report")?;
    writeln!(out, "================")?;
    writeln!(
        out,
        "tile: lat {:.6}..{:.6}, lon {:.6}..{:.6}",
        b.lat_min, b.lat_max, b.lon_min, b.lon_max
    )?;
    writeln!(
        out,
        "grid: {}x{} samples, cell {:.2} x {:.2} m, altitude {:.1} m",
        scenario.size.width, scenario.size.height, cw, ch, scenario.altitude
    )?;
    writeln!(out, "detection threshold: {:.2} V/m", threshold)?;

    let emitters = scenario.scene.emitters();
    writeln!(out)?;
    writeln!(out, "Emitters ({})", emitters.len())?;
    writeln!(
        out,
        "  {:<16} {:>11} {:>11} {:>11} {:>10} {:>8}",
        "id", "lon", "lat", "power W", "freq MHz", "h m"
    )?;
    for e in &emitters {
        writeln!(
            out,
            "  {:<16} {:>11.6} {:>11.6} {:>11.1} {:>10.1} {:>8.1}",
            e.id, e.lon, e.lat, e.power, e.frequency, e.height
        )?;
    }

    let obstacles = scenario.scene.obstacles();
    writeln!(out)?;
    writeln!(out, "Obstacles ({})", obstacles.len())?;
    writeln!(
        out,
        "  {:<16} {:>11} {:>11} {:>8} {:>8} {:>8}",
        "id", "lon", "lat", "len m", "wid m", "h m"
    )?;
    for o in &obstacles {
        writeln!(
            out,
            "  {:<16} {:>11.6} {:>11.6} {:>8.1} {:>8.1} {:>8.1}",
            o.id, o.lon, o.lat, o.length, o.width, o.height
        )?;
    }

    if !outcome.diagnostics.is_empty() {
        writeln!(out)?;
        writeln!(out, "Warnings")?;
        for d in &outcome.diagnostics {
            writeln!(out, "  - {}", d)?;
        }
    }

    let s = outcome.grid.summary(threshold);
    let total = outcome.grid.size().cells().max(1);
    writeln!(out)?;
    writeln!(out, "Field summary")?;
    writeln!(out, "  peak (finite): {:.2} V/m", s.max_finite)?;
    writeln!(out, "  source cells (unbounded): {}", s.infinite_cells)?;
    writeln!(
        out,
        "  cells >= threshold: {} ({:.2}%)",
        s.above_threshold,
        100.0 * s.above_threshold as f64 / total as f64
    )?;
    writeln!(out, "  cells with signal: {}", s.nonzero_cells)?;
    writeln!(out, "  evaluations: {}", outcome.evaluations)?;
    Ok(())
}
