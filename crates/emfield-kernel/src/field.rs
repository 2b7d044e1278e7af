use emfield_geom::{Aabb, Vec3};

/// Proportionality constant of the far-field law `E = sqrt(k * P / d^2)`.
pub const FIELD_CONSTANT: f64 = 30.0;

/// Squared distances below this count as the emitter itself.
pub const COINCIDENT_DISTANCE_SQ: f64 = 1e-6;

/// Unobstructed field magnitude at squared distance `distance_sq` from a source of `power` watts.
///
/// Returns `f64::INFINITY` at the source; consumers treat that as maximum severity.
#[inline]
pub fn field_strength(power: f64, distance_sq: f64) -> f64 {
    if distance_sq < COINCIDENT_DISTANCE_SQ {
        return f64::INFINITY;
    }
    (FIELD_CONSTANT * power / distance_sq).sqrt()
}

/// Field at `sample` from a source at `emitter`, zero when any blocker cuts the line of sight.
#[inline]
pub fn evaluate(emitter: Vec3, sample: Vec3, power: f64, blockers: &[Aabb]) -> f64 {
    if is_occluded(emitter, sample, blockers) {
        return 0.0;
    }
    field_strength(power, (emitter - sample).length_squared())
}

#[inline]
pub fn is_occluded(emitter: Vec3, sample: Vec3, blockers: &[Aabb]) -> bool {
    blockers.iter().any(|b| b.segment_intersects(emitter, sample))
}
