use core::f64::consts::PI;

/// Mean Earth radius used by the equirectangular approximation (metres).
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Planar metre frame tangent to the globe at an origin.
///
/// Equirectangular approximation: good for tiles spanning a few tens of kilometres, degrading
/// with distance from the origin. Built fresh for every calculation and never stored.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalFrame {
    origin_lon: f64,
    origin_lat: f64,
    lon_scale: f64,
    lat_scale: f64,
}

impl LocalFrame {
    pub fn new(origin_lon: f64, origin_lat: f64) -> Self {
        let lat_scale = PI / 180.0 * EARTH_RADIUS_M;
        Self {
            origin_lon,
            origin_lat,
            lon_scale: lat_scale * (origin_lat * PI / 180.0).cos(),
            lat_scale,
        }
    }

    #[inline]
    pub fn origin(&self) -> (f64, f64) {
        (self.origin_lon, self.origin_lat)
    }

    /// `(lon, lat)` degrees to `(x, y)` metres east/north of the origin.
    #[inline]
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            (lon - self.origin_lon) * self.lon_scale,
            (lat - self.origin_lat) * self.lat_scale,
        )
    }

    /// Inverse of [`LocalFrame::project`]. At the poles every x maps back to the origin longitude.
    #[inline]
    pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = if self.lon_scale == 0.0 {
            self.origin_lon
        } else {
            self.origin_lon + x / self.lon_scale
        };
        (lon, self.origin_lat + y / self.lat_scale)
    }
}

/// One-shot projection of `(lon, lat)` about `(origin_lon, origin_lat)`.
#[inline]
pub fn project(origin_lon: f64, origin_lat: f64, lon: f64, lat: f64) -> (f64, f64) {
    LocalFrame::new(origin_lon, origin_lat).project(lon, lat)
}
