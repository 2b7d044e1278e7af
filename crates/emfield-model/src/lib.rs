//! Input records handed to the field kernel.
#![forbid(unsafe_code)]

use emfield_geom::LocalFrame;
use serde::{Deserialize, Serialize};

/// Point emission source.
///
/// `frequency` (MHz) is carried for reporting only: the field law is frequency-independent,
/// a worst-case envelope over all bands.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Emitter {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
    /// Radiated power in watts.
    pub power: f64,
    #[serde(default)]
    pub frequency: f64,
    /// Installation height above local ground (m).
    #[serde(default)]
    pub height: f64,
}

impl Emitter {
    pub fn new(id: impl Into<String>, lon: f64, lat: f64, power: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            lon,
            lat,
            power,
            frequency: 0.0,
            height,
        }
    }

    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }
}

/// Box-shaped blocker standing on flat ground.
///
/// `length` runs east-west and `width` north-south, both in metres.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: String,
    pub lon: f64,
    pub lat: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
}

impl Obstacle {
    pub fn new(
        id: impl Into<String>,
        lon: f64,
        lat: f64,
        length: f64,
        width: f64,
        height: f64,
    ) -> Self {
        Self {
            id: id.into(),
            lon,
            lat,
            length,
            width,
            height,
        }
    }
}

/// Geographic tile in degrees. Expected `lat_min <= lat_max` and `lon_min <= lon_max`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub lat_min: f64,
    pub lat_max: f64,
    pub lon_min: f64,
    pub lon_max: f64,
}

impl GeoBounds {
    pub const fn new(lat_min: f64, lat_max: f64, lon_min: f64, lon_max: f64) -> Self {
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Tile of `width_m` x `height_m` metres centred on `(lon, lat)`.
    pub fn around(lon: f64, lat: f64, width_m: f64, height_m: f64) -> Self {
        let frame = LocalFrame::new(lon, lat);
        let (lon_min, lat_min) = frame.unproject(-width_m / 2.0, -height_m / 2.0);
        let (lon_max, lat_max) = frame.unproject(width_m / 2.0, height_m / 2.0);
        Self {
            lat_min,
            lat_max,
            lon_min,
            lon_max,
        }
    }

    /// Midpoint of the tile as `(lon, lat)`.
    #[inline]
    pub fn centroid(&self) -> (f64, f64) {
        (
            (self.lon_min + self.lon_max) / 2.0,
            (self.lat_min + self.lat_max) / 2.0,
        )
    }

    pub fn is_finite(&self) -> bool {
        self.lat_min.is_finite()
            && self.lat_max.is_finite()
            && self.lon_min.is_finite()
            && self.lon_max.is_finite()
    }
}

/// Grid resolution in samples: `width` along longitude, `height` along latitude.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridSize {
    pub width: usize,
    pub height: usize,
}

impl GridSize {
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}

impl Default for GridSize {
    fn default() -> Self {
        Self::new(200, 200)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn around_is_centred() {
        let b = GeoBounds::around(105.85, 21.03, 1_000.0, 500.0);
        let (lon, lat) = b.centroid();
        assert!((lon - 105.85).abs() < 1e-12);
        assert!((lat - 21.03).abs() < 1e-12);
        assert!(b.lon_min < b.lon_max && b.lat_min < b.lat_max);
    }

    #[test]
    fn around_has_requested_extent() {
        let b = GeoBounds::around(0.0, 45.0, 2_000.0, 1_000.0);
        let f = LocalFrame::new(0.0, 45.0);
        let (x0, y0) = f.project(b.lon_min, b.lat_min);
        let (x1, y1) = f.project(b.lon_max, b.lat_max);
        assert!((x1 - x0 - 2_000.0).abs() < 1e-6);
        assert!((y1 - y0 - 1_000.0).abs() < 1e-6);
    }

    #[test]
    fn emitter_from_toml_defaults_optional_fields() {
        let e: Emitter = toml::from_str(
            r#"
            id = "tx-1"
            lon = 105.8
            lat = 21.0
            power = 500.0
        "#,
        )
        .unwrap();
        assert_eq!(e.id, "tx-1");
        assert_eq!(e.frequency, 0.0);
        assert_eq!(e.height, 0.0);
    }

    #[test]
    fn default_grid_is_200_square() {
        assert_eq!(GridSize::default().cells(), 40_000);
    }
}
