use serde::Deserialize;
use std::error::Error;
use std::fs;
use std::path::Path;

use emfield_kernel::{FieldParams, FieldRequest};
use emfield_model::{Emitter, GeoBounds, GridSize, Obstacle};
use emfield_scene::Scene;

#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioConfig {
    pub tile: GeoBounds,
    #[serde(default)]
    pub grid: GridConfig,
    #[serde(default)]
    pub model: FieldParams,
    #[serde(default)]
    pub emitters: Vec<Emitter>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GridConfig {
    #[serde(default = "default_grid_dim")]
    pub width: usize,
    #[serde(default = "default_grid_dim")]
    pub height: usize,
    #[serde(default)]
    pub altitude: f64,
}
fn default_grid_dim() -> usize {
    200
}
impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: default_grid_dim(),
            height: default_grid_dim(),
            altitude: 0.0,
        }
    }
}

/// Loaded scenario: tile, sampling and model settings plus the scene contents.
pub struct Scenario {
    pub bounds: GeoBounds,
    pub size: GridSize,
    pub altitude: f64,
    pub params: FieldParams,
    pub scene: Scene,
}

impl Scenario {
    pub fn from_config(cfg: ScenarioConfig) -> Result<Self, Box<dyn Error>> {
        let mut scene = Scene::new();
        for e in cfg.emitters {
            scene.insert_emitter(e)?;
        }
        for o in cfg.obstacles {
            scene.insert_obstacle(o)?;
        }
        Ok(Self {
            bounds: cfg.tile,
            size: GridSize::new(cfg.grid.width, cfg.grid.height),
            altitude: cfg.grid.altitude,
            params: cfg.model,
            scene,
        })
    }

    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: ScenarioConfig = toml::from_str(s)?;
        Self::from_config(cfg)
    }

    /// Run `f` with a kernel request borrowing a snapshot of the scene.
    pub fn with_request<R>(&self, f: impl FnOnce(&FieldRequest<'_>) -> R) -> R {
        let emitters = self.scene.emitters();
        let obstacles = self.scene.obstacles();
        let req = FieldRequest {
            emitters: &emitters,
            obstacles: &obstacles,
            altitude: self.altitude,
            bounds: self.bounds,
            size: self.size,
        };
        f(&req)
    }
}

pub fn load_scenario_from_path(path: &Path) -> Result<Scenario, Box<dyn Error>> {
    let s = fs::read_to_string(path)?;
    Scenario::from_toml_str(&s)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"
        [tile]
        lat_min = 21.02
        lat_max = 21.04
        lon_min = 105.84
        lon_max = 105.86
    "#;

    #[test]
    fn minimal_scenario_uses_defaults() {
        let s = Scenario::from_toml_str(MINIMAL).unwrap();
        assert_eq!(s.size, GridSize::new(200, 200));
        assert_eq!(s.altitude, 0.0);
        assert_eq!(s.params, FieldParams::default());
        assert_eq!(s.scene.stats().emitters, 0);
    }

    #[test]
    fn full_scenario_populates_scene_in_order() {
        let text = format!(
            r#"{MINIMAL}
            [grid]
            width = 400
            height = 300
            altitude = 12.5

            [model]
            detection_threshold = 6.0

            [[emitters]]
            id = "b"
            lon = 105.85
            lat = 21.03
            power = 2000.0
            frequency = 2400.0
            height = 20.0

            [[emitters]]
            id = "a"
            lon = 105.851
            lat = 21.031
            power = 500.0

            [[obstacles]]
            id = "tower"
            lon = 105.852
            lat = 21.03
            length = 30.0
            width = 20.0
            height = 60.0
        "#
        );
        let s = Scenario::from_toml_str(&text).unwrap();
        assert_eq!(s.size, GridSize::new(400, 300));
        assert_eq!(s.altitude, 12.5);
        assert_eq!(s.params.detection_threshold, 6.0);
        let ids: Vec<String> = s.scene.emitters().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(s.scene.obstacle("tower").map(|o| o.height), Some(60.0));
        let n = s.with_request(|req| req.emitters.len() + req.obstacles.len());
        assert_eq!(n, 3);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let text = format!(
            r#"{MINIMAL}
            [[emitters]]
            id = "x"
            lon = 105.85
            lat = 21.03
            power = 1.0

            [[emitters]]
            id = "x"
            lon = 105.85
            lat = 21.03
            power = 2.0
        "#
        );
        let err = Scenario::from_toml_str(&text).err().unwrap();
        assert!(err.to_string().contains("already exists"));
    }

    #[test]
    fn missing_tile_is_an_error() {
        assert!(Scenario::from_toml_str("[grid]\nwidth = 10").is_err());
    }
}
