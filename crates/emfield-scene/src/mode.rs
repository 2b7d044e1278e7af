use emfield_model::{Emitter, Obstacle};

use crate::{EntityKind, Scene, SceneError};

/// Where the editor is in an add/edit interaction.
///
/// `Idle -> Placing -> EditingDetails -> Idle` when adding; `Idle -> EditingDetails -> Idle`
/// when editing an existing entity. Cancelling returns to `Idle` from anywhere.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum EditMode {
    #[default]
    Idle,
    /// Waiting for the user to pick a position on the map.
    Placing(EntityKind),
    EditingDetails {
        kind: EntityKind,
        lon: f64,
        lat: f64,
        /// `Some(id)` when editing an existing entity.
        target: Option<String>,
    },
}

impl EditMode {
    fn name(&self) -> &'static str {
        match self {
            EditMode::Idle => "idle",
            EditMode::Placing(_) => "placing",
            EditMode::EditingDetails { .. } => "editing details",
        }
    }
}

/// Attribute form submitted when committing.
#[derive(Clone, Debug, PartialEq)]
pub enum Details {
    Emitter {
        power: f64,
        frequency: f64,
        height: f64,
    },
    Obstacle {
        length: f64,
        width: f64,
        height: f64,
    },
}

impl Details {
    pub fn kind(&self) -> EntityKind {
        match self {
            Details::Emitter { .. } => EntityKind::Emitter,
            Details::Obstacle { .. } => EntityKind::Obstacle,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct EditSession {
    mode: EditMode,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    fn reject(&self, action: &'static str) -> SceneError {
        SceneError::InvalidTransition {
            action,
            state: self.mode.name(),
        }
    }

    pub fn begin_placing(&mut self, kind: EntityKind) -> Result<(), SceneError> {
        if self.mode != EditMode::Idle {
            return Err(self.reject("start placing"));
        }
        self.mode = EditMode::Placing(kind);
        Ok(())
    }

    pub fn place(&mut self, lon: f64, lat: f64) -> Result<(), SceneError> {
        let EditMode::Placing(kind) = self.mode else {
            return Err(self.reject("place"));
        };
        self.mode = EditMode::EditingDetails {
            kind,
            lon,
            lat,
            target: None,
        };
        Ok(())
    }

    pub fn begin_edit(&mut self, scene: &Scene, kind: EntityKind, id: &str) -> Result<(), SceneError> {
        if self.mode != EditMode::Idle {
            return Err(self.reject("start editing"));
        }
        let (lon, lat) = scene.position(kind, id).ok_or_else(|| SceneError::UnknownId {
            kind,
            id: id.to_string(),
        })?;
        self.mode = EditMode::EditingDetails {
            kind,
            lon,
            lat,
            target: Some(id.to_string()),
        };
        Ok(())
    }

    /// Apply `details` to the scene and return to idle. Returns the entity id.
    ///
    /// On error the session stays where it was.
    pub fn commit(&mut self, scene: &mut Scene, details: Details) -> Result<String, SceneError> {
        let EditMode::EditingDetails {
            kind,
            lon,
            lat,
            target,
        } = &self.mode
        else {
            return Err(self.reject("commit"));
        };
        if details.kind() != *kind {
            return Err(self.reject(match details.kind() {
                EntityKind::Emitter => "commit emitter details",
                EntityKind::Obstacle => "commit obstacle details",
            }));
        }
        let (lon, lat) = (*lon, *lat);
        let id = match target {
            Some(id) => id.clone(),
            None => scene.next_id(*kind),
        };
        let editing = target.is_some();
        match details {
            Details::Emitter {
                power,
                frequency,
                height,
            } => {
                let e = Emitter::new(id.clone(), lon, lat, power, height).with_frequency(frequency);
                if editing {
                    scene.update_emitter(e)?;
                } else {
                    scene.insert_emitter(e)?;
                }
            }
            Details::Obstacle {
                length,
                width,
                height,
            } => {
                let o = Obstacle::new(id.clone(), lon, lat, length, width, height);
                if editing {
                    scene.update_obstacle(o)?;
                } else {
                    scene.insert_obstacle(o)?;
                }
            }
        }
        self.mode = EditMode::Idle;
        Ok(id)
    }

    /// Abandon whatever is in progress. Returns the mode that was left.
    pub fn cancel(&mut self) -> EditMode {
        std::mem::take(&mut self.mode)
    }
}
