//! Editable scene: emitters and obstacles keyed by identifier, with change tracking.
#![forbid(unsafe_code)]

use std::fmt;

use emfield_model::{Emitter, Obstacle};
use hashbrown::HashMap;
use thiserror::Error;

mod mode;

pub use mode::{Details, EditMode, EditSession};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum EntityKind {
    Emitter,
    Obstacle,
}

impl EntityKind {
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            EntityKind::Emitter => "emitter",
            EntityKind::Obstacle => "obstacle",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SceneError {
    #[error("{kind} id {id:?} already exists")]
    DuplicateId { kind: EntityKind, id: String },
    #[error("no {kind} with id {id:?}")]
    UnknownId { kind: EntityKind, id: String },
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    pub emitters: usize,
    pub obstacles: usize,
    pub revision: u64,
    pub computed_revision: u64,
}

/// Ordered id -> record table.
#[derive(Clone, Debug)]
struct Table<T> {
    kind: EntityKind,
    by_id: HashMap<String, T>,
    order: Vec<String>,
}

impl<T: Clone> Table<T> {
    fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            by_id: HashMap::new(),
            order: Vec::new(),
        }
    }

    fn insert(&mut self, id: &str, value: T) -> Result<(), SceneError> {
        if self.by_id.contains_key(id) {
            return Err(SceneError::DuplicateId {
                kind: self.kind,
                id: id.to_string(),
            });
        }
        self.by_id.insert(id.to_string(), value);
        self.order.push(id.to_string());
        Ok(())
    }

    fn replace(&mut self, id: &str, value: T) -> Result<(), SceneError> {
        match self.by_id.get_mut(id) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(self.unknown(id)),
        }
    }

    fn remove(&mut self, id: &str) -> Result<T, SceneError> {
        let value = self.by_id.remove(id).ok_or_else(|| self.unknown(id))?;
        self.order.retain(|k| k != id);
        Ok(value)
    }

    fn unknown(&self, id: &str) -> SceneError {
        SceneError::UnknownId {
            kind: self.kind,
            id: id.to_string(),
        }
    }

    fn snapshot(&self) -> Vec<T> {
        self.order
            .iter()
            .filter_map(|k| self.by_id.get(k).cloned())
            .collect()
    }
}

/// Scene owned by the editing layer. The kernel only ever sees snapshots.
#[derive(Clone, Debug)]
pub struct Scene {
    emitters: Table<Emitter>,
    obstacles: Table<Obstacle>,
    revision: u64,
    computed: u64,
    next_serial: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            emitters: Table::new(EntityKind::Emitter),
            obstacles: Table::new(EntityKind::Obstacle),
            revision: 0,
            computed: 0,
            next_serial: 0,
        }
    }

    fn bump(&mut self) -> u64 {
        self.revision = self.revision.wrapping_add(1).max(1);
        self.revision
    }

    /// Fresh identifier of the form `emitter-N` / `obstacle-N`, unused in this scene.
    pub fn next_id(&mut self, kind: EntityKind) -> String {
        loop {
            self.next_serial += 1;
            let id = format!("{}-{}", kind.label(), self.next_serial);
            let taken = match kind {
                EntityKind::Emitter => self.emitters.by_id.contains_key(&id),
                EntityKind::Obstacle => self.obstacles.by_id.contains_key(&id),
            };
            if !taken {
                return id;
            }
        }
    }

    pub fn insert_emitter(&mut self, e: Emitter) -> Result<u64, SceneError> {
        let id = e.id.clone();
        self.emitters.insert(&id, e)?;
        log::debug!(target: "scene", "emitter {} added", id);
        Ok(self.bump())
    }

    pub fn update_emitter(&mut self, e: Emitter) -> Result<u64, SceneError> {
        let id = e.id.clone();
        self.emitters.replace(&id, e)?;
        log::debug!(target: "scene", "emitter {} updated", id);
        Ok(self.bump())
    }

    pub fn remove_emitter(&mut self, id: &str) -> Result<Emitter, SceneError> {
        let e = self.emitters.remove(id)?;
        log::debug!(target: "scene", "emitter {} removed", id);
        self.bump();
        Ok(e)
    }

    pub fn emitter(&self, id: &str) -> Option<&Emitter> {
        self.emitters.by_id.get(id)
    }

    pub fn insert_obstacle(&mut self, o: Obstacle) -> Result<u64, SceneError> {
        let id = o.id.clone();
        self.obstacles.insert(&id, o)?;
        log::debug!(target: "scene", "obstacle {} added", id);
        Ok(self.bump())
    }

    pub fn update_obstacle(&mut self, o: Obstacle) -> Result<u64, SceneError> {
        let id = o.id.clone();
        self.obstacles.replace(&id, o)?;
        log::debug!(target: "scene", "obstacle {} updated", id);
        Ok(self.bump())
    }

    pub fn remove_obstacle(&mut self, id: &str) -> Result<Obstacle, SceneError> {
        let o = self.obstacles.remove(id)?;
        log::debug!(target: "scene", "obstacle {} removed", id);
        self.bump();
        Ok(o)
    }

    pub fn obstacle(&self, id: &str) -> Option<&Obstacle> {
        self.obstacles.by_id.get(id)
    }

    /// Geographic position of an entity, if present.
    pub fn position(&self, kind: EntityKind, id: &str) -> Option<(f64, f64)> {
        match kind {
            EntityKind::Emitter => self.emitter(id).map(|e| (e.lon, e.lat)),
            EntityKind::Obstacle => self.obstacle(id).map(|o| (o.lon, o.lat)),
        }
    }

    /// Emitters in insertion order.
    pub fn emitters(&self) -> Vec<Emitter> {
        self.emitters.snapshot()
    }

    /// Obstacles in insertion order.
    pub fn obstacles(&self) -> Vec<Obstacle> {
        self.obstacles.snapshot()
    }

    #[inline]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Record that a grid was computed from revision `rev`. Older revisions are ignored.
    pub fn mark_computed(&mut self, rev: u64) {
        if rev > self.computed {
            self.computed = rev;
        }
    }

    /// Has the scene changed since the last computed grid?
    pub fn needs_recompute(&self) -> bool {
        self.revision > self.computed
    }

    pub fn stats(&self) -> SceneStats {
        SceneStats {
            emitters: self.emitters.order.len(),
            obstacles: self.obstacles.order.len(),
            revision: self.revision,
            computed_revision: self.computed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(id: &str, power: f64) -> Emitter {
        Emitter::new(id, 105.85, 21.03, power, 10.0)
    }

    #[test]
    fn snapshots_keep_insertion_order() {
        let mut scene = Scene::new();
        for id in ["c", "a", "b"] {
            scene.insert_emitter(tx(id, 1.0)).unwrap();
        }
        let ids: Vec<String> = scene.emitters().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);

        scene.remove_emitter("a").unwrap();
        let ids: Vec<String> = scene.emitters().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["c", "b"]);
    }

    #[test]
    fn duplicate_and_unknown_ids_are_errors() {
        let mut scene = Scene::new();
        scene.insert_emitter(tx("a", 1.0)).unwrap();
        assert_eq!(
            scene.insert_emitter(tx("a", 2.0)),
            Err(SceneError::DuplicateId {
                kind: EntityKind::Emitter,
                id: "a".into()
            })
        );
        assert!(matches!(
            scene.update_obstacle(Obstacle::new("x", 0.0, 0.0, 1.0, 1.0, 1.0)),
            Err(SceneError::UnknownId { kind: EntityKind::Obstacle, .. })
        ));
        assert!(scene.remove_emitter("zzz").is_err());
        assert_eq!(scene.emitter("a").map(|e| e.power), Some(1.0));
    }

    #[test]
    fn revisions_track_recompute() {
        let mut scene = Scene::new();
        assert!(!scene.needs_recompute());
        let r1 = scene.insert_emitter(tx("a", 1.0)).unwrap();
        assert!(scene.needs_recompute());
        scene.mark_computed(r1);
        assert!(!scene.needs_recompute());

        let r2 = scene.update_emitter(tx("a", 5.0)).unwrap();
        assert!(r2 > r1);
        assert!(scene.needs_recompute());
        // Stale result does not clear the flag.
        scene.mark_computed(r1);
        assert!(scene.needs_recompute());
        scene.mark_computed(r2);
        assert_eq!(scene.stats().computed_revision, r2);
    }

    #[test]
    fn failed_edits_leave_revision_alone() {
        let mut scene = Scene::new();
        scene.insert_emitter(tx("a", 1.0)).unwrap();
        let rev = scene.revision();
        let _ = scene.insert_emitter(tx("a", 1.0));
        let _ = scene.remove_obstacle("nope");
        assert_eq!(scene.revision(), rev);
    }

    #[test]
    fn next_id_skips_taken_names() {
        let mut scene = Scene::new();
        scene.insert_emitter(tx("emitter-1", 1.0)).unwrap();
        assert_eq!(scene.next_id(EntityKind::Emitter), "emitter-2");
        assert_eq!(scene.next_id(EntityKind::Obstacle), "obstacle-3");
    }
}
