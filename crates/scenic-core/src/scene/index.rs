//! Structural validation and id lookup for scenes.
//!
//! [`SceneIndex`] is built once per operation. It maps object ids to their
//! position in [`Scene::objects`], resolves every relationship endpoint, and
//! records which relationships touch each object. Downstream code works with
//! these positions and never scans the object list to find an id.

use std::collections::{HashMap, hash_map::Entry};

use log::trace;
use thiserror::Error;

use super::Scene;

/// Structural problems that make a scene unusable for layout or scoring.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StructureError {
    #[error("duplicate object id `{id}`")]
    DuplicateObjectId { id: String },

    #[error("relationship `{relationship_id}` references unknown object `{object_id}`")]
    DanglingRelationship {
        relationship_id: String,
        object_id: String,
    },

    #[error("object `{id}` has non-positive dimensions {width}x{height}")]
    NonPositiveDimension { id: String, width: f64, height: f64 },

    #[error("canvas has non-positive size {width}x{height}")]
    NonPositiveCanvas { width: f64, height: f64 },

    #[error("object `{id}` has a non-finite position")]
    NonFinitePosition { id: String },
}

/// Resolved endpoints of one relationship, as positions in the object list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoints {
    pub source: usize,
    pub target: usize,
}

impl Endpoints {
    /// Returns true if the relationship starts and ends at the same object
    pub fn is_self_loop(self) -> bool {
        self.source == self.target
    }

    /// Returns true if `object` is one of the two endpoints
    pub fn touches(self, object: usize) -> bool {
        self.source == object || self.target == object
    }

    /// Returns the endpoint opposite to `object`
    pub fn other(self, object: usize) -> usize {
        if self.source == object {
            self.target
        } else {
            self.source
        }
    }
}

/// Id lookup table and adjacency for a validated scene.
///
/// The index borrows the ids of the scene it was built from. Layout only
/// rewrites positions, so an index stays valid for any scene derived from the
/// original one by moving objects.
#[derive(Debug, Clone)]
pub struct SceneIndex<'a> {
    by_id: HashMap<&'a str, usize>,
    endpoints: Vec<Endpoints>,
    incident: Vec<Vec<usize>>,
}

impl<'a> SceneIndex<'a> {
    /// Validates `scene` and builds its index.
    ///
    /// Checks run in a fixed order: canvas, then objects in insertion order
    /// (position, dimensions, duplicate id), then relationships in insertion
    /// order. The first problem found is returned.
    ///
    /// # Errors
    ///
    /// Returns the first [`StructureError`] found.
    pub fn new(scene: &'a Scene) -> Result<Self, StructureError> {
        let canvas = scene.canvas_size();
        if !(canvas.is_positive() && canvas.width().is_finite() && canvas.height().is_finite()) {
            return Err(StructureError::NonPositiveCanvas {
                width: canvas.width(),
                height: canvas.height(),
            });
        }

        let mut by_id = HashMap::with_capacity(scene.objects().len());
        for (idx, object) in scene.objects().iter().enumerate() {
            if !object.center().is_finite() {
                return Err(StructureError::NonFinitePosition {
                    id: object.id().to_string(),
                });
            }

            let size = object.size();
            if !size.is_positive() || !size.width().is_finite() || !size.height().is_finite() {
                return Err(StructureError::NonPositiveDimension {
                    id: object.id().to_string(),
                    width: size.width(),
                    height: size.height(),
                });
            }

            match by_id.entry(object.id()) {
                Entry::Occupied(_) => {
                    return Err(StructureError::DuplicateObjectId {
                        id: object.id().to_string(),
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(idx);
                }
            }
        }

        let mut endpoints = Vec::with_capacity(scene.relationships().len());
        let mut incident = vec![Vec::new(); scene.objects().len()];
        for (rel_idx, relationship) in scene.relationships().iter().enumerate() {
            let resolve = |object_id: &str| {
                by_id
                    .get(object_id)
                    .copied()
                    .ok_or_else(|| StructureError::DanglingRelationship {
                        relationship_id: relationship.id().to_string(),
                        object_id: object_id.to_string(),
                    })
            };
            let source = resolve(relationship.source_id())?;
            let target = resolve(relationship.target_id())?;

            incident[source].push(rel_idx);
            if target != source {
                incident[target].push(rel_idx);
            }
            endpoints.push(Endpoints { source, target });
        }

        trace!(
            objects = by_id.len(),
            relationships = endpoints.len();
            "Scene index built"
        );

        Ok(Self {
            by_id,
            endpoints,
            incident,
        })
    }

    /// Position of the object with `id` in the object list
    pub fn position_of(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }

    /// Number of indexed objects
    pub fn object_count(&self) -> usize {
        self.incident.len()
    }

    /// Resolved endpoints of every relationship, in insertion order
    pub fn endpoints(&self) -> &[Endpoints] {
        &self.endpoints
    }

    /// Positions (in the relationship list) of relationships touching an object
    pub fn incident(&self, object: usize) -> &[usize] {
        &self.incident[object]
    }

    /// Returns true if the object takes part in at least one relationship
    pub fn is_connected(&self, object: usize) -> bool {
        !self.incident[object].is_empty()
    }
}
