// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;

use canopy_index::{Backend, QuadTree};
use hashbrown::{HashMap, HashSet};
use kurbo::{Point, Rect};
use log::{debug, trace};

use crate::damage::SceneDamage;
use crate::entity::{Edge, Entity};
use crate::error::SceneError;
use crate::key::{Arena, EdgeKey, EntityKey};
use crate::selection::Selection;

#[derive(Clone, Debug)]
struct EdgeRecord {
    edge: Edge,
    source: EntityKey,
    target: EntityKey,
}

fn validate(entity: &Entity) -> Result<(), SceneError> {
    if !entity.position.is_finite() {
        return Err(SceneError::NonFinitePosition(entity.id.clone()));
    }
    if !(entity.radius.is_finite() && entity.radius >= 0.0) {
        return Err(SceneError::InvalidRadius {
            id: entity.id.clone(),
            radius: entity.radius,
        });
    }
    Ok(())
}

/// Checks a full replacement scene: valid entities, unique ids, and edges
/// whose endpoints are among the new entities.
fn validate_replacement(entities: &[Entity], edges: &[Edge]) -> Result<(), SceneError> {
    let mut seen: HashSet<&str> = HashSet::with_capacity(entities.len());
    for entity in entities {
        validate(entity)?;
        if !seen.insert(entity.id.as_str()) {
            return Err(SceneError::DuplicateId(entity.id.clone()));
        }
    }
    let mut seen_edges: HashSet<&str> = HashSet::with_capacity(edges.len());
    for edge in edges {
        if !seen_edges.insert(edge.id.as_str()) {
            return Err(SceneError::DuplicateId(edge.id.clone()));
        }
        for end in [&edge.source, &edge.target] {
            if !seen.contains(end.as_str()) {
                return Err(SceneError::UnknownEntity(end.clone()));
            }
        }
    }
    Ok(())
}

/// Owner of the scene's entities and edges, kept in lockstep with a spatial index.
///
/// Entities live in a generational arena and are addressed either by their
/// string id or by an [`EntityKey`]. The index stores keys and copies of
/// positions; every method that changes a position relocates the key in the
/// index within the same call, so a reader between calls always sees the
/// index and the store agree.
///
/// Structural edits ([`SceneStore::add_entity`], [`SceneStore::add_edge`],
/// [`SceneStore::replace_all`]) validate their input and report a
/// [`SceneError`]. Gesture-facing edits (moving, selecting) ignore unknown ids
/// and return whether anything changed.
///
/// Selection policy:
/// - [`SceneStore::select_one`] toggles a single entity.
/// - [`SceneStore::select_many`] only ever adds; it never deselects, even for
///   entities that are already selected.
///
/// The asymmetry is long-standing product behavior and is kept on purpose.
#[derive(Debug)]
pub struct SceneStore<B: Backend<EntityKey> = QuadTree<EntityKey>> {
    entities: Arena<EntityKey, Entity>,
    ids: HashMap<String, EntityKey>,
    edges: Arena<EdgeKey, EdgeRecord>,
    edge_ids: HashMap<String, EdgeKey>,
    index: B,
    selection: Selection<EntityKey>,
    edge_selection: Selection<EdgeKey>,
    max_radius: f64,
    damage: SceneDamage,
}

impl<B: Backend<EntityKey> + Default> Default for SceneStore<B> {
    fn default() -> Self {
        Self::with_backend(B::default())
    }
}

impl SceneStore {
    /// Creates an empty store indexed by a [`QuadTree`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: Backend<EntityKey>> SceneStore<B> {
    /// Creates an empty store over the given index backend. The backend is cleared.
    #[must_use]
    pub fn with_backend(mut index: B) -> Self {
        index.clear();
        Self {
            entities: Arena::default(),
            ids: HashMap::new(),
            edges: Arena::default(),
            edge_ids: HashMap::new(),
            index,
            selection: Selection::new(),
            edge_selection: Selection::new(),
            max_radius: 0.0,
            damage: SceneDamage::default(),
        }
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` if the scene has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.len() == 0
    }

    /// Whether an entity with this id exists.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    /// The key of the entity with this id.
    #[must_use]
    pub fn key(&self, id: &str) -> Option<EntityKey> {
        self.ids.get(id).copied()
    }

    /// The entity with this id.
    #[must_use]
    pub fn entity(&self, id: &str) -> Option<&Entity> {
        self.key(id).and_then(|key| self.entities.get(key))
    }

    /// The entity behind `key`, if it is still alive.
    #[must_use]
    pub fn entity_by_key(&self, key: EntityKey) -> Option<&Entity> {
        self.entities.get(key)
    }

    /// Iterates all entities in unspecified order.
    pub fn entities(&self) -> impl Iterator<Item = (EntityKey, &Entity)> + '_ {
        self.entities.iter()
    }

    /// The spatial index, for read-only queries.
    #[must_use]
    pub fn index(&self) -> &B {
        &self.index
    }

    /// Largest entity radius in the scene, or `0.0` if empty.
    #[must_use]
    pub fn max_radius(&self) -> f64 {
        self.max_radius
    }

    /// Union of all entity disks' bounding boxes, or `None` if empty.
    #[must_use]
    pub fn content_bounds(&self) -> Option<Rect> {
        self.entities
            .iter()
            .map(|(_, e)| e.bounds())
            .reduce(|acc, r| acc.union(r))
    }

    /// Keys of the entities whose centers lie inside `rect` (edges inclusive).
    #[must_use]
    pub fn entities_in_rect(&self, rect: Rect) -> Vec<EntityKey> {
        self.index.query_rect(rect)
    }

    /// Adds an entity and indexes it.
    ///
    /// An entity created with `selected == true` joins the selection.
    ///
    /// # Errors
    ///
    /// - [`SceneError::DuplicateId`] if the id is taken.
    /// - [`SceneError::NonFinitePosition`] / [`SceneError::InvalidRadius`] for
    ///   bad geometry.
    pub fn add_entity(&mut self, entity: Entity) -> Result<EntityKey, SceneError> {
        validate(&entity)?;
        if self.ids.contains_key(&entity.id) {
            return Err(SceneError::DuplicateId(entity.id));
        }
        let position = entity.position;
        let key = self.insert_unindexed(entity);
        self.index.insert(key, position);
        Ok(key)
    }

    /// Removes the entity with this id together with its incident edges.
    ///
    /// Unknown ids are ignored.
    pub fn remove_entity(&mut self, id: &str) -> Option<Entity> {
        let Some(key) = self.key(id) else {
            debug!("remove of unknown entity `{id}` ignored");
            return None;
        };
        self.remove_by_key(key)
    }

    /// Removes the entity behind `key` together with its incident edges.
    pub fn remove_by_key(&mut self, key: EntityKey) -> Option<Entity> {
        let entity = self.entities.remove(key)?;
        self.ids.remove(&entity.id);
        let indexed = self.index.remove(key);
        debug_assert!(indexed.is_some(), "entity {key:?} was not indexed");

        if self.selection.remove(&key) {
            self.damage.selection_changed = true;
        }
        let incident: Vec<EdgeKey> = self
            .edges
            .iter()
            .filter(|(_, r)| r.source == key || r.target == key)
            .map(|(k, _)| k)
            .collect();
        for edge in incident {
            self.remove_edge_by_key(edge);
        }
        if entity.radius >= self.max_radius {
            self.max_radius = self.entities.iter().map(|(_, e)| e.radius).fold(0.0, f64::max);
        }
        self.damage.record_removed(key, entity.bounds());
        debug!("removed entity `{}`", entity.id);
        Some(entity)
    }

    /// Moves the entity with this id and relocates it in the index.
    ///
    /// Unknown ids and non-finite positions are ignored. Returns whether the
    /// entity moved.
    pub fn move_entity(&mut self, id: &str, position: Point) -> bool {
        match self.key(id) {
            Some(key) => self.move_by_key(key, position),
            None => {
                debug!("move of unknown entity `{id}` ignored");
                false
            }
        }
    }

    /// Moves the entity behind `key`; see [`SceneStore::move_entity`].
    pub fn move_by_key(&mut self, key: EntityKey, position: Point) -> bool {
        if !position.is_finite() {
            debug!("non-finite move of {key:?} ignored");
            return false;
        }
        let Some(entity) = self.entities.get_mut(key) else {
            return false;
        };
        if entity.position == position {
            return false;
        }
        let old = entity.bounds();
        entity.position = position;
        let new = entity.bounds();

        let relocated = self.index.relocate(key, position);
        debug_assert!(relocated, "entity {key:?} was not indexed");
        if !relocated {
            self.index.insert(key, position);
        }
        self.damage.record_moved(key, old, new);
        trace!("moved {key:?} to {position:?}");
        true
    }

    /// Entity selection.
    #[must_use]
    pub fn selection(&self) -> &Selection<EntityKey> {
        &self.selection
    }

    /// Edge selection.
    #[must_use]
    pub fn edge_selection(&self) -> &Selection<EdgeKey> {
        &self.edge_selection
    }

    /// Whether the entity with this id is selected.
    #[must_use]
    pub fn is_selected(&self, id: &str) -> bool {
        self.entity(id).is_some_and(|e| e.selected)
    }

    /// Selected entities in selection order.
    pub fn selected_entities(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.selection.iter().filter_map(|k| self.entities.get(*k))
    }

    /// Toggles the selection of exactly this entity. Others are unaffected.
    ///
    /// Returns whether anything changed; unknown ids change nothing.
    pub fn select_one(&mut self, id: &str) -> bool {
        match self.key(id) {
            Some(key) => self.toggle_key(key),
            None => {
                debug!("select of unknown entity `{id}` ignored");
                false
            }
        }
    }

    /// Toggles the selection of the entity behind `key`.
    pub fn toggle_key(&mut self, key: EntityKey) -> bool {
        let Some(entity) = self.entities.get_mut(key) else {
            return false;
        };
        entity.selected = self.selection.toggle(key);
        self.damage.selection_changed = true;
        true
    }

    /// Adds the entity behind `key` to the selection if it is not selected yet.
    pub fn select_key(&mut self, key: EntityKey) -> bool {
        self.extend_selection([key]) > 0
    }

    /// Adds every named entity to the selection; never deselects.
    ///
    /// Unknown ids are skipped. Returns the number of newly selected entities.
    pub fn select_many<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<EntityKey> = ids
            .into_iter()
            .filter_map(|id| self.key(id.as_ref()))
            .collect();
        self.extend_selection(keys)
    }

    /// Adds every live key to the selection; never deselects.
    pub fn extend_selection<I>(&mut self, keys: I) -> usize
    where
        I: IntoIterator<Item = EntityKey>,
    {
        let keys: Vec<EntityKey> = keys
            .into_iter()
            .filter(|k| self.entities.get(*k).is_some())
            .collect();
        let added = self.selection.extend_with(keys.iter().copied());
        if added > 0 {
            for key in keys {
                if let Some(entity) = self.entities.get_mut(key) {
                    entity.selected = true;
                }
            }
            self.damage.selection_changed = true;
        }
        added
    }

    /// Deselects every entity and edge. Returns whether anything was selected.
    pub fn clear_selection(&mut self) -> bool {
        if self.selection.is_empty() && self.edge_selection.is_empty() {
            return false;
        }
        for key in self.selection.iter() {
            if let Some(entity) = self.entities.get_mut(*key) {
                entity.selected = false;
            }
        }
        for key in self.edge_selection.iter() {
            if let Some(record) = self.edges.get_mut(*key) {
                record.edge.selected = false;
            }
        }
        self.selection.clear();
        self.edge_selection.clear();
        self.damage.selection_changed = true;
        true
    }

    /// Number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// The edge with this id.
    #[must_use]
    pub fn edge(&self, id: &str) -> Option<&Edge> {
        let key = self.edge_ids.get(id)?;
        self.edges.get(*key).map(|r| &r.edge)
    }

    /// Iterates all edges in unspecified order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeKey, &Edge)> + '_ {
        self.edges.iter().map(|(k, r)| (k, &r.edge))
    }

    /// Resolved `(source, target)` entity keys of an edge.
    #[must_use]
    pub fn edge_endpoints(&self, key: EdgeKey) -> Option<(EntityKey, EntityKey)> {
        self.edges.get(key).map(|r| (r.source, r.target))
    }

    /// Adds an edge between two existing entities.
    ///
    /// # Errors
    ///
    /// - [`SceneError::DuplicateId`] if the edge id is taken.
    /// - [`SceneError::UnknownEntity`] if an endpoint does not exist.
    pub fn add_edge(&mut self, edge: Edge) -> Result<EdgeKey, SceneError> {
        if self.edge_ids.contains_key(&edge.id) {
            return Err(SceneError::DuplicateId(edge.id));
        }
        let source = self
            .key(&edge.source)
            .ok_or_else(|| SceneError::UnknownEntity(edge.source.clone()))?;
        let target = self
            .key(&edge.target)
            .ok_or_else(|| SceneError::UnknownEntity(edge.target.clone()))?;
        Ok(self.insert_edge(edge, source, target))
    }

    /// Removes the edge with this id. Unknown ids are ignored.
    pub fn remove_edge(&mut self, id: &str) -> Option<Edge> {
        let key = *self.edge_ids.get(id)?;
        self.remove_edge_by_key(key)
    }

    /// Toggles the selection of exactly this edge.
    pub fn select_edge(&mut self, id: &str) -> bool {
        let Some(key) = self.edge_ids.get(id).copied() else {
            debug!("select of unknown edge `{id}` ignored");
            return false;
        };
        let Some(record) = self.edges.get_mut(key) else {
            return false;
        };
        record.edge.selected = self.edge_selection.toggle(key);
        self.damage.selection_changed = true;
        true
    }

    /// Adds every named edge to the selection; never deselects.
    pub fn select_edges<I, S>(&mut self, ids: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keys: Vec<EdgeKey> = ids
            .into_iter()
            .filter_map(|id| self.edge_ids.get(id.as_ref()).copied())
            .collect();
        let added = self.edge_selection.extend_with(keys.iter().copied());
        if added > 0 {
            for key in keys {
                if let Some(record) = self.edges.get_mut(key) {
                    record.edge.selected = true;
                }
            }
            self.damage.selection_changed = true;
        }
        added
    }

    /// Replaces the whole scene and rebuilds the index in one pass.
    ///
    /// Input is validated before anything is touched, so on error the store is
    /// unchanged. Every previous entity is reported as removed.
    ///
    /// # Errors
    ///
    /// Same conditions as [`SceneStore::add_entity`] and
    /// [`SceneStore::add_edge`], checked against the new contents.
    pub fn replace_all<E, G>(&mut self, entities: E, edges: G) -> Result<(), SceneError>
    where
        E: IntoIterator<Item = Entity>,
        G: IntoIterator<Item = Edge>,
    {
        let entities: Vec<Entity> = entities.into_iter().collect();
        let edges: Vec<Edge> = edges.into_iter().collect();

        validate_replacement(&entities, &edges)?;

        for (key, entity) in self.entities.iter() {
            self.damage.record_removed(key, entity.bounds());
        }
        if !self.selection.is_empty() || !self.edge_selection.is_empty() {
            self.damage.selection_changed = true;
        }
        if self.edges.len() > 0 || !edges.is_empty() {
            self.damage.edges_changed = true;
        }
        self.entities.clear();
        self.ids.clear();
        self.edges.clear();
        self.edge_ids.clear();
        self.selection.clear();
        self.edge_selection.clear();
        self.max_radius = 0.0;

        for entity in entities {
            self.insert_unindexed(entity);
        }
        self.rebuild_index();
        for edge in edges {
            if let (Some(source), Some(target)) = (self.key(&edge.source), self.key(&edge.target)) {
                self.insert_edge(edge, source, target);
            }
        }
        debug!(
            "scene replaced: {} entities, {} edges",
            self.entities.len(),
            self.edges.len()
        );
        Ok(())
    }

    /// Rebuilds the index from the stored entity positions.
    pub fn rebuild_index(&mut self) {
        self.index
            .rebuild_all(self.entities.iter().map(|(k, e)| (k, e.position)));
    }

    /// Whether the index holds exactly the stored entities at their current
    /// positions, each findable by a zero-radius query.
    ///
    /// A `false` here is a bug; tests assert on it.
    #[must_use]
    pub fn is_index_consistent(&self) -> bool {
        self.index.len() == self.entities.len()
            && self.entities.iter().all(|(key, entity)| {
                self.index.position(key) == Some(entity.position)
                    && self
                        .index
                        .find_nearest(entity.position, 0.0)
                        .is_some_and(|hit| hit.position == entity.position)
            })
    }

    /// Drains the changes recorded since the previous call.
    pub fn take_damage(&mut self) -> SceneDamage {
        core::mem::take(&mut self.damage)
    }

    fn insert_unindexed(&mut self, entity: Entity) -> EntityKey {
        let selected = entity.selected;
        let bounds = entity.bounds();
        self.max_radius = self.max_radius.max(entity.radius);
        debug!("added entity `{}`", entity.id);
        let id = entity.id.clone();
        let key = self.entities.insert(entity);
        self.ids.insert(id, key);
        if selected {
            self.selection.add(key);
            self.damage.selection_changed = true;
        }
        self.damage.record_added(key, bounds);
        key
    }

    fn insert_edge(&mut self, edge: Edge, source: EntityKey, target: EntityKey) -> EdgeKey {
        let selected = edge.selected;
        let id = edge.id.clone();
        let key = self.edges.insert(EdgeRecord {
            edge,
            source,
            target,
        });
        self.edge_ids.insert(id, key);
        if selected {
            self.edge_selection.add(key);
            self.damage.selection_changed = true;
        }
        self.damage.edges_changed = true;
        key
    }

    fn remove_edge_by_key(&mut self, key: EdgeKey) -> Option<Edge> {
        let record = self.edges.remove(key)?;
        self.edge_ids.remove(&record.edge.id);
        if self.edge_selection.remove(&key) {
            self.damage.selection_changed = true;
        }
        self.damage.edges_changed = true;
        Some(record.edge)
    }
}
