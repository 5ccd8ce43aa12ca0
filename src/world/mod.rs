//! The World (§4.A): owns entities, indexes components by type, and answers
//! queries. Mirrors the teacher's `Scene` (`core/scene.rs` in the teacher
//! crate) in spirit — a flat, lock-protected store sized for hundreds to a
//! few thousand entities, not an archetype-table ECS — but replaces the
//! teacher's single fat `Entity` struct with the type-indexed component
//! storage §4.A requires, since this spec's components are a closed set
//! registered independently rather than fields baked into one struct.

pub mod entity;
pub mod registry;

pub use entity::Entity;
pub use registry::{Component, ComponentRegistry};

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::error::WorldError;

/// Capacity hints for a new [`World`]. `Serialize`/`Deserialize` so a host
/// can ship these as part of a scene file loaded with `serde_json`, the way
/// the teacher's `AssetManifest` is (`assets/manifest.rs`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Entities the initial storage should be able to hold without
    /// reallocating.
    #[serde(default = "default_entity_capacity")]
    pub initial_entity_capacity: usize,
}

fn default_entity_capacity() -> usize {
    256
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self { initial_entity_capacity: 256 }
    }
}

/// Notification queue entry for a world mutation the scheduler or host may
/// care about (§9: "model this as a world-level callback queue drained at
/// the end of each mutation, not as per-entity subscribers").
#[derive(Debug, Clone, Copy)]
pub enum WorldEvent {
    EntityCreated(i32),
    ComponentAdded(i32, TypeId),
}

struct ComponentColumn {
    /// Entity ids holding this component, in the order they first gained it.
    order: Vec<i32>,
    values: HashMap<i32, Box<dyn Any>>,
}

impl ComponentColumn {
    fn new() -> Self {
        Self { order: Vec::new(), values: HashMap::new() }
    }

    fn insert(&mut self, id: i32, value: Box<dyn Any>) {
        if self.values.insert(id, value).is_none() {
            self.order.push(id);
        }
    }

    fn remove(&mut self, id: i32) -> Option<Box<dyn Any>> {
        let removed = self.values.remove(&id);
        if removed.is_some() {
            self.order.retain(|&e| e != id);
        }
        removed
    }
}

struct WorldInner {
    next_id: i32,
    order: Vec<i32>,
    by_id: HashMap<i32, Entity>,
    components: HashMap<TypeId, ComponentColumn>,
    events: Vec<WorldEvent>,
    active_camera_override: Option<i32>,
}

impl WorldInner {
    fn new(config: WorldConfig) -> Self {
        Self {
            next_id: 0,
            order: Vec::with_capacity(config.initial_entity_capacity),
            by_id: HashMap::with_capacity(config.initial_entity_capacity),
            components: HashMap::new(),
            events: Vec::new(),
            active_camera_override: None,
        }
    }
}

/// Owns entities and their components for one scene.
///
/// Every public operation locks an internal mutex (§5: "World entity store:
/// protected by a mutex; all public methods lock it... no user callbacks
/// under lock; `view` takes a snapshot then releases"). In the engine's
/// single-threaded frame loop this buys nothing for concurrency, but it
/// keeps the type honest about the snapshot semantics `view` promises and
/// means a `&World` (not `&mut World`) is enough for every caller, including
/// several systems reading the same tick.
pub struct World {
    inner: Mutex<WorldInner>,
}

impl World {
    pub fn new() -> Self {
        Self::with_config(WorldConfig::default())
    }

    pub fn with_config(config: WorldConfig) -> Self {
        Self { inner: Mutex::new(WorldInner::new(config)) }
    }

    /// Create a new entity with the given display name.
    pub fn create_entity(&self, name: impl Into<String>) -> Entity {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        let entity = Entity::new(id, name);
        inner.order.push(id);
        inner.by_id.insert(id, entity.clone());
        inner.events.push(WorldEvent::EntityCreated(id));
        entity
    }

    /// Remove an entity and every component it holds. Returns whether it
    /// existed.
    pub fn destroy_entity(&self, id: i32) -> bool {
        let mut inner = self.inner.lock().unwrap();
        if inner.by_id.remove(&id).is_none() {
            return false;
        }
        inner.order.retain(|&e| e != id);
        for column in inner.components.values_mut() {
            column.remove(id);
        }
        true
    }

    /// Whether an entity with this id currently exists.
    pub fn contains_entity(&self, id: i32) -> bool {
        self.inner.lock().unwrap().by_id.contains_key(&id)
    }

    /// Number of live entities.
    pub fn entity_count(&self) -> usize {
        self.inner.lock().unwrap().order.len()
    }

    /// Snapshot of every live entity, in registration order.
    pub fn entities(&self) -> Vec<Entity> {
        let inner = self.inner.lock().unwrap();
        inner.order.iter().map(|id| inner.by_id[id].clone()).collect()
    }

    /// Add a component of kind `T`. Fails with [`WorldError::DuplicateComponent`]
    /// if the entity already holds one, or [`WorldError::EntityNotFound`] if
    /// the entity does not exist.
    pub fn add_component<T: Component>(&self, entity: i32, component: T) -> Result<(), WorldError> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.by_id.contains_key(&entity) {
            return Err(WorldError::EntityNotFound(entity));
        }
        let type_id = TypeId::of::<T>();
        let column = inner.components.entry(type_id).or_insert_with(ComponentColumn::new);
        if column.values.contains_key(&entity) {
            return Err(WorldError::DuplicateComponent(entity));
        }
        column.insert(entity, Box::new(component));
        inner.events.push(WorldEvent::ComponentAdded(entity, type_id));
        Ok(())
    }

    /// Add a default-constructed component of kind `T`.
    pub fn add_default_component<T: Component + Default>(&self, entity: i32) -> Result<(), WorldError> {
        self.add_component(entity, T::default())
    }

    /// Fetch a copy of entity `entity`'s component of kind `T`.
    pub fn get_component<T: Component + Clone>(&self, entity: i32) -> Result<T, WorldError> {
        let inner = self.inner.lock().unwrap();
        inner
            .components
            .get(&TypeId::of::<T>())
            .and_then(|column| column.values.get(&entity))
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
            .ok_or(WorldError::MissingComponent(entity))
    }

    /// Fetch a copy of entity `entity`'s component of kind `T`, or `None`.
    pub fn try_get_component<T: Component + Clone>(&self, entity: i32) -> Option<T> {
        self.get_component(entity).ok()
    }

    /// Overwrite entity `entity`'s component of kind `T` in place. Fails
    /// with [`WorldError::MissingComponent`] if it does not already hold one.
    pub fn set_component<T: Component>(&self, entity: i32, component: T) -> Result<(), WorldError> {
        let mut inner = self.inner.lock().unwrap();
        let column = inner
            .components
            .get_mut(&TypeId::of::<T>())
            .ok_or(WorldError::MissingComponent(entity))?;
        if !column.values.contains_key(&entity) {
            return Err(WorldError::MissingComponent(entity));
        }
        column.values.insert(entity, Box::new(component));
        Ok(())
    }

    /// Mutate entity `entity`'s component of kind `T` in place via `f`.
    pub fn with_component_mut<T: Component, R>(
        &self,
        entity: i32,
        f: impl FnOnce(&mut T) -> R,
    ) -> Result<R, WorldError> {
        let mut inner = self.inner.lock().unwrap();
        let column = inner
            .components
            .get_mut(&TypeId::of::<T>())
            .ok_or(WorldError::MissingComponent(entity))?;
        let value = column
            .values
            .get_mut(&entity)
            .and_then(|v| v.downcast_mut::<T>())
            .ok_or(WorldError::MissingComponent(entity))?;
        Ok(f(value))
    }

    /// Remove entity `entity`'s component of kind `T`, if present.
    pub fn remove_component<T: Component>(&self, entity: i32) -> bool {
        let mut inner = self.inner.lock().unwrap();
        match inner.components.get_mut(&TypeId::of::<T>()) {
            Some(column) => column.remove(entity).is_some(),
            None => false,
        }
    }

    /// Whether entity `entity` holds a component of kind `T`.
    pub fn has_component<T: Component>(&self, entity: i32) -> bool {
        let inner = self.inner.lock().unwrap();
        inner
            .components
            .get(&TypeId::of::<T>())
            .map(|column| column.values.contains_key(&entity))
            .unwrap_or(false)
    }

    /// A snapshot of every `(entity, component)` pair for kind `T`, in the
    /// order those entities first gained the component (§3: "Queries return
    /// a consistent snapshot for the duration of a single tick"; §5: the
    /// store may be mutated afterward without corrupting this snapshot).
    pub fn view<T: Component + Clone>(&self) -> Vec<(i32, T)> {
        let inner = self.inner.lock().unwrap();
        match inner.components.get(&TypeId::of::<T>()) {
            Some(column) => column
                .order
                .iter()
                .filter_map(|&id| {
                    column
                        .values
                        .get(&id)
                        .and_then(|v| v.downcast_ref::<T>())
                        .map(|v| (id, v.clone()))
                })
                .collect(),
            None => Vec::new(),
        }
    }

    /// Entity ids holding a component of kind `T`, in the order those
    /// entities first gained it. Unlike [`Self::view`], this does not
    /// require `T: Clone` — useful for mutating components in place via
    /// [`Self::with_component_mut`] without a clone round-trip.
    pub fn ids_with_component<T: Component>(&self) -> Vec<i32> {
        let inner = self.inner.lock().unwrap();
        inner
            .components
            .get(&TypeId::of::<T>())
            .map(|column| column.order.clone())
            .unwrap_or_default()
    }

    /// All entity ids holding every one of the two given component kinds, in
    /// overall entity-registration order.
    pub fn group2<A: Component, B: Component>(&self) -> Vec<i32> {
        let inner = self.inner.lock().unwrap();
        let has = |type_id: TypeId, id: i32| {
            inner
                .components
                .get(&type_id)
                .map(|c| c.values.contains_key(&id))
                .unwrap_or(false)
        };
        let (a, b) = (TypeId::of::<A>(), TypeId::of::<B>());
        inner.order.iter().copied().filter(|&id| has(a, id) && has(b, id)).collect()
    }

    /// All entity ids holding every one of the three given component kinds,
    /// in overall entity-registration order.
    pub fn group3<A: Component, B: Component, C: Component>(&self) -> Vec<i32> {
        let inner = self.inner.lock().unwrap();
        let has = |type_id: TypeId, id: i32| {
            inner
                .components
                .get(&type_id)
                .map(|c| c.values.contains_key(&id))
                .unwrap_or(false)
        };
        let (a, b, c) = (TypeId::of::<A>(), TypeId::of::<B>(), TypeId::of::<C>());
        inner
            .order
            .iter()
            .copied()
            .filter(|&id| has(a, id) && has(b, id) && has(c, id))
            .collect()
    }

    /// Drain and return every mutation notification queued since the last
    /// call. Intended to be polled once per tick by the scheduler or host.
    pub fn drain_events(&self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.inner.lock().unwrap().events)
    }

    /// Force the camera that [`crate::systems::RenderingSystem2D`] and
    /// [`crate::systems::RenderingSystem3D`] render through, bypassing
    /// whichever camera is marked primary. Set by [`crate::scene::Scene::on_update_edit`]
    /// for the duration of an edit-mode tick (§4.D: edit-capable systems
    /// render against an explicit editor camera, not the scene's primary).
    pub fn set_active_camera_override(&self, entity: Option<i32>) {
        self.inner.lock().unwrap().active_camera_override = entity;
    }

    /// The entity set by [`Self::set_active_camera_override`], if any.
    pub fn active_camera_override(&self) -> Option<i32> {
        self.inner.lock().unwrap().active_camera_override
    }

    /// Clone every component the entity holds (via [`ComponentRegistry`])
    /// onto a freshly created entity. Used by [`crate::scene::Scene::duplicate_entity`]
    /// (§4.B/§4.D). Fails with [`crate::error::ResourceError::UnclonableComponent`]
    /// if any held component kind has no registered clone hook.
    pub fn duplicate_entity(
        &self,
        entity: i32,
        new_name: impl Into<String>,
    ) -> Result<Entity, WorldError> {
        let clones: Vec<(TypeId, Box<dyn Any>)> = {
            let inner = self.inner.lock().unwrap();
            if !inner.by_id.contains_key(&entity) {
                return Err(WorldError::EntityNotFound(entity));
            }
            let mut clones = Vec::new();
            for (&type_id, column) in inner.components.iter() {
                if let Some(value) = column.values.get(&entity) {
                    match ComponentRegistry::clone_component(type_id, value.as_ref()) {
                        Ok(cloned) => clones.push((type_id, cloned)),
                        Err(err) => {
                            log::error!(
                                "duplicate_entity({entity}): component {type_id:?} has no registered clone hook: {err}"
                            );
                            return Err(WorldError::EntityNotFound(entity));
                        }
                    }
                }
            }
            clones
        };

        let new_entity = self.create_entity(new_name);
        let mut inner = self.inner.lock().unwrap();
        for (type_id, value) in clones {
            let column = inner.components.entry(type_id).or_insert_with(ComponentColumn::new);
            column.insert(new_entity.id(), value);
            inner.events.push(WorldEvent::ComponentAdded(new_entity.id(), type_id));
        }
        Ok(new_entity)
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq)]
    struct Position {
        x: f32,
        y: f32,
        z: f32,
    }

    #[derive(Debug, Clone, Copy, PartialEq, Default)]
    struct Velocity {
        dx: f32,
        dy: f32,
    }

    // Scenario 1 from spec.md §8: World basics.
    #[test]
    fn world_basics_scenario() {
        let world = World::new();
        let e1 = world.create_entity("Alpha");
        let _e2 = world.create_entity("Beta");

        world.add_component(e1.id(), Position { x: 10.0, y: 20.0, z: 0.0 }).unwrap();
        assert_eq!(world.view::<Position>(), vec![(e1.id(), Position { x: 10.0, y: 20.0, z: 0.0 })]);

        world.destroy_entity(e1.id());
        assert!(world.view::<Position>().is_empty());
    }

    #[test]
    fn world_config_deserializes_with_default_capacity() {
        let config: WorldConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.initial_entity_capacity, 256);
    }

    #[test]
    fn ids_are_unique_and_monotonic() {
        let world = World::new();
        let e1 = world.create_entity("a");
        let e2 = world.create_entity("b");
        assert_ne!(e1.id(), e2.id());
        assert!(e2.id() > e1.id());
    }

    #[test]
    fn duplicate_component_is_rejected() {
        let world = World::new();
        let e = world.create_entity("a");
        world.add_component(e.id(), Position { x: 0.0, y: 0.0, z: 0.0 }).unwrap();
        let err = world.add_component(e.id(), Position { x: 1.0, y: 1.0, z: 1.0 }).unwrap_err();
        assert!(matches!(err, WorldError::DuplicateComponent(id) if id == e.id()));
    }

    #[test]
    fn missing_component_is_reported() {
        let world = World::new();
        let e = world.create_entity("a");
        let err = world.get_component::<Position>(e.id()).unwrap_err();
        assert!(matches!(err, WorldError::MissingComponent(id) if id == e.id()));
        assert!(world.try_get_component::<Position>(e.id()).is_none());
    }

    #[test]
    fn destroying_entity_removes_all_components() {
        let world = World::new();
        let e = world.create_entity("a");
        world.add_component(e.id(), Position { x: 0.0, y: 0.0, z: 0.0 }).unwrap();
        world.add_component(e.id(), Velocity::default()).unwrap();
        assert!(world.destroy_entity(e.id()));
        assert!(!world.has_component::<Position>(e.id()));
        assert!(!world.has_component::<Velocity>(e.id()));
        assert!(!world.destroy_entity(e.id()));
    }

    #[test]
    fn view_preserves_registration_order() {
        let world = World::new();
        let ids: Vec<i32> = (0..5)
            .map(|i| {
                let e = world.create_entity(format!("e{i}"));
                world.add_component(e.id(), Position { x: i as f32, y: 0.0, z: 0.0 }).unwrap();
                e.id()
            })
            .collect();
        let view: Vec<i32> = world.view::<Position>().into_iter().map(|(id, _)| id).collect();
        assert_eq!(view, ids);
    }

    #[test]
    fn group_requires_all_component_kinds() {
        let world = World::new();
        let e1 = world.create_entity("a");
        let e2 = world.create_entity("b");
        world.add_component(e1.id(), Position { x: 0.0, y: 0.0, z: 0.0 }).unwrap();
        world.add_component(e1.id(), Velocity::default()).unwrap();
        world.add_component(e2.id(), Position { x: 1.0, y: 1.0, z: 1.0 }).unwrap();

        assert_eq!(world.group2::<Position, Velocity>(), vec![e1.id()]);
    }

    #[test]
    fn duplicate_entity_clones_registered_components() {
        ComponentRegistry::register_clone::<Position>();
        let world = World::new();
        let e = world.create_entity("original");
        world.add_component(e.id(), Position { x: 5.0, y: 6.0, z: 7.0 }).unwrap();

        let dup = world.duplicate_entity(e.id(), "copy").unwrap();
        assert_ne!(dup.id(), e.id());
        assert_eq!(world.get_component::<Position>(dup.id()).unwrap(), Position { x: 5.0, y: 6.0, z: 7.0 });
    }

    #[test]
    fn mutation_during_iteration_does_not_corrupt_snapshot() {
        let world = World::new();
        let e1 = world.create_entity("a");
        let e2 = world.create_entity("b");
        world.add_component(e1.id(), Position { x: 0.0, y: 0.0, z: 0.0 }).unwrap();
        world.add_component(e2.id(), Position { x: 1.0, y: 0.0, z: 0.0 }).unwrap();

        let snapshot = world.view::<Position>();
        // Mutate the world after the snapshot was taken.
        world.destroy_entity(e2.id());
        let e3 = world.create_entity("c");
        world.add_component(e3.id(), Position { x: 2.0, y: 0.0, z: 0.0 }).unwrap();

        // The already-taken snapshot is unaffected.
        assert_eq!(snapshot.len(), 2);
        // A fresh call observes the new state.
        let fresh = world.view::<Position>();
        assert_eq!(fresh.len(), 2);
        assert!(fresh.iter().any(|&(id, _)| id == e1.id()));
        assert!(fresh.iter().any(|&(id, _)| id == e3.id()));
    }
}
