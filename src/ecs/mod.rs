//! Minimal entity-component store
//!
//! A [`World`] maps entity ids to heterogeneous per-entity component sets,
//! queryable by component-type intersection. One component of each type per
//! entity; inserting a second replaces the first. Nothing here is specific to
//! the game - the simulation keeps its fixed entities as plain structs - but
//! the store is useful for tooling that wants free-form entities.

use std::any::{Any, TypeId};
use std::collections::{BTreeMap, HashMap};

pub type EntityId = u32;

/// One entity's components, at most one value per component type
#[derive(Debug, Default)]
pub struct ComponentMap {
    map: HashMap<TypeId, Box<dyn Any>>,
}

impl ComponentMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a component, returning the previous value of the same type
    pub fn insert<C: Any>(&mut self, component: C) -> Option<C> {
        self.map
            .insert(TypeId::of::<C>(), Box::new(component))
            .and_then(|old| old.downcast().ok())
            .map(|boxed| *boxed)
    }

    pub fn get<C: Any>(&self) -> Option<&C> {
        self.map
            .get(&TypeId::of::<C>())
            .and_then(|component| component.downcast_ref())
    }

    pub fn get_mut<C: Any>(&mut self) -> Option<&mut C> {
        self.map
            .get_mut(&TypeId::of::<C>())
            .and_then(|component| component.downcast_mut())
    }

    /// Remove and return the component of type `C`, if present
    pub fn remove<C: Any>(&mut self) -> Option<C> {
        self.map
            .remove(&TypeId::of::<C>())
            .and_then(|component| component.downcast().ok())
            .map(|boxed| *boxed)
    }

    pub fn contains<C: Any>(&self) -> bool {
        self.map.contains_key(&TypeId::of::<C>())
    }

    /// True when every listed type is present; vacuously true for an empty list
    pub fn contains_all(&self, types: &[TypeId]) -> bool {
        types.iter().all(|ty| self.map.contains_key(ty))
    }

    pub fn clear(&mut self) {
        self.map.clear();
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Entity table with ascending-id iteration order
#[derive(Debug, Default)]
pub struct World {
    next_id: EntityId,
    entities: BTreeMap<EntityId, ComponentMap>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty entity and return its id
    ///
    /// Ids are never reused, so iteration order doubles as creation order.
    pub fn spawn(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        self.entities.insert(id, ComponentMap::new());
        id
    }

    /// Remove an entity and its components; false if it never existed or was
    /// already despawned
    pub fn despawn(&mut self, id: EntityId) -> bool {
        self.entities.remove(&id).is_some()
    }

    pub fn components(&self, id: EntityId) -> Option<&ComponentMap> {
        self.entities.get(&id)
    }

    pub fn components_mut(&mut self, id: EntityId) -> Option<&mut ComponentMap> {
        self.entities.get_mut(&id)
    }

    /// First entity (in creation order) carrying every listed component type
    ///
    /// An empty type list matches nothing.
    pub fn find(&self, types: &[TypeId]) -> Option<EntityId> {
        if types.is_empty() {
            return None;
        }
        self.entities
            .iter()
            .find(|(_, components)| components.contains_all(types))
            .map(|(id, _)| *id)
    }

    /// All entities carrying every listed component type, in creation order
    pub fn view<'a>(
        &'a self,
        types: &'a [TypeId],
    ) -> impl Iterator<Item = (EntityId, &'a ComponentMap)> {
        self.entities
            .iter()
            .filter(move |(_, components)| components.contains_all(types))
            .map(|(id, components)| (*id, components))
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
