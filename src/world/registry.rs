//! Process-wide component registry (§4.B).
//!
//! Replaces the source's runtime type-lookup-by-class-object with a closed
//! set of component kinds, each contributing a clone hook keyed by its
//! [`TypeId`]. `World` consults this table only when duplicating an entity
//! (the editor's "Duplicate" operation); ordinary `add_component`/`get_component`
//! never go through it.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

use crate::error::ResourceError;

/// Marker trait for a registered component kind.
///
/// Implementors are plain data records (§3: "Components carry no logic").
/// Blanket-implemented for any `'static` type so the crate's closed set of
/// kinds is enforced by which types are actually registered, not by this
/// trait bound.
pub trait Component: Any + 'static {}
impl<T: Any + 'static> Component for T {}

type CloneFn = Box<dyn Fn(&dyn Any) -> Box<dyn Any> + Send + Sync>;

fn table() -> &'static Mutex<HashMap<TypeId, CloneFn>> {
    static TABLE: OnceLock<Mutex<HashMap<TypeId, CloneFn>>> = OnceLock::new();
    TABLE.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Process-wide table from component kind to its clone hook.
///
/// A component kind becomes cloneable the moment [`register_clone`] is
/// called for it; types that never register one (because they hold a
/// resource they cannot safely duplicate) make [`World::duplicate_entity`]
/// fail with [`ResourceError::UnclonableComponent`] for any entity that
/// carries them, rather than silently producing an aliasing copy.
///
/// [`World::duplicate_entity`]: crate::world::World::duplicate_entity
pub struct ComponentRegistry;

impl ComponentRegistry {
    /// Register the default clone hook for `T`: a plain `Clone::clone`.
    /// Calling this more than once for the same `T` simply replaces the hook.
    pub fn register_clone<T: Component + Clone>() {
        let cloner: CloneFn = Box::new(|value: &dyn Any| {
            let concrete = value
                .downcast_ref::<T>()
                .expect("clone hook invoked with mismatched component type");
            Box::new(concrete.clone()) as Box<dyn Any>
        });
        table().lock().unwrap().insert(TypeId::of::<T>(), cloner);
    }

    /// Register a custom clone hook, e.g. one that deep-copies or rewrites
    /// fields that must not alias between the original and the duplicate.
    pub fn register_custom_clone<T: Component>(
        cloner: impl Fn(&T) -> T + Send + Sync + 'static,
    ) {
        let boxed: CloneFn = Box::new(move |value: &dyn Any| {
            let concrete = value
                .downcast_ref::<T>()
                .expect("clone hook invoked with mismatched component type");
            Box::new(cloner(concrete)) as Box<dyn Any>
        });
        table().lock().unwrap().insert(TypeId::of::<T>(), boxed);
    }

    /// Whether a clone hook has been registered for the given kind.
    pub fn is_registered(type_id: TypeId) -> bool {
        table().lock().unwrap().contains_key(&type_id)
    }

    /// Clone a type-erased component value using its registered hook.
    pub fn clone_component(
        type_id: TypeId,
        value: &dyn Any,
    ) -> Result<Box<dyn Any>, ResourceError> {
        let guard = table().lock().unwrap();
        match guard.get(&type_id) {
            Some(cloner) => Ok(cloner(value)),
            None => Err(ResourceError::UnclonableComponent(type_id)),
        }
    }

    /// Remove a registered hook. Mainly useful for isolating unit tests that
    /// probe registration state against the shared process-wide table.
    #[cfg(test)]
    pub fn unregister(type_id: TypeId) {
        table().lock().unwrap().remove(&type_id);
    }
}
