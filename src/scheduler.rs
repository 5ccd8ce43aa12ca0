//! Priority-ordered system scheduler (§4.C).
//!
//! Grounded in the teacher's `systems/mod.rs`, which keeps a flat
//! `Vec<Box<dyn System>>` and runs it in registration order; this module
//! keeps that flat-vec shape but adds the priority sort, the
//! shared-vs-per-scene distinction, and the strict lifecycle state machine
//! the teacher crate never needed (it only ever tears down at process exit).

use std::any::TypeId;

use crate::error::SchedulerError;
use crate::world::World;

/// A unit of per-frame behavior registered with a [`SystemScheduler`].
///
/// Systems are plain structs implementing this trait (§3: "components carry
/// no logic"; the corresponding rule for systems is that *all* per-frame
/// logic lives here, never on a component). `priority` is read once at
/// registration time; changing it afterward has no effect on an already
/// registered system.
pub trait System: 'static {
    /// Sort key; lower runs earlier. Ties break by registration order.
    fn priority(&self) -> i32;

    /// Called once, in ascending priority order, by [`SystemScheduler::initialize`].
    fn on_init(&mut self) {}

    /// Called once per tick, in ascending priority order, by [`SystemScheduler::update`].
    fn on_update(&mut self, dt: f32, world: &World);

    /// Called once, in descending priority order, by [`SystemScheduler::shutdown`]
    /// (for non-shared systems) or [`SystemScheduler::shutdown_all`].
    fn on_shutdown(&mut self) {}

    /// Whether [`SystemScheduler::update_edit`] should tick this system
    /// while the owning scene is in its edit lifetime (§4.D: `on_update_edit`
    /// "pumps *only* rendering systems marked as edit-capable"). Most
    /// systems (physics, animation, audio) are runtime-only and leave this
    /// `false`.
    fn is_edit_capable(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LifecycleState {
    Uninitialized,
    Initialized,
    Disposed,
}

struct Entry {
    system: Box<dyn System>,
    type_id: TypeId,
    shared: bool,
    registration_index: usize,
}

/// Registers, orders, initializes, ticks, and tears down [`System`]s.
///
/// One scheduler belongs to exactly one [`crate::scene::Scene`] (§9:
/// "the World must not be a process singleton... the scheduler holds a
/// reference to *its* World"); shared systems are the one exception meant
/// to outlive a single scene's scheduler across a `shutdown` (not
/// `shutdown_all`) call.
pub struct SystemScheduler {
    entries: Vec<Entry>,
    state: LifecycleState,
    next_registration_index: usize,
}

impl SystemScheduler {
    pub fn new() -> Self {
        Self { entries: Vec::new(), state: LifecycleState::Uninitialized, next_registration_index: 0 }
    }

    /// Register a system. `shared` marks it as application-scoped: it
    /// survives [`Self::shutdown`] (but not [`Self::shutdown_all`]) and is
    /// skipped by [`Self::dispose`].
    ///
    /// Fails with [`SchedulerError::DuplicateSystem`] if a system of the
    /// same concrete type is already registered, and with
    /// [`SchedulerError::AlreadyInitialized`] once [`Self::initialize`] has run.
    pub fn register<S: System>(&mut self, system: S, shared: bool) -> Result<(), SchedulerError> {
        if self.state != LifecycleState::Uninitialized {
            return Err(SchedulerError::AlreadyInitialized);
        }
        let type_id = TypeId::of::<S>();
        if self.entries.iter().any(|e| e.type_id == type_id) {
            return Err(SchedulerError::DuplicateSystem(type_id));
        }
        let registration_index = self.next_registration_index;
        self.next_registration_index += 1;
        let priority = system.priority();
        let entry = Entry { system: Box::new(system), type_id, shared, registration_index };
        let position = self
            .entries
            .iter()
            .position(|e| (e.system.priority(), e.registration_index) > (priority, registration_index))
            .unwrap_or(self.entries.len());
        self.entries.insert(position, entry);
        Ok(())
    }

    /// Run every system's init hook in ascending priority order.
    ///
    /// Fails with [`SchedulerError::AlreadyInitialized`] if called twice. An
    /// individual system's hook is never skipped because an earlier one
    /// panicked-free but logically failed; this core has no per-system
    /// init `Result`, matching §7: "Scheduler initialize/shutdown failures
    /// of an individual system do not prevent remaining systems from
    /// having their corresponding hook invoked."
    pub fn initialize(&mut self) -> Result<(), SchedulerError> {
        if self.state != LifecycleState::Uninitialized {
            return Err(SchedulerError::AlreadyInitialized);
        }
        for entry in self.entries.iter_mut() {
            entry.system.on_init();
        }
        self.state = LifecycleState::Initialized;
        Ok(())
    }

    /// Run every system's per-frame hook in ascending priority order.
    ///
    /// Fails with [`SchedulerError::NotInitialized`] before [`Self::initialize`].
    pub fn update(&mut self, dt: f32, world: &World) -> Result<(), SchedulerError> {
        if self.state != LifecycleState::Initialized {
            return Err(SchedulerError::NotInitialized);
        }
        for entry in self.entries.iter_mut() {
            entry.system.on_update(dt, world);
        }
        Ok(())
    }

    /// Tick only edit-capable systems (§4.D: `Scene::on_update_edit`), in
    /// ascending priority order, regardless of the scheduler's lifecycle
    /// state. The editor pumps rendering systems before `on_runtime_start`
    /// has ever run.
    pub fn update_edit(&mut self, dt: f32, world: &World) {
        for entry in self.entries.iter_mut() {
            if entry.system.is_edit_capable() {
                entry.system.on_update(dt, world);
            }
        }
    }

    /// Run shutdown hooks in descending priority order for every
    /// **non-shared** system; shared systems are left untouched so they can
    /// continue serving the next scene.
    pub fn shutdown(&mut self) -> Result<(), SchedulerError> {
        self.shutdown_matching(|shared| !shared)
    }

    /// As [`Self::shutdown`] but also tears down shared systems. Intended
    /// for process exit.
    pub fn shutdown_all(&mut self) -> Result<(), SchedulerError> {
        self.shutdown_matching(|_shared| true)
    }

    fn shutdown_matching(&mut self, include: impl Fn(bool) -> bool) -> Result<(), SchedulerError> {
        if self.state != LifecycleState::Initialized {
            return Err(SchedulerError::NotInitialized);
        }
        for entry in self.entries.iter_mut().rev() {
            if include(entry.shared) {
                entry.system.on_shutdown();
            }
        }
        Ok(())
    }

    /// Drop per-scene systems that carry releasable resources; shared
    /// systems are never disposed here. Transitions the scheduler to
    /// [`LifecycleState::Disposed`]; no further registration or ticking is
    /// possible afterward.
    pub fn dispose(&mut self) {
        self.entries.retain(|e| e.shared);
        self.state = LifecycleState::Disposed;
    }

    /// Whether [`Self::initialize`] has run.
    pub fn is_initialized(&self) -> bool {
        self.state == LifecycleState::Initialized
    }

    /// Number of currently registered systems.
    pub fn system_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for SystemScheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct RecordingSystem {
        id: i32,
        priority: i32,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl System for RecordingSystem {
        fn priority(&self) -> i32 {
            self.priority
        }

        fn on_init(&mut self) {
            self.log.borrow_mut().push(format!("init:{}", self.id));
        }

        fn on_update(&mut self, _dt: f32, _world: &World) {
            self.log.borrow_mut().push(format!("update:{}", self.id));
        }

        fn on_shutdown(&mut self) {
            self.log.borrow_mut().push(format!("shutdown:{}", self.id));
        }
    }

    // distinct marker types so TypeId is unique per registered system
    macro_rules! system_variant {
        ($name:ident) => {
            struct $name(RecordingSystem);
            impl System for $name {
                fn priority(&self) -> i32 {
                    self.0.priority()
                }
                fn on_init(&mut self) {
                    self.0.on_init()
                }
                fn on_update(&mut self, dt: f32, world: &World) {
                    self.0.on_update(dt, world)
                }
                fn on_shutdown(&mut self) {
                    self.0.on_shutdown()
                }
            }
        };
    }

    system_variant!(SystemA);
    system_variant!(SystemB);
    system_variant!(SystemC);

    // Scenario 2 from spec.md §8: Scheduler priorities.
    #[test]
    fn scheduler_priorities_scenario() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler
            .register(SystemA(RecordingSystem { id: 3, priority: 3, log: log.clone() }), false)
            .unwrap();
        scheduler
            .register(SystemB(RecordingSystem { id: 1, priority: 1, log: log.clone() }), false)
            .unwrap();
        scheduler
            .register(SystemC(RecordingSystem { id: 2, priority: 2, log: log.clone() }), false)
            .unwrap();

        let world = World::new();
        scheduler.initialize().unwrap();
        scheduler.update(0.016, &world).unwrap();
        scheduler.shutdown().unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "init:1", "init:2", "init:3",
                "update:1", "update:2", "update:3",
                "shutdown:3", "shutdown:2", "shutdown:1",
            ]
        );
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler
            .register(SystemA(RecordingSystem { id: 1, priority: 0, log: log.clone() }), false)
            .unwrap();
        let err = scheduler
            .register(SystemA(RecordingSystem { id: 2, priority: 0, log }), false)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateSystem(_)));
    }

    #[test]
    fn update_before_initialize_fails() {
        let mut scheduler = SystemScheduler::new();
        let world = World::new();
        assert!(matches!(scheduler.update(0.016, &world), Err(SchedulerError::NotInitialized)));
    }

    #[test]
    fn double_initialize_fails() {
        let mut scheduler = SystemScheduler::new();
        scheduler.initialize().unwrap();
        assert!(matches!(scheduler.initialize(), Err(SchedulerError::AlreadyInitialized)));
    }

    #[test]
    fn shutdown_leaves_shared_systems_intact() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler
            .register(SystemA(RecordingSystem { id: 1, priority: 0, log: log.clone() }), true)
            .unwrap();
        scheduler
            .register(SystemB(RecordingSystem { id: 2, priority: 1, log: log.clone() }), false)
            .unwrap();

        scheduler.initialize().unwrap();
        scheduler.shutdown().unwrap();

        assert_eq!(*log.borrow(), vec!["init:1", "init:2", "shutdown:2"]);
        assert_eq!(scheduler.system_count(), 2);
    }

    #[test]
    fn shutdown_all_tears_down_shared_systems_too() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler
            .register(SystemA(RecordingSystem { id: 1, priority: 0, log: log.clone() }), true)
            .unwrap();

        scheduler.initialize().unwrap();
        scheduler.shutdown_all().unwrap();

        assert_eq!(*log.borrow(), vec!["init:1", "shutdown:1"]);
    }

    #[test]
    fn dispose_drops_only_per_scene_systems() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut scheduler = SystemScheduler::new();
        scheduler
            .register(SystemA(RecordingSystem { id: 1, priority: 0, log: log.clone() }), true)
            .unwrap();
        scheduler
            .register(SystemB(RecordingSystem { id: 2, priority: 1, log }), false)
            .unwrap();

        scheduler.initialize().unwrap();
        scheduler.dispose();

        assert_eq!(scheduler.system_count(), 1);
    }
}
