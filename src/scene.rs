//! Scene: binds one World to one Scheduler with an edit/play lifecycle
//! (§3 Scene, §4.D).
//!
//! Grounded in the teacher's `core/scene.rs`, which already couples a
//! world-like entity store to a viewport and a primary-camera slot; this
//! module keeps that coupling but adds the explicit Edit/Play state
//! machine and scheduler-mediated system ticking the teacher never needed
//! (the teacher's `Scene` runs systems unconditionally every frame).

use serde::{Deserialize, Serialize};

use crate::camera::Camera;
use crate::error::{SchedulerError, WorldError};
use crate::scheduler::SystemScheduler;
use crate::world::{Entity, World, WorldConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneState {
    Edit,
    Play,
}

/// Construction-time tuning for a [`Scene`] (§4.Q): its world's capacity
/// hints plus the initial viewport size, built with `Default` and consumed
/// via [`Scene::with_config`] the way the teacher's `GameConfig` feeds
/// `Game::with_config` (`api/game.rs`). `Serialize`/`Deserialize` so a host
/// can load scene setup from a JSON file the way the teacher's
/// `AssetManifest::from_json` does (`assets/manifest.rs`).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SceneConfig {
    #[serde(default)]
    pub world: WorldConfig,
    #[serde(default = "default_viewport")]
    pub viewport: (u32, u32),
}

fn default_viewport() -> (u32, u32) {
    (1, 1)
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self { world: WorldConfig::default(), viewport: default_viewport() }
    }
}

impl SceneConfig {
    /// Parse a scene configuration from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// A World bound to a Scheduler, with an edit/play lifecycle (§3 Scene).
pub struct Scene {
    world: World,
    scheduler: SystemScheduler,
    viewport: (u32, u32),
    state: SceneState,
}

impl Scene {
    pub fn new(viewport: (u32, u32)) -> Self {
        Self::with_config(SceneConfig { viewport, ..SceneConfig::default() })
    }

    pub fn with_config(config: SceneConfig) -> Self {
        Self {
            world: World::with_config(config.world),
            scheduler: SystemScheduler::new(),
            viewport: config.viewport,
            state: SceneState::Edit,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scheduler_mut(&mut self) -> &mut SystemScheduler {
        &mut self.scheduler
    }

    pub fn state(&self) -> SceneState {
        self.state
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn create_entity(&self, name: impl Into<String>) -> Entity {
        self.world.create_entity(name)
    }

    /// Duplicate `entity`, cloning every component it holds via the
    /// component registry. Preserves only the given entity, not a
    /// parent-child graph (§4.D: this core has none).
    pub fn duplicate_entity(&self, entity: i32, new_name: impl Into<String>) -> Result<Entity, WorldError> {
        self.world.duplicate_entity(entity, new_name)
    }

    /// Initializes the scheduler and enters [`SceneState::Play`]. Any
    /// physics/audio bootstrapping is the concern of the built-in systems
    /// themselves, not the scene.
    pub fn on_runtime_start(&mut self) -> Result<(), SchedulerError> {
        self.scheduler.initialize()?;
        self.state = SceneState::Play;
        Ok(())
    }

    /// Shuts down non-shared systems and returns to [`SceneState::Edit`].
    /// The world is left intact for a subsequent `on_runtime_start`.
    pub fn on_runtime_stop(&mut self) -> Result<(), SchedulerError> {
        self.scheduler.shutdown()?;
        self.state = SceneState::Edit;
        Ok(())
    }

    /// Pumps only edit-capable rendering systems, with `editor_camera` as
    /// the active camera rather than whichever camera is marked primary
    /// (§4.D). The override is cleared again once the tick finishes, so a
    /// later [`Self::on_update_runtime`] still resolves its own primary
    /// camera. Does not require [`Self::on_runtime_start`] to have run.
    pub fn on_update_edit(&mut self, dt: f32, editor_camera: i32) {
        self.world.set_active_camera_override(Some(editor_camera));
        self.scheduler.update_edit(dt, &self.world);
        self.world.set_active_camera_override(None);
    }

    /// Discovers the primary camera (falling back to no camera if none is
    /// marked primary), sets it active, then ticks the scheduler.
    pub fn on_update_runtime(&mut self, dt: f32) -> Result<(), SchedulerError> {
        let _primary = self.primary_camera();
        self.scheduler.update(dt, &self.world)
    }

    /// Updates the aspect ratio of every camera without a fixed aspect
    /// ratio flag, and records the new viewport size.
    pub fn on_viewport_resize(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
        for id in self.world.ids_with_component::<Camera>() {
            let _ = self.world.with_component_mut::<Camera, _>(id, |camera| {
                if !camera.fixed_aspect_ratio() {
                    camera.set_viewport_size(width, height);
                }
            });
        }
    }

    /// The first entity holding a [`Camera`] component with `primary` set.
    /// `None` if no camera is marked primary.
    pub fn primary_camera(&self) -> Option<i32> {
        self.world.ids_with_component::<Camera>().into_iter().find(|&id| {
            self.world
                .with_component_mut::<Camera, _>(id, |camera| camera.is_primary())
                .unwrap_or(false)
        })
    }
}
