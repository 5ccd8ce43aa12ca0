//! Per-frame input snapshot (§3 Ownership summary, §4.L).
//!
//! Grounded in the teacher's `input/queue.rs` (`InputQueue`/`InputEvent`),
//! but reshaped from an event queue into the polled snapshot §4.L actually
//! specifies: `is_key_pressed`/`is_mouse_button_pressed`/`mouse_position`,
//! refreshed once per frame by the host and read-only during `update`.

use std::collections::HashSet;

/// A keyboard key, identified the way the teacher's event queue already
/// does: an opaque numeric code the host's windowing layer assigns.
pub type KeyCode = u32;
pub type MouseButton = u8;

/// The input state for one frame. The host calls [`Self::begin_frame`]
/// exactly once before `Scene::on_update_runtime`/`on_update_edit`; systems
/// only ever read it during that tick.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    pressed_keys: HashSet<KeyCode>,
    pressed_buttons: HashSet<MouseButton>,
    mouse_position: (f32, f32),
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.pressed_keys.contains(&key)
    }

    pub fn is_mouse_button_pressed(&self, button: MouseButton) -> bool {
        self.pressed_buttons.contains(&button)
    }

    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_position
    }

    /// Host-only: record a key as currently held. Called while building the
    /// next frame's snapshot, never by systems.
    pub fn set_key_pressed(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            self.pressed_keys.insert(key);
        } else {
            self.pressed_keys.remove(&key);
        }
    }

    pub fn set_mouse_button_pressed(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.pressed_buttons.insert(button);
        } else {
            self.pressed_buttons.remove(&button);
        }
    }

    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        self.mouse_position = (x, y);
    }
}
