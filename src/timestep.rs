//! Fixed-timestep accumulator (SPEC_FULL.md "Supplemented features"): an
//! opt-in helper a host can use to call [`crate::scene::Scene::on_update_runtime`]
//! at a deterministic cadence regardless of the frame-to-frame variable `dt`
//! (§5: "deterministic ticking given a `dt` sequence").
//!
//! Grounded in the teacher's `core/time.rs`.

/// Accumulates variable frame time and reports how many fixed-size steps
/// have elapsed, capping the catch-up to avoid a spiral of death under a
/// long stall.
pub struct FixedTimestep {
    dt: f32,
    accumulator: f32,
    max_steps_per_frame: u32,
}

impl FixedTimestep {
    pub fn new(dt: f32) -> Self {
        Self { dt, accumulator: 0.0, max_steps_per_frame: 10 }
    }

    /// Add `frame_dt` seconds of wall-clock time and return how many fixed
    /// steps of [`Self::dt`] should now run, capped at
    /// [`Self::max_steps_per_frame`].
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt;
        self.accumulator = self.accumulator.min(self.dt * self.max_steps_per_frame as f32);
        let steps = (self.accumulator / self.dt) as u32;
        self.accumulator -= steps as f32 * self.dt;
        steps
    }

    /// Fraction of a step remaining in the accumulator, for interpolating
    /// render state between the last two fixed steps.
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.dt
    }

    pub fn dt(&self) -> f32 {
        self.dt
    }
}
