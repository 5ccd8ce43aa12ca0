//! Frame-indexed clip playback (§3 Animation, §4.N).
//!
//! Grounded in the teacher's `components/animation.rs`
//! (`AnimationDef`/`AnimationComponent` tick logic), generalized from the
//! teacher's single hardcoded advance rule into the spec's explicit
//! loop-vs-clamp behavior and per-frame event emission.

/// A rectangle in atlas pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SourceRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One frame of a clip: where to sample the atlas, the sprite's pivot
/// (normalized 0..1), and zero or more event labels fired when this frame
/// becomes current.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub source_rect: SourceRect,
    pub pivot: (f32, f32),
    pub events: Vec<String>,
}

impl AnimationFrame {
    pub fn new(source_rect: SourceRect) -> Self {
        Self { source_rect, pivot: (0.5, 0.5), events: Vec::new() }
    }
}

/// A named sequence of frames at a fixed frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClip {
    pub name: String,
    pub fps: f32,
    pub frames: Vec<AnimationFrame>,
}

impl AnimationClip {
    pub fn new(name: impl Into<String>, fps: f32, frames: Vec<AnimationFrame>) -> Self {
        Self { name: name.into(), fps, frames }
    }

    /// `frame_count / fps`.
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 / self.fps
    }
}

/// A set of named clips an [`AnimationPlayer`] can play by name.
#[derive(Debug, Clone, Default)]
pub struct AnimationAsset {
    clips: Vec<AnimationClip>,
}

impl AnimationAsset {
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        Self { clips }
    }

    pub fn clip(&self, name: &str) -> Option<&AnimationClip> {
        self.clips.iter().find(|c| c.name == name)
    }
}

/// Per-entity playback state (§3: "current clip name, current frame index,
/// elapsed-time-in-clip, playing/paused, loop flag, playback speed").
#[derive(Debug, Clone, Default)]
pub struct AnimationPlayer {
    current_clip: Option<String>,
    current_frame: i32,
    elapsed: f32,
    playing: bool,
    pub loop_playback: bool,
    pub speed: f32,
}

impl AnimationPlayer {
    pub fn new() -> Self {
        Self { speed: 1.0, loop_playback: true, ..Default::default() }
    }

    pub fn current_clip(&self) -> Option<&str> {
        self.current_clip.as_deref()
    }

    pub fn current_frame(&self) -> i32 {
        self.current_frame
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn play(&mut self, clip_name: impl Into<String>) {
        self.current_clip = Some(clip_name.into());
        self.current_frame = 0;
        self.elapsed = 0.0;
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    pub fn resume(&mut self) {
        if self.current_clip.is_some() {
            self.playing = true;
        }
    }

    pub fn stop(&mut self) {
        self.playing = false;
        self.current_frame = 0;
        self.elapsed = 0.0;
    }

    pub fn seek(&mut self, frame_index: i32, asset: &AnimationAsset) {
        let Some(clip) = self.current_clip.as_deref().and_then(|name| asset.clip(name)) else { return };
        let frame_count = clip.frames.len() as i32;
        if frame_count == 0 {
            return;
        }
        self.current_frame = frame_index.clamp(0, frame_count - 1);
        self.elapsed = self.current_frame as f32 / clip.fps;
    }

    /// Advance playback by `dt` seconds and return the event labels of any
    /// frame the playhead newly entered, each exactly once, in frame order
    /// (§4.N: "emit each of the current frame's event labels exactly once").
    pub fn advance(&mut self, dt: f32, asset: &AnimationAsset) -> Vec<String> {
        let mut emitted = Vec::new();
        if !self.playing {
            return emitted;
        }
        let Some(clip) = self.current_clip.as_deref().and_then(|name| asset.clip(name)) else {
            return emitted;
        };
        let frame_count = clip.frames.len() as i32;
        if frame_count == 0 {
            self.playing = false;
            return emitted;
        }

        self.elapsed += dt * self.speed;
        let raw_frame = (self.elapsed * clip.fps).floor() as i32;
        let new_frame = if self.loop_playback {
            raw_frame.rem_euclid(frame_count)
        } else if raw_frame >= frame_count {
            self.playing = false;
            frame_count - 1
        } else {
            raw_frame
        };

        if new_frame != self.current_frame {
            self.current_frame = new_frame;
            if let Some(frame) = clip.frames.get(new_frame as usize) {
                emitted.extend(frame.events.iter().cloned());
            }
        }
        emitted
    }
}
