//! Per-entity audio source model and its conversions (§3 Audio source, §4.M).
//!
//! The engine calls out to an external audio device (§1 Out of scope); this
//! module owns only the component data, the `play`/`pause`/`stop` state
//! machine, and the linear/dB and semitone/pitch math the external engine's
//! calls are parameterized by.

use crate::error::AudioError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Stopped,
    Playing,
    Paused,
}

/// Per-entity audio source (§3: "clip reference, volume, pitch, loop,
/// play-on-awake, is-3D flag, min/max distance").
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSource {
    pub clip: String,
    volume: f32,
    pitch: f32,
    pub loop_playback: bool,
    pub play_on_awake: bool,
    pub is_3d: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    state: PlaybackState,
}

impl AudioSource {
    pub fn new(clip: impl Into<String>) -> Self {
        Self {
            clip: clip.into(),
            volume: 1.0,
            pitch: 1.0,
            loop_playback: false,
            play_on_awake: false,
            is_3d: false,
            min_distance: 1.0,
            max_distance: 500.0,
            state: PlaybackState::Stopped,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<(), AudioError> {
        if !is_valid_volume(volume) {
            return Err(AudioError::InvalidVolume(volume));
        }
        self.volume = volume;
        Ok(())
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    pub fn set_pitch(&mut self, pitch: f32) -> Result<(), AudioError> {
        if !is_valid_pitch(pitch) {
            return Err(AudioError::InvalidPitch(pitch));
        }
        self.pitch = pitch;
        Ok(())
    }

    /// Set `min_distance`/`max_distance` together. Valid only when
    /// `min <= max` (§3); returns whether the update was applied.
    pub fn set_distance_range(&mut self, min: f32, max: f32) -> bool {
        if min > max {
            return false;
        }
        self.min_distance = min;
        self.max_distance = max;
        true
    }

    pub fn play(&mut self) {
        self.state = PlaybackState::Playing;
    }

    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.state = PlaybackState::Paused;
        }
    }

    pub fn stop(&mut self) {
        self.state = PlaybackState::Stopped;
    }
}

/// At most one per scene (§3 Listener); carries no fields of its own beyond
/// marking the entity that hosts it as the active listener.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AudioListener;

pub fn is_valid_volume(volume: f32) -> bool {
    (0.0..=1.0).contains(&volume)
}

pub fn is_valid_pitch(pitch: f32) -> bool {
    pitch > 0.0 && pitch <= 4.0
}

pub fn db_to_linear(db: f32) -> f32 {
    10f32.powf(db / 20.0)
}

pub fn linear_to_db(linear: f32) -> f32 {
    20.0 * linear.max(1e-4).log10()
}

pub fn semitones_to_pitch(semitones: f32) -> f32 {
    2f32.powf(semitones / 12.0)
}

pub fn pitch_to_semitones(pitch: f32) -> f32 {
    12.0 * pitch.log2()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Scenario 7 from spec.md §8: Audio conversions.
    #[test]
    fn audio_conversions_scenario() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-4);
        assert!((db_to_linear(-6.0) - 0.5012).abs() < 1e-2);
        assert!((semitones_to_pitch(12.0) - 2.0).abs() < 1e-4);
        assert!((linear_to_db(0.0) - (-80.0)).abs() < 1e-2);
    }

    #[test]
    fn db_linear_round_trip() {
        let mut x = 1e-3f32;
        while x <= 10.0 {
            let round_tripped = db_to_linear(linear_to_db(x));
            assert!((round_tripped - x).abs() < 1e-3, "x={x}");
            x *= 1.7;
        }
    }

    #[test]
    fn linear_db_round_trip() {
        let mut db = -40.0f32;
        while db <= 20.0 {
            let round_tripped = linear_to_db(db_to_linear(db));
            assert!((round_tripped - db).abs() < 1e-3, "db={db}");
            db += 3.0;
        }
    }

    #[test]
    fn semitone_pitch_round_trip() {
        let mut pitch = 0.25f32;
        while pitch <= 4.0 {
            let round_tripped = semitones_to_pitch(pitch_to_semitones(pitch));
            assert!((round_tripped - pitch).abs() < 1e-3, "pitch={pitch}");
            pitch += 0.25;
        }
    }

    #[test]
    fn volume_and_pitch_validators() {
        assert!(is_valid_volume(0.0));
        assert!(is_valid_volume(1.0));
        assert!(!is_valid_volume(-0.01));
        assert!(!is_valid_volume(1.01));

        assert!(!is_valid_pitch(0.0));
        assert!(is_valid_pitch(4.0));
        assert!(!is_valid_pitch(4.01));
    }

    #[test]
    fn set_volume_rejects_out_of_range() {
        let mut source = AudioSource::new("clip.ogg");
        assert!(source.set_volume(1.5).is_err());
        assert_eq!(source.volume(), 1.0);
        assert!(source.set_volume(0.5).is_ok());
        assert_eq!(source.volume(), 0.5);
    }

    #[test]
    fn play_pause_stop_state_machine() {
        let mut source = AudioSource::new("clip.ogg");
        assert_eq!(source.state(), PlaybackState::Stopped);
        source.play();
        assert_eq!(source.state(), PlaybackState::Playing);
        source.pause();
        assert_eq!(source.state(), PlaybackState::Paused);
        source.stop();
        assert_eq!(source.state(), PlaybackState::Stopped);
    }
}
