//! The audio boundary.
//!
//! The core never talks to a sound device.  It asks an [`AudioOut`] to strike
//! chimes and to start the bloom cue, and holds the returned [`CueHandle`]
//! for as long as the cue should sound.  Dropping the handle stops the cue.

use thiserror::Error;

/// A playable sound, referenced by logical name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cue {
    /// The ascending bloom melody ([`bloom_chime::BLOOM_CUE_NAME`]).
    BloomMelody,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Cue::BloomMelody => bloom_chime::BLOOM_CUE_NAME,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// No output device, or audio disabled.
    #[error("audio output unavailable")]
    Unavailable,
    /// The device refused to start playback.
    #[error("playback rejected: {0}")]
    Rejected(String),
}

/// Control surface of one running cue, implemented by the audio backend.
pub trait Playback {
    fn set_volume(&mut self, volume: f32);
    fn stop(&mut self);
}

/// Owned handle to a running cue.  Stops the cue when dropped.
pub struct CueHandle {
    cue:   Cue,
    inner: Option<Box<dyn Playback>>,
}

impl CueHandle {
    pub fn new(cue: Cue, playback: Box<dyn Playback>) -> Self {
        CueHandle { cue, inner: Some(playback) }
    }

    pub fn set_volume(&mut self, volume: f32) {
        if let Some(p) = self.inner.as_mut() {
            p.set_volume(volume.clamp(0.0, 1.0));
        }
    }

    /// Stop now.  Idempotent.
    pub fn stop(&mut self) {
        if let Some(mut p) = self.inner.take() {
            p.stop();
        }
    }
}

impl Drop for CueHandle {
    fn drop(&mut self) { self.stop(); }
}

impl std::fmt::Debug for CueHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CueHandle")
            .field("cue", &self.cue)
            .field("live", &self.inner.is_some())
            .finish()
    }
}

/// Anything that can make the piece's sounds.
pub trait AudioOut {
    /// Strike a single chime (MIDI note).  Fire and forget.
    fn chime(&mut self, note: u8) -> Result<(), AudioError>;

    /// Start `cue` at `volume` and hand back ownership of it.
    fn play(&mut self, cue: Cue, volume: f32) -> Result<CueHandle, AudioError>;
}

/// Silent backend: every request is refused with [`AudioError::Unavailable`].
#[derive(Debug, Default, Clone, Copy)]
pub struct NullAudio;

impl AudioOut for NullAudio {
    fn chime(&mut self, _note: u8) -> Result<(), AudioError> {
        Err(AudioError::Unavailable)
    }
    fn play(&mut self, _cue: Cue, _volume: f32) -> Result<CueHandle, AudioError> {
        Err(AudioError::Unavailable)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Test double
// ════════════════════════════════════════════════════════════════════════════
