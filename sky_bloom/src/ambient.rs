//! Background chimes that start with the first touch.
//!
//! One chime at 659 Hz right away, then a random palette chime after a
//! random 2–7 s wait, over and over until stopped.

use std::time::Duration;

use rand::Rng;
use tracing::debug;

use crate::audio::AudioOut;
use crate::constants::{AMBIENT_MAX_GAP, AMBIENT_MIN_GAP};

/// Longest stretch of time one update will fill with chimes.
const MAX_CATCH_UP: Duration = Duration::from_secs(120);

#[derive(Debug, Default)]
pub struct AmbientChimes {
    /// Countdown to the next chime; `None` until started or after `stop`.
    next_in: Option<Duration>,
    stopped: bool,
}

impl AmbientChimes {
    pub fn new() -> Self { Self::default() }

    pub fn is_running(&self) -> bool { self.next_in.is_some() }

    /// Strike the opening chime and schedule the next.  Only the first call
    /// does anything.
    pub fn start<R: Rng>(&mut self, rng: &mut R, audio: &mut dyn AudioOut) {
        if self.stopped || self.next_in.is_some() {
            return;
        }
        strike(audio, bloom_chime::FIRST_CHIME);
        self.next_in = Some(random_gap(rng));
    }

    /// Spend `dt`; returns how many chimes were struck.
    pub fn update<R: Rng>(&mut self, dt: Duration, rng: &mut R, audio: &mut dyn AudioOut) -> u32 {
        let Some(mut remaining) = self.next_in else { return 0 };
        let mut budget = dt.min(MAX_CATCH_UP);
        let mut struck = 0;
        while budget >= remaining {
            budget -= remaining;
            strike(audio, bloom_chime::pick_chime(rng));
            struck += 1;
            remaining = random_gap(rng);
        }
        self.next_in = Some(remaining - budget);
        struck
    }

    /// Cancel the schedule for good.
    pub fn stop(&mut self) {
        self.next_in = None;
        self.stopped = true;
    }
}

fn random_gap<R: Rng>(rng: &mut R) -> Duration {
    let ms = rng.random_range(AMBIENT_MIN_GAP.as_millis() as u64..=AMBIENT_MAX_GAP.as_millis() as u64);
    Duration::from_millis(ms)
}

fn strike(audio: &mut dyn AudioOut, note: u8) {
    if let Err(e) = audio.chime(note) {
        debug!(note, "chime dropped: {}", e);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
