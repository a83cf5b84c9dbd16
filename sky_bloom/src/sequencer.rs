//! The one-shot bloom sequence.
//!
//! ```text
//!   Idle ──(is_blooming rises, first time)──▶ Delaying 5 s
//!        ──▶ PetalFalling (entry: drop petal 3, start bloom cue)
//!        ──▶ Rainbow (hue sweep over the cue length, volume fades)
//!        ──▶ WishReveal 1.5 s ──▶ Done
//! ```
//!
//! All waits are countdowns advanced by [`BloomSequencer::update`].  Time
//! left over after a transition is spent in the next phase, so one large
//! `dt` walks through as many phases as it covers.

use std::f32::consts::PI;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::audio::{AudioOut, Cue, CueHandle};
use crate::constants::*;
use crate::interpolate::{lerp, unit, Hsl};

/// Resting petal colour, before and after the sweep.
pub const PETAL_WHITE: Hsl = Hsl::new(60.0, 20.0, 97.0);

// ════════════════════════════════════════════════════════════════════════════
// BloomPhase
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BloomPhase {
    Idle,
    Delaying   { remaining: Duration },
    /// Transient: entered and left within one update.
    PetalFalling,
    Rainbow    { elapsed: Duration },
    WishReveal { remaining: Duration },
    Done,
}

/// Things that happened during one update, in order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BloomEvent {
    Triggered,
    PetalFell,
    RainbowFinished,
    WishRevealed,
}

// ════════════════════════════════════════════════════════════════════════════
// BloomSequencer
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct BloomSequencer {
    phase:                   BloomPhase,
    was_blooming:            bool,
    has_bloomed_once:        bool,
    /// Armed by `observe` but `Triggered` not yet returned from `update`.
    armed_unreported:        bool,
    falling_petal_triggered: bool,
    rainbow_progress:        f32,
    wish_panel_visible:      bool,
    cue_length:              Duration,
    cue:                     Option<CueHandle>,
}

impl Default for BloomSequencer {
    fn default() -> Self {
        Self::new(bloom_chime::Melody::bloom().duration())
    }
}

impl BloomSequencer {
    /// `cue_length` is how long the rainbow sweep lasts.
    pub fn new(cue_length: Duration) -> Self {
        BloomSequencer {
            phase:                   BloomPhase::Idle,
            was_blooming:            false,
            has_bloomed_once:        false,
            armed_unreported:        false,
            falling_petal_triggered: false,
            rainbow_progress:        0.0,
            wish_panel_visible:      false,
            cue_length,
            cue:                     None,
        }
    }

    pub fn phase(&self)                   -> BloomPhase { self.phase }
    pub fn has_bloomed_once(&self)        -> bool { self.has_bloomed_once }
    pub fn falling_petal_triggered(&self) -> bool { self.falling_petal_triggered }
    pub fn rainbow_progress(&self)        -> f32 { self.rainbow_progress }
    pub fn wish_panel_visible(&self)      -> bool { self.wish_panel_visible }
    pub fn cue_playing(&self)             -> bool { self.cue.is_some() }
    pub fn is_done(&self)                 -> bool { self.phase == BloomPhase::Done }

    /// Sample the bloom condition.  Arms the sequence on the first rising
    /// edge; returns true if this call armed it.
    ///
    /// Call it whenever the scalars change, so an edge that comes and goes
    /// between two updates still counts.
    pub fn observe(&mut self, blooming: bool) -> bool {
        let rising = blooming && !self.was_blooming;
        self.was_blooming = blooming;
        if !rising || self.has_bloomed_once || self.phase != BloomPhase::Idle {
            return false;
        }
        info!("bloom condition reached, sequence armed");
        self.has_bloomed_once = true;
        self.armed_unreported = true;
        self.phase = BloomPhase::Delaying { remaining: BLOOM_DELAY };
        true
    }

    /// Observe `blooming` and spend `dt` on the pending waits.
    ///
    /// Audio failures are logged and otherwise ignored; the visual sequence
    /// runs on regardless.
    pub fn update(&mut self, dt: Duration, blooming: bool, audio: &mut dyn AudioOut) -> Vec<BloomEvent> {
        let mut events = Vec::new();

        self.observe(blooming);
        if self.armed_unreported {
            self.armed_unreported = false;
            events.push(BloomEvent::Triggered);
            // The delay starts counting from the next update.
            return events;
        }

        let mut budget = dt;
        loop {
            match self.phase {
                BloomPhase::Idle | BloomPhase::Done => break,

                BloomPhase::Delaying { remaining } => {
                    if budget < remaining {
                        self.phase = BloomPhase::Delaying { remaining: remaining - budget };
                        break;
                    }
                    budget -= remaining;
                    self.phase = BloomPhase::PetalFalling;
                }

                BloomPhase::PetalFalling => {
                    self.falling_petal_triggered = true;
                    events.push(BloomEvent::PetalFell);
                    self.start_cue(audio);
                    self.phase = BloomPhase::Rainbow { elapsed: Duration::ZERO };
                }

                BloomPhase::Rainbow { elapsed } => {
                    let elapsed = elapsed.saturating_add(budget);
                    if elapsed >= self.cue_length {
                        budget = elapsed - self.cue_length;
                        self.rainbow_progress = 1.0;
                        self.release_cue();
                        events.push(BloomEvent::RainbowFinished);
                        self.phase = BloomPhase::WishReveal { remaining: WISH_DELAY };
                    } else {
                        self.rainbow_progress =
                            unit(elapsed.as_secs_f32() / self.cue_length.as_secs_f32());
                        if let Some(cue) = self.cue.as_mut() {
                            cue.set_volume(fade_volume(self.rainbow_progress));
                        }
                        self.phase = BloomPhase::Rainbow { elapsed };
                        break;
                    }
                }

                BloomPhase::WishReveal { remaining } => {
                    if budget < remaining {
                        self.phase = BloomPhase::WishReveal { remaining: remaining - budget };
                        break;
                    }
                    budget -= remaining;
                    self.wish_panel_visible = true;
                    events.push(BloomEvent::WishRevealed);
                    self.phase = BloomPhase::Done;
                    debug!("bloom sequence complete");
                }
            }
        }
        events
    }

    /// Cancel every pending wait and release the cue.  Terminal.
    pub fn dispose(&mut self) {
        self.release_cue();
        self.armed_unreported = false;
        self.phase = BloomPhase::Done;
    }

    /// Hue-swept colour of petal `index` (0–5, clockwise from the top).
    pub fn petal_color(&self, index: usize) -> Hsl {
        petal_color(index, self.rainbow_progress)
    }

    fn start_cue(&mut self, audio: &mut dyn AudioOut) {
        match audio.play(Cue::BloomMelody, CUE_START_VOLUME) {
            Ok(handle) => self.cue = Some(handle),
            Err(e) => warn!(cue = Cue::BloomMelody.name(), "bloom cue not started: {}", e),
        }
    }

    fn release_cue(&mut self) {
        if let Some(mut cue) = self.cue.take() {
            cue.stop();
        }
    }
}

impl Drop for BloomSequencer {
    fn drop(&mut self) { self.release_cue(); }
}

/// Cue volume at sweep `progress`.
pub fn fade_volume(progress: f32) -> f32 {
    (CUE_START_VOLUME * (1.0 - unit(progress))).max(CUE_FADE_FLOOR)
}

/// Petals are spread 60° apart and turn once round the wheel over the sweep;
/// saturation swells mid-sweep and relaxes back to white.
pub fn petal_hue(index: usize, progress: f32) -> f32 {
    let spread = 360.0 / PETAL_COUNT as f32;
    (index as f32 * spread + unit(progress) * 360.0).rem_euclid(360.0)
}

pub fn petal_color(index: usize, progress: f32) -> Hsl {
    let p = unit(progress);
    if p <= 0.0 || p >= 1.0 {
        return PETAL_WHITE;
    }
    let glow = (p * PI).sin();
    Hsl::new(
        petal_hue(index, p),
        lerp(PETAL_WHITE.s, 70.0, glow),
        lerp(PETAL_WHITE.l, 72.0, glow),
    )
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
