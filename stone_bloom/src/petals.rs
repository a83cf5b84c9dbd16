//! Animated scenery: rain, floating petals, the falling petal, the whisper
//! fade, and the breathing star, sunlight and stroke glow.
//!
//! None of this feeds back into the garden.  Each animation advances with
//! the frame delta and is read by the visualizer.

use std::f32::consts::TAU;

use rand::Rng;

/// Motion values below are tuned in pixels per 60 Hz frame.
const FRAME_RATE: f32 = 60.0;

/// Smooth 0 → 1 → 0 over one period; `t` in seconds.
fn pulse(t: f32, period: f32) -> f32 {
    0.5 - 0.5 * (t / period * TAU).cos()
}

// ════════════════════════════════════════════════════════════════════════════
// Breathing — star and sunlight
// ════════════════════════════════════════════════════════════════════════════

/// Star breathing: `(scale, opacity)` cycling 0.8–1.2 / 0.3–1.0 every 4 s.
pub fn star_breath(t: f32) -> (f32, f32) {
    let p = pulse(t, 4.0);
    (0.8 + 0.4 * p, 0.3 + 0.7 * p)
}

/// Main and secondary sunlight ray strength (6 s and 8 s cycles).
pub fn sun_rays(t: f32) -> (f32, f32) {
    (0.5 + 0.3 * pulse(t, 6.0), 0.3 + 0.3 * pulse(t - 1.0, 8.0))
}

/// Glow under the stone while it is stroked: 0.3–0.7 every 1.5 s.
pub fn stroke_glow(t: f32) -> f32 {
    0.3 + 0.4 * pulse(t, 1.5)
}

// ════════════════════════════════════════════════════════════════════════════
// WhisperFade
// ════════════════════════════════════════════════════════════════════════════

/// Opacity keyframes, evenly spaced over [`WhisperFade::FADE`].
const WHISPER_KEYS: [f32; 5] = [0.0, 0.35, 0.2, 0.3, 0.0];

/// The whisper waits, wavers in and out once, then stays hidden until it is
/// shown afresh.
#[derive(Debug, Default)]
pub struct WhisperFade {
    shown_for: Option<f32>,
}

impl WhisperFade {
    pub const DELAY: f32 = 5.0;
    pub const FADE:  f32 = 12.0;

    pub fn tick(&mut self, dt: f32, showing: bool) {
        self.shown_for = match (showing, self.shown_for) {
            (false, _)      => None,
            (true, None)    => Some(0.0),
            (true, Some(t)) => Some(t + dt),
        };
    }

    pub fn alpha(&self) -> f32 {
        let Some(t) = self.shown_for else { return 0.0 };
        let u = (t - Self::DELAY) / Self::FADE;
        if !(0.0..1.0).contains(&u) {
            return 0.0;
        }
        let span = u * (WHISPER_KEYS.len() - 1) as f32;
        let i = (span.floor() as usize).min(WHISPER_KEYS.len() - 2);
        let f = span - i as f32;
        let eased = f * f * (3.0 - 2.0 * f);
        WHISPER_KEYS[i] + (WHISPER_KEYS[i + 1] - WHISPER_KEYS[i]) * eased
    }
}

// ════════════════════════════════════════════════════════════════════════════
// RainField
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug, PartialEq)]
pub struct RainDrop {
    pub x:      f32,
    pub y:      f32,
    /// Pixels per frame.
    pub speed:  f32,
    pub length: f32,
    pub alpha:  f32,
}

#[derive(Debug)]
pub struct RainField {
    pub drops: Vec<RainDrop>,
    width:     f32,
    height:    f32,
}

pub const RAIN_DROPS: usize = 80;

impl RainField {
    pub fn new<R: Rng>(rng: &mut R, width: usize, height: usize) -> Self {
        let (w, h) = (width as f32, height as f32);
        let drops = (0..RAIN_DROPS)
            .map(|_| RainDrop {
                x:      rng.random_range(0.0..w),
                y:      rng.random_range(0.0..h),
                speed:  rng.random_range(1.5..4.0),
                length: rng.random_range(15.0..40.0),
                alpha:  rng.random_range(0.15..0.4),
            })
            .collect();
        RainField { drops, width: w, height: h }
    }

    /// Fall; drops that leave the bottom restart above the top at a new x.
    pub fn tick<R: Rng>(&mut self, dt: f32, rng: &mut R) {
        let frames = dt * FRAME_RATE;
        for d in &mut self.drops {
            d.y += d.speed * frames;
            if d.y > self.height + d.length {
                d.y = -d.length;
                d.x = rng.random_range(0.0..self.width);
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// PetalDrift — petals floating down while the flower blooms
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Debug)]
pub struct FloatingPetal {
    /// Fraction of the window width.
    pub start_x:  f32,
    pub drift_x:  f32,
    pub drift_y:  f32,
    pub rotation: f32,
    pub delay:    f32,
    pub duration: f32,
    pub size:     f32,
}

/// Where one floating petal is this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PetalPose {
    pub x:     f32,
    pub y:     f32,
    pub angle: f32,
    pub alpha: f32,
    pub size:  f32,
}

#[derive(Debug)]
pub struct PetalDrift {
    pub petals: Vec<FloatingPetal>,
    /// Seconds since the drift last became active.
    clock:      f32,
    active:     bool,
}

pub const FLOATING_PETALS: usize = 12;

impl PetalDrift {
    pub fn new<R: Rng>(rng: &mut R) -> Self {
        let petals = (0..FLOATING_PETALS)
            .map(|_| FloatingPetal {
                start_x:  rng.random_range(0.0..1.0),
                drift_x:  rng.random_range(-75.0..75.0),
                drift_y:  rng.random_range(80.0..200.0),
                rotation: rng.random_range(0.0..360.0),
                delay:    rng.random_range(0.0..6.0),
                duration: rng.random_range(7.0..12.0),
                size:     rng.random_range(14.0..28.0),
            })
            .collect();
        PetalDrift { petals, clock: 0.0, active: false }
    }

    /// Restarts from the top each time `active` turns on.
    pub fn tick(&mut self, dt: f32, active: bool) {
        if active && !self.active {
            self.clock = 0.0;
        }
        self.active = active;
        if active {
            self.clock += dt;
        }
    }

    /// Poses of the petals that are past their delay.
    pub fn poses(&self, width: f32, height: f32) -> Vec<PetalPose> {
        if !self.active {
            return Vec::new();
        }
        self.petals.iter()
            .filter_map(|p| {
                let t = self.clock - p.delay;
                if t < 0.0 { return None; }
                let u = (t % p.duration) / p.duration;
                Some(PetalPose {
                    x:     p.start_x * width + p.drift_x * u,
                    y:     -0.05 * height + p.drift_y * 2.0 * u,
                    angle: (p.rotation * 2.0 * u).to_radians(),
                    alpha: 0.7 * (u * std::f32::consts::PI).sin(),
                    size:  p.size,
                })
            })
            .collect()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// FallingPetal — the one petal that drops after the bloom
// ════════════════════════════════════════════════════════════════════════════

/// Falls from the flower head to the ground over [`FallingPetal::DURATION`]
/// seconds, swaying, then rests.
#[derive(Debug, Default)]
pub struct FallingPetal {
    elapsed: Option<f32>,
}

impl FallingPetal {
    pub const DURATION: f32 = 3.5;
    const SWAY:          f32 = 18.0;

    pub fn tick(&mut self, dt: f32, fallen: bool) {
        if !fallen {
            self.elapsed = None;
            return;
        }
        self.elapsed = Some(match self.elapsed {
            None    => 0.0,
            Some(t) => (t + dt).min(Self::DURATION),
        });
    }

    /// 0.0 at release, 1.0 on the ground; `None` while still attached.
    pub fn progress(&self) -> Option<f32> {
        self.elapsed.map(|t| t / Self::DURATION)
    }

    /// Position between `from` (the flower head) and `ground_y`.
    pub fn position(&self, from: (f32, f32), ground_y: f32) -> Option<(f32, f32)> {
        let p = self.progress()?;
        let eased = p * p * (3.0 - 2.0 * p);
        let x = from.0 + Self::SWAY * (p * TAU * 1.5).sin() + 30.0 * p;
        let y = from.1 + (ground_y - from.1) * eased;
        Some((x, y))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
