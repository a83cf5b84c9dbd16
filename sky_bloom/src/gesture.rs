//! Pointer gestures → state changes.
//!
//! Two independent drags share one pointer:
//!
//! | Region | Gesture | Effect |
//! |---|---|---|
//! | anywhere (`Sky`) | vertical drag | sky progress ± `0.002`/px, swipe up = clearer |
//! | stone (`Stone`) | stroke | `+0.003` growth per move sample, occasional chime |
//!
//! The host delivers every raw sample to `Region::Sky` and, while the
//! pointer is over the stone (or just left it), also to `Region::Stone`.

use rand::Rng;

use crate::constants::{NURTURE_CHIME_PROBABILITY, NURTURE_STEP, SWIPE_SENSITIVITY};
use crate::progression::Progress;

// ════════════════════════════════════════════════════════════════════════════
// PointerEvent
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Region {
    /// The whole view.
    Sky,
    /// The stone / flower hit area.
    Stone,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerPhase { Down, Move, Up, Leave, Cancel }

impl PointerPhase {
    /// Phases that end a drag.
    pub fn is_release(self) -> bool {
        matches!(self, PointerPhase::Up | PointerPhase::Leave | PointerPhase::Cancel)
    }
}

/// One pointer sample as seen by one region.  `y` is in screen pixels,
/// growing downward.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub region: Region,
    pub phase:  PointerPhase,
    pub y:      f32,
}

impl PointerEvent {
    pub fn sky(phase: PointerPhase, y: f32) -> Self {
        PointerEvent { region: Region::Sky, phase, y }
    }
    pub fn stone(phase: PointerPhase, y: f32) -> Self {
        PointerEvent { region: Region::Stone, phase, y }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SkyDrag
// ════════════════════════════════════════════════════════════════════════════

/// Tracks the last pointer Y while the pointer is down.
#[derive(Debug, Default)]
pub struct SkyDrag {
    last_y: Option<f32>,
}

impl SkyDrag {
    /// Returns the sky progress delta for this sample.
    pub fn handle(&mut self, phase: PointerPhase, y: f32) -> f32 {
        match phase {
            PointerPhase::Down => {
                self.last_y = Some(y);
                0.0
            }
            PointerPhase::Move => match self.last_y {
                Some(last) => {
                    self.last_y = Some(y);
                    (last - y) * SWIPE_SENSITIVITY
                }
                None => 0.0,
            },
            _ => {
                self.last_y = None;
                0.0
            }
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// NurtureDrag
// ════════════════════════════════════════════════════════════════════════════

/// The stone's own drag flag.
#[derive(Debug, Default)]
pub struct NurtureDrag {
    dragging: bool,
}

impl NurtureDrag {
    /// Returns true when this sample is a nurture event.
    pub fn handle(&mut self, phase: PointerPhase) -> bool {
        match phase {
            PointerPhase::Down => { self.dragging = true; false }
            PointerPhase::Move => self.dragging,
            _ => { self.dragging = false; false }
        }
    }

    pub fn is_dragging(&self) -> bool { self.dragging }
}

// ════════════════════════════════════════════════════════════════════════════
// GestureTranslator
// ════════════════════════════════════════════════════════════════════════════

/// What one pointer sample did.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GestureOutcome {
    /// A pointer-down landed (any region).
    pub pressed:   bool,
    /// Sky progress actually moved by this much (after clamping).
    pub sky_delta: f32,
    /// This sample was a nurture event.
    pub nurtured:  bool,
    /// The nurture event rolled a chime.
    pub chime:     bool,
}

#[derive(Debug)]
pub struct GestureTranslator {
    sky:               SkyDrag,
    nurture:           NurtureDrag,
    chime_probability: f64,
}

impl Default for GestureTranslator {
    fn default() -> Self { Self::new(NURTURE_CHIME_PROBABILITY) }
}

impl GestureTranslator {
    pub fn new(chime_probability: f64) -> Self {
        let p = if chime_probability.is_finite() { chime_probability.clamp(0.0, 1.0) } else { 0.0 };
        GestureTranslator {
            sky:               SkyDrag::default(),
            nurture:           NurtureDrag::default(),
            chime_probability: p,
        }
    }

    /// Apply one sample to `progress`.
    pub fn apply<R: Rng>(&mut self, event: PointerEvent, progress: &mut Progress, rng: &mut R)
        -> GestureOutcome
    {
        let mut out = GestureOutcome {
            pressed: event.phase == PointerPhase::Down,
            ..GestureOutcome::default()
        };

        match event.region {
            Region::Sky => {
                let delta = self.sky.handle(event.phase, event.y);
                if delta != 0.0 {
                    let before = progress.sky();
                    progress.nudge_sky(delta);
                    out.sky_delta = progress.sky() - before;
                }
            }
            Region::Stone => {
                if self.nurture.handle(event.phase) {
                    progress.grow(NURTURE_STEP);
                    out.nurtured = true;
                    out.chime = rng.random_bool(self.chime_probability);
                }
            }
        }
        out
    }

    /// Drop any in-progress drags.
    pub fn reset(&mut self) {
        self.sky = SkyDrag::default();
        self.nurture = NurtureDrag::default();
    }

    pub fn is_nurturing(&self) -> bool { self.nurture.is_dragging() }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng { StdRng::seed_from_u64(42) }

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-5 }

    #[test]
    fn swipe_up_two_hundred_px() {
        let mut t = GestureTranslator::default();
        let mut p = Progress::new(0.3, 0.0);
        let mut r = rng();
        t.apply(PointerEvent::sky(PointerPhase::Down, 400.0), &mut p, &mut r);
        let out = t.apply(PointerEvent::sky(PointerPhase::Move, 200.0), &mut p, &mut r);
        assert!(close(p.sky(), 0.7));
        assert!(close(out.sky_delta, 0.4));
    }

    #[test]
    fn swipe_down_toward_storm() {
        let mut t = GestureTranslator::default();
        let mut p = Progress::new(0.5, 0.0);
        let mut r = rng();
        t.apply(PointerEvent::sky(PointerPhase::Down, 100.0), &mut p, &mut r);
        t.apply(PointerEvent::sky(PointerPhase::Move, 150.0), &mut p, &mut r);
        assert!(close(p.sky(), 0.4));
    }

    #[test]
    fn net_zero_swipe_is_reversible() {
        let mut t = GestureTranslator::default();
        let mut p = Progress::new(0.42, 0.0);
        let mut r = rng();
        t.apply(PointerEvent::sky(PointerPhase::Down, 300.0), &mut p, &mut r);
        for y in [250.0, 180.0, 260.0, 330.0, 310.0, 300.0] {
            t.apply(PointerEvent::sky(PointerPhase::Move, y), &mut p, &mut r);
        }
        t.apply(PointerEvent::sky(PointerPhase::Up, 300.0), &mut p, &mut r);
        assert!(close(p.sky(), 0.42));
    }

    #[test]
    fn move_without_down_does_nothing() {
        let mut t = GestureTranslator::default();
        let mut p = Progress::new(0.5, 0.0);
        let mut r = rng();
        t.apply(PointerEvent::sky(PointerPhase::Move, 10.0), &mut p, &mut r);
        t.apply(PointerEvent::sky(PointerPhase::Move, 500.0), &mut p, &mut r);
        assert_eq!(p.sky(), 0.5);
    }

    #[test]
    fn release_phases_end_sky_drag() {
        for end in [PointerPhase::Up, PointerPhase::Leave, PointerPhase::Cancel] {
            let mut t = GestureTranslator::default();
            let mut p = Progress::new(0.5, 0.0);
            let mut r = rng();
            t.apply(PointerEvent::sky(PointerPhase::Down, 100.0), &mut p, &mut r);
            t.apply(PointerEvent::sky(end, 100.0), &mut p, &mut r);
            t.apply(PointerEvent::sky(PointerPhase::Move, 0.0), &mut p, &mut r);
            assert_eq!(p.sky(), 0.5, "{:?} should end the drag", end);
        }
    }

    #[test]
    fn sky_drag_clamps() {
        let mut t = GestureTranslator::default();
        let mut p = Progress::new(0.9, 0.0);
        let mut r = rng();
        t.apply(PointerEvent::sky(PointerPhase::Down, 1000.0), &mut p, &mut r);
        let out = t.apply(PointerEvent::sky(PointerPhase::Move, 0.0), &mut p, &mut r);
        assert_eq!(p.sky(), 1.0);
        assert!(close(out.sky_delta, 0.1));
    }

    #[test]
    fn stroke_counts_events_not_distance() {
        let mut t = GestureTranslator::new(0.0);
        let mut p = Progress::default();
        let mut r = rng();
        t.apply(PointerEvent::stone(PointerPhase::Down, 0.0), &mut p, &mut r);
        // Ten tiny moves and one huge one: eleven nurture events.
        for i in 0..10 {
            t.apply(PointerEvent::stone(PointerPhase::Move, i as f32 * 0.1), &mut p, &mut r);
        }
        t.apply(PointerEvent::stone(PointerPhase::Move, 900.0), &mut p, &mut r);
        assert!(close(p.growth(), 11.0 * NURTURE_STEP));
    }

    #[test]
    fn stone_leave_stops_nurture() {
        let mut t = GestureTranslator::new(0.0);
        let mut p = Progress::default();
        let mut r = rng();
        t.apply(PointerEvent::stone(PointerPhase::Down, 0.0), &mut p, &mut r);
        t.apply(PointerEvent::stone(PointerPhase::Leave, 0.0), &mut p, &mut r);
        let out = t.apply(PointerEvent::stone(PointerPhase::Move, 0.0), &mut p, &mut r);
        assert!(!out.nurtured);
        assert_eq!(p.growth(), 0.0);
    }

    #[test]
    fn growth_never_decreases_under_gestures() {
        let mut t = GestureTranslator::new(0.5);
        let mut p = Progress::new(0.5, 0.3);
        let mut r = rng();
        let script = [
            PointerEvent::sky(PointerPhase::Down, 300.0),
            PointerEvent::stone(PointerPhase::Down, 300.0),
            PointerEvent::sky(PointerPhase::Move, 900.0),
            PointerEvent::stone(PointerPhase::Move, 900.0),
            PointerEvent::sky(PointerPhase::Move, 0.0),
            PointerEvent::stone(PointerPhase::Cancel, 0.0),
            PointerEvent::sky(PointerPhase::Up, 0.0),
        ];
        let mut last = p.growth();
        for _ in 0..50 {
            for ev in script {
                t.apply(ev, &mut p, &mut r);
                assert!(p.growth() >= last);
                last = p.growth();
            }
        }
    }

    #[test]
    fn growth_clamps_at_one() {
        let mut t = GestureTranslator::new(0.0);
        let mut p = Progress::new(0.0, 0.999);
        let mut r = rng();
        t.apply(PointerEvent::stone(PointerPhase::Down, 0.0), &mut p, &mut r);
        t.apply(PointerEvent::stone(PointerPhase::Move, 0.0), &mut p, &mut r);
        assert_eq!(p.growth(), 1.0);
    }

    #[test]
    fn chime_probability_extremes() {
        let mut p = Progress::default();
        let mut r = rng();

        let mut always = GestureTranslator::new(1.0);
        always.apply(PointerEvent::stone(PointerPhase::Down, 0.0), &mut p, &mut r);
        assert!(always.apply(PointerEvent::stone(PointerPhase::Move, 0.0), &mut p, &mut r).chime);

        let mut never = GestureTranslator::new(0.0);
        never.apply(PointerEvent::stone(PointerPhase::Down, 0.0), &mut p, &mut r);
        assert!(!never.apply(PointerEvent::stone(PointerPhase::Move, 0.0), &mut p, &mut r).chime);
    }

    #[test]
    fn chime_probability_out_of_range_is_clamped() {
        // random_bool panics outside [0, 1]
        let mut t = GestureTranslator::new(7.0);
        let mut p = Progress::default();
        let mut r = rng();
        t.apply(PointerEvent::stone(PointerPhase::Down, 0.0), &mut p, &mut r);
        assert!(t.apply(PointerEvent::stone(PointerPhase::Move, 0.0), &mut p, &mut r).chime);
        let _ = GestureTranslator::new(f64::NAN);
    }

    #[test]
    fn down_is_reported_as_press() {
        let mut t = GestureTranslator::default();
        let mut p = Progress::default();
        let mut r = rng();
        assert!(t.apply(PointerEvent::sky(PointerPhase::Down, 0.0), &mut p, &mut r).pressed);
        assert!(!t.apply(PointerEvent::sky(PointerPhase::Move, 0.0), &mut p, &mut r).pressed);
    }
}
