//! The one canonical set of thresholds, rates, and timings.

use std::time::Duration;

// ── Progression clock ───────────────────────────────────────────────────────
pub const CLOCK_PERIOD:   Duration = Duration::from_millis(50);
pub const SKY_PER_TICK:   f32 = 0.002;
pub const GROWTH_PER_TICK: f32 = 0.001;

// ── Gestures ────────────────────────────────────────────────────────────────
/// Sky progress per pixel of vertical drag (swipe up = positive).
pub const SWIPE_SENSITIVITY: f32 = 0.002;
/// Growth added by one pointer-move sample while stroking the stone.
pub const NURTURE_STEP: f32 = 0.003;
/// Chance that a single nurture event rings a chime.
pub const NURTURE_CHIME_PROBABILITY: f64 = 0.03;

// ── Sky keyframe split and layer ramps ──────────────────────────────────────
pub const NIGHT_POINT:      f32 = 0.5;
pub const RAIN_FADE_END:    f32 = 0.35;
pub const STAR_HALF_WIDTH:  f32 = 0.3;
pub const SUN_RAMP_START:   f32 = 0.65;
pub const SUN_RAMP_LEN:     f32 = 0.35;
/// Below this opacity a layer is not drawn at all.
pub const LAYER_VISIBLE_MIN: f32 = 0.01;
pub const MOON_VISIBLE_MIN:  f32 = 0.1;
pub const MOON_OPACITY_SCALE: f32 = 0.7;
/// Above this sky progress text switches to dark ink.
pub const DAYLIGHT_TEXT_POINT: f32 = 0.7;

// ── Growth stages ───────────────────────────────────────────────────────────
pub const SPROUT_AT:      f32 = 0.2;
pub const GROW_AT:        f32 = 0.5;
pub const BLOOM_GROWTH:   f32 = 0.8;
pub const BLOOM_SKY:      f32 = 0.8;
/// The stroke hint stays up until growth passes this.
pub const STROKE_HINT_UNTIL: f32 = 0.3;

// ── Bloom sequence ──────────────────────────────────────────────────────────
pub const BLOOM_DELAY:      Duration = Duration::from_millis(5000);
pub const WISH_DELAY:       Duration = Duration::from_millis(1500);
pub const CUE_START_VOLUME: f32 = 0.8;
pub const CUE_FADE_FLOOR:   f32 = 0.02;
/// Index (0–5, clockwise from the top) of the petal that drops.
pub const FALLING_PETAL:    usize = 3;
pub const PETAL_COUNT:      usize = 6;

// ── Ambient chimes ──────────────────────────────────────────────────────────
pub const AMBIENT_MIN_GAP: Duration = Duration::from_millis(2000);
pub const AMBIENT_MAX_GAP: Duration = Duration::from_millis(7000);

// ── Wish text ───────────────────────────────────────────────────────────────
pub const WISH_MAX_CHARS: usize = 200;
