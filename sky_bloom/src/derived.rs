//! Everything the renderer needs, computed from the two scalars.
//!
//! [`SceneParams::compute`] is a pure function: no stored state, no loops,
//! no I/O.  It runs on every pointer sample and every clock tick.

use crate::constants::*;
use crate::interpolate::{lerp, sky_colors, unit, Hsl, SkyColors};

// ════════════════════════════════════════════════════════════════════════════
// GrowthStage
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrowthStage { Stone, Sprouting, Growing, Blooming }

impl GrowthStage {
    pub fn from_levels(sky: f32, growth: f32) -> Self {
        if growth < SPROUT_AT {
            GrowthStage::Stone
        } else if growth < GROW_AT {
            GrowthStage::Sprouting
        } else if growth < BLOOM_GROWTH || sky < BLOOM_SKY {
            GrowthStage::Growing
        } else {
            GrowthStage::Blooming
        }
    }

    /// Stem height in pixels.
    pub fn stem_height(self) -> f32 {
        match self {
            GrowthStage::Stone     => 0.0,
            GrowthStage::Sprouting => 25.0,
            GrowthStage::Growing   => 60.0,
            GrowthStage::Blooming  => 90.0,
        }
    }

    pub fn has_leaves(self) -> bool {
        matches!(self, GrowthStage::Growing | GrowthStage::Blooming)
    }
}

/// The single bloom condition.
pub fn is_blooming(sky: f32, growth: f32) -> bool {
    growth >= BLOOM_GROWTH && sky >= BLOOM_SKY
}

pub fn rain_opacity(sky: f32) -> f32 {
    unit(1.0 - sky / RAIN_FADE_END)
}

pub fn star_opacity(sky: f32) -> f32 {
    unit(1.0 - (sky - NIGHT_POINT).abs() / STAR_HALF_WIDTH)
}

pub fn sunlight_opacity(sky: f32) -> f32 {
    unit((sky - SUN_RAMP_START) / SUN_RAMP_LEN)
}

// ════════════════════════════════════════════════════════════════════════════
// SceneParams
// ════════════════════════════════════════════════════════════════════════════

/// Presentation parameters for one (sky, growth) pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SceneParams {
    pub sky_colors:       SkyColors,
    pub rain_opacity:     f32,
    pub star_opacity:     f32,
    pub sunlight_opacity: f32,
    pub moon_opacity:     f32,
    pub stage:            GrowthStage,
    pub is_blooming:      bool,
    /// Ground tint, drawn at [`GROUND_ALPHA`].
    pub ground:           Hsl,
    pub stone:            Hsl,
    /// Title ink: lightness flips for daylight, alpha rises with the sky.
    pub title_lightness:  f32,
    pub title_alpha:      f32,
    pub hint_lightness:   f32,
}

pub const GROUND_ALPHA: f32 = 0.4;

impl SceneParams {
    pub fn compute(sky: f32, growth: f32) -> Self {
        let sky = unit(sky);
        let growth = unit(growth);
        let star = star_opacity(sky);
        let daylight = sky > DAYLIGHT_TEXT_POINT;

        SceneParams {
            sky_colors:       sky_colors(sky),
            rain_opacity:     rain_opacity(sky),
            star_opacity:     star,
            sunlight_opacity: sunlight_opacity(sky),
            moon_opacity:     if star > MOON_VISIBLE_MIN { star * MOON_OPACITY_SCALE } else { 0.0 },
            stage:            GrowthStage::from_levels(sky, growth),
            is_blooming:      is_blooming(sky, growth),
            ground: Hsl::new(
                lerp(215.0, 120.0, sky),
                lerp(15.0, 20.0, sky),
                lerp(20.0, 35.0, sky),
            ),
            stone:            Hsl::new(30.0, 8.0 + sky * 4.0, 45.0 + sky * 15.0),
            title_lightness:  if daylight { 20.0 } else { 90.0 },
            title_alpha:      0.5 + sky * 0.2,
            hint_lightness:   if daylight { 30.0 } else { 85.0 },
        }
    }

    pub fn rain_visible(&self)     -> bool { self.rain_opacity >= LAYER_VISIBLE_MIN }
    pub fn star_visible(&self)     -> bool { self.star_opacity >= LAYER_VISIBLE_MIN }
    pub fn sunlight_visible(&self) -> bool { self.sunlight_opacity >= LAYER_VISIBLE_MIN }
    pub fn moon_visible(&self)     -> bool { self.moon_opacity > 0.0 }
    /// Floating petals drift while the bloom condition holds.
    pub fn petals_active(&self)    -> bool { self.is_blooming }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-5 }

    #[test]
    fn blooming_boundaries() {
        assert!(!is_blooming(0.8, 0.79));
        assert!(!is_blooming(0.79, 0.8));
        assert!(is_blooming(0.8, 0.8));
        assert!(is_blooming(1.0, 1.0));
    }

    #[test]
    fn stage_scenarios() {
        assert_eq!(GrowthStage::from_levels(0.0, 0.15), GrowthStage::Stone);
        assert_eq!(GrowthStage::from_levels(0.0, 0.45), GrowthStage::Sprouting);
        assert_eq!(GrowthStage::from_levels(0.9, 0.6), GrowthStage::Growing);
        assert_eq!(GrowthStage::from_levels(0.9, 0.9), GrowthStage::Blooming);
    }

    #[test]
    fn full_growth_under_dark_sky_stays_growing() {
        assert_eq!(GrowthStage::from_levels(0.79, 1.0), GrowthStage::Growing);
    }

    #[test]
    fn stage_thresholds_inclusive() {
        assert_eq!(GrowthStage::from_levels(0.0, 0.2), GrowthStage::Sprouting);
        assert_eq!(GrowthStage::from_levels(0.0, 0.5), GrowthStage::Growing);
    }

    #[test]
    fn star_peaks_at_night() {
        assert!(close(star_opacity(0.5), 1.0));
        assert!(close(star_opacity(0.8), 0.0));
        assert!(close(star_opacity(0.2), 0.0));
        assert!(close(star_opacity(0.35), 0.5));
    }

    #[test]
    fn rain_fades_by_035() {
        assert_eq!(rain_opacity(0.0), 1.0);
        assert_eq!(rain_opacity(0.35), 0.0);
        assert_eq!(rain_opacity(0.9), 0.0);
    }

    #[test]
    fn sunlight_ramps_from_065() {
        assert_eq!(sunlight_opacity(0.5), 0.0);
        assert_eq!(sunlight_opacity(0.65), 0.0);
        assert!(close(sunlight_opacity(1.0), 1.0));
    }

    #[test]
    fn moon_needs_some_starlight() {
        let dusk = SceneParams::compute(0.5, 0.0);
        assert!(close(dusk.moon_opacity, 0.7));
        let day = SceneParams::compute(0.79, 0.0);
        assert!(!day.moon_visible());
    }

    #[test]
    fn text_ink_flips_in_daylight() {
        assert_eq!(SceneParams::compute(0.7, 0.0).title_lightness, 90.0);
        assert_eq!(SceneParams::compute(0.71, 0.0).title_lightness, 20.0);
        assert_eq!(SceneParams::compute(0.9, 0.0).hint_lightness, 30.0);
    }

    #[test]
    fn stone_and_ground_follow_sky() {
        let storm = SceneParams::compute(0.0, 0.0);
        let clear = SceneParams::compute(1.0, 0.0);
        assert_eq!(storm.stone, Hsl::new(30.0, 8.0, 45.0));
        assert_eq!(clear.stone, Hsl::new(30.0, 12.0, 60.0));
        assert_eq!(storm.ground.h, 215.0);
        assert_eq!(clear.ground.h, 120.0);
    }

    #[test]
    fn compute_is_idempotent() {
        for &(s, g) in &[(0.0, 0.0), (0.33, 0.71), (0.8, 0.8), (1.0, 0.2)] {
            assert_eq!(SceneParams::compute(s, g), SceneParams::compute(s, g));
        }
    }

    #[test]
    fn layer_visibility_cutoff() {
        let p = SceneParams::compute(0.349, 0.0);
        assert!(!p.rain_visible());
        assert!(SceneParams::compute(0.3, 0.0).rain_visible());
    }
}
