//! Scalar and HSL interpolation, and the three sky keyframes.
//!
//! Hue is interpolated as a plain number, never along the shortest arc.  The
//! sky keyframes sit within 35° of each other so the long way round never
//! shows.

use std::fmt;

// ════════════════════════════════════════════════════════════════════════════
// Scalars
// ════════════════════════════════════════════════════════════════════════════

/// Clamp `v` to `[0, 1]`.
pub fn unit(v: f32) -> f32 {
    v.clamp(0.0, 1.0)
}

/// Linear interpolation with `t` clamped to `[0, 1]`.
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * unit(t)
}

// ════════════════════════════════════════════════════════════════════════════
// Hsl
// ════════════════════════════════════════════════════════════════════════════

/// Hue in degrees, saturation and lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Hsl { h, s, l }
    }

    /// Channel-wise linear interpolation.
    pub fn lerp(self, other: Hsl, t: f32) -> Hsl {
        Hsl {
            h: lerp(self.h, other.h, t),
            s: lerp(self.s, other.s, t),
            l: lerp(self.l, other.l, t),
        }
    }

    /// Packed `0xAARRGGBB`, fully opaque.
    pub fn to_argb(self) -> u32 {
        let (r, g, b) = self.to_rgb();
        0xFF00_0000 | (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// 8-bit RGB channels.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        let h = self.h.rem_euclid(360.0);
        let s = unit(self.s / 100.0);
        let l = unit(self.l / 100.0);

        let c  = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let hp = h / 60.0;
        let x  = c * (1.0 - (hp % 2.0 - 1.0).abs());
        let (r1, g1, b1) = match hp as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = l - c / 2.0;
        let to8 = |v: f32| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
        (to8(r1), to8(g1), to8(b1))
    }
}

impl fmt::Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hsl({}, {}%, {}%)", self.h, self.s, self.l)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Sky keyframes
// ════════════════════════════════════════════════════════════════════════════

/// A top/bottom gradient pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SkyColors {
    pub top:    Hsl,
    pub bottom: Hsl,
}

impl SkyColors {
    pub fn lerp(self, other: SkyColors, t: f32) -> SkyColors {
        SkyColors {
            top:    self.top.lerp(other.top, t),
            bottom: self.bottom.lerp(other.bottom, t),
        }
    }
}

pub struct SkyStates {
    pub rain:  SkyColors,
    pub night: SkyColors,
    pub clear: SkyColors,
}

pub const SKY_STATES: SkyStates = SkyStates {
    rain: SkyColors {
        top:    Hsl::new(215.0, 25.0, 45.0),
        bottom: Hsl::new(210.0, 20.0, 60.0),
    },
    night: SkyColors {
        top:    Hsl::new(230.0, 50.0, 10.0),
        bottom: Hsl::new(225.0, 40.0, 18.0),
    },
    clear: SkyColors {
        top:    Hsl::new(200.0, 60.0, 75.0),
        bottom: Hsl::new(195.0, 50.0, 85.0),
    },
};

/// Two-leg gradient: rain → night over `[0, 0.5]`, night → clear over `(0.5, 1]`.
pub fn sky_colors(progress: f32) -> SkyColors {
    use crate::constants::NIGHT_POINT;
    if progress <= NIGHT_POINT {
        SKY_STATES.rain.lerp(SKY_STATES.night, progress / NIGHT_POINT)
    } else {
        SKY_STATES.night.lerp(SKY_STATES.clear, (progress - NIGHT_POINT) / (1.0 - NIGHT_POINT))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-4 }

    #[test]
    fn lerp_endpoints() {
        for &(a, b) in &[(0.0, 1.0), (215.0, 120.0), (-3.0, 7.5)] {
            assert_eq!(lerp(a, b, 0.0), a);
            assert_eq!(lerp(a, b, 1.0), b);
        }
    }

    #[test]
    fn lerp_clamps_t() {
        assert_eq!(lerp(2.0, 4.0, -1.0), 2.0);
        assert_eq!(lerp(2.0, 4.0, 3.0), 4.0);
    }

    #[test]
    fn hsl_lerp_monotonic_per_channel() {
        let a = Hsl::new(10.0, 20.0, 30.0);
        let b = Hsl::new(200.0, 60.0, 90.0);
        let mut prev = a;
        for i in 1..=20 {
            let c = a.lerp(b, i as f32 / 20.0);
            assert!(c.h >= prev.h && c.s >= prev.s && c.l >= prev.l);
            prev = c;
        }
        assert_eq!(prev, b);
    }

    #[test]
    fn hue_does_not_wrap() {
        // 350 → 10 goes the long way, through 180.
        let mid = Hsl::new(350.0, 50.0, 50.0).lerp(Hsl::new(10.0, 50.0, 50.0), 0.5);
        assert!(close(mid.h, 180.0));
    }

    #[test]
    fn sky_colors_keyframes() {
        assert_eq!(sky_colors(0.0), SKY_STATES.rain);
        assert_eq!(sky_colors(0.5), SKY_STATES.night);
        assert_eq!(sky_colors(1.0), SKY_STATES.clear);
    }

    #[test]
    fn sky_colors_midway_between_rain_and_night() {
        let c = sky_colors(0.25);
        assert!(close(c.top.h, 222.5));
        assert!(close(c.top.l, 27.5));
    }

    #[test]
    fn hsl_to_rgb_primaries() {
        assert_eq!(Hsl::new(0.0, 100.0, 50.0).to_rgb(), (255, 0, 0));
        assert_eq!(Hsl::new(120.0, 100.0, 50.0).to_rgb(), (0, 255, 0));
        assert_eq!(Hsl::new(240.0, 100.0, 50.0).to_rgb(), (0, 0, 255));
        assert_eq!(Hsl::new(0.0, 0.0, 100.0).to_argb(), 0xFFFF_FFFF);
    }

    #[test]
    fn hsl_display() {
        assert_eq!(Hsl::new(215.0, 25.0, 45.0).to_string(), "hsl(215, 25%, 45%)");
    }
}
