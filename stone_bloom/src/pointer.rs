//! Mouse sampling → [`PointerEvent`]s.
//!
//! The window is polled once per frame.  [`PointerTracker`] compares each
//! [`MouseSample`] with the previous one and emits the edges the garden
//! understands: every sample goes to the sky region, and samples over the
//! stone (or the one that leaves it) also go to the stone region.

use sky_bloom::{PointerEvent, PointerPhase};

// ════════════════════════════════════════════════════════════════════════════
// StoneArea — the stone / flower hit area
// ════════════════════════════════════════════════════════════════════════════

/// Petal radius plus a little slack around the flower head.
const FLOWER_MARGIN: f32 = 24.0;

/// Axis-aligned ellipse around the stone, in window pixels, plus an optional
/// column above it where the flower stands.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StoneArea {
    pub cx:    f32,
    pub cy:    f32,
    pub rx:    f32,
    pub ry:    f32,
    /// How far above the stone top the hit area reaches.
    pub reach: f32,
}

impl StoneArea {
    /// The stone sits centred, a fifth of the height above the bottom edge.
    pub fn for_window(width: usize, height: usize) -> Self {
        let w = width as f32;
        let h = height as f32;
        let rx = (w * 0.09).clamp(40.0, 110.0);
        StoneArea { cx: w / 2.0, cy: h * 0.8, rx, ry: rx * 0.62, reach: 0.0 }
    }

    /// The same area grown upward to cover a stem of `stem_height` and its
    /// flower head.
    pub fn with_flower(self, stem_height: f32) -> Self {
        let reach = if stem_height > 0.0 { stem_height + FLOWER_MARGIN } else { 0.0 };
        StoneArea { reach, ..self }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        let dx = (x - self.cx) / self.rx;
        let dy = (y - self.cy) / self.ry;
        if dx * dx + dy * dy <= 1.0 {
            return true;
        }
        self.reach > 0.0
            && (x - self.cx).abs() <= FLOWER_MARGIN.max(self.rx * 0.5)
            && y >= self.top() - self.reach
            && y <= self.cy
    }

    /// Top of the stone, where the stem starts.
    pub fn top(&self) -> f32 { self.cy - self.ry }
}

// ════════════════════════════════════════════════════════════════════════════
// PointerTracker
// ════════════════════════════════════════════════════════════════════════════

/// One poll of the mouse.  `pos` is `None` when the cursor is outside the
/// window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MouseSample {
    pub pos:  Option<(f32, f32)>,
    pub down: bool,
}

#[derive(Debug, Default)]
pub struct PointerTracker {
    was_down:   bool,
    was_inside: bool,
    last_pos:   Option<(f32, f32)>,
}

impl PointerTracker {
    pub fn new() -> Self { Self::default() }

    pub fn sample(&mut self, s: MouseSample, stone: &StoneArea) -> Vec<PointerEvent> {
        let mut out = Vec::new();

        let Some((x, y)) = s.pos else {
            // Cursor left the window: everything in progress ends here.
            let last_y = self.last_pos.map(|p| p.1).unwrap_or(0.0);
            if self.was_down {
                out.push(PointerEvent::sky(PointerPhase::Leave, last_y));
            }
            if self.was_inside {
                out.push(PointerEvent::stone(PointerPhase::Leave, last_y));
            }
            *self = PointerTracker::default();
            return out;
        };

        let inside = stone.contains(x, y);
        let moved = self.last_pos != Some((x, y));

        match (self.was_down, s.down) {
            (false, true) => {
                out.push(PointerEvent::sky(PointerPhase::Down, y));
                if inside {
                    out.push(PointerEvent::stone(PointerPhase::Down, y));
                }
            }
            (true, true) if moved => {
                out.push(PointerEvent::sky(PointerPhase::Move, y));
                if inside {
                    out.push(PointerEvent::stone(PointerPhase::Move, y));
                } else if self.was_inside {
                    out.push(PointerEvent::stone(PointerPhase::Leave, y));
                }
            }
            (true, false) => {
                out.push(PointerEvent::sky(PointerPhase::Up, y));
                if inside || self.was_inside {
                    out.push(PointerEvent::stone(PointerPhase::Up, y));
                }
            }
            _ => {
                if self.was_inside && !inside {
                    out.push(PointerEvent::stone(PointerPhase::Leave, y));
                }
            }
        }

        self.was_down = s.down;
        self.was_inside = inside;
        self.last_pos = Some((x, y));
        out
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use sky_bloom::Region;

    fn area() -> StoneArea { StoneArea { cx: 100.0, cy: 100.0, rx: 50.0, ry: 30.0, reach: 0.0 } }

    fn at(x: f32, y: f32, down: bool) -> MouseSample { MouseSample { pos: Some((x, y)), down } }

    fn phases(evs: &[PointerEvent], region: Region) -> Vec<PointerPhase> {
        evs.iter().filter(|e| e.region == region).map(|e| e.phase).collect()
    }

    #[test]
    fn ellipse_hit_test() {
        let a = area();
        assert!(a.contains(100.0, 100.0));
        assert!(a.contains(149.0, 100.0));
        assert!(!a.contains(100.0, 131.0));
        assert!(!a.contains(140.0, 125.0));
        assert_eq!(a.top(), 70.0);
    }

    #[test]
    fn flower_column_joins_the_hit_area() {
        let bare = area();
        assert!(!bare.contains(100.0, 40.0));
        assert_eq!(bare.with_flower(0.0), bare);

        let grown = bare.with_flower(60.0);
        assert!(grown.contains(100.0, 40.0));
        assert!(grown.contains(110.0, 0.0));
        assert!(!grown.contains(100.0, -20.0));
        assert!(!grown.contains(180.0, 40.0));
    }

    #[test]
    fn stroking_the_flower_stays_on_the_stone() {
        let mut t = PointerTracker::new();
        let a = area().with_flower(90.0);
        let evs = t.sample(at(100.0, 100.0, true), &a);
        assert_eq!(phases(&evs, Region::Stone), vec![PointerPhase::Down]);
        let evs = t.sample(at(100.0, 20.0, true), &a);
        assert_eq!(phases(&evs, Region::Stone), vec![PointerPhase::Move]);
    }

    #[test]
    fn window_area_is_centred() {
        let a = StoneArea::for_window(960, 640);
        assert_eq!(a.cx, 480.0);
        assert_eq!(a.cy, 512.0);
        assert!(a.contains(480.0, 512.0));
    }

    #[test]
    fn press_in_sky_only_goes_to_sky() {
        let mut t = PointerTracker::new();
        let evs = t.sample(at(10.0, 10.0, true), &area());
        assert_eq!(evs, vec![PointerEvent::sky(PointerPhase::Down, 10.0)]);
    }

    #[test]
    fn stroke_on_stone_reaches_both_regions() {
        let mut t = PointerTracker::new();
        let a = area();
        let evs = t.sample(at(100.0, 100.0, true), &a);
        assert_eq!(phases(&evs, Region::Stone), vec![PointerPhase::Down]);
        let evs = t.sample(at(105.0, 100.0, true), &a);
        assert_eq!(phases(&evs, Region::Sky), vec![PointerPhase::Move]);
        assert_eq!(phases(&evs, Region::Stone), vec![PointerPhase::Move]);
        let evs = t.sample(at(105.0, 100.0, false), &a);
        assert_eq!(phases(&evs, Region::Stone), vec![PointerPhase::Up]);
    }

    #[test]
    fn holding_still_emits_nothing() {
        let mut t = PointerTracker::new();
        let a = area();
        t.sample(at(100.0, 100.0, true), &a);
        for _ in 0..10 {
            assert!(t.sample(at(100.0, 100.0, true), &a).is_empty());
        }
    }

    #[test]
    fn dragging_off_the_stone_leaves_it() {
        let mut t = PointerTracker::new();
        let a = area();
        t.sample(at(100.0, 100.0, true), &a);
        let evs = t.sample(at(300.0, 100.0, true), &a);
        assert_eq!(phases(&evs, Region::Stone), vec![PointerPhase::Leave]);
        let evs = t.sample(at(310.0, 100.0, true), &a);
        assert!(phases(&evs, Region::Stone).is_empty());
    }

    #[test]
    fn hover_moves_are_silent() {
        let mut t = PointerTracker::new();
        let a = area();
        assert!(t.sample(at(0.0, 0.0, false), &a).is_empty());
        assert!(t.sample(at(5.0, 50.0, false), &a).is_empty());
    }

    #[test]
    fn leaving_window_ends_drags() {
        let mut t = PointerTracker::new();
        let a = area();
        t.sample(at(100.0, 100.0, true), &a);
        let evs = t.sample(MouseSample { pos: None, down: true }, &a);
        assert_eq!(phases(&evs, Region::Sky), vec![PointerPhase::Leave]);
        assert_eq!(phases(&evs, Region::Stone), vec![PointerPhase::Leave]);
    }
}
