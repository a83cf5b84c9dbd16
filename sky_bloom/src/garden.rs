//! The garden: owns the two scalars and everything that moves them.
//!
//! Data flows one way.  The clock and pointer samples write [`Progress`];
//! [`SceneParams`] is recomputed from it; the bloom sequencer only observes
//! `is_blooming`.  The host calls [`Garden::pointer`] for each sample and
//! [`Garden::update`] once per frame, then draws [`Garden::view`].

use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::ambient::AmbientChimes;
use crate::audio::AudioOut;
use crate::constants::STROKE_HINT_UNTIL;
use crate::derived::SceneParams;
use crate::gesture::{GestureOutcome, GestureTranslator, PointerEvent};
use crate::progression::{Progress, ProgressionClock};
use crate::sequencer::{BloomEvent, BloomPhase, BloomSequencer};
use crate::wish::WishText;

pub const TITLE:   &str = "Wishing a lovely life";
pub const WHISPER: &str = "to a beloved life.";

// ════════════════════════════════════════════════════════════════════════════
// Hint
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hint {
    /// Nobody has touched the screen yet.
    Swipe,
    /// The stone still needs stroking.
    Stroke,
}

impl Hint {
    pub fn text(self) -> &'static str {
        match self {
            Hint::Swipe  => "swipe the screen to change the sky",
            Hint::Stroke => "stroke the stone",
        }
    }

    pub fn select(has_interacted: bool, growth: f32) -> Option<Hint> {
        if !has_interacted {
            Some(Hint::Swipe)
        } else if growth < STROKE_HINT_UNTIL {
            Some(Hint::Stroke)
        } else {
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// GardenView
// ════════════════════════════════════════════════════════════════════════════

/// Everything the renderer reads for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GardenView {
    pub sky:                f32,
    pub growth:             f32,
    pub params:             SceneParams,
    pub hint:               Option<Hint>,
    pub whisper:            bool,
    /// A stroke on the stone is in progress.
    pub nurturing:          bool,
    pub phase:              BloomPhase,
    pub petal_fallen:       bool,
    pub rainbow_progress:   f32,
    pub wish_panel_visible: bool,
}

// ════════════════════════════════════════════════════════════════════════════
// Garden
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug)]
pub struct Garden {
    progress:       Progress,
    clock:          ProgressionClock,
    gestures:       GestureTranslator,
    sequencer:      BloomSequencer,
    ambient:        AmbientChimes,
    wish:           WishText,
    rng:            StdRng,
    has_interacted: bool,
}

impl Garden {
    /// `seed` makes chime rolls and scheduling reproducible.
    pub fn new(chime_probability: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => StdRng::seed_from_u64(s),
            None    => StdRng::from_os_rng(),
        };
        Garden {
            progress:       Progress::default(),
            clock:          ProgressionClock::default(),
            gestures:       GestureTranslator::new(chime_probability),
            sequencer:      BloomSequencer::default(),
            ambient:        AmbientChimes::new(),
            wish:           WishText::new(),
            rng,
            has_interacted: false,
        }
    }

    pub fn progress(&self)       -> Progress { self.progress }
    pub fn has_interacted(&self) -> bool { self.has_interacted }
    pub fn sequencer(&self)      -> &BloomSequencer { &self.sequencer }
    pub fn wish(&self)           -> &WishText { &self.wish }
    pub fn wish_mut(&mut self)   -> &mut WishText { &mut self.wish }

    /// Feed one pointer sample.
    pub fn pointer(&mut self, event: PointerEvent, audio: &mut dyn AudioOut) -> GestureOutcome {
        let out = self.gestures.apply(event, &mut self.progress, &mut self.rng);
        self.sequencer.observe(self.params().is_blooming);

        if out.pressed && !self.has_interacted {
            info!("first interaction");
            self.has_interacted = true;
            self.ambient.start(&mut self.rng, audio);
        }
        if out.chime {
            let note = bloom_chime::pick_chime(&mut self.rng);
            if let Err(e) = audio.chime(note) {
                debug!(note, "nurture chime dropped: {}", e);
            }
        }
        out
    }

    /// Advance the clock, the ambient chimes and the bloom sequence by `dt`.
    pub fn update(&mut self, dt: Duration, audio: &mut dyn AudioOut) -> Vec<BloomEvent> {
        self.clock.drive(dt, &mut self.progress);
        self.ambient.update(dt, &mut self.rng, audio);
        let blooming = self.params().is_blooming;
        self.sequencer.update(dt, blooming, audio)
    }

    pub fn params(&self) -> SceneParams {
        SceneParams::compute(self.progress.sky(), self.progress.growth())
    }

    pub fn hint(&self) -> Option<Hint> {
        Hint::select(self.has_interacted, self.progress.growth())
    }

    pub fn view(&self) -> GardenView {
        let params = self.params();
        GardenView {
            sky:                self.progress.sky(),
            growth:             self.progress.growth(),
            params,
            hint:               self.hint(),
            whisper:            self.sequencer.has_bloomed_once() && params.is_blooming,
            nurturing:          self.gestures.is_nurturing(),
            phase:              self.sequencer.phase(),
            petal_fallen:       self.sequencer.falling_petal_triggered(),
            rainbow_progress:   self.sequencer.rainbow_progress(),
            wish_panel_visible: self.sequencer.wish_panel_visible(),
        }
    }

    /// Teardown: stop the clock and chimes, cancel the bloom sequence and
    /// release its audio.
    pub fn dispose(&mut self) {
        self.clock.stop();
        self.ambient.stop();
        self.sequencer.dispose();
        self.gestures.reset();
        debug!("garden disposed");
    }
}

impl Default for Garden {
    fn default() -> Self {
        Self::new(crate::constants::NURTURE_CHIME_PROBABILITY, None)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::testing::{Call, RecordingAudio};
    use crate::constants::CLOCK_PERIOD;
    use crate::derived::GrowthStage;
    use crate::gesture::PointerPhase;

    fn garden() -> Garden { Garden::new(0.0, Some(7)) }

    fn close(a: f32, b: f32) -> bool { (a - b).abs() < 1e-3 }

    /// Run `total` in 16 ms frames.
    fn run(g: &mut Garden, total: Duration, audio: &mut RecordingAudio) -> Vec<BloomEvent> {
        let frame = Duration::from_millis(16);
        let mut left = total;
        let mut events = Vec::new();
        while left > Duration::ZERO {
            let dt = frame.min(left);
            events.extend(g.update(dt, audio));
            left -= dt;
        }
        events
    }

    #[test]
    fn fresh_garden() {
        let g = garden();
        let v = g.view();
        assert_eq!(v.sky, 0.0);
        assert_eq!(v.growth, 0.0);
        assert_eq!(v.hint, Some(Hint::Swipe));
        assert_eq!(v.params.stage, GrowthStage::Stone);
        assert!(!v.whisper);
    }

    #[test]
    fn clock_alone_after_500_ticks() {
        let mut g = garden();
        let mut audio = RecordingAudio::default();
        run(&mut g, CLOCK_PERIOD * 500, &mut audio);
        assert!(close(g.progress().sky(), 1.0));
        assert!(close(g.progress().growth(), 0.5));
        assert!(!g.sequencer().has_bloomed_once());
    }

    #[test]
    fn first_press_starts_ambient_and_changes_hint() {
        let mut g = garden();
        let mut audio = RecordingAudio::default();
        g.pointer(PointerEvent::sky(PointerPhase::Down, 300.0), &mut audio);
        assert!(g.has_interacted());
        assert_eq!(g.hint(), Some(Hint::Stroke));
        assert_eq!(audio.calls(), vec![Call::Chime(bloom_chime::FIRST_CHIME)]);

        g.pointer(PointerEvent::sky(PointerPhase::Up, 300.0), &mut audio);
        g.pointer(PointerEvent::sky(PointerPhase::Down, 300.0), &mut audio);
        assert_eq!(audio.calls().len(), 1);
    }

    #[test]
    fn stroke_hint_clears_at_03() {
        let mut g = garden();
        let mut audio = RecordingAudio::default();
        g.pointer(PointerEvent::stone(PointerPhase::Down, 0.0), &mut audio);
        for _ in 0..101 {
            g.pointer(PointerEvent::stone(PointerPhase::Move, 0.0), &mut audio);
        }
        assert!(g.progress().growth() >= 0.3);
        assert_eq!(g.hint(), None);
    }

    #[test]
    fn nurture_chimes_ring_from_palette() {
        let mut g = Garden::new(1.0, Some(11));
        let mut audio = RecordingAudio::default();
        g.pointer(PointerEvent::stone(PointerPhase::Down, 0.0), &mut audio);
        for _ in 0..5 {
            g.pointer(PointerEvent::stone(PointerPhase::Move, 0.0), &mut audio);
        }
        // Opening ambient chime plus one per nurture event.
        assert_eq!(audio.count(|c| matches!(c, Call::Chime(_))), 6);
    }

    #[test]
    fn full_bloom_walkthrough() {
        let mut g = garden();
        let mut audio = RecordingAudio::default();

        // Stroke to 0.8 growth and swipe the sky clear.
        g.pointer(PointerEvent::stone(PointerPhase::Down, 0.0), &mut audio);
        for _ in 0..270 {
            g.pointer(PointerEvent::stone(PointerPhase::Move, 0.0), &mut audio);
        }
        g.pointer(PointerEvent::stone(PointerPhase::Up, 0.0), &mut audio);
        g.pointer(PointerEvent::sky(PointerPhase::Down, 600.0), &mut audio);
        g.pointer(PointerEvent::sky(PointerPhase::Move, 100.0), &mut audio);
        g.pointer(PointerEvent::sky(PointerPhase::Up, 100.0), &mut audio);
        assert!(g.params().is_blooming);

        let events = run(&mut g, Duration::from_secs(12), &mut audio);
        assert_eq!(
            events,
            vec![
                BloomEvent::Triggered,
                BloomEvent::PetalFell,
                BloomEvent::RainbowFinished,
                BloomEvent::WishRevealed,
            ]
        );
        let v = g.view();
        assert!(v.whisper);
        assert!(v.petal_fallen);
        assert!(v.wish_panel_visible);
        assert_eq!(v.phase, BloomPhase::Done);
        assert_eq!(audio.count(|c| matches!(c, Call::Play(..))), 1);
    }

    #[test]
    fn bloom_crossed_and_left_between_frames_still_triggers() {
        let mut g = garden();
        let mut audio = RecordingAudio::default();
        g.pointer(PointerEvent::stone(PointerPhase::Down, 0.0), &mut audio);
        for _ in 0..300 {
            g.pointer(PointerEvent::stone(PointerPhase::Move, 0.0), &mut audio);
        }
        g.pointer(PointerEvent::stone(PointerPhase::Up, 0.0), &mut audio);

        // Up to 0.9 and back to 0.4 in one frame's worth of samples.
        g.pointer(PointerEvent::sky(PointerPhase::Down, 600.0), &mut audio);
        g.pointer(PointerEvent::sky(PointerPhase::Move, 150.0), &mut audio);
        g.pointer(PointerEvent::sky(PointerPhase::Move, 400.0), &mut audio);
        g.pointer(PointerEvent::sky(PointerPhase::Up, 400.0), &mut audio);
        assert!(!g.params().is_blooming);

        let events = g.update(Duration::from_millis(16), &mut audio);
        assert_eq!(events, vec![BloomEvent::Triggered]);
        assert!(g.sequencer().has_bloomed_once());

        let events = run(&mut g, Duration::from_secs(12), &mut audio);
        assert!(events.contains(&BloomEvent::WishRevealed));
    }

    #[test]
    fn huge_frame_delta_does_not_panic() {
        let mut g = garden();
        let mut audio = RecordingAudio::default();
        g.pointer(PointerEvent::sky(PointerPhase::Down, 0.0), &mut audio);
        let events = g.update(Duration::MAX, &mut audio);
        assert_eq!(g.progress(), Progress::new(1.0, 1.0));
        assert_eq!(events, vec![BloomEvent::Triggered]);
        let events = g.update(Duration::MAX, &mut audio);
        assert!(events.contains(&BloomEvent::WishRevealed));
    }

    #[test]
    fn dispose_freezes_everything() {
        let mut g = garden();
        let mut audio = RecordingAudio::default();
        g.pointer(PointerEvent::sky(PointerPhase::Down, 0.0), &mut audio);
        g.dispose();
        let before = g.progress();
        let events = run(&mut g, Duration::from_secs(30), &mut audio);
        assert!(events.is_empty());
        assert_eq!(g.progress(), before);
        assert_eq!(audio.count(|c| matches!(c, Call::Chime(_))), 1);
    }

    #[test]
    fn view_reports_stroke_in_progress() {
        let mut g = garden();
        let mut audio = RecordingAudio::default();
        assert!(!g.view().nurturing);
        g.pointer(PointerEvent::stone(PointerPhase::Down, 0.0), &mut audio);
        assert!(g.view().nurturing);
        g.pointer(PointerEvent::stone(PointerPhase::Leave, 0.0), &mut audio);
        assert!(!g.view().nurturing);
    }

    #[test]
    fn wish_is_editable() {
        let mut g = garden();
        g.wish_mut().push_str("rain, then sun");
        assert_eq!(g.wish().as_str(), "rain, then sun");
    }
}
