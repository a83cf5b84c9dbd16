//! Top-level application state.
//!
//! `AppState` owns the [`Garden`], the audio backend, the pointer tracker and
//! the scenery animations.  Each frame it feeds the polled mouse and keys to
//! the garden, advances everything by the frame delta and hands a [`Scene`]
//! to the visualizer.

use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use sky_bloom::{AudioOut, BloomEvent, Garden, GardenView, NullAudio};

use crate::config::Config;
use crate::petals::{FallingPetal, PetalDrift, RainField, WhisperFade};
use crate::player::{Player, PlayerConfig};
use crate::pointer::{MouseSample, PointerTracker, StoneArea};
use crate::visualizer::{Scene, Visualizer};

/// Longest frame delta fed to the garden.
const MAX_FRAME: Duration = Duration::from_millis(100);

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub width:             usize,
    pub height:            usize,
    pub chime_probability: f64,
    pub seed:              Option<u64>,
    /// `None` runs silently.
    pub player:            Option<PlayerConfig>,
}

impl AppConfig {
    pub fn from_config(cfg: &Config) -> Self {
        AppConfig {
            width:             cfg.window.width,
            height:            cfg.window.height,
            chime_probability: cfg.nurture.chime_probability,
            seed:              cfg.seed,
            player:            cfg.audio.enabled.then(|| PlayerConfig {
                instrument: cfg.audio.program(),
                volume:     cfg.audio.volume,
                port_hint:  cfg.audio.port_hint.clone(),
            }),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppState
// ════════════════════════════════════════════════════════════════════════════

pub struct AppState {
    // ── progression ──────────────────────────────────────────────────────
    garden:  Garden,
    audio:   Box<dyn AudioOut>,

    // ── input ────────────────────────────────────────────────────────────
    pointer: PointerTracker,
    stone:   StoneArea,

    // ── scenery ──────────────────────────────────────────────────────────
    rng:     StdRng,
    rain:    RainField,
    drift:   PetalDrift,
    falling: FallingPetal,
    whisper: WhisperFade,
    /// Seconds since start.
    time:    f32,
}

impl AppState {
    pub fn new(cfg: &AppConfig, audio: Box<dyn AudioOut>) -> Self {
        let mut rng = match cfg.seed {
            // Scenery gets its own stream so it does not shift chime rolls.
            Some(s) => StdRng::seed_from_u64(s.wrapping_add(1)),
            None    => StdRng::from_os_rng(),
        };
        let rain = RainField::new(&mut rng, cfg.width, cfg.height);
        let drift = PetalDrift::new(&mut rng);

        AppState {
            garden:  Garden::new(cfg.chime_probability, cfg.seed),
            audio,
            pointer: PointerTracker::new(),
            stone:   StoneArea::for_window(cfg.width, cfg.height),
            rng,
            rain,
            drift,
            falling: FallingPetal::default(),
            whisper: WhisperFade::default(),
            time:    0.0,
        }
    }

    pub fn garden(&self) -> &Garden { &self.garden }

    pub fn view(&self) -> GardenView { self.garden.view() }

    // ── input ────────────────────────────────────────────────────────────

    pub fn handle_mouse(&mut self, sample: MouseSample) {
        let area = self.stone.with_flower(self.garden.params().stage.stem_height());
        for event in self.pointer.sample(sample, &area) {
            self.garden.pointer(event, self.audio.as_mut());
        }
    }

    /// Typing only reaches the wish once its panel is showing.
    pub fn handle_keys(&mut self, typed: &[char], backspace: bool) {
        if !self.garden.sequencer().wish_panel_visible() {
            return;
        }
        let wish = self.garden.wish_mut();
        if backspace {
            wish.backspace();
        }
        for &c in typed {
            wish.push(c);
        }
    }

    // ── per-frame update ─────────────────────────────────────────────────

    pub fn tick(&mut self, dt: Duration) -> Vec<BloomEvent> {
        let dt = dt.min(MAX_FRAME);
        let events = self.garden.update(dt, self.audio.as_mut());
        for e in &events {
            info!(event = ?e, "bloom");
        }

        let view = self.garden.view();
        let secs = dt.as_secs_f32();
        self.time += secs;
        self.rain.tick(secs, &mut self.rng);
        self.drift.tick(secs, view.params.petals_active());
        self.falling.tick(secs, view.petal_fallen);
        self.whisper.tick(secs, view.whisper);
        events
    }

    pub fn scene<'a>(&'a self, view: &'a GardenView) -> Scene<'a> {
        Scene {
            view,
            rain:    &self.rain,
            drift:   &self.drift,
            falling: &self.falling,
            stone:   &self.stone,
            wish:    self.garden.wish().as_str(),
            whisper: self.whisper.alpha(),
            time:    self.time,
        }
    }

    /// Stop the clock and chimes and release the bloom cue.
    pub fn dispose(&mut self) {
        self.garden.dispose();
    }
}

// ════════════════════════════════════════════════════════════════════════════
// run — main loop
// ════════════════════════════════════════════════════════════════════════════

pub fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let mut vis = Visualizer::new(cfg.width, cfg.height)?;

    let audio: Box<dyn AudioOut> = match &cfg.player {
        Some(pc) => {
            let player = Player::spawn(pc.clone());
            if !player.is_available() {
                warn!("no MIDI output; running silently");
            }
            Box::new(player)
        }
        None => {
            info!("audio disabled");
            Box::new(NullAudio)
        }
    };

    let mut app = AppState::new(&cfg, audio);
    info!(width = cfg.width, height = cfg.height, "garden open");

    let mut last = Instant::now();
    loop {
        let input = vis.poll_input();
        if input.quit {
            break;
        }
        if let Some(sample) = input.mouse {
            app.handle_mouse(sample);
        }
        app.handle_keys(&input.typed, input.backspace);

        let now = Instant::now();
        app.tick(now - last);
        last = now;

        let view = app.view();
        vis.render(&app.scene(&view));
    }

    if !app.garden().wish().is_empty() {
        info!(wish = app.garden().wish().as_str(), "wish made");
    }
    app.dispose();
    info!("garden closed");
    Ok(())
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use sky_bloom::{AudioError, BloomPhase, Cue, CueHandle, Playback};

    /// Notes struck and cues started, shared with the test.
    #[derive(Default, Clone)]
    struct Log {
        chimes: Rc<RefCell<Vec<u8>>>,
        cues:   Rc<RefCell<Vec<Cue>>>,
    }

    struct Silent;
    impl Playback for Silent {
        fn set_volume(&mut self, _volume: f32) {}
        fn stop(&mut self) {}
    }

    impl AudioOut for Log {
        fn chime(&mut self, note: u8) -> Result<(), AudioError> {
            self.chimes.borrow_mut().push(note);
            Ok(())
        }
        fn play(&mut self, cue: Cue, _volume: f32) -> Result<CueHandle, AudioError> {
            self.cues.borrow_mut().push(cue);
            Ok(CueHandle::new(cue, Box::new(Silent)))
        }
    }

    fn cfg() -> AppConfig {
        AppConfig {
            width:             960,
            height:            640,
            chime_probability: 0.0,
            seed:              Some(3),
            player:            None,
        }
    }

    fn app() -> (AppState, Log) {
        let log = Log::default();
        (AppState::new(&cfg(), Box::new(log.clone())), log)
    }

    fn at(x: f32, y: f32, down: bool) -> MouseSample { MouseSample { pos: Some((x, y)), down } }

    fn run_for(app: &mut AppState, total: Duration) {
        let frame = Duration::from_millis(16);
        let mut t = Duration::ZERO;
        while t < total {
            app.tick(frame);
            t += frame;
        }
    }

    #[test]
    fn config_maps_audio_section() {
        let mut c = Config::default();
        assert_eq!(AppConfig::from_config(&c).player.map(|p| p.instrument), Some(8));
        c.audio.enabled = false;
        assert!(AppConfig::from_config(&c).player.is_none());
    }

    #[test]
    fn first_press_rings_the_first_chime() {
        let (mut app, log) = app();
        app.handle_mouse(at(100.0, 100.0, true));
        assert_eq!(*log.chimes.borrow(), vec![bloom_chime::FIRST_CHIME]);
        assert!(app.garden().has_interacted());
    }

    #[test]
    fn dragging_up_clears_the_sky() {
        let (mut app, _log) = app();
        app.handle_mouse(at(100.0, 400.0, true));
        app.handle_mouse(at(100.0, 200.0, true));
        assert!((app.view().sky - 0.4).abs() < 1e-3);
    }

    #[test]
    fn stroking_the_stone_grows_it() {
        let (mut app, _log) = app();
        app.handle_mouse(at(480.0, 512.0, true));
        for i in 1..=10 {
            app.handle_mouse(at(480.0 + i as f32, 512.0, true));
        }
        assert!((app.view().growth - 0.03).abs() < 1e-4);
    }

    #[test]
    fn keys_ignored_before_wish_panel() {
        let (mut app, _log) = app();
        app.handle_keys(&['h', 'i'], false);
        assert!(app.garden().wish().is_empty());
    }

    #[test]
    fn clock_alone_reaches_the_wish() {
        let (mut app, log) = app();
        run_for(&mut app, Duration::from_secs(60));
        let view = app.view();
        assert_eq!(view.phase, BloomPhase::Done);
        assert!(view.wish_panel_visible);
        assert_eq!(*log.cues.borrow(), vec![Cue::BloomMelody]);

        app.handle_keys(&['h', 'i', '!'], false);
        app.handle_keys(&[], true);
        assert_eq!(app.garden().wish().as_str(), "hi");
    }

    #[test]
    fn wish_takes_any_script_up_to_the_cap() {
        let (mut app, _log) = app();
        run_for(&mut app, Duration::from_secs(60));
        let typed: Vec<char> = "願い事".chars().cycle().take(250).collect();
        app.handle_keys(&typed, false);
        let wish = app.garden().wish().as_str();
        assert_eq!(wish.chars().count(), 200);
        assert!(wish.starts_with("願い事"));
    }

    #[test]
    fn whisper_waits_before_fading_in() {
        let (mut app, _log) = app();
        let mut waited = Duration::ZERO;
        while !app.view().whisper {
            assert!(waited < Duration::from_secs(120));
            app.tick(Duration::from_millis(16));
            waited += Duration::from_millis(16);
        }
        assert_eq!(app.scene(&app.view()).whisper, 0.0);
        run_for(&mut app, Duration::from_secs(4));
        assert_eq!(app.scene(&app.view()).whisper, 0.0);
        run_for(&mut app, Duration::from_secs(4));
        assert!(app.scene(&app.view()).whisper > 0.0);
    }

    #[test]
    fn long_frames_are_capped() {
        let (mut app, _log) = app();
        app.tick(Duration::from_secs(30));
        // One 100 ms frame is two clock ticks.
        assert!((app.view().sky - 0.004).abs() < 1e-4);
    }
}
