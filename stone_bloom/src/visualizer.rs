//! Software-rendered visualizer using `minifb`.
//!
//! Layout (back to front):
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │            WISHING A LOVELY LIFE            ╲ sun rays   │
//! │    (moon)                        * star      ╲           │
//! │   ' rain '    '   floating petals   '    '               │
//! │                     ┌──────────────┐                     │
//! │                     │  wish panel  │                     │
//! │                     └──────────────┘                     │
//! │                         ✿  flower                        │
//! │                         |  stem                          │
//! │ ░░░░░░░░░░░░░░░░░░░░  (stone)  ░░░░░░░░░ ground tint ░░░ │
//! │                     hint / whisper                       │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Drawing happens on a [`Canvas`], which knows nothing about the window, so
//! the scene can be rendered in tests.

use std::f32::consts::TAU;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use minifb::{InputCallback, Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};
use thiserror::Error;

use sky_bloom::constants::{FALLING_PETAL, PETAL_COUNT, WISH_MAX_CHARS};
use sky_bloom::garden::{TITLE, WHISPER};
use sky_bloom::sequencer::petal_color;
use sky_bloom::{GardenView, GrowthStage, Hsl};

use crate::petals::{stroke_glow, sun_rays, star_breath, FallingPetal, PetalDrift, RainField};
use crate::pointer::{MouseSample, StoneArea};

const FRAME_LIMIT:  Duration = Duration::from_millis(16);
const STEM_COLOR:   Hsl = Hsl::new(120.0, 30.0, 40.0);
const LEAF_COLOR:   Hsl = Hsl::new(120.0, 35.0, 45.0);
const BUD_COLOR:    Hsl = Hsl::new(100.0, 28.0, 52.0);
const CENTRE_COLOR: Hsl = Hsl::new(50.0, 70.0, 65.0);
const RAIN_COLOR:   Hsl = Hsl::new(200.0, 30.0, 75.0);
const STAR_COLOR:   Hsl = Hsl::new(45.0, 80.0, 85.0);
const MOON_COLOR:   Hsl = Hsl::new(45.0, 20.0, 85.0);
const SUN_COLOR:    Hsl = Hsl::new(45.0, 50.0, 92.0);
const WHISPER_INK:  Hsl = Hsl::new(210.0, 20.0, 40.0);
const STROKE_GLOW:  Hsl = Hsl::new(45.0, 60.0, 80.0);
/// Stone scale while it is being stroked.
const PRESSED:      f32 = 0.97;
const PANEL_BG:     Hsl = Hsl::new(40.0, 30.0, 97.0);
const PANEL_INK:    Hsl = Hsl::new(30.0, 10.0, 30.0);
const PETAL_RADIUS: f32 = 14.0;

#[derive(Debug, Error)]
pub enum VisualizerError {
    #[error("could not open window: {0}")]
    Window(#[from] minifb::Error),
}

// ════════════════════════════════════════════════════════════════════════════
// Scene — everything one frame draws
// ════════════════════════════════════════════════════════════════════════════

pub struct Scene<'a> {
    pub view:    &'a GardenView,
    pub rain:    &'a RainField,
    pub drift:   &'a PetalDrift,
    pub falling: &'a FallingPetal,
    pub stone:   &'a StoneArea,
    pub wish:    &'a str,
    /// Current whisper opacity; nothing is drawn at 0.
    pub whisper: f32,
    /// Seconds since start, for breathing and blinking.
    pub time:    f32,
}

/// Flower head centre for a stone and stage.
pub fn flower_head(stone: &StoneArea, stage: GrowthStage) -> (f32, f32) {
    (stone.cx, stone.top() - stage.stem_height())
}

// ════════════════════════════════════════════════════════════════════════════
// FrameInput — what the window saw this frame
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
pub struct FrameInput {
    pub mouse:     Option<MouseSample>,
    pub typed:     Vec<char>,
    pub backspace: bool,
    pub quit:      bool,
}

/// Collects the text the window delivers between polls.  Control
/// characters are dropped; Backspace and Escape arrive as keys.
struct TypedChars(Arc<Mutex<Vec<char>>>);

impl InputCallback for TypedChars {
    fn add_char(&mut self, uni_char: u32) {
        let Some(c) = char::from_u32(uni_char).filter(|c| !c.is_control()) else { return };
        if let Ok(mut queue) = self.0.lock() {
            queue.push(c);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Visualizer
// ════════════════════════════════════════════════════════════════════════════

pub struct Visualizer {
    window: Window,
    canvas: Canvas,
    typed:  Arc<Mutex<Vec<char>>>,
}

impl Visualizer {
    pub fn new(width: usize, height: usize) -> Result<Self, VisualizerError> {
        let mut window = Window::new(
            TITLE,
            width, height,
            WindowOptions {
                resize: false,
                ..WindowOptions::default()
            },
        )?;
        window.limit_update_rate(Some(FRAME_LIMIT)); // ~60fps

        let typed = Arc::new(Mutex::new(Vec::new()));
        window.set_input_callback(Box::new(TypedChars(Arc::clone(&typed))));

        Ok(Visualizer { window, canvas: Canvas::new(width, height), typed })
    }

    /// Poll mouse and keyboard.
    pub fn poll_input(&mut self) -> FrameInput {
        let mut input = FrameInput::default();
        if !self.window.is_open() {
            input.quit = true;
            return input;
        }

        input.mouse = Some(MouseSample {
            pos:  self.window.get_mouse_pos(MouseMode::Discard),
            down: self.window.get_mouse_down(MouseButton::Left),
        });

        if let Ok(mut queue) = self.typed.lock() {
            input.typed = std::mem::take(&mut *queue);
        }
        for key in self.window.get_keys_pressed(KeyRepeat::Yes) {
            match key {
                Key::Escape    => input.quit = true,
                Key::Backspace => input.backspace = true,
                _ => {}
            }
        }
        input
    }

    /// Render one frame and present it.
    pub fn render(&mut self, scene: &Scene) {
        draw_scene(&mut self.canvas, scene);
        if let Err(e) = self.window.update_with_buffer(&self.canvas.buf, self.canvas.w, self.canvas.h) {
            tracing::debug!("frame not presented: {}", e);
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// draw_scene
// ════════════════════════════════════════════════════════════════════════════

pub fn draw_scene(c: &mut Canvas, s: &Scene) {
    let p = &s.view.params;
    let (w, h) = (c.w as f32, c.h as f32);

    // ── Sky gradient ──────────────────────────────────────────────────────
    c.vertical_gradient(p.sky_colors.top, p.sky_colors.bottom);

    // ── Sunlight ──────────────────────────────────────────────────────────
    if p.sunlight_visible() {
        let (main, second) = sun_rays(s.time);
        c.light_ray(w * 0.78, w * 0.22, 0.15 * main * p.sunlight_opacity, SUN_COLOR.to_argb());
        c.light_ray(w * 0.58, w * 0.14, 0.10 * second * p.sunlight_opacity, SUN_COLOR.to_argb());
    }

    // ── Rain ──────────────────────────────────────────────────────────────
    if p.rain_visible() {
        let argb = RAIN_COLOR.to_argb();
        for d in &s.rain.drops {
            c.line(d.x, d.y, d.x - 0.5, d.y + d.length, argb, d.alpha * p.rain_opacity);
        }
    }

    // ── Star and moon ─────────────────────────────────────────────────────
    if p.star_visible() {
        let (scale, breath) = star_breath(s.time);
        c.glow(w * 0.72, h * 0.18, 6.0 * scale, 30.0 * scale, STAR_COLOR.to_argb(), p.star_opacity * breath);
    }
    if p.moon_visible() {
        let (mx, my) = (w * 0.2 + 25.0, h * 0.12 + 25.0);
        c.glow(mx, my, 25.0, 45.0, MOON_COLOR.to_argb(), p.moon_opacity * 0.4);
        c.fill_ellipse(mx, my, 25.0, 25.0, MOON_COLOR.to_argb(), p.moon_opacity);
    }

    // ── Floating petals ───────────────────────────────────────────────────
    if p.petals_active() {
        for pose in s.drift.poses(w, h) {
            c.fill_ellipse(pose.x, pose.y, pose.size * 0.5, pose.size * 0.7, 0xFFFFFFFF, pose.alpha);
        }
    }

    // ── Ground tint ───────────────────────────────────────────────────────
    let ground_top = h * 0.75;
    let tint = p.ground.to_argb();
    for y in ground_top as usize..c.h {
        let t = (y as f32 - ground_top) / (h - ground_top);
        c.blend_row(y, tint, sky_bloom::derived::GROUND_ALPHA * t);
    }

    // ── Stone and flower ──────────────────────────────────────────────────
    draw_flower(c, s);
    let k = if s.view.nurturing { PRESSED } else { 1.0 };
    let (rx, ry) = (s.stone.rx * k, s.stone.ry * k);
    c.fill_ellipse(s.stone.cx, s.stone.cy, rx, ry, p.stone.to_argb(), 1.0);
    c.fill_ellipse(
        s.stone.cx - rx * 0.3, s.stone.cy - ry * 0.35,
        rx * 0.35, ry * 0.25, 0xFFFFFFFF, 0.08,
    );
    if s.view.nurturing {
        c.glow(s.stone.cx, s.stone.cy, 0.0, rx * 1.2, STROKE_GLOW.to_argb(), 0.6 * stroke_glow(s.time));
    }

    if let Some((x, y)) = s.falling.position(flower_head(s.stone, GrowthStage::Blooming), s.stone.cy) {
        let colour = petal_color(FALLING_PETAL, s.view.rainbow_progress).to_argb();
        c.fill_ellipse(x, y, PETAL_RADIUS * 0.5, PETAL_RADIUS * 0.7, colour, 0.95);
    }

    // ── Text ──────────────────────────────────────────────────────────────
    let title_ink = Hsl::new(0.0, 0.0, p.title_lightness).to_argb();
    c.draw_label_centered(TITLE, h * 0.06, 4, title_ink, p.title_alpha);

    if let Some(hint) = s.view.hint {
        let ink = Hsl::new(0.0, 0.0, p.hint_lightness).to_argb();
        let scale = if hint == sky_bloom::Hint::Stroke { 4 } else { 2 };
        c.draw_label_centered(hint.text(), h * 0.93, scale, ink, 0.5);
    }
    if s.whisper > 0.0 {
        c.draw_label_centered(WHISPER, h * 0.9, 2, WHISPER_INK.to_argb(), s.whisper);
    }

    if s.view.wish_panel_visible {
        draw_wish_panel(c, s);
    }
}

fn draw_flower(c: &mut Canvas, s: &Scene) {
    let stage = s.view.params.stage;
    if stage == GrowthStage::Stone {
        return;
    }
    let (hx, hy) = flower_head(s.stone, stage);
    let base = s.stone.top() + 4.0;
    c.fill_rect_f(hx - 1.5, hy, 3.0, base - hy, STEM_COLOR.to_argb(), 1.0);

    if stage.has_leaves() {
        let mid = (hy + base) / 2.0;
        c.fill_ellipse(hx - 10.0, mid, 9.0, 4.0, LEAF_COLOR.to_argb(), 1.0);
        c.fill_ellipse(hx + 10.0, mid + 10.0, 9.0, 4.0, LEAF_COLOR.to_argb(), 1.0);
    }

    match stage {
        GrowthStage::Stone => {}
        GrowthStage::Sprouting => {
            c.fill_ellipse(hx, hy, 4.0, 6.0, BUD_COLOR.to_argb(), 1.0);
        }
        GrowthStage::Growing => {
            c.fill_ellipse(hx, hy, 7.0, 10.0, BUD_COLOR.to_argb(), 1.0);
        }
        GrowthStage::Blooming => {
            for i in 0..PETAL_COUNT {
                if i == FALLING_PETAL && s.view.petal_fallen {
                    continue;
                }
                // Index 0 at the top, clockwise.
                let a = i as f32 / PETAL_COUNT as f32 * TAU - TAU / 4.0;
                let (px, py) = (hx + a.cos() * PETAL_RADIUS, hy + a.sin() * PETAL_RADIUS);
                let colour = petal_color(i, s.view.rainbow_progress).to_argb();
                c.fill_ellipse(px, py, PETAL_RADIUS * 0.6, PETAL_RADIUS * 0.6, colour, 0.95);
            }
            c.fill_ellipse(hx, hy, 6.0, 6.0, CENTRE_COLOR.to_argb(), 1.0);
        }
    }
}

fn draw_wish_panel(c: &mut Canvas, s: &Scene) {
    let pw = (c.w as f32 * 0.5).max(300.0);
    let ph = 150.0;
    let px = (c.w as f32 - pw) / 2.0;
    let py = c.h as f32 * 0.3;
    c.fill_rect_f(px, py, pw, ph, PANEL_BG.to_argb(), 0.85);
    c.draw_border(px as usize, py as usize, pw as usize, ph as usize, PANEL_INK.to_argb());

    let ink = PANEL_INK.to_argb();
    c.draw_label("make a wish", px as usize + 12, py as usize + 12, 2, ink, 1.0);

    let cols = ((pw - 24.0) / 8.0) as usize;
    let blink = if (s.time * 2.0) as u32 % 2 == 0 { "_" } else { "" };
    let text = format!("{}{}", s.wish, blink);
    for (row, line) in wrap(&text, cols).iter().take(8).enumerate() {
        c.draw_label(line, px as usize + 12, py as usize + 40 + row * 12, 2, ink, 1.0);
    }
    let count = format!("{}/{}", s.wish.chars().count(), WISH_MAX_CHARS);
    c.draw_label(&count, (px + pw) as usize - 12 - count.len() * 8, (py + ph) as usize - 16, 2, ink, 0.6);
}

/// Greedy word wrap to `cols` characters; long words are split.
pub fn wrap(text: &str, cols: usize) -> Vec<String> {
    let cols = cols.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split(' ') {
        let mut word: Vec<char> = word.chars().collect();
        loop {
            let used = line.chars().count();
            let gap = usize::from(used > 0);
            if used + gap + word.len() <= cols {
                if gap == 1 { line.push(' '); }
                line.extend(word.iter());
                break;
            }
            if used > 0 {
                lines.push(std::mem::take(&mut line));
                continue;
            }
            let rest = word.split_off(cols);
            lines.push(word.iter().collect());
            word = rest;
        }
    }
    lines.push(line);
    lines
}

// ════════════════════════════════════════════════════════════════════════════
// Canvas — primitive drawing helpers
// ════════════════════════════════════════════════════════════════════════════

pub struct Canvas {
    pub w:   usize,
    pub h:   usize,
    pub buf: Vec<u32>,
}

impl Canvas {
    pub fn new(w: usize, h: usize) -> Self {
        Canvas { w, h, buf: vec![0xFF000000; w * h] }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.w && y < self.h).then(|| self.buf[y * self.w + x])
    }

    fn set_pixel(&mut self, x: usize, y: usize, color: u32) {
        if x < self.w && y < self.h {
            self.buf[y * self.w + x] = color;
        }
    }

    fn blend_pixel(&mut self, x: isize, y: isize, color: u32, alpha: f32) {
        if x < 0 || y < 0 || alpha <= 0.0 { return; }
        let (x, y) = (x as usize, y as usize);
        if x < self.w && y < self.h {
            let i = y * self.w + x;
            self.buf[i] = blend(self.buf[i], color, alpha);
        }
    }

    fn blend_row(&mut self, y: usize, color: u32, alpha: f32) {
        for x in 0..self.w {
            self.blend_pixel(x as isize, y as isize, color, alpha);
        }
    }

    fn vertical_gradient(&mut self, top: Hsl, bottom: Hsl) {
        let span = (self.h.max(2) - 1) as f32;
        for y in 0..self.h {
            let color = top.lerp(bottom, y as f32 / span).to_argb();
            self.buf[y * self.w..(y + 1) * self.w].fill(color);
        }
    }

    fn fill_rect_f(&mut self, x: f32, y: f32, w: f32, h: f32, color: u32, alpha: f32) {
        let (x0, y0) = (x.round() as isize, y.round() as isize);
        let (x1, y1) = ((x + w).round() as isize, (y + h).round() as isize);
        for row in y0..y1 {
            for col in x0..x1 {
                self.blend_pixel(col, row, color, alpha);
            }
        }
    }

    fn draw_border(&mut self, x: usize, y: usize, w: usize, h: usize, color: u32) {
        if w == 0 || h == 0 { return; }
        for col in x..(x + w).min(self.w) {
            self.set_pixel(col, y, color);
            self.set_pixel(col, y + h - 1, color);
        }
        for row in y..(y + h).min(self.h) {
            self.set_pixel(x, row, color);
            self.set_pixel(x + w - 1, row, color);
        }
    }

    fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, color: u32, alpha: f32) {
        if rx <= 0.0 || ry <= 0.0 { return; }
        let (y0, y1) = ((cy - ry).floor() as isize, (cy + ry).ceil() as isize);
        for row in y0..=y1 {
            let dy = (row as f32 + 0.5 - cy) / ry;
            if dy.abs() > 1.0 { continue; }
            let half = rx * (1.0 - dy * dy).sqrt();
            let (x0, x1) = ((cx - half).round() as isize, (cx + half).round() as isize);
            for col in x0..x1 {
                self.blend_pixel(col, row, color, alpha);
            }
        }
    }

    /// Bright core of `core` radius with a soft halo out to `halo`.
    fn glow(&mut self, cx: f32, cy: f32, core: f32, halo: f32, color: u32, alpha: f32) {
        let r = halo.max(core);
        let (x0, x1) = ((cx - r).floor() as isize, (cx + r).ceil() as isize);
        let (y0, y1) = ((cy - r).floor() as isize, (cy + r).ceil() as isize);
        for row in y0..=y1 {
            for col in x0..=x1 {
                let d = ((col as f32 + 0.5 - cx).powi(2) + (row as f32 + 0.5 - cy).powi(2)).sqrt();
                let a = if d <= core {
                    1.0
                } else if d <= r {
                    0.35 * (1.0 - (d - core) / (r - core)).powi(2)
                } else {
                    0.0
                };
                self.blend_pixel(col, row, color, alpha * a);
            }
        }
    }

    /// A soft diagonal band from the top edge, leaning left as it falls.
    fn light_ray(&mut self, top_x: f32, width: f32, alpha: f32, color: u32) {
        if alpha <= 0.0 { return; }
        let h = self.h as f32;
        for y in 0..self.h {
            let fade = 1.0 - y as f32 / h;
            let centre = top_x - y as f32 * 0.45;
            let x0 = (centre - width).max(0.0) as usize;
            let x1 = ((centre + width).max(0.0) as usize).min(self.w);
            for x in x0..x1 {
                let d = ((x as f32 - centre) / width).abs();
                self.blend_pixel(x as isize, y as isize, color, alpha * fade * (1.0 - d));
            }
        }
    }

    fn line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, color: u32, alpha: f32) {
        let steps = (x1 - x0).abs().max((y1 - y0).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let x = x0 + (x1 - x0) * t;
            let y = y0 + (y1 - y0) * t;
            self.blend_pixel(x.round() as isize, y.round() as isize, color, alpha);
        }
    }

    /// Minimal bitmap font — 3×5 characters, each pixel drawn `scale`×`scale`.
    fn draw_label(&mut self, text: &str, x: usize, y: usize, scale: usize, color: u32, alpha: f32) {
        let scale = scale.max(1);
        let mut cx = x;
        for ch in text.chars() {
            let glyph = char_glyph(ch);
            for (row, &bits) in glyph.iter().enumerate() {
                for col in 0..3usize {
                    if bits & (1 << (2 - col)) != 0 {
                        for sy in 0..scale {
                            for sx in 0..scale {
                                self.blend_pixel(
                                    (cx + col * scale + sx) as isize,
                                    (y + row * scale + sy) as isize,
                                    color, alpha,
                                );
                            }
                        }
                    }
                }
            }
            cx += 4 * scale; // 3 wide + 1 gap
            if cx + 4 * scale > self.w { break; }
        }
    }

    fn draw_label_centered(&mut self, text: &str, y: f32, scale: usize, color: u32, alpha: f32) {
        let width = text.chars().count() * 4 * scale;
        let x = self.w.saturating_sub(width) / 2;
        self.draw_label(text, x, y.max(0.0) as usize, scale, color, alpha);
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Minimal 3×5 bitmap font
// ────────────────────────────────────────────────────────────────────────────

fn char_glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b001, 0b001, 0b001],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        'a' | 'A' => [0b111, 0b101, 0b111, 0b101, 0b101],
        'b' | 'B' => [0b110, 0b101, 0b110, 0b101, 0b110],
        'c' | 'C' => [0b111, 0b100, 0b100, 0b100, 0b111],
        'd' | 'D' => [0b110, 0b101, 0b101, 0b101, 0b110],
        'e' | 'E' => [0b111, 0b100, 0b111, 0b100, 0b111],
        'f' | 'F' => [0b111, 0b100, 0b111, 0b100, 0b100],
        'g' | 'G' => [0b111, 0b100, 0b101, 0b101, 0b111],
        'h' | 'H' => [0b101, 0b101, 0b111, 0b101, 0b101],
        'i' | 'I' => [0b111, 0b010, 0b010, 0b010, 0b111],
        'j' | 'J' => [0b001, 0b001, 0b001, 0b101, 0b111],
        'k' | 'K' => [0b101, 0b101, 0b110, 0b101, 0b101],
        'l' | 'L' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' | 'M' => [0b101, 0b111, 0b101, 0b101, 0b101],
        'n' | 'N' => [0b111, 0b101, 0b101, 0b101, 0b101],
        'o' | 'O' => [0b111, 0b101, 0b101, 0b101, 0b111],
        'p' | 'P' => [0b111, 0b101, 0b111, 0b100, 0b100],
        'q' | 'Q' => [0b111, 0b101, 0b101, 0b111, 0b001],
        'r' | 'R' => [0b110, 0b101, 0b110, 0b101, 0b101],
        's' | 'S' => [0b111, 0b100, 0b111, 0b001, 0b111],
        't' | 'T' => [0b111, 0b010, 0b010, 0b010, 0b010],
        'u' | 'U' => [0b101, 0b101, 0b101, 0b101, 0b111],
        'v' | 'V' => [0b101, 0b101, 0b101, 0b010, 0b010],
        'w' | 'W' => [0b101, 0b101, 0b101, 0b111, 0b101],
        'x' | 'X' => [0b101, 0b101, 0b010, 0b101, 0b101],
        'y' | 'Y' => [0b101, 0b101, 0b111, 0b010, 0b010],
        'z' | 'Z' => [0b111, 0b001, 0b010, 0b100, 0b111],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '_' => [0b000, 0b000, 0b000, 0b000, 0b111],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        ',' => [0b000, 0b000, 0b000, 0b010, 0b100],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '!' => [0b010, 0b010, 0b010, 0b000, 0b010],
        '?' => [0b111, 0b001, 0b010, 0b000, 0b010],
        '\'' => [0b010, 0b010, 0b000, 0b000, 0b000],
        '=' => [0b000, 0b111, 0b000, 0b111, 0b000],
        '+' => [0b000, 0b010, 0b111, 0b010, 0b000],
        ' ' => [0b000, 0b000, 0b000, 0b000, 0b000],
        _   => [0b000, 0b000, 0b010, 0b000, 0b000], // fallback dot
    }
}

/// Alpha-blend two ARGB colors. `t` = 0.0 → all `a`, `t` = 1.0 → all `b`.
fn blend(a: u32, b: u32, t: f32) -> u32 {
    let t = t.clamp(0.0, 1.0);
    let lerp = |ca: u32, cb: u32| (ca as f32 * (1.0-t) + cb as f32 * t).round() as u32;
    let ar = (a >> 16) & 0xFF; let br = (b >> 16) & 0xFF;
    let ag = (a >>  8) & 0xFF; let bg = (b >>  8) & 0xFF;
    let ab =  a        & 0xFF; let bb =  b        & 0xFF;
    0xFF000000 | (lerp(ar,br) << 16) | (lerp(ag,bg) << 8) | lerp(ab,bb)
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
