//! # stone_bloom
//!
//! A stone that becomes a flower.  The window shows a sky moving from storm
//! through night to a clear morning; swiping moves the sky and stroking the
//! stone makes it grow.  When both are far enough along the flower blooms
//! once: a petal falls, the petals sweep through a rainbow while the bloom
//! melody plays, and a panel opens for a wish.
//!
//! ## Input → effect
//!
//! | Input | Where | Effect |
//! |---|---|---|
//! | Drag up / down | Anywhere | Sky clearer / stormier (`0.002` per pixel) |
//! | Stroke | Stone | Growth `+0.003` per move, occasional chime |
//! | First press | Anywhere | Starts the ambient chimes |
//! | Type / Backspace | Wish panel | Edit the wish (200 characters) |
//! | `Escape` | — | Quit |
//!
//! The sky and growth also creep forward on their own, so an idle garden
//! still blooms eventually.
//!
//! ## Modules
//!
//! | Module | Role |
//! |---|---|
//! | [`config`] | `config.toml` loading and defaults |
//! | [`app`] | per-frame state and the main loop |
//! | [`pointer`] | mouse polls → sky / stone pointer events |
//! | [`petals`] | rain, floating petals, falling petal, breathing |
//! | [`player`] | MIDI playback thread behind `AudioOut` |
//! | [`visualizer`] | `minifb` window and software renderer |

pub mod app;
pub mod config;
pub mod petals;
pub mod player;
pub mod pointer;
pub mod visualizer;
