//! # sky_bloom
//!
//! The progression state machine behind *Wishing a lovely life*: a sky that
//! moves from storm through night to a clear morning, and a stone that grows
//! into a flower when it is stroked.
//!
//! ## Two scalars
//!
//! | Scalar | 0.0 | 0.5 | 1.0 | Moved by |
//! |---|---|---|---|---|
//! | sky progress | storm | night | clear | clock (+), vertical drag (±) |
//! | growth level | bare stone | | full bloom | clock (+), stroking the stone (+) |
//!
//! Everything else ([`SceneParams`]) is a pure function of the two.
//!
//! ## Modules
//!
//! | Module | Role |
//! |---|---|
//! | [`interpolate`] | scalar / HSL lerp, sky keyframes |
//! | [`progression`] | [`Progress`] and the 50 ms [`ProgressionClock`] |
//! | [`gesture`] | pointer samples → sky drag and nurture events |
//! | [`derived`] | opacities, growth stage, `is_blooming` |
//! | [`sequencer`] | one-shot bloom: delay, falling petal, rainbow, wish |
//! | [`ambient`] | background chimes after the first touch |
//! | [`audio`] | the [`AudioOut`] boundary and owned [`CueHandle`]s |
//! | [`garden`] | the aggregate a host drives once per frame |
//!
//! ## Quick start
//!
//! ```
//! use std::time::Duration;
//! use sky_bloom::{Garden, NullAudio, PointerEvent, PointerPhase};
//!
//! let mut garden = Garden::new(0.03, Some(1));
//! let mut audio = NullAudio;
//! garden.pointer(PointerEvent::sky(PointerPhase::Down, 400.0), &mut audio);
//! garden.pointer(PointerEvent::sky(PointerPhase::Move, 200.0), &mut audio);
//! garden.update(Duration::from_millis(16), &mut audio);
//! assert!(garden.view().sky > 0.39);
//! ```

pub mod ambient;
pub mod audio;
pub mod constants;
pub mod derived;
pub mod garden;
pub mod gesture;
pub mod interpolate;
pub mod progression;
pub mod sequencer;
pub mod wish;

pub use audio::{AudioError, AudioOut, Cue, CueHandle, NullAudio, Playback};
pub use derived::{GrowthStage, SceneParams};
pub use garden::{Garden, GardenView, Hint};
pub use gesture::{GestureOutcome, GestureTranslator, PointerEvent, PointerPhase, Region};
pub use interpolate::{Hsl, SkyColors};
pub use progression::{Progress, ProgressionClock};
pub use sequencer::{BloomEvent, BloomPhase, BloomSequencer};
pub use wish::WishText;
