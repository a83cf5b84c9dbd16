//! # bloom_chime
//!
//! The musical material of the stone bloom piece:
//!
//! * a six-note **wind-chime palette** used for ambient and nurture chimes,
//! * the ascending **bloom melody** played once when the flower opens,
//! * a Standard MIDI File writer so the melody can be exported and auditioned
//!   outside the piece.
//!
//! Notes are expressed as MIDI note numbers.  The palette was originally
//! tuned in Hz, so [`hz_to_midi`] documents the mapping.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use bloom_chime::{Melody, GeneralMidi};
//!
//! let track = Melody::bloom().to_track(120, 480, GeneralMidi::Celesta.program(), 0);
//! track.write_file("bloom.mid").unwrap();
//! ```

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use rand::Rng;

// ════════════════════════════════════════════════════════════════════════════
// Palette and melody tables
// ════════════════════════════════════════════════════════════════════════════

/// Wind-chime palette: 523, 587, 659, 784, 880, 1047 Hz.
pub const CHIME_PALETTE: [u8; 6] = [72, 74, 76, 79, 81, 84];

/// The chime that greets the first interaction (659 Hz, E5).
pub const FIRST_CHIME: u8 = 76;

/// Bloom melody: 523, 659, 784, 1047, 1319, 1568 Hz.
pub const BLOOM_NOTES: [u8; 6] = [72, 76, 79, 84, 88, 91];

/// Logical name of the bloom cue.
pub const BLOOM_CUE_NAME: &str = "bloom-melody";

/// Gap between bloom melody onsets.
pub const BLOOM_STEP: Duration = Duration::from_millis(400);
/// How long each bloom note rings.
pub const BLOOM_RING: Duration = Duration::from_millis(2500);
/// How long a single chime rings.
pub const CHIME_RING: Duration = Duration::from_millis(3000);

const BLOOM_VELOCITY: u8 = 96;
const CHIME_VELOCITY: u8 = 72;

/// Convert a frequency in Hz to the nearest MIDI note number (A4 = 440 Hz = 69).
pub fn hz_to_midi(hz: f32) -> u8 {
    if hz <= 0.0 { return 0; }
    let n = 69.0 + 12.0 * (hz / 440.0).log2();
    n.round().clamp(0.0, 127.0) as u8
}

/// Pick a chime uniformly from [`CHIME_PALETTE`].
pub fn pick_chime<R: Rng>(rng: &mut R) -> u8 {
    CHIME_PALETTE[rng.random_range(0..CHIME_PALETTE.len())]
}

// ════════════════════════════════════════════════════════════════════════════
// General MIDI programs — the bell-like corner of the GM set
// ════════════════════════════════════════════════════════════════════════════

/// General MIDI instruments that suit a chime (0-indexed program numbers).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum GeneralMidi {
    Celesta        = 8,
    Glockenspiel   = 9,
    MusicBox       = 10,
    Vibraphone     = 11,
    TubularBells   = 14,
    OrchestralHarp = 46,
    Pad1NewAge     = 88,
    Pad7Halo       = 94,
    Fx3Crystal     = 98,
    Kalimba        = 108,
    TinkleBell     = 112,
}

impl GeneralMidi {
    pub const ALL: [GeneralMidi; 11] = [
        GeneralMidi::Celesta,
        GeneralMidi::Glockenspiel,
        GeneralMidi::MusicBox,
        GeneralMidi::Vibraphone,
        GeneralMidi::TubularBells,
        GeneralMidi::OrchestralHarp,
        GeneralMidi::Pad1NewAge,
        GeneralMidi::Pad7Halo,
        GeneralMidi::Fx3Crystal,
        GeneralMidi::Kalimba,
        GeneralMidi::TinkleBell,
    ];

    /// Raw MIDI program number (0–127).
    pub fn program(self) -> u8 { self as u8 }

    /// Human-readable name.
    pub fn name(self) -> &'static str {
        match self {
            GeneralMidi::Celesta        => "Celesta",
            GeneralMidi::Glockenspiel   => "Glockenspiel",
            GeneralMidi::MusicBox       => "Music Box",
            GeneralMidi::Vibraphone     => "Vibraphone",
            GeneralMidi::TubularBells   => "Tubular Bells",
            GeneralMidi::OrchestralHarp => "Orchestral Harp",
            GeneralMidi::Pad1NewAge     => "Pad 1 (New Age)",
            GeneralMidi::Pad7Halo       => "Pad 7 (Halo)",
            GeneralMidi::Fx3Crystal     => "FX 3 (Crystal)",
            GeneralMidi::Kalimba        => "Kalimba",
            GeneralMidi::TinkleBell     => "Tinkle Bell",
        }
    }

    /// Look up a program by name, ignoring case, spaces and punctuation
    /// (`"music box"`, `"MusicBox"` and `"music-box"` all match).
    pub fn from_name(name: &str) -> Option<Self> {
        let key = |s: &str| -> String {
            s.chars().filter(|c| c.is_ascii_alphanumeric()).map(|c| c.to_ascii_lowercase()).collect()
        };
        let wanted = key(name);
        Self::ALL.iter().copied().find(|gm| key(gm.name()) == wanted)
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Melody — notes scheduled in wall-clock time
// ════════════════════════════════════════════════════════════════════════════

/// One note of a [`Melody`], placed at `onset` from the melody start.
///
/// Notes may overlap: a chime keeps ringing while the next one starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScheduledNote {
    pub onset:    Duration,
    pub pitch:    u8,
    pub ring:     Duration,
    pub velocity: u8,
}

impl ScheduledNote {
    pub fn release(&self) -> Duration { self.onset + self.ring }
}

/// A short phrase of possibly-overlapping notes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Melody {
    pub name:  String,
    pub notes: Vec<ScheduledNote>,
}

impl Melody {
    /// The ascending bloom melody: one note every 400 ms, each ringing 2.5 s.
    pub fn bloom() -> Self {
        let notes = BLOOM_NOTES.iter().enumerate()
            .map(|(i, &pitch)| ScheduledNote {
                onset:    BLOOM_STEP * i as u32,
                pitch,
                ring:     BLOOM_RING,
                velocity: BLOOM_VELOCITY,
            })
            .collect();
        Melody { name: BLOOM_CUE_NAME.to_string(), notes }
    }

    /// A single chime struck at time zero.
    pub fn chime(pitch: u8) -> Self {
        Melody {
            name:  format!("chime-{}", pitch),
            notes: vec![ScheduledNote {
                onset:    Duration::ZERO,
                pitch:    pitch.min(127),
                ring:     CHIME_RING,
                velocity: CHIME_VELOCITY,
            }],
        }
    }

    /// Time from the first onset until the last note has stopped ringing.
    pub fn duration(&self) -> Duration {
        self.notes.iter().map(ScheduledNote::release).max().unwrap_or(Duration::ZERO)
    }

    /// Resolve wall-clock onsets into MIDI ticks at the given tempo.
    pub fn to_track(&self, tempo_bpm: u32, ticks_per_quarter: u16, instrument: u8, channel: u8)
        -> MidiTrack
    {
        let tempo = tempo_bpm.max(1);
        let to_ticks = |d: Duration| -> u32 {
            // ticks = ms * tpq * bpm / 60_000
            let ms = d.as_millis() as u64;
            (ms * ticks_per_quarter as u64 * tempo as u64 / 60_000) as u32
        };

        let mut events = Vec::with_capacity(self.notes.len() * 2);
        for n in &self.notes {
            events.push(TrackEvent { tick: to_ticks(n.onset),     kind: EventKind::On,  pitch: n.pitch, velocity: n.velocity });
            events.push(TrackEvent { tick: to_ticks(n.release()), kind: EventKind::Off, pitch: n.pitch, velocity: 0 });
        }
        // Offs sort before ons at the same tick so a re-struck pitch is not cut short.
        events.sort_by_key(|e| (e.tick, e.kind));

        MidiTrack {
            events,
            ticks_per_quarter,
            tempo_bpm: tempo,
            instrument,
            channel,
            description: self.name.clone(),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MidiTrack — absolute-tick events ready for serialisation
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum EventKind { Off, On }

/// A note-on or note-off at an absolute tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackEvent {
    pub tick:     u32,
    pub kind:     EventKind,
    pub pitch:    u8,
    pub velocity: u8,
}

/// A resolved event list, produced by [`Melody::to_track`].
pub struct MidiTrack {
    pub events:            Vec<TrackEvent>,
    pub ticks_per_quarter: u16,
    pub tempo_bpm:         u32,
    pub instrument:        u8,
    pub channel:           u8,
    /// Written as the track name meta-event.
    pub description:       String,
}

impl MidiTrack {
    /// Serialise to a standard MIDI Type-0 file and write to `path`.
    pub fn write_file(&self, path: impl AsRef<Path>) -> std::io::Result<()> {
        let bytes = self.to_bytes();
        let mut f = std::fs::File::create(path)?;
        f.write_all(&bytes)
    }

    /// Serialise to a `Vec<u8>` containing a valid MIDI Type-0 file.
    pub fn to_bytes(&self) -> Vec<u8> {
        let track = self.build_track_chunk();

        let mut out = Vec::new();
        // ── Header chunk ──────────────────────────────────────────────────
        out.extend_from_slice(b"MThd");
        out.extend_from_slice(&6u32.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes()); // format 0
        out.extend_from_slice(&1u16.to_be_bytes()); // 1 track
        out.extend_from_slice(&self.ticks_per_quarter.to_be_bytes());

        // ── Track chunk ───────────────────────────────────────────────────
        out.extend_from_slice(b"MTrk");
        out.extend_from_slice(&(track.len() as u32).to_be_bytes());
        out.extend_from_slice(&track);

        out
    }

    fn build_track_chunk(&self) -> Vec<u8> {
        let mut t: Vec<u8> = Vec::new();
        let ch = self.channel & 0x0F;

        // ── Tempo meta-event ──────────────────────────────────────────────
        let micros = 60_000_000u32 / self.tempo_bpm.max(1);
        t.extend_from_slice(&[0x00, 0xFF, 0x51, 0x03]);
        t.push(((micros >> 16) & 0xFF) as u8);
        t.push(((micros >>  8) & 0xFF) as u8);
        t.push(( micros        & 0xFF) as u8);

        // ── Track name meta-event ─────────────────────────────────────────
        let name = self.description.as_bytes();
        t.extend_from_slice(&[0x00, 0xFF, 0x03]);
        write_vlq(&mut t, name.len() as u32);
        t.extend_from_slice(name);

        // ── Program Change ────────────────────────────────────────────────
        t.extend_from_slice(&[0x00, 0xC0 | ch, self.instrument & 0x7F]);

        // ── Note events, delta-encoded ────────────────────────────────────
        let mut last_tick = 0u32;
        for e in &self.events {
            write_vlq(&mut t, e.tick - last_tick);
            last_tick = e.tick;
            match e.kind {
                EventKind::On  => t.extend_from_slice(&[0x90 | ch, e.pitch, e.velocity]),
                EventKind::Off => t.extend_from_slice(&[0x80 | ch, e.pitch, 0x00]),
            }
        }

        // ── End of Track ──────────────────────────────────────────────────
        t.extend_from_slice(&[0x00, 0xFF, 0x2F, 0x00]);

        t
    }
}

/// Write a MIDI variable-length quantity (VLQ).
fn write_vlq(buf: &mut Vec<u8>, mut value: u32) {
    let mut bytes = [0u8; 5];
    let mut i = 4;
    bytes[i] = (value & 0x7F) as u8;
    value >>= 7;
    while value > 0 {
        i -= 1;
        bytes[i] = ((value & 0x7F) | 0x80) as u8;
        value >>= 7;
    }
    buf.extend_from_slice(&bytes[i..]);
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
