//! Real-time MIDI playback thread.
//!
//! The window thread never touches the MIDI port.  It sends
//! [`PlayerCommand`]s over a channel; the player thread owns the connection,
//! keeps a small schedule of pending note-on / note-off events and sleeps
//! until the next one is due.
//!
//! Chimes sound on one channel and the bloom cue on another, so the cue's
//! fade (CC 7) leaves the chimes alone.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use bloom_chime::{Melody, ScheduledNote};
use sky_bloom::{AudioError, AudioOut, Cue, CueHandle, Playback};

const CHIME_CHANNEL: u8 = 0;
const CUE_CHANNEL:   u8 = 1;
/// How long `spawn` waits for the thread to report whether a port opened.
const OPEN_TIMEOUT:  Duration = Duration::from_secs(2);
/// Idle poll when nothing is scheduled.
const IDLE_WAIT:     Duration = Duration::from_millis(50);

// ════════════════════════════════════════════════════════════════════════════
// PlayerCommand — sent to the playback thread
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    /// Ring one note for the chime length.
    Chime(u8),
    /// Start the bloom melody as cue `id` at `volume`.
    StartCue { id: u64, volume: f32 },
    /// Change the CC 7 volume of cue `id`.
    CueVolume { id: u64, volume: f32 },
    /// Silence cue `id` and drop its pending notes.
    StopCue(u64),
    /// Terminate the thread.
    Quit,
}

// ════════════════════════════════════════════════════════════════════════════
// MidiOut — abstraction over midir / a recorder (for testing)
// ════════════════════════════════════════════════════════════════════════════

trait MidiOut: Send {
    fn send(&mut self, msg: &[u8]);

    fn program_change(&mut self, channel: u8, program: u8) {
        self.send(&[0xC0 | (channel & 0x0F), program & 0x7F]);
    }
    fn note_on(&mut self, channel: u8, note: u8, velocity: u8) {
        self.send(&[0x90 | (channel & 0x0F), note & 0x7F, velocity & 0x7F]);
    }
    fn note_off(&mut self, channel: u8, note: u8) {
        self.send(&[0x80 | (channel & 0x0F), note & 0x7F, 0]);
    }
    fn volume(&mut self, channel: u8, level: u8) {
        self.send(&[0xB0 | (channel & 0x0F), 7, level & 0x7F]);
    }
}

// ── midir backend ─────────────────────────────────────────────────────────

struct MidirOut {
    conn: midir::MidiOutputConnection,
}

impl MidiOut for MidirOut {
    fn send(&mut self, msg: &[u8]) {
        if let Err(e) = self.conn.send(msg) {
            debug!("midi send failed: {}", e);
        }
    }
}

/// 0.0–1.0 → 0–127.
fn to_midi_level(v: f32) -> u8 {
    (v.clamp(0.0, 1.0) * 127.0).round() as u8
}

// ════════════════════════════════════════════════════════════════════════════
// open_midi_output — enumerate ports and pick one
// ════════════════════════════════════════════════════════════════════════════

/// Names that look like a software synthesiser.
fn looks_like_synth(name: &str) -> bool {
    let n = name.to_lowercase();
    n.contains("fluid") || n.contains("timidity") || n.contains("microsoft")
        || n.contains("gm") || n.contains("synth")
}

/// Index of the port to use: the first matching `hint`, else the first
/// softsynth, else the first port.
fn choose_port(names: &[String], hint: Option<&str>) -> Option<usize> {
    if names.is_empty() {
        return None;
    }
    if let Some(h) = hint.map(str::to_lowercase) {
        if let Some(i) = names.iter().position(|n| n.to_lowercase().contains(&h)) {
            return Some(i);
        }
        warn!(hint = %h, "no MIDI port matches the configured hint");
    }
    Some(names.iter().position(|n| looks_like_synth(n)).unwrap_or(0))
}

fn open_midi_output(hint: Option<&str>) -> Option<Box<dyn MidiOut>> {
    let midi_out = match midir::MidiOutput::new("stone_bloom_player") {
        Ok(m)  => m,
        Err(e) => {
            warn!("MIDI init error: {}", e);
            return None;
        }
    };

    let ports = midi_out.ports();
    let names: Vec<String> = ports.iter()
        .map(|p| midi_out.port_name(p).unwrap_or_else(|_| "Unknown".to_string()))
        .collect();

    let Some(idx) = choose_port(&names, hint) else {
        warn!("no MIDI output ports found; running silent");
        info!("install a MIDI synthesiser (e.g. `timidity -iA` or `fluidsynth` on Linux)");
        return None;
    };

    info!(port = %names[idx], "opening MIDI port");
    match midi_out.connect(&ports[idx], "stone-bloom") {
        Ok(conn) => Some(Box::new(MidirOut { conn })),
        Err(e) => {
            warn!("failed to connect MIDI port: {}", e);
            None
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Voices — the thread's note schedule
// ════════════════════════════════════════════════════════════════════════════

#[derive(Clone, Copy, Debug, PartialEq)]
enum VoiceAction { On(u8), Off }

#[derive(Clone, Copy, Debug)]
struct Pending {
    /// Pairs an on with its off.
    voice:   u64,
    at:      Instant,
    channel: u8,
    note:    u8,
    action:  VoiceAction,
    cue:     Option<u64>,
}

/// Pending events plus the master volume applied to every velocity.
struct Voices {
    pending:    Vec<Pending>,
    master:     f32,
    active_cue: Option<u64>,
    next_voice: u64,
}

impl Voices {
    fn new(master: f32) -> Self {
        Voices { pending: Vec::new(), master: master.clamp(0.0, 1.0), active_cue: None, next_voice: 0 }
    }

    fn scaled(&self, velocity: u8) -> u8 {
        ((velocity as f32) * self.master).round().clamp(1.0, 127.0) as u8
    }

    fn schedule(&mut self, now: Instant, channel: u8, notes: &[ScheduledNote], cue: Option<u64>) {
        for n in notes {
            let voice = self.next_voice;
            self.next_voice += 1;
            self.pending.push(Pending {
                voice, at: now + n.onset, channel, note: n.pitch,
                action: VoiceAction::On(self.scaled(n.velocity)), cue,
            });
            self.pending.push(Pending {
                voice, at: now + n.release(), channel, note: n.pitch,
                action: VoiceAction::Off, cue,
            });
        }
    }

    fn chime(&mut self, now: Instant, note: u8, out: &mut dyn MidiOut) {
        self.schedule(now, CHIME_CHANNEL, &Melody::chime(note).notes, None);
        self.fire_due(now, out);
    }

    fn start_cue(&mut self, now: Instant, id: u64, volume: f32, out: &mut dyn MidiOut) {
        if let Some(prev) = self.active_cue {
            self.stop_cue(prev, out);
        }
        self.active_cue = Some(id);
        out.volume(CUE_CHANNEL, to_midi_level(volume));
        self.schedule(now, CUE_CHANNEL, &Melody::bloom().notes, Some(id));
        self.fire_due(now, out);
    }

    fn cue_volume(&mut self, id: u64, volume: f32, out: &mut dyn MidiOut) {
        if self.active_cue == Some(id) {
            out.volume(CUE_CHANNEL, to_midi_level(volume));
        }
    }

    /// Drop the cue's future note-ons and release everything it still holds.
    fn stop_cue(&mut self, id: u64, out: &mut dyn MidiOut) {
        let (mine, rest): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.cue == Some(id));
        self.pending = rest;
        release_held(&mine, out);
        if self.active_cue == Some(id) {
            self.active_cue = None;
        }
    }

    /// Send every event due at `now`, in time order (offs before ons on ties).
    fn fire_due(&mut self, now: Instant, out: &mut dyn MidiOut) {
        let (mut due, rest): (Vec<Pending>, Vec<Pending>) =
            self.pending.drain(..).partition(|p| p.at <= now);
        self.pending = rest;
        due.sort_by_key(|p| (p.at, matches!(p.action, VoiceAction::On(_))));
        for p in due {
            match p.action {
                VoiceAction::On(v) => out.note_on(p.channel, p.note, v),
                VoiceAction::Off   => out.note_off(p.channel, p.note),
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.pending.iter().map(|p| p.at).min()
    }

    /// Release every sounding note.
    fn silence(&mut self, out: &mut dyn MidiOut) {
        let all: Vec<Pending> = self.pending.drain(..).collect();
        release_held(&all, out);
        self.active_cue = None;
    }
}

/// Send the off of every voice in `events` whose on has already gone out.
fn release_held(events: &[Pending], out: &mut dyn MidiOut) {
    let started = |voice: u64| {
        !events.iter().any(|p| p.voice == voice && matches!(p.action, VoiceAction::On(_)))
    };
    for p in events.iter().filter(|p| p.action == VoiceAction::Off && started(p.voice)) {
        out.note_off(p.channel, p.note);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Player — the playback thread
// ════════════════════════════════════════════════════════════════════════════

/// Settings handed to the playback thread.
#[derive(Clone, Debug)]
pub struct PlayerConfig {
    pub instrument: u8,
    /// Master volume, scales every velocity.
    pub volume:     f32,
    /// Case-insensitive substring of the preferred port name.
    pub port_hint:  Option<String>,
}

/// Handle to the MIDI playback thread.  Implements [`AudioOut`].
pub struct Player {
    cmd_tx:    Sender<PlayerCommand>,
    thread:    Option<JoinHandle<()>>,
    available: bool,
    next_cue:  u64,
}

impl Player {
    /// Spawn the playback thread and wait briefly for it to open a port.
    pub fn spawn(cfg: PlayerConfig) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<PlayerCommand>();
        let (ready_tx, ready_rx) = mpsc::channel::<bool>();

        let spawned = thread::Builder::new()
            .name("midi-player".into())
            .spawn(move || {
                let Some(mut midi) = open_midi_output(cfg.port_hint.as_deref()) else {
                    let _ = ready_tx.send(false);
                    return;
                };
                let _ = ready_tx.send(true);
                player_thread(midi.as_mut(), cfg.instrument, cfg.volume, cmd_rx);
            });

        let thread = match spawned {
            Ok(h)  => Some(h),
            Err(e) => {
                warn!("could not start MIDI thread: {}", e);
                None
            }
        };
        let available = thread.is_some()
            && ready_rx.recv_timeout(OPEN_TIMEOUT).unwrap_or(false);

        Player { cmd_tx, thread, available, next_cue: 0 }
    }

    pub fn is_available(&self) -> bool { self.available }

    fn send(&self, cmd: PlayerCommand) -> Result<(), AudioError> {
        if !self.available {
            return Err(AudioError::Unavailable);
        }
        self.cmd_tx.send(cmd)
            .map_err(|_| AudioError::Rejected("player thread stopped".into()))
    }
}

impl AudioOut for Player {
    fn chime(&mut self, note: u8) -> Result<(), AudioError> {
        self.send(PlayerCommand::Chime(note))
    }

    fn play(&mut self, cue: Cue, volume: f32) -> Result<CueHandle, AudioError> {
        let id = self.next_cue;
        self.next_cue += 1;
        self.send(PlayerCommand::StartCue { id, volume })?;
        debug!(cue = cue.name(), id, "cue started");
        Ok(CueHandle::new(cue, Box::new(PlayerCue { id, tx: self.cmd_tx.clone() })))
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        let _ = self.cmd_tx.send(PlayerCommand::Quit);
        if let Some(h) = self.thread.take() {
            if h.join().is_err() {
                warn!("MIDI thread panicked");
            }
        }
    }
}

/// Cue control that forwards to the player thread.
struct PlayerCue {
    id: u64,
    tx: Sender<PlayerCommand>,
}

impl Playback for PlayerCue {
    fn set_volume(&mut self, volume: f32) {
        let _ = self.tx.send(PlayerCommand::CueVolume { id: self.id, volume });
    }
    fn stop(&mut self) {
        let _ = self.tx.send(PlayerCommand::StopCue(self.id));
    }
}

// ════════════════════════════════════════════════════════════════════════════
// player_thread — the actual loop
// ════════════════════════════════════════════════════════════════════════════

fn player_thread(
    midi:       &mut dyn MidiOut,
    instrument: u8,
    volume:     f32,
    cmd_rx:     Receiver<PlayerCommand>,
) {
    let mut voices = Voices::new(volume);
    midi.program_change(CHIME_CHANNEL, instrument);
    midi.program_change(CUE_CHANNEL, instrument);

    loop {
        let wait = voices.next_deadline()
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_WAIT);

        match cmd_rx.recv_timeout(wait) {
            Ok(cmd) => {
                if !apply_command(&mut voices, midi, cmd) {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => break,
        }
        voices.fire_due(Instant::now(), midi);
    }
    voices.silence(midi);
    debug!("MIDI thread exiting");
}

/// Returns false on `Quit`.
fn apply_command(voices: &mut Voices, midi: &mut dyn MidiOut, cmd: PlayerCommand) -> bool {
    let now = Instant::now();
    match cmd {
        PlayerCommand::Chime(note)               => voices.chime(now, note, midi),
        PlayerCommand::StartCue { id, volume }   => voices.start_cue(now, id, volume, midi),
        PlayerCommand::CueVolume { id, volume }  => voices.cue_volume(id, volume, midi),
        PlayerCommand::StopCue(id)               => voices.stop_cue(id, midi),
        PlayerCommand::Quit => return false,
    }
    true
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
