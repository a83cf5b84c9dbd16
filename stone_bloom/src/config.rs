//! Configuration (`config.toml` in the platform config directory).
//!
//! Every field has a default, so a partial or missing file is fine.  Only an
//! explicitly requested file that cannot be read or parsed is an error.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use bloom_chime::GeneralMidi;
use sky_bloom::constants::NURTURE_CHIME_PROBABILITY;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Read {
        path:   PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("could not parse {path}: {source}")]
    Parse {
        path:   PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ════════════════════════════════════════════════════════════════════════════
// Config
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    /// Fixed RNG seed for chimes and particles.
    #[serde(default)]
    pub seed:    Option<u64>,
    #[serde(default)]
    pub window:  WindowConfig,
    #[serde(default)]
    pub audio:   AudioConfig,
    #[serde(default)]
    pub nurture: NurtureConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Width in pixels (default: 960)
    #[serde(default = "default_width")]
    pub width:  usize,
    /// Height in pixels (default: 640)
    #[serde(default = "default_height")]
    pub height: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AudioConfig {
    /// Play through MIDI at all (default: true)
    #[serde(default = "default_true")]
    pub enabled:    bool,
    /// Master volume, 0.0–1.0 (default: 0.8)
    #[serde(default = "default_volume")]
    pub volume:     f32,
    /// General MIDI instrument name or program number (default: "celesta")
    #[serde(default = "default_instrument")]
    pub instrument: String,
    /// Substring of the preferred MIDI port name
    #[serde(default)]
    pub port_hint:  Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NurtureConfig {
    /// Chance a single stroke rings a chime (default: 0.03)
    #[serde(default = "default_chime_probability")]
    pub chime_probability: f64,
}

fn default_width() -> usize { 960 }
fn default_height() -> usize { 640 }
fn default_true() -> bool { true }
fn default_volume() -> f32 { 0.8 }
fn default_instrument() -> String { "celesta".to_string() }
fn default_chime_probability() -> f64 { NURTURE_CHIME_PROBABILITY }

impl Default for WindowConfig {
    fn default() -> Self {
        Self { width: default_width(), height: default_height() }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            enabled:    default_true(),
            volume:     default_volume(),
            instrument: default_instrument(),
            port_hint:  None,
        }
    }
}

impl Default for NurtureConfig {
    fn default() -> Self {
        Self { chime_probability: default_chime_probability() }
    }
}

impl AudioConfig {
    /// MIDI program for `instrument`: a known name, or a raw 0–127 number.
    /// Anything else falls back to Celesta.
    pub fn program(&self) -> u8 {
        if let Some(gm) = GeneralMidi::from_name(&self.instrument) {
            return gm.program();
        }
        match self.instrument.trim().parse::<u8>() {
            Ok(p) if p < 128 => p,
            _ => {
                warn!(instrument = %self.instrument, "unknown instrument, using Celesta");
                GeneralMidi::Celesta.program()
            }
        }
    }
}

impl Config {
    /// Clamp values into usable ranges.
    pub fn sanitized(mut self) -> Self {
        self.window.width = self.window.width.clamp(320, 3840);
        self.window.height = self.window.height.clamp(240, 2160);
        self.audio.volume = if self.audio.volume.is_finite() {
            self.audio.volume.clamp(0.0, 1.0)
        } else {
            default_volume()
        };
        self.nurture.chime_probability = if self.nurture.chime_probability.is_finite() {
            self.nurture.chime_probability.clamp(0.0, 1.0)
        } else {
            default_chime_probability()
        };
        self
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Loading
// ════════════════════════════════════════════════════════════════════════════

/// Platform config directory.
///
/// On Linux: `~/.config/stone-bloom`
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("org", "", "stone-bloom")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn default_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join("config.toml"))
}

/// Read and parse one file.
pub fn load_from(path: &Path) -> Result<Config, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    let cfg: Config = toml::from_str(&text)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
    Ok(cfg.sanitized())
}

/// Load `explicit` if given (errors propagate); otherwise the default file,
/// falling back to defaults if it is missing or broken.
pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return load_from(path);
    }
    let Some(path) = default_path() else {
        return Ok(Config::default());
    };
    if !path.exists() {
        debug!(path = %path.display(), "no config file, using defaults");
        return Ok(Config::default());
    }
    match load_from(&path) {
        Ok(cfg) => Ok(cfg),
        Err(e) => {
            warn!("{}; using defaults", e);
            Ok(Config::default())
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(contents: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        f.write_all(contents.as_bytes()).unwrap();
        f
    }

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.window.width, 960);
        assert_eq!(c.window.height, 640);
        assert!(c.audio.enabled);
        assert_eq!(c.audio.volume, 0.8);
        assert_eq!(c.audio.program(), 8);
        assert_eq!(c.nurture.chime_probability, 0.03);
        assert_eq!(c.seed, None);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let f = write_tmp("");
        assert_eq!(load_from(f.path()).unwrap(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let f = write_tmp("seed = 42\n[audio]\ninstrument = \"music box\"\n");
        let c = load_from(f.path()).unwrap();
        assert_eq!(c.seed, Some(42));
        assert_eq!(c.audio.program(), 10);
        assert_eq!(c.audio.volume, 0.8);
        assert_eq!(c.window, WindowConfig::default());
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let f = write_tmp("[audio]\nvolume = 3.0\n[nurture]\nchime_probability = -1.0\n[window]\nwidth = 10\n");
        let c = load_from(f.path()).unwrap();
        assert_eq!(c.audio.volume, 1.0);
        assert_eq!(c.nurture.chime_probability, 0.0);
        assert_eq!(c.window.width, 320);
    }

    #[test]
    fn numeric_instrument() {
        let a = AudioConfig { instrument: "112".into(), ..AudioConfig::default() };
        assert_eq!(a.program(), 112);
        let a = AudioConfig { instrument: "nonsense".into(), ..AudioConfig::default() };
        assert_eq!(a.program(), 8);
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn explicit_broken_file_is_an_error() {
        let f = write_tmp("[window\nwidth = ");
        assert!(matches!(load(Some(f.path())), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn round_trips_through_toml() {
        let mut c = Config::default();
        c.seed = Some(7);
        c.audio.port_hint = Some("fluid".into());
        let text = toml::to_string_pretty(&c).unwrap();
        assert_eq!(toml::from_str::<Config>(&text).unwrap(), c);
    }
}
