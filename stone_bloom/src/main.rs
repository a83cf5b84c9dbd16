//! stone_bloom — interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use bloom_chime::Melody;
use stone_bloom::app::{run, AppConfig};
use stone_bloom::config;

#[derive(Parser, Debug)]
#[command(name = "stone_bloom", version, about = "Wishing a lovely life")]
struct Args {
    /// Config file (default: platform config dir / config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Run without MIDI output
    #[arg(long)]
    no_audio: bool,

    /// Fixed RNG seed for chimes and scenery
    #[arg(long)]
    seed: Option<u64>,

    /// Write the bloom melody as a Standard MIDI File and exit
    #[arg(long, value_name = "PATH")]
    export_melody: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut cfg = config::load(args.config.as_deref())?;
    if args.no_audio {
        cfg.audio.enabled = false;
    }
    if args.seed.is_some() {
        cfg.seed = args.seed;
    }

    if let Some(path) = args.export_melody {
        let track = Melody::bloom().to_track(120, 480, cfg.audio.program(), 0);
        track.write_file(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        info!(path = %path.display(), "bloom melody written");
        return Ok(());
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                   Wishing a lovely life                      ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    println!("  Swipe up or down anywhere to move the sky.");
    println!("  Stroke the stone to help it grow.  Escape quits.");
    println!();

    run(AppConfig::from_config(&cfg))
}
