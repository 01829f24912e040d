//! notekit CLI: play a built-in tune through the default audio device or
//! render it to a WAV file.
//!
//! Usage:
//!   nk-cli --tune ode-to-joy
//!   nk-cli --tune fanfare --wav fanfare.wav
//!   nk-cli --list

use std::io::Write;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::LevelFilter;
use nk_ir::tunes;
use nk_master::{arrangement_duration_ms, Controller, StderrLogger};

/// Polyphonic PWM buzzer sequencer, simulated on the desktop
#[derive(Parser)]
#[command(name = "nk-cli", version, long_about = None)]
struct Cli {
    /// Built-in tune to play
    #[arg(short, long, default_value = "ode-to-joy")]
    tune: String,

    /// List built-in tunes and exit
    #[arg(long)]
    list: bool,

    /// Override the tune's tempo
    #[arg(long)]
    bpm: Option<u16>,

    /// Render to this WAV file instead of playing
    #[arg(long, value_name = "FILE")]
    wav: Option<PathBuf>,

    /// Render length cap, for looping tunes
    #[arg(long, default_value_t = 30)]
    seconds: u32,

    /// WAV sample rate
    #[arg(long, default_value_t = 44_100)]
    sample_rate: u32,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    StderrLogger::init(level).map_err(|e| anyhow!("logger: {}", e))?;

    if cli.list {
        for name in tunes::NAMES {
            println!("{}", name);
        }
        return Ok(());
    }

    let arrangement = tunes::by_name(&cli.tune).ok_or_else(|| {
        anyhow!("unknown tune '{}' (try one of: {})", cli.tune, tunes::NAMES.join(", "))
    })?;

    let mut ctrl = Controller::new(arrangement);
    if let Some(bpm) = cli.bpm {
        ctrl.set_tempo(bpm);
    }

    let arr = ctrl.arrangement();
    println!("Title:  {}", arr.title);
    println!("Tempo:  {} BPM", arr.bpm);
    println!("Parts:  {}", arr.parts.len());
    for part in &arr.parts {
        let looped = if part.looped { " (looped)" } else { "" };
        println!("  {:<8} {} notes{}", part.name, part.len(), looped);
    }
    match arrangement_duration_ms(arr) {
        Some(ms) => println!("Length: {}.{:03} s", ms / 1000, ms % 1000),
        None => println!("Length: endless"),
    }
    println!();

    match cli.wav {
        Some(path) => render_to_wav(&ctrl, &path, cli.sample_rate, cli.seconds),
        None => {
            play_audio(&mut ctrl);
            Ok(())
        }
    }
}

fn play_audio(ctrl: &mut Controller) {
    ctrl.play();
    println!("Playing... (Ctrl-C to stop)");

    while ctrl.is_playing() {
        if let Some(ms) = ctrl.position_ms() {
            print!("\r{:>4}.{:03} s", ms / 1000, ms % 1000);
            let _ = std::io::stdout().flush();
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }

    println!("\rDone.          ");
}

fn render_to_wav(ctrl: &Controller, path: &PathBuf, sample_rate: u32, seconds: u32) -> Result<()> {
    println!("Rendering to {} at {} Hz...", path.display(), sample_rate);

    let wav = ctrl.render_to_wav(sample_rate, seconds);
    std::fs::write(path, &wav).with_context(|| format!("failed to write {}", path.display()))?;

    println!("Wrote {} bytes", wav.len());
    Ok(())
}
