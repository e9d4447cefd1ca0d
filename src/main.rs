//! Polarity headless runner
//!
//! Loads a converted level, plays it for a number of frames with optional
//! scripted polarity flips, and reports the outcome. Rendering and keyboard
//! input live in the front-end; this drives the same session logic.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use polarity::driver::PlaybackSpeed;
use polarity::settings::ForceTuning;
use polarity::{SceneDescription, Session, SessionPhase, Settings};

#[derive(Parser, Debug)]
#[command(name = "polarity", about = "Play a Polarity level headless")]
struct Args {
    /// Level scene file (JSON)
    scene: PathBuf,

    /// Settings file (JSON); defaults apply when omitted
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Number of rendered frames to play
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Playback speed
    #[arg(long, value_enum, default_value_t = PlaybackSpeed::Normal)]
    speed: PlaybackSpeed,

    /// Force tuning, overrides the settings file
    #[arg(long, value_enum)]
    tuning: Option<ForceTuning>,

    /// Frame numbers on which to flip player polarity
    #[arg(long = "flip-at", value_delimiter = ',')]
    flip_at: Vec<u64>,

    /// Print the final orb states as JSON
    #[arg(long)]
    dump: bool,

    /// Validate the scene and settings, then exit without playing
    #[arg(long)]
    check: bool,

    /// Write the effective settings to this file
    #[arg(long = "save-settings")]
    save_settings: Option<PathBuf>,
}

fn load_scene(path: &Path) -> Result<SceneDescription> {
    let file = File::open(path).with_context(|| format!("opening scene {}", path.display()))?;
    let scene = SceneDescription::from_reader(BufReader::new(file))
        .with_context(|| format!("reading scene {}", path.display()))?;
    Ok(scene)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let speed = args.speed;
    let mut settings = match &args.settings {
        Some(path) => Settings::load(path),
        None => Settings::default(),
    };
    if let Some(tuning) = args.tuning {
        log::info!("Using {} force tuning", tuning.as_str());
        settings.tuning = tuning;
    }
    if let Some(path) = &args.save_settings {
        settings
            .save(path)
            .with_context(|| format!("saving settings {}", path.display()))?;
    }

    let scene = load_scene(&args.scene)?;
    if args.check {
        scene.validate().context("checking scene")?;
        settings.physics().validate().context("checking settings")?;
        println!(
            "{}: {} orbs, {} goals, ok",
            args.scene.display(),
            scene.orbs.len() + scene.marks.len(),
            scene.goals.len()
        );
        return Ok(());
    }

    let mut session = Session::new(scene, &settings).context("loading level")?;

    log::info!(
        "Polarity starting: {} frames ({:.1}s at {} fps), {:?} speed, {} ticks/frame",
        args.frames,
        args.frames as f32 / settings.frame_rate.max(1) as f32,
        settings.frame_rate,
        speed,
        speed.ticks_per_frame(settings.ticks_per_frame)
    );

    for frame in 0..args.frames {
        if args.flip_at.contains(&frame) && session.flip_polarity() {
            log::info!("Flipped polarity on frame {}", frame);
        }
        session.frame(speed);
        if session.phase() == SessionPhase::Success {
            break;
        }
    }

    let sim = session.simulation();
    match session.phase() {
        SessionPhase::Success => println!(
            "Success! Goal reached on tick {} after {} frames ({:.2}s simulated)",
            sim.won_at_tick().unwrap_or_default(),
            session.frames(),
            sim.elapsed()
        ),
        _ => println!(
            "No goal reached after {} frames ({:.2}s simulated)",
            session.frames(),
            sim.elapsed()
        ),
    }

    if args.dump {
        println!("{}", serde_json::to_string_pretty(&sim.snapshot())?);
    }

    Ok(())
}
