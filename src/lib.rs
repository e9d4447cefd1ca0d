//! Polarity - A charged-orb physics puzzle
//!
//! Core modules:
//! - `sim`: Deterministic simulation (forces, integration, win detection)
//! - `scene`: Level data as produced by the level converter
//! - `settings`: Data-driven physics and playback tuning
//! - `driver`: Ticks-per-frame playback control (pause, fast, slow)
//! - `session`: One loaded level and its play/pause/success flow

pub mod driver;
pub mod scene;
pub mod session;
pub mod settings;
pub mod sim;

pub use driver::{FrameControls, FrameReport, PlaybackSpeed, StepDriver};
pub use scene::{SceneDescription, SceneError};
pub use session::{Session, SessionPhase};
pub use settings::Settings;
pub use sim::{Goal, Orb, OrbId, OrbView, PhysicsParams, SingularPolicy, Simulation};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation tick rate (ticks per simulated second)
    pub const TICK_RATE: f32 = 60.0;
    /// Render frame rate the driver is paced for
    pub const FRAME_RATE: u32 = 60;
    /// Simulation ticks run per rendered frame at normal speed
    pub const TICKS_PER_FRAME: u32 = 8;
    /// Multiplier/divisor applied to ticks per frame in fast/slow playback
    pub const PLAYBACK_FACTOR: u32 = 4;

    /// Coulomb-like force constant
    pub const COULOMB_CONSTANT: f32 = 10_000.0;
    /// Softer tuning used by gentler level sets
    pub const COULOMB_CONSTANT_SOFT: f32 = 4_000.0;
}
