//! A played level
//!
//! Owns the scene (so the level can be restarted), the running simulation and
//! the playback state. Input handling and drawing stay with the caller; this
//! only decides what each input means in each phase.

use serde::{Deserialize, Serialize};

use crate::driver::{FrameControls, FrameReport, PlaybackSpeed, StepDriver};
use crate::scene::{SceneDescription, SceneError};
use crate::settings::Settings;
use crate::sim::{PhysicsParams, Simulation};

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// Simulation advances every frame
    Playing,
    /// Nothing changes until unpaused
    Paused,
    /// A player orb reached a goal; the simulation is frozen
    Success,
}

/// One loaded level with its playback state
#[derive(Debug, Clone)]
pub struct Session {
    scene: SceneDescription,
    params: PhysicsParams,
    sim: Simulation,
    driver: StepDriver,
    phase: SessionPhase,
    frames: u64,
}

impl Session {
    /// Load a level. Fails without side effects on an invalid scene.
    pub fn new(scene: SceneDescription, settings: &Settings) -> Result<Self, SceneError> {
        let params = settings.physics();
        let sim = Simulation::load(&scene, params)?;
        Ok(Self {
            scene,
            params,
            sim,
            driver: StepDriver::new(settings.ticks_per_frame),
            phase: SessionPhase::Playing,
            frames: 0,
        })
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn simulation(&self) -> &Simulation {
        &self.sim
    }

    /// Rendered frames since the last (re)start
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Run one rendered frame at the given speed
    pub fn frame(&mut self, speed: PlaybackSpeed) -> FrameReport {
        self.frames += 1;
        let controls = FrameControls {
            paused: self.phase != SessionPhase::Playing,
            speed,
        };
        let report = self.driver.advance(&mut self.sim, controls);
        if report.won && self.phase == SessionPhase::Playing {
            self.phase = SessionPhase::Success;
            log::info!(
                "Level complete after {} ticks ({:.2}s simulated)",
                self.sim.tick_count(),
                self.sim.elapsed()
            );
        }
        report
    }

    /// Flip player polarity. Ignored unless playing.
    pub fn flip_polarity(&mut self) -> bool {
        if self.phase == SessionPhase::Playing {
            self.sim.flip_player_polarity();
            true
        } else {
            false
        }
    }

    /// Toggle between playing and paused. Has no effect after success.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            SessionPhase::Playing => {
                log::info!("Paused at tick {}", self.sim.tick_count());
                SessionPhase::Paused
            }
            SessionPhase::Paused => {
                log::info!("Resumed at tick {}", self.sim.tick_count());
                SessionPhase::Playing
            }
            SessionPhase::Success => SessionPhase::Success,
        };
    }

    /// Reload the level from its scene and start playing again
    pub fn restart(&mut self) -> Result<(), SceneError> {
        self.sim = Simulation::load(&self.scene, self.params)?;
        self.phase = SessionPhase::Playing;
        self.frames = 0;
        log::info!("Level restarted");
        Ok(())
    }
}
