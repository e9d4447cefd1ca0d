//! Simulation state and entity types
//!
//! A `Simulation` owns the orbs and goals of one loaded level. Orbs keep the
//! scene order for their whole life; nothing is added or removed mid-level.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::force::SingularPolicy;
use super::rect::Rect;
use super::tick::tick;
use crate::consts::*;
use crate::scene::{SceneDescription, SceneError};

/// Stable identity of an orb within a loaded level
pub type OrbId = u32;

/// A charged particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Orb {
    pub id: OrbId,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Signed charge; the sign decides attraction or repulsion
    pub charge: f32,
    /// Only affects how big the orb is drawn, never its acceleration
    pub mass: f32,
    /// Fixed orbs exert and feel force but never move
    pub is_fixed: bool,
    /// Player orbs have their charge flipped by player input
    pub is_player: bool,
}

impl Orb {
    pub fn new(
        id: OrbId,
        pos: Vec2,
        charge: f32,
        mass: f32,
        is_fixed: bool,
        is_player: bool,
        vel: Vec2,
    ) -> Self {
        Self {
            id,
            pos,
            vel,
            charge,
            mass,
            is_fixed,
            is_player,
        }
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.charge)
    }

    /// Read-only copy for rendering
    pub fn view(&self) -> OrbView {
        OrbView {
            id: self.id,
            pos: self.pos,
            vel: self.vel,
            charge: self.charge,
            mass: self.mass,
            is_fixed: self.is_fixed,
            is_player: self.is_player,
        }
    }
}

/// Sign of an orb's charge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
    Neutral,
}

impl Polarity {
    pub fn of(charge: f32) -> Self {
        if charge > 0.0 {
            Polarity::Positive
        } else if charge < 0.0 {
            Polarity::Negative
        } else {
            Polarity::Neutral
        }
    }
}

/// Snapshot of one orb handed to the renderer each frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbView {
    pub id: OrbId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub charge: f32,
    pub mass: f32,
    pub is_fixed: bool,
    pub is_player: bool,
}

impl OrbView {
    pub fn polarity(&self) -> Polarity {
        Polarity::of(self.charge)
    }
}

/// A static goal region
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub rect: Rect,
}

impl Goal {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains_point(point)
    }
}

/// Physics tuning for one loaded level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsParams {
    /// Ticks per simulated second; one tick advances time by `1 / tick_rate`
    pub tick_rate: f32,
    pub coulomb_constant: f32,
    pub singular: SingularPolicy,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self {
            tick_rate: TICK_RATE,
            coulomb_constant: COULOMB_CONSTANT,
            singular: SingularPolicy::Skip,
        }
    }
}

impl PhysicsParams {
    pub fn with_tick_rate(tick_rate: f32) -> Self {
        Self {
            tick_rate,
            ..Default::default()
        }
    }

    /// Fixed tick duration in seconds
    #[inline]
    pub fn dt(&self) -> f32 {
        self.tick_rate.recip()
    }

    pub fn validate(&self) -> Result<(), SceneError> {
        if !(self.tick_rate.is_finite() && self.tick_rate > 0.0) {
            return Err(SceneError::InvalidTickRate(self.tick_rate));
        }
        if !self.coulomb_constant.is_finite() {
            return Err(SceneError::InvalidParameter {
                name: "coulomb_constant",
                value: self.coulomb_constant,
            });
        }
        if let SingularPolicy::Clamp { min_distance } = self.singular {
            if !(min_distance.is_finite() && min_distance >= 0.0) {
                return Err(SceneError::InvalidParameter {
                    name: "min_distance",
                    value: min_distance,
                });
            }
        }
        Ok(())
    }
}

/// One loaded level being simulated
#[derive(Debug, Clone)]
pub struct Simulation {
    pub(super) params: PhysicsParams,
    pub(super) orbs: Vec<Orb>,
    pub(super) goals: Vec<Goal>,
    /// Per-tick net force scratch, one slot per orb
    pub(super) forces: Vec<Vec2>,
    pub(super) won: bool,
    pub(super) won_at_tick: Option<u64>,
    pub(super) time_ticks: u64,
}

impl Simulation {
    /// Build a simulation from a scene. Nothing is constructed unless the
    /// whole scene and the parameters are valid.
    pub fn load(scene: &SceneDescription, params: PhysicsParams) -> Result<Self, SceneError> {
        params.validate()?;
        let records = scene.resolve_orbs()?;
        let rects = scene.goal_rects()?;

        let orbs: Vec<Orb> = records
            .iter()
            .zip(1..)
            .map(|(r, id)| Orb::new(id, r.pos, r.charge, r.mass, r.is_fixed, r.is_player, r.velocity))
            .collect();
        let goals: Vec<Goal> = rects.into_iter().map(Goal::new).collect();

        log::info!(
            "Loaded scene: {} orbs ({} player), {} goals, tick_rate={}, k={}",
            orbs.len(),
            orbs.iter().filter(|o| o.is_player).count(),
            goals.len(),
            params.tick_rate,
            params.coulomb_constant
        );

        Ok(Self {
            forces: vec![Vec2::ZERO; orbs.len()],
            params,
            orbs,
            goals,
            won: false,
            won_at_tick: None,
            time_ticks: 0,
        })
    }

    /// Load with the default force constant and singular policy
    pub fn with_tick_rate(scene: &SceneDescription, tick_rate: f32) -> Result<Self, SceneError> {
        Self::load(scene, PhysicsParams::with_tick_rate(tick_rate))
    }

    /// Advance by one fixed tick. Keeps evolving after a win.
    pub fn step(&mut self) {
        tick(self);
    }

    /// Invert the charge of every player orb
    pub fn flip_player_polarity(&mut self) {
        for orb in self.orbs.iter_mut().filter(|o| o.is_player) {
            orb.charge = -orb.charge;
        }
        log::debug!("Player polarity flipped at tick {}", self.time_ticks);
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    /// Tick on which a player orb first reached a goal
    pub fn won_at_tick(&self) -> Option<u64> {
        self.won_at_tick
    }

    pub fn orbs(&self) -> &[Orb] {
        &self.orbs
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    /// Copy of every orb's visible state, in scene order
    pub fn snapshot(&self) -> Vec<OrbView> {
        self.orbs.iter().map(Orb::view).collect()
    }

    pub fn params(&self) -> &PhysicsParams {
        &self.params
    }

    /// Ticks executed since load
    pub fn tick_count(&self) -> u64 {
        self.time_ticks
    }

    /// Simulated seconds since load
    pub fn elapsed(&self) -> f64 {
        self.time_ticks as f64 / self.params.tick_rate as f64
    }

    pub fn player_count(&self) -> usize {
        self.orbs.iter().filter(|o| o.is_player).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::OrbRecord;

    fn scene() -> SceneDescription {
        SceneDescription::new()
            .with_orb(OrbRecord::new(Vec2::new(0.0, 0.0), 1.0, 2.0, true, false))
            .with_orb(OrbRecord::new(Vec2::new(50.0, 0.0), -1.0, 1.0, false, true))
            .with_orb(OrbRecord::new(Vec2::new(0.0, 50.0), 0.5, 0.5, false, true))
            .with_goal(Rect::new(100.0, -10.0, 20.0, 20.0))
    }

    #[test]
    fn test_load_assigns_ids_in_scene_order() {
        let sim = Simulation::with_tick_rate(&scene(), 60.0).unwrap();
        let ids: Vec<OrbId> = sim.orbs().iter().map(|o| o.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(sim.goals().len(), 1);
        assert_eq!(sim.player_count(), 2);
        assert!(!sim.is_won());
        assert_eq!(sim.tick_count(), 0);
    }

    #[test]
    fn test_load_rejects_bad_tick_rate() {
        for rate in [0.0, -60.0, f32::NAN, f32::INFINITY] {
            let err = Simulation::with_tick_rate(&scene(), rate).unwrap_err();
            assert!(matches!(err, SceneError::InvalidTickRate(_)));
        }
    }

    #[test]
    fn test_load_rejects_bad_clamp_distance() {
        let params = PhysicsParams {
            singular: SingularPolicy::Clamp { min_distance: -1.0 },
            ..Default::default()
        };
        assert!(Simulation::load(&scene(), params).is_err());
    }

    #[test]
    fn test_flip_only_touches_players() {
        let mut sim = Simulation::with_tick_rate(&scene(), 60.0).unwrap();
        let before: Vec<f32> = sim.orbs().iter().map(|o| o.charge).collect();

        sim.flip_player_polarity();
        let after: Vec<f32> = sim.orbs().iter().map(|o| o.charge).collect();
        assert_eq!(after, vec![before[0], -before[1], -before[2]]);

        sim.flip_player_polarity();
        let restored: Vec<f32> = sim.orbs().iter().map(|o| o.charge).collect();
        assert_eq!(restored, before);
    }

    #[test]
    fn test_snapshot_matches_orbs() {
        let sim = Simulation::with_tick_rate(&scene(), 60.0).unwrap();
        let views = sim.snapshot();
        assert_eq!(views.len(), 3);
        assert_eq!(views[1].pos, Vec2::new(50.0, 0.0));
        assert_eq!(views[1].polarity(), Polarity::Negative);
        assert_eq!(views[0].mass, 2.0);
        assert!(views[2].is_player);
    }

    #[test]
    fn test_elapsed_follows_tick_rate() {
        let mut sim = Simulation::with_tick_rate(&scene(), 120.0).unwrap();
        for _ in 0..60 {
            sim.step();
        }
        assert_eq!(sim.tick_count(), 60);
        assert!((sim.elapsed() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_polarity_of() {
        assert_eq!(Polarity::of(2.0), Polarity::Positive);
        assert_eq!(Polarity::of(-0.5), Polarity::Negative);
        assert_eq!(Polarity::of(0.0), Polarity::Neutral);
    }
}
