//! Deterministic simulation module
//!
//! All physics lives here. This module must be pure and deterministic:
//! - Fixed timestep only (dt comes from the tick rate, never the wall clock)
//! - Stable iteration order (scene order, by orb ID)
//! - No rendering or platform dependencies

pub mod force;
pub mod rect;
pub mod state;
pub mod tick;

pub use force::{SingularPolicy, accumulate_forces, pairwise_force};
pub use rect::Rect;
pub use state::{Goal, Orb, OrbId, OrbView, PhysicsParams, Polarity, Simulation};
pub use tick::tick;
