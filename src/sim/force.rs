//! Pairwise electrostatic forces between orbs
//!
//! Inverse-square law written in vector form:
//! `F_a = k * q_a * q_b / |d|^3 * d` with `d = p_a - p_b`, so like charges
//! push apart and opposite charges pull together.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::Orb;

/// What to do when two orbs sit at exactly the same position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SingularPolicy {
    /// Coincident pairs contribute nothing
    #[default]
    Skip,
    /// Distances below `min_distance` are raised to it. A pair at exactly
    /// zero separation has no direction and still contributes nothing.
    Clamp { min_distance: f32 },
}

/// Force that `b` exerts on `a`
///
/// Swapping the arguments returns the exact negation: the charge product is
/// formed before the constant is applied and the distance only depends on
/// `|p_a - p_b|`.
#[inline]
pub fn pairwise_force(
    pos_a: Vec2,
    charge_a: f32,
    pos_b: Vec2,
    charge_b: f32,
    k: f32,
    policy: SingularPolicy,
) -> Vec2 {
    let offset = pos_a - pos_b;
    if offset == Vec2::ZERO {
        log::trace!("Coincident orbs at {:?}, pair skipped", pos_a);
        return Vec2::ZERO;
    }

    let mut dist = offset.length();
    if let SingularPolicy::Clamp { min_distance } = policy {
        dist = dist.max(min_distance);
    }
    let dist3 = dist * dist * dist;
    if dist3 == 0.0 {
        // Tiny offsets can still underflow to zero here
        return Vec2::ZERO;
    }

    let coef = k * (charge_a * charge_b) / dist3;
    let force = offset * coef;
    if !force.is_finite() {
        // Near-coincident pair: the term overflowed, treat it as coincident
        log::trace!("Singular force between {:?} and {:?}, pair skipped", pos_a, pos_b);
        return Vec2::ZERO;
    }
    force
}

/// Accumulate the net force on every orb into `out`
///
/// Reads positions only, so the whole pass sees the same snapshot. Fixed orbs
/// are included on both sides. `out` must have one slot per orb.
pub fn accumulate_forces(orbs: &[Orb], k: f32, policy: SingularPolicy, out: &mut [Vec2]) {
    debug_assert_eq!(orbs.len(), out.len(), "force buffer out of sync with orbs");

    for (i, a) in orbs.iter().enumerate() {
        let mut net = Vec2::ZERO;
        for (j, b) in orbs.iter().enumerate() {
            if i == j {
                continue;
            }
            net += pairwise_force(a.pos, a.charge, b.pos, b.charge, k, policy);
        }
        out[i] = net;
    }
}
