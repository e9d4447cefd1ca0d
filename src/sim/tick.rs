//! Fixed timestep simulation tick
//!
//! One tick is a simultaneous explicit update:
//! 1. net force on every orb from the positions at the start of the tick
//! 2. `vel += force * dt` for every orb (mass is not applied)
//! 3. `pos += vel * dt` for every non-fixed orb
//! 4. any player orb inside any goal sets the win flag

use super::force::accumulate_forces;
use super::state::Simulation;

/// Advance the simulation by one fixed timestep
pub fn tick(state: &mut Simulation) {
    let params = state.params;
    let dt = params.dt();

    accumulate_forces(
        &state.orbs,
        params.coulomb_constant,
        params.singular,
        &mut state.forces,
    );

    for (orb, force) in state.orbs.iter_mut().zip(state.forces.iter()) {
        orb.vel += *force * dt;
    }

    for orb in state.orbs.iter_mut().filter(|o| !o.is_fixed) {
        orb.pos += orb.vel * dt;
    }

    state.time_ticks += 1;

    if !state.won {
        let reached = state
            .orbs
            .iter()
            .filter(|o| o.is_player)
            .any(|o| state.goals.iter().any(|g| g.contains(o.pos)));
        if reached {
            state.won = true;
            state.won_at_tick = Some(state.time_ticks);
            log::info!("Goal reached on tick {}", state.time_ticks);
        }
    }
}
