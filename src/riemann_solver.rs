//! Approximate Riemann solvers for the star state at a moving cell face.
//!
//! Solvers are injected into the time stepper as strategy objects; the
//! variant is resolved once at configuration time, never re-dispatched by
//! name per call.

use glam::DVec2;

use crate::{
    errors::ConfigError,
    gas_law::GasLaw,
    physical_quantities::{Primitive, State},
};

mod hllc;
mod pvrs;

pub use hllc::HLLCRiemannSolver;
pub use pvrs::PVRiemannSolver;

/// Sign-preserving floor applied to near-degenerate denominators.
pub(crate) const DENOM_FLOOR: f64 = 1e-14;

pub(crate) fn floor_denominator(denom: f64) -> f64 {
    if denom.abs() < DENOM_FLOOR {
        DENOM_FLOOR.copysign(denom)
    } else {
        denom
    }
}

pub(crate) fn sound_speed(state: &State<Primitive>, eos: &GasLaw) -> f64 {
    let internal_energy =
        eos.gas_internal_energy_from_pressure(state.pressure(), state.density());
    eos.sound_speed(state.density(), internal_energy)
}

/// The resolved state at a face: normal velocity and pressure of the contact.
#[derive(Default, Debug, Clone, Copy)]
pub struct RiemannStarValues {
    pub u_star: f64,
    pub p_star: f64,
}

pub trait RiemannStarSolver: Sync + Send {
    /// Star normal velocity and pressure for the Riemann problem between the
    /// two given states, with velocities projected on the face unit normal
    /// `n_unit` (pointing from `left` to `right`).
    fn solve_for_star_values(
        &self,
        left: &State<Primitive>,
        right: &State<Primitive>,
        n_unit: DVec2,
        eos: &GasLaw,
    ) -> RiemannStarValues;

    /// Star state against a wall moving at `u_wall`, both velocities taken
    /// along the outward normal of the domain boundary.
    ///
    /// The contact rides on the wall, and the pressure follows the one-sided
    /// acoustic relation of the linearised solver.
    fn solve_for_wall(
        &self,
        state: &State<Primitive>,
        u_n: f64,
        u_wall: f64,
        eos: &GasLaw,
    ) -> RiemannStarValues {
        let a = sound_speed(state, eos);
        let p_star = state.pressure() + state.density() * a * (u_n - u_wall);
        RiemannStarValues {
            u_star: u_wall,
            p_star: p_star.max(eos.p_floor()),
        }
    }
}

pub fn get_solver(kind: &str) -> Result<Box<dyn RiemannStarSolver>, ConfigError> {
    match kind {
        "PVRS" => Ok(Box::new(PVRiemannSolver)),
        "HLLC" => Ok(Box::new(HLLCRiemannSolver)),
        _ => Err(ConfigError::UnknownRiemannSolver(kind.to_string())),
    }
}
