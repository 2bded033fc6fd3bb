use glam::DVec2;

use crate::{
    gas_law::GasLaw,
    physical_quantities::{Conserved, Primitive, State},
};

use super::{floor_denominator, sound_speed, RiemannStarSolver, RiemannStarValues};

/// HLLC Riemann solver with an ALE correction for faces that move with the
/// resolved contact wave.
///
/// See Section 10.4-10.6 in Toro (2009) for the jump relations.
pub struct HLLCRiemannSolver;

struct WaveSpeeds {
    s_l: f64,
    s_m: f64,
    s_r: f64,
}

impl HLLCRiemannSolver {
    /// Outer wave speed estimates and the contact speed from the standard
    /// HLLC jump relations.
    fn wave_speeds(
        left: &State<Primitive>,
        right: &State<Primitive>,
        v_l: f64,
        v_r: f64,
        a_l: f64,
        a_r: f64,
    ) -> WaveSpeeds {
        let s_l = (v_l - a_l).min(v_r - a_r);
        let s_r = (v_l + a_l).max(v_r + a_r);
        let denom = floor_denominator(
            left.density() * (s_l - v_l) - right.density() * (s_r - v_r),
        );
        let s_m = (right.pressure() - left.pressure() + left.density() * v_l * (s_l - v_l)
            - right.density() * v_r * (s_r - v_r))
            / denom;
        WaveSpeeds { s_l, s_m, s_r }
    }

    /// Conserved state (per unit area) and physical flux of one side.
    fn state_and_flux(
        state: &State<Primitive>,
        v_n: f64,
        n_unit: DVec2,
        eos: &GasLaw,
    ) -> (State<Conserved>, State<Conserved>) {
        let rho_e = state.pressure() * eos.gamma().odgm1()
            + 0.5 * state.density() * state.velocity().length_squared();
        let u = State::<Conserved>::new(state.density(), state.density() * state.velocity(), rho_e);
        let flux = State::<Conserved>::new(
            state.density() * v_n,
            state.density() * v_n * state.velocity() + state.pressure() * n_unit,
            (rho_e + state.pressure()) * v_n,
        );
        (u, flux)
    }

    /// Star conserved state on one side of the contact.
    fn star_state(
        state: &State<Primitive>,
        v_n: f64,
        s_k: f64,
        s_m: f64,
        n_unit: DVec2,
        eos: &GasLaw,
    ) -> State<Conserved> {
        let starfac = state.density() * (s_k - v_n) / floor_denominator(s_k - s_m);
        let e = state.pressure() * eos.gamma().odgm1() / state.density().max(eos.rho_floor())
            + 0.5 * state.velocity().length_squared();
        let e_star = e
            + (s_m - v_n)
                * (s_m
                    + state.pressure()
                        / floor_denominator(state.density() * (s_k - v_n)));
        starfac * State::<Conserved>::new(1., (s_m - v_n) * n_unit + state.velocity(), e_star)
    }

    /// HLLC flux expressed in the frame of a face moving at the contact speed
    /// `S_M`: the branch flux minus `S_M` times the branch conserved state.
    ///
    /// This is the defining Lagrangian property: the mesh face follows the
    /// contact, so no mass crosses it.
    pub fn solve_for_ale_flux(
        &self,
        left: &State<Primitive>,
        right: &State<Primitive>,
        n_unit: DVec2,
        eos: &GasLaw,
    ) -> State<Conserved> {
        let v_l = left.velocity().dot(n_unit);
        let v_r = right.velocity().dot(n_unit);
        let a_l = sound_speed(left, eos);
        let a_r = sound_speed(right, eos);
        let speeds = Self::wave_speeds(left, right, v_l, v_r, a_l, a_r);

        // Four-way branch on the wave-speed signs.
        let (u_face, flux) = if speeds.s_l >= 0. {
            Self::state_and_flux(left, v_l, n_unit, eos)
        } else if speeds.s_m >= 0. {
            let (u_l, flux_l) = Self::state_and_flux(left, v_l, n_unit, eos);
            let u_star = Self::star_state(left, v_l, speeds.s_l, speeds.s_m, n_unit, eos);
            (u_star, flux_l + speeds.s_l * (u_star - u_l))
        } else if speeds.s_r >= 0. {
            let (u_r, flux_r) = Self::state_and_flux(right, v_r, n_unit, eos);
            let u_star = Self::star_state(right, v_r, speeds.s_r, speeds.s_m, n_unit, eos);
            (u_star, flux_r + speeds.s_r * (u_star - u_r))
        } else {
            Self::state_and_flux(right, v_r, n_unit, eos)
        };

        let ale_flux = flux - speeds.s_m * u_face;
        debug_assert!(ale_flux.is_finite());
        ale_flux
    }
}

impl RiemannStarSolver for HLLCRiemannSolver {
    fn solve_for_star_values(
        &self,
        left: &State<Primitive>,
        right: &State<Primitive>,
        n_unit: DVec2,
        eos: &GasLaw,
    ) -> RiemannStarValues {
        let v_l = left.velocity().dot(n_unit);
        let v_r = right.velocity().dot(n_unit);
        let a_l = sound_speed(left, eos);
        let a_r = sound_speed(right, eos);
        let speeds = Self::wave_speeds(left, right, v_l, v_r, a_l, a_r);

        let p_star =
            left.pressure() + left.density() * (speeds.s_l - v_l) * (speeds.s_m - v_l);
        RiemannStarValues {
            u_star: speeds.s_m,
            p_star: p_star.max(eos.p_floor()),
        }
    }
}
