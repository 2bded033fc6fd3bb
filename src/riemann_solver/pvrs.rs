use glam::DVec2;

use crate::{
    gas_law::GasLaw,
    physical_quantities::{Primitive, State},
};

use super::{floor_denominator, sound_speed, RiemannStarSolver, RiemannStarValues};

/// Primitive-variable (linearised) Riemann solver: a cheap two-state estimate
/// of the star pressure and contact velocity.
pub struct PVRiemannSolver;

impl PVRiemannSolver {
    pub(super) fn rho_bar(rho_l: f64, rho_r: f64) -> f64 {
        0.5 * (rho_l + rho_r)
    }

    pub(super) fn a_bar(a_l: f64, a_r: f64) -> f64 {
        0.5 * (a_l + a_r)
    }
}

impl RiemannStarSolver for PVRiemannSolver {
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

        let rho_bar = Self::rho_bar(left.density(), right.density());
        let a_bar = Self::a_bar(a_l, a_r);
        let rho_a = floor_denominator(rho_bar * a_bar);

        let p_star = 0.5 * (left.pressure() + right.pressure())
            - 0.5 * (v_r - v_l) * rho_bar * a_bar;
        let u_star = 0.5 * (v_l + v_r) + (left.pressure() - right.pressure()) / rho_a;

        RiemannStarValues {
            u_star,
            p_star: p_star.max(eos.p_floor()),
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use super::*;

    const GAMMA: f64 = 5. / 3.;

    #[test]
    fn test_consistency() {
        // Identical left and right states resolve to that very state.
        let eos = GasLaw::new(GAMMA);
        let state = State::<Primitive>::new(1.5, DVec2::new(0.2, -0.7), 1.2);
        let star = PVRiemannSolver.solve_for_star_values(&state, &state, DVec2::X, &eos);
        assert_approx_eq!(f64, star.u_star, 0.2);
        assert_approx_eq!(f64, star.p_star, 1.2);
    }

    #[test]
    fn test_compression_raises_pressure() {
        let eos = GasLaw::new(GAMMA);
        let left = State::<Primitive>::new(1., DVec2::new(1., 0.), 1.);
        let right = State::<Primitive>::new(1., DVec2::new(-1., 0.), 1.);
        let star = PVRiemannSolver.solve_for_star_values(&left, &right, DVec2::X, &eos);
        // Symmetric collision: contact at rest, compressed star pressure.
        assert_approx_eq!(f64, star.u_star, 0.);
        assert!(star.p_star > 1.);
    }

    #[test]
    fn test_vacuum_adjacent_states_stay_finite() {
        let eos = GasLaw::new(GAMMA);
        let left = State::<Primitive>::new(0., DVec2::ZERO, 0.);
        let right = State::<Primitive>::new(0., DVec2::ZERO, 0.);
        let star = PVRiemannSolver.solve_for_star_values(&left, &right, DVec2::X, &eos);
        assert!(star.u_star.is_finite());
        assert!(star.p_star >= eos.p_floor());
    }
}
