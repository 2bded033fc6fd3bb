use glam::DVec2;
use ndarray::Array2;

use crate::{
    mesh::MovingQuadMesh,
    physical_quantities::{Primitive, State},
    riemann_solver::RiemannStarValues,
    state::CellState,
};

/// Von Neumann-Richtmyer quadratic artificial viscosity.
///
/// A scalar pressure correction `q = Cq rho_up (l |du_n|)^2` added to the star
/// pressure of compressive interior faces, where `l` is the smaller inscribed
/// diameter of the two adjacent cells and `rho_up` the density of the cell the
/// flow comes from. Expansive faces (`du_n >= 0`) are never touched, so smooth
/// rarefactions stay inviscid. A zero coefficient disables it.
pub struct ArtificialViscosity {
    coeff: f64,
}

impl ArtificialViscosity {
    pub fn new(coeff: f64) -> Self {
        Self { coeff }
    }

    pub fn enabled(&self) -> bool {
        self.coeff > 0.
    }

    fn face_q(
        &self,
        left: &State<Primitive>,
        right: &State<Primitive>,
        n_unit: DVec2,
        length_scale: f64,
    ) -> f64 {
        let du_n = (right.velocity() - left.velocity()).dot(n_unit);
        if du_n >= 0. {
            return 0.;
        }
        let rho_up = if 0.5 * (left.velocity() + right.velocity()).dot(n_unit) > 0. {
            left.density()
        } else {
            right.density()
        };
        self.coeff * rho_up * (length_scale * du_n).powi(2)
    }

    /// Add the viscous pressure to the star values of all interior faces.
    ///
    /// Boundary faces carry the star state prescribed by the boundary policy
    /// and are left alone.
    pub fn apply(
        &self,
        mesh: &MovingQuadMesh,
        state: &CellState,
        x_faces: &mut Array2<RiemannStarValues>,
        y_faces: &mut Array2<RiemannStarValues>,
    ) {
        if !self.enabled() {
            return;
        }
        for j in 0..mesh.ny() {
            for i in 1..mesh.nx() {
                let (n_unit, _) = mesh.x_face_geometry(j, i);
                let length_scale = mesh
                    .inscribed_diameter(j, i - 1)
                    .min(mesh.inscribed_diameter(j, i));
                x_faces[(j, i)].p_star += self.face_q(
                    state.primitives(j, i - 1),
                    state.primitives(j, i),
                    n_unit,
                    length_scale,
                );
            }
        }
        for j in 1..mesh.ny() {
            for i in 0..mesh.nx() {
                let (n_unit, _) = mesh.y_face_geometry(j, i);
                let length_scale = mesh
                    .inscribed_diameter(j - 1, i)
                    .min(mesh.inscribed_diameter(j, i));
                y_faces[(j, i)].p_star += self.face_q(
                    state.primitives(j - 1, i),
                    state.primitives(j, i),
                    n_unit,
                    length_scale,
                );
            }
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;

    use super::*;
    use crate::{gas_law::GasLaw, physical_quantities::Conserved};

    fn colliding_state(mesh: &MovingQuadMesh, eos: &GasLaw) -> CellState {
        let mut state = CellState::new(mesh.ny(), mesh.nx());
        for j in 0..mesh.ny() {
            for i in 0..mesh.nx() {
                let u = if i == 0 { 1. } else { -1. };
                let primitives = State::<Primitive>::new(1., DVec2::new(u, 0.), 1.);
                state.set_conserved(
                    j,
                    i,
                    State::<Conserved>::from_primitives(&primitives, mesh.cell_area(j, i), eos),
                );
            }
        }
        state.sync_primitives(mesh, eos);
        state
    }

    #[test]
    fn test_compressive_face_gains_pressure() {
        let mesh = MovingQuadMesh::new(2, 1, 0., 1., 0., 1.);
        let eos = GasLaw::new(1.4);
        let state = colliding_state(&mesh, &eos);
        let viscosity = ArtificialViscosity::new(2.);

        let mut x_faces = Array2::from_elem((1, 3), RiemannStarValues::default());
        let mut y_faces = Array2::from_elem((2, 2), RiemannStarValues::default());
        viscosity.apply(&mesh, &state, &mut x_faces, &mut y_faces);

        // du_n = -2 across the middle face, l = inscribed diameter of a
        // 0.5 x 1 cell, upwind density 1.
        let l = mesh.inscribed_diameter(0, 0);
        assert_approx_eq!(f64, x_faces[(0, 1)].p_star, 2. * (l * 2.).powi(2));
        // Boundary faces and shear-free horizontal faces are untouched.
        assert_approx_eq!(f64, x_faces[(0, 0)].p_star, 0.);
        assert_approx_eq!(f64, x_faces[(0, 2)].p_star, 0.);
        assert_approx_eq!(f64, y_faces[(1, 0)].p_star, 0.);
    }

    #[test]
    fn test_expansive_face_is_untouched() {
        let mesh = MovingQuadMesh::new(2, 1, 0., 1., 0., 1.);
        let eos = GasLaw::new(1.4);
        let mut state = CellState::new(1, 2);
        for i in 0..2 {
            let u = if i == 0 { -1. } else { 1. };
            let primitives = State::<Primitive>::new(1., DVec2::new(u, 0.), 1.);
            state.set_conserved(
                0,
                i,
                State::<Conserved>::from_primitives(&primitives, mesh.cell_area(0, i), &eos),
            );
        }
        state.sync_primitives(&mesh, &eos);

        let viscosity = ArtificialViscosity::new(2.);
        let mut x_faces = Array2::from_elem((1, 3), RiemannStarValues::default());
        let mut y_faces = Array2::from_elem((2, 2), RiemannStarValues::default());
        viscosity.apply(&mesh, &state, &mut x_faces, &mut y_faces);
        assert_approx_eq!(f64, x_faces[(0, 1)].p_star, 0.);
    }

    #[test]
    fn test_zero_coefficient_disables() {
        let viscosity = ArtificialViscosity::new(0.);
        assert!(!viscosity.enabled());
    }
}
