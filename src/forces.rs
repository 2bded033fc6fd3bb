use ndarray::Array2;

use crate::{
    mesh::MovingQuadMesh,
    physical_quantities::{Conserved, State},
    riemann_solver::RiemannStarValues,
};

/// Reduce the face star values into per-cell conserved rates of change.
///
/// Each cell reads its own four faces: the momentum rate is the sum of
/// `-p_star * n_out * L` and the energy rate the sum of `-p_star * u_star * L`
/// over them, with `n_out` the outward normal. The two cells sharing a face
/// read the identical record with opposite outward normals, so their
/// contributions cancel exactly in floating point and the interior faces
/// conserve momentum and energy to roundoff. Mass rates are identically zero
/// in pure-Lagrangian mode.
pub fn accumulate_rates(
    mesh: &MovingQuadMesh,
    x_faces: &Array2<RiemannStarValues>,
    y_faces: &Array2<RiemannStarValues>,
) -> Array2<State<Conserved>> {
    let mut rates = Array2::from_elem((mesh.ny(), mesh.nx()), State::<Conserved>::vacuum());
    ndarray::Zip::indexed(&mut rates).par_for_each(|(j, i), rate| {
        let mut momentum = glam::DVec2::ZERO;
        let mut energy = 0.;

        // West and south faces point into the cell, east and north out of it.
        let sides = [
            (x_faces[(j, i)], mesh.x_face_geometry(j, i), 1.),
            (x_faces[(j, i + 1)], mesh.x_face_geometry(j, i + 1), -1.),
            (y_faces[(j, i)], mesh.y_face_geometry(j, i), 1.),
            (y_faces[(j + 1, i)], mesh.y_face_geometry(j + 1, i), -1.),
        ];
        for (star, (n_unit, length), sign) in sides {
            momentum += sign * star.p_star * length * n_unit;
            energy += sign * star.p_star * star.u_star * length;
        }
        *rate = State::<Conserved>::new(0., momentum, energy);
    });
    rates
}
