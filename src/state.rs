use ndarray::Array2;

use crate::{
    errors::ConfigError,
    gas_law::GasLaw,
    mesh::MovingQuadMesh,
    physical_quantities::{Conserved, Primitive, State},
};

/// Per-cell conserved quantities and their derived primitives.
///
/// The conserved fields are the single source of truth; the primitive fields
/// are a cache that is only valid immediately after [`CellState::sync_primitives`].
/// In pure-Lagrangian mode the cell masses are fixed at initialisation and the
/// density is recomputed from mass over (moving) area.
pub struct CellState {
    conserved: Array2<State<Conserved>>,
    primitives: Array2<State<Primitive>>,
}

impl CellState {
    pub fn new(ny: usize, nx: usize) -> Self {
        Self {
            conserved: Array2::from_elem((ny, nx), State::vacuum()),
            primitives: Array2::from_elem((ny, nx), State::vacuum()),
        }
    }

    pub fn conserved(&self, j: usize, i: usize) -> &State<Conserved> {
        &self.conserved[(j, i)]
    }

    pub fn set_conserved(&mut self, j: usize, i: usize, conserved: State<Conserved>) {
        self.conserved[(j, i)] = conserved;
    }

    pub fn primitives(&self, j: usize, i: usize) -> &State<Primitive> {
        &self.primitives[(j, i)]
    }

    /// `conserved += dt * rate`, leaving the primitives stale until the next
    /// synchronisation.
    pub fn apply_rates(&mut self, rates: &Array2<State<Conserved>>, dt: f64) {
        ndarray::Zip::from(&mut self.conserved)
            .and(rates)
            .for_each(|conserved, &rate| *conserved += dt * rate);
    }

    pub fn snapshot_conserved(&self) -> Array2<State<Conserved>> {
        self.conserved.clone()
    }

    /// Heun combination with a begin-of-step snapshot of the conserved state.
    pub fn blend_conserved(&mut self, conserved0: &Array2<State<Conserved>>) {
        ndarray::Zip::from(&mut self.conserved)
            .and(conserved0)
            .for_each(|conserved, &c0| *conserved = 0.5 * (c0 + *conserved));
    }

    /// Recompute the primitive cache from the conserved quantities and the
    /// *current* cell areas.
    ///
    /// Must be called after every conserved update and after every mesh move,
    /// in that dependency order: the density needs the new area.
    pub fn sync_primitives(&mut self, mesh: &MovingQuadMesh, eos: &GasLaw) {
        ndarray::Zip::indexed(&mut self.primitives)
            .and(&self.conserved)
            .for_each(|(j, i), primitives, conserved| {
                *primitives =
                    State::<Primitive>::from_conserved(conserved, mesh.cell_area(j, i), eos);
            });
    }

    /// Sum of mass, momentum and energy over all cells.
    pub fn totals(&self) -> State<Conserved> {
        self.conserved
            .iter()
            .fold(State::vacuum(), |acc, &conserved| acc + conserved)
    }

    /// Diagnostic accessor: a per-cell array of the named quantity, aligned
    /// with the current (moved) grid. Momentum and energy are per unit area.
    pub fn get_var(
        &self,
        name: &str,
        mesh: &MovingQuadMesh,
    ) -> Result<Array2<f64>, ConfigError> {
        let per_area = |f: &dyn Fn(&State<Conserved>) -> f64| {
            Array2::from_shape_fn(self.conserved.dim(), |(j, i)| {
                f(&self.conserved[(j, i)]) / mesh.cell_area(j, i)
            })
        };
        match name {
            "density" => Ok(per_area(&|c| c.mass())),
            "x-momentum" => Ok(per_area(&|c| c.momentum().x)),
            "y-momentum" => Ok(per_area(&|c| c.momentum().y)),
            "energy" => Ok(per_area(&|c| c.energy())),
            "pressure" => Ok(Array2::from_shape_fn(self.primitives.dim(), |(j, i)| {
                self.primitives[(j, i)].pressure()
            })),
            _ => Err(ConfigError::UnknownVariable(name.to_string())),
        }
    }
}

#[cfg(test)]
mod test {
    use float_cmp::assert_approx_eq;
    use glam::DVec2;

    use super::*;

    #[test]
    fn test_sync_follows_area() {
        let mesh = MovingQuadMesh::new(2, 2, 0., 1., 0., 1.);
        let eos = GasLaw::new(1.4);
        let mut state = CellState::new(2, 2);
        for j in 0..2 {
            for i in 0..2 {
                let primitives = State::<Primitive>::new(1., DVec2::new(0.5, 0.), 1.);
                state.set_conserved(
                    j,
                    i,
                    State::<Conserved>::from_primitives(&primitives, mesh.cell_area(j, i), &eos),
                );
            }
        }
        state.sync_primitives(&mesh, &eos);
        assert_approx_eq!(f64, state.primitives(0, 0).density(), 1.);
        assert_approx_eq!(f64, state.primitives(1, 1).pressure(), 1.);
        assert_approx_eq!(f64, state.primitives(0, 1).velocity().x, 0.5);
    }

    #[test]
    fn test_get_var() {
        let mesh = MovingQuadMesh::new(2, 1, 0., 1., 0., 1.);
        let eos = GasLaw::new(1.4);
        let mut state = CellState::new(1, 2);
        let primitives = State::<Primitive>::new(2., DVec2::new(1., 0.), 0.4);
        for i in 0..2 {
            state.set_conserved(
                0,
                i,
                State::<Conserved>::from_primitives(&primitives, mesh.cell_area(0, i), &eos),
            );
        }
        state.sync_primitives(&mesh, &eos);

        let density = state.get_var("density", &mesh).unwrap();
        assert_approx_eq!(f64, density[(0, 0)], 2.);
        let xmom = state.get_var("x-momentum", &mesh).unwrap();
        assert_approx_eq!(f64, xmom[(0, 1)], 2.);
        let pressure = state.get_var("pressure", &mesh).unwrap();
        assert_approx_eq!(f64, pressure[(0, 0)], 0.4);
        assert!(state.get_var("entropy", &mesh).is_err());
    }
}
