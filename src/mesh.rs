use glam::DVec2;
use ndarray::Array2;

use crate::{
    errors::HydroError, gas_law::GasLaw, riemann_solver::RiemannStarValues, state::CellState,
};

/// Floor used when the CFL estimate degenerates to a non-finite or
/// non-positive value. Repeatedly hitting this floor is a diagnostic signal,
/// not a healthy state.
pub const TIMESTEP_FLOOR: f64 = 1e-12;

/// A structured grid of quadrilateral cells whose nodes move in time.
///
/// The `(ny + 1) x (nx + 1)` node positions own the geometry; cell areas,
/// centroids, face lengths and outward normals are always derived from them
/// and recomputed after every node move. Node ordering is fixed for the
/// lifetime of a run.
pub struct MovingQuadMesh {
    nx: usize,
    ny: usize,
    nodes: Array2<DVec2>,
    areas: Array2<f64>,
    centroids: Array2<DVec2>,
}

impl MovingQuadMesh {
    /// Create a uniform structured mesh covering the given extents.
    pub fn new(nx: usize, ny: usize, xmin: f64, xmax: f64, ymin: f64, ymax: f64) -> Self {
        debug_assert!(nx > 0 && ny > 0, "Mesh must have at least one cell!");
        debug_assert!(xmax > xmin && ymax > ymin, "Inverted mesh extents!");
        let dx = (xmax - xmin) / nx as f64;
        let dy = (ymax - ymin) / ny as f64;
        let nodes = Array2::from_shape_fn((ny + 1, nx + 1), |(j, i)| {
            DVec2::new(xmin + i as f64 * dx, ymin + j as f64 * dy)
        });
        let mut mesh = Self {
            nx,
            ny,
            nodes,
            areas: Array2::zeros((ny, nx)),
            centroids: Array2::from_elem((ny, nx), DVec2::ZERO),
        };
        mesh.update_geometry()
            .expect("Uniform initial mesh cannot have degenerate cells");
        mesh
    }

    pub fn nx(&self) -> usize {
        self.nx
    }

    pub fn ny(&self) -> usize {
        self.ny
    }

    pub fn node(&self, j: usize, i: usize) -> DVec2 {
        self.nodes[(j, i)]
    }

    pub fn cell_area(&self, j: usize, i: usize) -> f64 {
        self.areas[(j, i)]
    }

    pub fn centroid(&self, j: usize, i: usize) -> DVec2 {
        self.centroids[(j, i)]
    }

    /// Diameter of the circle with the same area as the cell, used as the
    /// characteristic length scale of a general (possibly sheared) quad.
    pub fn inscribed_diameter(&self, j: usize, i: usize) -> f64 {
        (4. * self.areas[(j, i)] / std::f64::consts::PI).sqrt()
    }

    /// Unit normal and length of the vertical face `i` (0..=nx) of row `j`.
    ///
    /// The normal points from the west cell `(j, i - 1)` towards the east cell
    /// `(j, i)`.
    pub fn x_face_geometry(&self, j: usize, i: usize) -> (DVec2, f64) {
        let d = self.nodes[(j + 1, i)] - self.nodes[(j, i)];
        let length = d.length();
        (DVec2::new(d.y, -d.x) / length, length)
    }

    /// Unit normal and length of the horizontal face `j` (0..=ny) of column
    /// `i`. The normal points from the south cell `(j - 1, i)` towards the
    /// north cell `(j, i)`.
    pub fn y_face_geometry(&self, j: usize, i: usize) -> (DVec2, f64) {
        let d = self.nodes[(j, i + 1)] - self.nodes[(j, i)];
        let length = d.length();
        (DVec2::new(-d.y, d.x) / length, length)
    }

    /// Assemble a nodal velocity field by count-weighted averaging of the star
    /// velocities of all faces sharing each node.
    pub fn assemble_node_velocities(
        &self,
        x_faces: &Array2<RiemannStarValues>,
        y_faces: &Array2<RiemannStarValues>,
    ) -> Array2<DVec2> {
        let mut velocity = Array2::from_elem((self.ny + 1, self.nx + 1), DVec2::ZERO);
        let mut weight = Array2::<f64>::zeros((self.ny + 1, self.nx + 1));

        for j in 0..self.ny {
            for i in 0..=self.nx {
                let (n_unit, _) = self.x_face_geometry(j, i);
                let v_face = x_faces[(j, i)].u_star * n_unit;
                velocity[(j, i)] += v_face;
                weight[(j, i)] += 1.;
                velocity[(j + 1, i)] += v_face;
                weight[(j + 1, i)] += 1.;
            }
        }
        for j in 0..=self.ny {
            for i in 0..self.nx {
                let (n_unit, _) = self.y_face_geometry(j, i);
                let v_face = y_faces[(j, i)].u_star * n_unit;
                velocity[(j, i)] += v_face;
                weight[(j, i)] += 1.;
                velocity[(j, i + 1)] += v_face;
                weight[(j, i + 1)] += 1.;
            }
        }

        ndarray::Zip::from(&mut velocity)
            .and(&weight)
            .for_each(|v, &w| {
                if w > 0. {
                    *v /= w;
                }
            });
        velocity
    }

    /// Advect the nodes over `dt` and recompute the derived geometry.
    ///
    /// A cell whose signed area becomes non-positive is a fatal geometry
    /// error: continuing would produce meaningless negative densities.
    pub fn move_nodes(
        &mut self,
        velocities: &Array2<DVec2>,
        dt: f64,
    ) -> Result<(), HydroError> {
        ndarray::Zip::from(&mut self.nodes)
            .and(velocities)
            .for_each(|x, &v| *x += dt * v);
        self.update_geometry()
    }

    pub fn snapshot_nodes(&self) -> Array2<DVec2> {
        self.nodes.clone()
    }

    /// Heun combination of the node positions: average the current positions
    /// with the given begin-of-step snapshot.
    pub fn blend_nodes(&mut self, nodes0: &Array2<DVec2>) -> Result<(), HydroError> {
        ndarray::Zip::from(&mut self.nodes)
            .and(nodes0)
            .for_each(|x, &x0| *x = 0.5 * (x0 + *x));
        self.update_geometry()
    }

    /// CFL-limited admissible timestep: `cfl * min(l / (a + |v|))` over all
    /// cells. The nodes move with the flow, so the bulk speed bounds the step
    /// just like the sound speed does; cold supersonic inflow would otherwise
    /// invert cells in a single step.
    ///
    /// A non-finite or non-positive result is replaced by a tiny positive
    /// floor rather than propagated, so the marching scheme never stalls on a
    /// NaN; callers should treat a step pinned at the floor as a warning sign.
    pub fn cfl_timestep(&self, state: &CellState, eos: &GasLaw, cfl: f64) -> f64 {
        let mut min_ratio = f64::INFINITY;
        for j in 0..self.ny {
            for i in 0..self.nx {
                let primitives = state.primitives(j, i);
                let internal_energy = eos.gas_internal_energy_from_pressure(
                    primitives.pressure(),
                    primitives.density(),
                );
                let signal_speed = eos.sound_speed(primitives.density(), internal_energy)
                    + primitives.velocity().length();
                if signal_speed > 0. {
                    min_ratio = min_ratio.min(self.inscribed_diameter(j, i) / signal_speed);
                }
            }
        }
        let dt = cfl * min_ratio;
        if !dt.is_finite() || dt <= 0. {
            log::warn!("CFL timestep degenerated ({}), flooring to {:e}", dt, TIMESTEP_FLOOR);
            return TIMESTEP_FLOOR;
        }
        dt
    }

    fn update_geometry(&mut self) -> Result<(), HydroError> {
        for j in 0..self.ny {
            for i in 0..self.nx {
                let n00 = self.nodes[(j, i)];
                let n10 = self.nodes[(j, i + 1)];
                let n01 = self.nodes[(j + 1, i)];
                let n11 = self.nodes[(j + 1, i + 1)];
                // Signed two-triangle decomposition, so an inverted cell shows
                // up as a non-positive area instead of being silently folded.
                let area = 0.5 * (n10 - n00).perp_dot(n11 - n00)
                    + 0.5 * (n11 - n00).perp_dot(n01 - n00);
                if area <= 0. {
                    return Err(HydroError::DegenerateCell { i, j, area });
                }
                self.areas[(j, i)] = area;
                self.centroids[(j, i)] = 0.25 * (n00 + n10 + n01 + n11);
            }
        }
        Ok(())
    }
}
