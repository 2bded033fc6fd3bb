//! Moving-mesh (ALE/Lagrangian) hydrodynamics code/library for the 2D Euler
//! equations on structured quad grids, focussed on flexibility rather than raw
//! performance.
//!
//! The mesh nodes follow the contact speeds resolved at the cell faces, so in
//! smooth flow no mass crosses a face and each cell keeps its initial mass.

pub use boundary::{BoundaryCondition, BoundaryManager, PistonKind, PistonProfile, Side};
pub use engine::{Config, Engine};
pub use errors::{ConfigError, HydroError};
pub use initial_conditions::InitialConditions;
pub use mesh::MovingQuadMesh;
pub use reconstruction::SlopeLimiter;
pub use state::CellState;
pub use time_integration::SspRk2Stepper;
pub use viscosity::ArtificialViscosity;

mod boundary;
mod engine;
mod errors;
mod forces;
pub mod gas_law;
mod initial_conditions;
mod mesh;
pub mod physical_quantities;
mod reconstruction;
pub mod riemann_solver;
mod state;
mod time_integration;
mod viscosity;
