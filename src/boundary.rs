//! Boundary policies supplying star values at domain-edge faces.

use glam::DVec2;

use crate::{
    gas_law::GasLaw,
    physical_quantities::{Primitive, State},
    riemann_solver::{RiemannStarSolver, RiemannStarValues},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryCondition {
    Reflecting,
    Piston,
    Outflow,
    Periodic,
}

impl BoundaryCondition {
    /// Resolve a boundary kind by name. Unknown names fall back to a
    /// reflecting wall with a warning rather than aborting.
    pub fn from_name(name: &str) -> Self {
        match name {
            "reflect" => Self::Reflecting,
            "piston" => Self::Piston,
            "outflow" => Self::Outflow,
            "periodic" => Self::Periodic,
            _ => {
                log::warn!("Unknown boundary kind {:?}, falling back to reflect", name);
                Self::Reflecting
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PistonKind {
    None,
    Constant,
    Sine,
}

/// Prescribed wall velocity profile, linearly ramped from rest over
/// `ramp_time` to avoid an impulsive start.
#[derive(Debug, Clone, Copy)]
pub struct PistonProfile {
    pub kind: PistonKind,
    pub u: f64,
    pub a: f64,
    pub f: f64,
    pub ramp_time: f64,
}

impl PistonProfile {
    pub fn none() -> Self {
        Self {
            kind: PistonKind::None,
            u: 0.,
            a: 0.,
            f: 0.,
            ramp_time: 0.,
        }
    }

    pub fn kind_from_name(name: &str) -> PistonKind {
        match name {
            "none" => PistonKind::None,
            "constant" => PistonKind::Constant,
            "sine" => PistonKind::Sine,
            _ => {
                log::warn!("Unknown piston kind {:?}, falling back to none", name);
                PistonKind::None
            }
        }
    }

    /// Signed wall speed along the positive axis of the piston's side.
    pub fn speed(&self, t: f64) -> f64 {
        let vel = match self.kind {
            PistonKind::None => return 0.,
            PistonKind::Constant => self.u,
            PistonKind::Sine => self.u + self.a * (2. * std::f64::consts::PI * self.f * t).sin(),
        };
        if t < self.ramp_time {
            vel * t / self.ramp_time
        } else {
            vel
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    West,
    East,
    South,
    North,
}

impl Side {
    /// Positive domain axis along which a piston on this side moves.
    fn axis(&self) -> DVec2 {
        match self {
            Side::West | Side::East => DVec2::X,
            Side::South | Side::North => DVec2::Y,
        }
    }
}

/// One boundary policy per domain side, plus the shared piston profile for
/// sides configured as `piston`.
pub struct BoundaryManager {
    pub west: BoundaryCondition,
    pub east: BoundaryCondition,
    pub south: BoundaryCondition,
    pub north: BoundaryCondition,
    piston: PistonProfile,
}

impl BoundaryManager {
    pub fn new(
        west: BoundaryCondition,
        east: BoundaryCondition,
        south: BoundaryCondition,
        north: BoundaryCondition,
        piston: PistonProfile,
    ) -> Self {
        Self {
            west,
            east,
            south,
            north,
            piston,
        }
    }

    pub fn all_reflecting() -> Self {
        Self::new(
            BoundaryCondition::Reflecting,
            BoundaryCondition::Reflecting,
            BoundaryCondition::Reflecting,
            BoundaryCondition::Reflecting,
            PistonProfile::none(),
        )
    }

    pub fn condition(&self, side: Side) -> BoundaryCondition {
        match side {
            Side::West => self.west,
            Side::East => self.east,
            Side::South => self.south,
            Side::North => self.north,
        }
    }

    /// True when the given axis is periodic. Periodicity must be declared on
    /// both opposing sides to take effect.
    pub fn x_periodic(&self) -> bool {
        self.west == BoundaryCondition::Periodic && self.east == BoundaryCondition::Periodic
    }

    pub fn y_periodic(&self) -> bool {
        self.south == BoundaryCondition::Periodic && self.north == BoundaryCondition::Periodic
    }

    /// Star values of a domain-edge face at time `t`, in the projection on the
    /// outward unit normal `n_out` of the given side.
    ///
    /// Periodic faces are paired with their opposite edge by the stepper and
    /// are never routed through here; if one arrives anyway it degrades to the
    /// zero-gradient treatment.
    pub fn boundary_face(
        &self,
        side: Side,
        interior: &State<Primitive>,
        n_out: DVec2,
        t: f64,
        solver: &dyn RiemannStarSolver,
        eos: &GasLaw,
    ) -> RiemannStarValues {
        let u_n = interior.velocity().dot(n_out);
        match self.condition(side) {
            BoundaryCondition::Reflecting => solver.solve_for_wall(interior, u_n, 0., eos),
            BoundaryCondition::Piston => {
                let u_wall = (self.piston.speed(t) * side.axis()).dot(n_out);
                solver.solve_for_wall(interior, u_n, u_wall, eos)
            }
            BoundaryCondition::Outflow | BoundaryCondition::Periodic => RiemannStarValues {
                u_star: u_n,
                p_star: interior.pressure().max(eos.p_floor()),
            },
        }
    }
}
