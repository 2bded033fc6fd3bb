use std::{
    marker::PhantomData,
    ops::{Add, AddAssign, Index, IndexMut, Mul, Sub, SubAssign},
};

use glam::DVec2;

use crate::gas_law::GasLaw;

#[derive(Default, Debug, Clone, Copy)]
pub struct Primitive;
#[derive(Default, Debug, Clone, Copy)]
pub struct Conserved;

/// A generic state vector: scalar, 2-vector, scalar.
///
/// For primitives these are (density, velocity, pressure), for conserved
/// quantities (mass, momentum, total energy).
#[derive(Default, Debug, Clone, Copy)]
pub struct State<T>(f64, DVec2, f64, PhantomData<T>);

impl<T> Add for State<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0, self.1 + rhs.1, self.2 + rhs.2, PhantomData)
    }
}

impl<T> AddAssign for State<T> {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
        self.1 += rhs.1;
        self.2 += rhs.2;
    }
}

impl<T> Sub for State<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0, self.1 - rhs.1, self.2 - rhs.2, PhantomData)
    }
}

impl<T> SubAssign for State<T> {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
        self.1 -= rhs.1;
        self.2 -= rhs.2;
    }
}

impl<T> Mul<State<T>> for f64 {
    type Output = State<T>;

    fn mul(self, rhs: State<T>) -> Self::Output {
        State::<T>(self * rhs.0, self * rhs.1, self * rhs.2, PhantomData)
    }
}

impl<T> State<T> {
    pub fn vacuum() -> Self {
        Self(0., DVec2::ZERO, 0., PhantomData)
    }

    pub fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite() && self.2.is_finite()
    }
}

impl<T> Index<usize> for State<T> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        match index {
            0 => &self.0,
            1 => &self.1.x,
            2 => &self.1.y,
            3 => &self.2,
            _ => panic!("Index out of bounds for State!"),
        }
    }
}

impl<T> IndexMut<usize> for State<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match index {
            0 => &mut self.0,
            1 => &mut self.1.x,
            2 => &mut self.1.y,
            3 => &mut self.2,
            _ => panic!("Index out of bounds for State!"),
        }
    }
}

pub const NUM_STATE_COMPONENTS: usize = 4;

impl State<Primitive> {
    pub fn new(density: f64, velocity: DVec2, pressure: f64) -> Self {
        Self(density, velocity, pressure, PhantomData)
    }

    pub fn density(&self) -> f64 {
        self.0
    }

    pub fn velocity(&self) -> DVec2 {
        self.1
    }

    pub fn pressure(&self) -> f64 {
        self.2
    }

    /// Primitives from the conserved quantities of a cell with the given area.
    ///
    /// Degenerate inputs follow the floor policy: a non-positive area yields a
    /// vacuum state (the caller treats that as a geometry error upstream), a
    /// mass below the density floor yields zero velocity, and the pressure is
    /// clamped by the equation of state.
    pub fn from_conserved(conserved: &State<Conserved>, area: f64, eos: &GasLaw) -> Self {
        if area <= 0. {
            return Self::vacuum();
        }
        let density = (conserved.mass() / area).max(eos.rho_floor());
        let velocity = if conserved.mass() > eos.rho_floor() * area {
            conserved.momentum() / conserved.mass()
        } else {
            DVec2::ZERO
        };
        let internal_energy =
            (conserved.energy() / conserved.mass().max(eos.rho_floor() * area)
                - 0.5 * velocity.length_squared())
            .max(0.);
        let pressure = eos.gas_pressure_from_internal_energy(internal_energy, density);
        Self::new(density, velocity, pressure)
    }
}

impl State<Conserved> {
    pub fn new(mass: f64, momentum: DVec2, energy: f64) -> Self {
        Self(mass, momentum, energy, PhantomData)
    }

    pub fn mass(&self) -> f64 {
        self.0
    }

    pub fn momentum(&self) -> DVec2 {
        self.1
    }

    pub fn energy(&self) -> f64 {
        self.2
    }

    /// Specific internal energy e, defined by: E = E_kin + m e.
    pub fn internal_energy(&self) -> f64 {
        let m_inv = 1. / self.mass();
        let thermal_energy = self.energy() - 0.5 * self.momentum().length_squared() * m_inv;
        thermal_energy * m_inv
    }

    pub fn from_primitives(primitives: &State<Primitive>, area: f64, eos: &GasLaw) -> Self {
        let mass = primitives.density() * area;
        let momentum = mass * primitives.velocity();
        let energy = 0.5 * momentum.dot(primitives.velocity())
            + mass
                * eos.gas_internal_energy_from_pressure(
                    primitives.pressure(),
                    primitives.density(),
                );
        Self::new(mass, momentum, energy)
    }
}
