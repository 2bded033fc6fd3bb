#[derive(Debug, Default, Clone, Copy)]
pub struct AdiabaticIndex {
    gamma: f64,
    odgm1: f64,
}

impl From<f64> for AdiabaticIndex {
    fn from(value: f64) -> Self {
        AdiabaticIndex {
            gamma: value,
            odgm1: 1. / (value - 1.),
        }
    }
}

impl AdiabaticIndex {
    pub fn gamma(&self) -> f64 {
        self.gamma
    }

    pub fn odgm1(&self) -> f64 {
        self.odgm1
    }
}

/// Gamma-law equation of state with positivity floors.
///
/// All degenerate inputs (vacuum-adjacent densities, negative internal
/// energies) are silently clamped so that no negative argument ever reaches a
/// square root or division. This is a robustness policy: the floors sit
/// several orders of magnitude below physically meaningful scales.
#[derive(Debug, Clone, Copy)]
pub struct GasLaw {
    gamma: AdiabaticIndex,
    rho_floor: f64,
    p_floor: f64,
}

pub const DEFAULT_FLOOR: f64 = 1e-16;

impl GasLaw {
    pub fn new(gamma: f64) -> Self {
        Self::with_floors(gamma, DEFAULT_FLOOR, DEFAULT_FLOOR)
    }

    pub fn with_floors(gamma: f64, rho_floor: f64, p_floor: f64) -> Self {
        Self {
            gamma: gamma.into(),
            rho_floor,
            p_floor,
        }
    }

    pub fn gamma(&self) -> &AdiabaticIndex {
        &self.gamma
    }

    pub fn rho_floor(&self) -> f64 {
        self.rho_floor
    }

    pub fn p_floor(&self) -> f64 {
        self.p_floor
    }

    /// `p = max((gamma - 1) rho max(e, 0), p_floor)`
    pub fn gas_pressure_from_internal_energy(&self, internal_energy: f64, density: f64) -> f64 {
        let density = density.max(self.rho_floor);
        let pressure = (self.gamma.gamma - 1.) * density * internal_energy.max(0.);
        pressure.max(self.p_floor)
    }

    /// Specific internal energy of a gas with the given pressure and density.
    pub fn gas_internal_energy_from_pressure(&self, pressure: f64, density: f64) -> f64 {
        pressure * self.gamma.odgm1 / density.max(self.rho_floor)
    }

    /// `a = sqrt(max(gamma p / rho, 0))`, with `rho` clamped to the floor.
    pub fn sound_speed(&self, density: f64, internal_energy: f64) -> f64 {
        let density = density.max(self.rho_floor);
        let pressure = self.gas_pressure_from_internal_energy(internal_energy, density);
        (self.gamma.gamma * pressure / density).max(0.).sqrt()
    }
}
