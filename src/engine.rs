//! The simulation driver: configuration parsing, setup and the main loop.

use ndarray::Array2;
use yaml_rust::Yaml;

use crate::{
    boundary::{BoundaryCondition, BoundaryManager, PistonProfile},
    errors::{ConfigError, HydroError},
    gas_law::GasLaw,
    initial_conditions::InitialConditions,
    mesh::MovingQuadMesh,
    reconstruction::SlopeLimiter,
    riemann_solver::get_solver,
    state::CellState,
    time_integration::SspRk2Stepper,
    viscosity::ArtificialViscosity,
};

/// Parsed run configuration.
///
/// Required keys fail construction with a [`ConfigError::MissingParameter`]
/// naming the key; everything else carries a documented default.
#[derive(Debug)]
pub struct Config {
    pub gamma: f64,
    pub nx: usize,
    pub ny: usize,
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub boundaries: [BoundaryCondition; 4],
    pub cfl: f64,
    pub tmax: f64,
    pub max_steps: usize,
    pub piston: PistonProfile,
    pub visc_coeff: f64,
    pub riemann_solver: String,
    pub limiter: SlopeLimiter,
    pub ics: String,
}

impl Config {
    pub fn parse(yaml: &Yaml) -> Result<Self, ConfigError> {
        let eos = &yaml["eos"];
        let gamma = eos["gamma"]
            .as_f64()
            .ok_or(ConfigError::MissingParameter("eos:gamma".to_string()))?;

        let mesh = &yaml["mesh"];
        let nx = mesh["nx"]
            .as_i64()
            .ok_or(ConfigError::MissingParameter("mesh:nx".to_string()))?
            as usize;
        let ny = mesh["ny"]
            .as_i64()
            .ok_or(ConfigError::MissingParameter("mesh:ny".to_string()))?
            as usize;
        let xmin = mesh["xmin"].as_f64().unwrap_or(0.);
        let xmax = mesh["xmax"].as_f64().unwrap_or(1.);
        let ymin = mesh["ymin"].as_f64().unwrap_or(0.);
        let ymax = mesh["ymax"].as_f64().unwrap_or(1.);
        let boundaries = [
            BoundaryCondition::from_name(mesh["xlboundary"].as_str().unwrap_or("reflect")),
            BoundaryCondition::from_name(mesh["xrboundary"].as_str().unwrap_or("reflect")),
            BoundaryCondition::from_name(mesh["ylboundary"].as_str().unwrap_or("reflect")),
            BoundaryCondition::from_name(mesh["yrboundary"].as_str().unwrap_or("reflect")),
        ];

        let driver = &yaml["driver"];
        let cfl = driver["cfl"].as_f64().unwrap_or(0.5);
        let tmax = driver["tmax"].as_f64().unwrap_or(1.);
        let max_steps = driver["max_steps"].as_i64().unwrap_or(10000) as usize;

        let piston_yaml = &yaml["piston"];
        let piston = PistonProfile {
            kind: PistonProfile::kind_from_name(piston_yaml["kind"].as_str().unwrap_or("none")),
            u: piston_yaml["U"].as_f64().unwrap_or(0.),
            a: piston_yaml["A"].as_f64().unwrap_or(0.),
            f: piston_yaml["f"].as_f64().unwrap_or(0.),
            ramp_time: piston_yaml["rampTime"].as_f64().unwrap_or(0.),
        };

        let lagrangian = &yaml["lagrangian"];
        let visc_coeff = lagrangian["visc_coeff"].as_f64().unwrap_or(0.);
        let riemann_solver = lagrangian["riemann_solver"]
            .as_str()
            .unwrap_or("PVRS")
            .to_string();
        let limiter = SlopeLimiter::from_name(
            lagrangian["limiter"].as_str().unwrap_or("monotonized-central"),
        );

        let ics = yaml["ics"]["kind"].as_str().unwrap_or("constant").to_string();

        Ok(Self {
            gamma,
            nx,
            ny,
            xmin,
            xmax,
            ymin,
            ymax,
            boundaries,
            cfl,
            tmax,
            max_steps,
            piston,
            visc_coeff,
            riemann_solver,
            limiter,
            ics,
        })
    }
}

pub struct Engine {
    mesh: MovingQuadMesh,
    state: CellState,
    eos: GasLaw,
    boundary: BoundaryManager,
    stepper: SspRk2Stepper,
    cfl: f64,
    tmax: f64,
    max_steps: usize,
    t: f64,
    step: usize,
}

impl Engine {
    /// Build mesh, state and stepper from a parsed configuration and a
    /// problem populator.
    pub fn new(config: &Config, ics: &InitialConditions) -> Result<Self, ConfigError> {
        let eos = GasLaw::new(config.gamma);
        let mesh = MovingQuadMesh::new(
            config.nx, config.ny, config.xmin, config.xmax, config.ymin, config.ymax,
        );
        let mut state = CellState::new(config.ny, config.nx);
        ics.populate(&mesh, &mut state, &eos);

        let [west, east, south, north] = config.boundaries;
        let boundary = BoundaryManager::new(west, east, south, north, config.piston);
        let stepper = SspRk2Stepper::new(
            config.limiter,
            get_solver(&config.riemann_solver)?,
            ArtificialViscosity::new(config.visc_coeff),
        );

        Ok(Self {
            mesh,
            state,
            eos,
            boundary,
            stepper,
            cfl: config.cfl,
            tmax: config.tmax,
            max_steps: config.max_steps,
            t: 0.,
            step: 0,
        })
    }

    /// Build an engine from the preset problem named in the configuration.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let mesh = MovingQuadMesh::new(
            config.nx, config.ny, config.xmin, config.xmax, config.ymin, config.ymax,
        );
        let ics = InitialConditions::from_preset(&config.ics, &mesh)?;
        Self::new(config, &ics)
    }

    pub fn initialize(&mut self) {
        let totals = self.state.totals();
        log::info!(
            "Initialized {}x{} cells, total mass {:.6e}, total energy {:.6e}",
            self.mesh.nx(),
            self.mesh.ny(),
            totals.mass(),
            totals.energy()
        );
    }

    /// CFL-limited timestep, clamped so the run ends exactly at `tmax`.
    pub fn compute_timestep(&self) -> f64 {
        let dt = self.mesh.cfl_timestep(&self.state, &self.eos, self.cfl);
        dt.min(self.tmax - self.t)
    }

    pub fn evolve(&mut self, dt: f64) -> Result<(), HydroError> {
        self.stepper.advance(
            &mut self.mesh,
            &mut self.state,
            &self.boundary,
            &self.eos,
            self.t,
            dt,
        )?;
        self.t += dt;
        self.step += 1;
        Ok(())
    }

    pub fn finalize(&mut self) {
        let totals = self.state.totals();
        log::info!(
            "Finished at t = {:.6e} after {} steps, total mass {:.6e}, total energy {:.6e}",
            self.t,
            self.step,
            totals.mass(),
            totals.energy()
        );
    }

    /// The main loop: march until `tmax` or the step budget is exhausted.
    pub fn run(&mut self) -> Result<(), HydroError> {
        self.initialize();
        while self.t < self.tmax && self.step < self.max_steps {
            let dt = self.compute_timestep();
            self.evolve(dt)?;
            if self.step % 100 == 0 {
                log::info!("Step {}: t = {:.6e}, dt = {:.6e}", self.step, self.t, dt);
            }
        }
        self.finalize();
        Ok(())
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn step_count(&self) -> usize {
        self.step
    }

    pub fn mesh(&self) -> &MovingQuadMesh {
        &self.mesh
    }

    pub fn state(&self) -> &CellState {
        &self.state
    }

    /// Diagnostic accessor, aligned with the current (moved) grid.
    pub fn get_var(&self, name: &str) -> Result<Array2<f64>, ConfigError> {
        self.state.get_var(name, &self.mesh)
    }
}
