use lagrangian_hydro::{Config, Engine};
use yaml_rust::YamlLoader;

pub fn get_engine(cfg: &str) -> Engine {
    let docs = YamlLoader::load_from_str(cfg).expect("Error loading config!");
    let config = Config::parse(&docs[0]).expect("Error parsing config!");
    Engine::from_config(&config).expect("Error initializing engine!")
}

/// Value of `var` in the row-0 cell whose centroid is closest to `x`.
#[allow(dead_code)]
pub fn sample_row(engine: &Engine, var: &str, x: f64) -> f64 {
    let values = engine.get_var(var).expect("Error getting variable!");
    let mesh = engine.mesh();
    let mut best = (f64::INFINITY, 0);
    for i in 0..mesh.nx() {
        let d = (mesh.centroid(0, i).x - x).abs();
        if d < best.0 {
            best = (d, i);
        }
    }
    values[(0, best.1)]
}
