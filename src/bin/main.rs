use std::{fs, path};

use clap::Parser;
use lagrangian_hydro::{Config, Engine};
use yaml_rust::YamlLoader;

#[derive(Parser)]
pub struct Cli {
    /// The path to the config file to read
    #[clap(parse(from_os_str))]
    pub config: path::PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // parse command line parameters
    let args = Cli::parse();

    // read configuration
    let docs = YamlLoader::load_from_str(&fs::read_to_string(args.config)?)?;
    let config = Config::parse(&docs[0])?;

    // Setup and run simulation
    let mut engine = Engine::from_config(&config)?;
    engine.run()?;

    println!("Done!");
    Ok(())
}
