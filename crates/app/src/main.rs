use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use engine_sim_app::{init_logging, run_simulation, save_curve_csv, SimulationConfig};
use log::info;
use simcore::SimResult;

fn run() -> SimResult<()> {
    let config = match env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => SimulationConfig::load(&path)?,
        None => SimulationConfig::default(),
    };
    init_logging(&config)?;

    let run = run_simulation(&config)?;
    println!("{}", run.report.to_json_pretty()?);

    if let Some(path) = &config.csv_path {
        save_curve_csv(&run.curve, path)?;
        info!("curve written to {}", path.display());
    }
    Ok(())
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("engine-sim: {err}");
            ExitCode::FAILURE
        }
    }
}
