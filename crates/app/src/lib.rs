//! Command-line runner for the engine cycle simulator
//!
//! This crate provides:
//! - JSON run configuration with engine layouts and per-cycle defaults
//! - The solve → sample → power pipeline behind the `engine-sim` binary
//! - JSON report and CSV curve output
//! - simplelog setup for the binary

pub mod config;
pub mod logging;
pub mod report;

pub use config::*;
pub use logging::*;
pub use report::*;

use log::{debug, info};
use simcore::SimResult;
use thermo::{derive_power, CurveSample, CurveSampler, CycleResult, CycleSolver, PowerOutput};

/// Everything one run produces
#[derive(Debug, Clone)]
pub struct SimulationRun {
    pub result: CycleResult,
    pub curve: CurveSample,
    pub power: PowerOutput,
    pub report: SimulationReport,
}

/// Solves, samples and rates the engine described by `config`
pub fn run_simulation(config: &SimulationConfig) -> SimResult<SimulationRun> {
    config.validate()?;
    let params = config.cycle_parameters();
    let result = CycleSolver::new(config.cycle).solve(&params)?;

    let curve = CurveSampler::with_config(config.sampler)?.sample(&result);
    debug!(
        "sampled {} points over {} legs, enclosed work {:.3} J",
        curve.len(),
        curve.legs.len(),
        curve.enclosed_work()
    );

    let power = derive_power(result.net_work, config.rpm, config.cylinders());
    let report = SimulationReport::new(config.layout, config.rpm, &result, &curve, power);
    info!("{}", report.summary());

    Ok(SimulationRun { result, curve, power, report })
}

#[cfg(test)]
mod tests {
    use super::*;
    use simcore::{CycleKind, SimError};

    #[test]
    fn test_reference_otto_run() {
        let run = run_simulation(&SimulationConfig::default()).unwrap();
        assert!((run.result.efficiency - 0.601893).abs() < 1e-5);
        assert!(run.result.net_work > 0.0);
        assert!((run.power.kilowatts - run.result.net_work * 25.0 * 4.0 / 1000.0).abs() < 1e-9);
        assert_eq!(run.report.cycle, CycleKind::Otto);
    }

    #[test]
    fn test_every_cycle_runs_with_defaults() {
        for cycle in CycleKind::ALL {
            let config = SimulationConfig { cycle, ..SimulationConfig::default() };
            let run = run_simulation(&config).unwrap();
            assert_eq!(run.result.kind, cycle);
            assert!(run.power.watts > 0.0);
        }
    }

    #[test]
    fn test_invalid_inputs_surface_field() {
        let config = SimulationConfig { compression_ratio: Some(1.0), ..SimulationConfig::default() };
        let err = run_simulation(&config).unwrap_err();
        assert_eq!(err.field(), Some("compression_ratio"));

        let config = SimulationConfig { displacement_l: -2.0, ..SimulationConfig::default() };
        assert!(matches!(
            run_simulation(&config),
            Err(SimError::InvalidParameter { field: "total_displacement_l", .. })
        ));
    }
}
