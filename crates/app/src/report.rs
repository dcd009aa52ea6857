//! Report and CSV output of one simulation run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use simcore::{CycleKind, SimResult, ThermodynamicState};
use thermo::{CurveSample, CycleResult, PowerOutput};

use crate::config::EngineLayout;

pub const CSV_HEADER: &str = "volume_l,pressure_kpa,temperature_k,process";

pub fn to_liters(volume_m3: f64) -> f64 {
    volume_m3 * 1000.0
}

pub fn to_kpa(pressure_pa: f64) -> f64 {
    pressure_pa / 1000.0
}

/// One corner state in display units
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    pub state: usize,
    pub pressure_kpa: f64,
    pub volume_l: f64,
    pub temperature_k: f64,
}

impl StateReport {
    fn new(state: usize, s: &ThermodynamicState) -> Self {
        StateReport {
            state,
            pressure_kpa: to_kpa(s.pressure),
            volume_l: to_liters(s.volume),
            temperature_k: s.temperature,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub cycle: CycleKind,
    pub layout: EngineLayout,
    pub cylinders: u32,
    pub displacement_l: f64,
    pub rpm: f64,
    pub compression_ratio: f64,
    pub expansion_ratio: f64,
    pub auxiliary_ratio: Option<f64>,
    pub gamma: f64,
    pub intake_pressure_kpa: f64,
    pub charge_mass_kg: f64,
    pub states: Vec<StateReport>,
    pub heat_in_j: f64,
    pub heat_out_j: f64,
    pub net_work_j: f64,
    pub efficiency: f64,
    pub mean_effective_pressure_kpa: f64,
    pub peak_pressure_kpa: f64,
    pub peak_temperature_k: f64,
    pub power: PowerOutput,
    pub curve_points: usize,
    /// ∮P dV of the sampled loop (J)
    pub enclosed_work_j: f64,
}

impl SimulationReport {
    pub fn new(
        layout: EngineLayout,
        rpm: f64,
        result: &CycleResult,
        curve: &CurveSample,
        power: PowerOutput,
    ) -> Self {
        let displaced = result.displaced_volume() * layout.cylinders() as f64;
        SimulationReport {
            cycle: result.kind,
            layout,
            cylinders: layout.cylinders(),
            displacement_l: to_liters(displaced),
            rpm,
            compression_ratio: result.compression_ratio,
            expansion_ratio: result.expansion_ratio,
            auxiliary_ratio: result.auxiliary_ratio,
            gamma: result.gas.gamma,
            intake_pressure_kpa: to_kpa(result.states[0].pressure),
            charge_mass_kg: result.mass,
            states: result
                .states
                .iter()
                .enumerate()
                .map(|(i, s)| StateReport::new(i + 1, s))
                .collect(),
            heat_in_j: result.heat_in,
            heat_out_j: result.heat_out,
            net_work_j: result.net_work,
            efficiency: result.efficiency,
            mean_effective_pressure_kpa: to_kpa(result.mean_effective_pressure()),
            peak_pressure_kpa: to_kpa(result.peak_pressure()),
            peak_temperature_k: result.peak_temperature(),
            power,
            curve_points: curve.len(),
            enclosed_work_j: curve.enclosed_work(),
        }
    }

    /// One-line human summary
    pub fn summary(&self) -> String {
        format!(
            "{} {} ({} cyl): {:.2} kW | {:.2} cv | efficiency {:.2}% | work {:.2} J",
            self.cycle,
            self.layout,
            self.cylinders,
            self.power.kilowatts,
            self.power.horsepower,
            self.efficiency * 100.0,
            self.net_work_j
        )
    }

    pub fn to_json_pretty(&self) -> SimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes the curve as `volume_l,pressure_kpa,temperature_k,process` rows
pub fn write_curve_csv<W: Write>(curve: &CurveSample, mut writer: W) -> SimResult<()> {
    writeln!(writer, "{CSV_HEADER}")?;
    for leg in &curve.legs {
        for i in leg.range() {
            writeln!(
                writer,
                "{},{},{},{}",
                to_liters(curve.volumes[i]),
                to_kpa(curve.pressures[i]),
                curve.temperatures[i],
                leg.process.label()
            )?;
        }
    }
    writer.flush()?;
    Ok(())
}

pub fn save_curve_csv(curve: &CurveSample, path: &Path) -> SimResult<()> {
    let file = File::create(path)?;
    write_curve_csv(curve, BufWriter::new(file))
}
