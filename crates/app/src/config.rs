//! Runner configuration, loaded from JSON.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::LevelFilter;
use serde::{Deserialize, Serialize};
use simcore::{require_positive, CycleKind, EngineGeometry, SimError, SimResult};
use thermo::{
    default_compression_ratio, Aspiration, CycleParameters, SamplerConfig, DEFAULT_ALPHA,
    DEFAULT_ATKINSON_EXPANSION_FACTOR, DEFAULT_CUTOFF_RATIO, DEFAULT_INTAKE_PRESSURE,
    DEFAULT_INTAKE_TEMPERATURE,
};

/// Cylinder arrangement; only the count matters to the cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum EngineLayout {
    I3,
    #[default]
    I4,
    I5,
    V6,
    V8,
    V10,
    V12,
    W16,
}

impl EngineLayout {
    pub const ALL: [EngineLayout; 8] = [
        EngineLayout::I3,
        EngineLayout::I4,
        EngineLayout::I5,
        EngineLayout::V6,
        EngineLayout::V8,
        EngineLayout::V10,
        EngineLayout::V12,
        EngineLayout::W16,
    ];

    pub fn cylinders(&self) -> u32 {
        match self {
            EngineLayout::I3 => 3,
            EngineLayout::I4 => 4,
            EngineLayout::I5 => 5,
            EngineLayout::V6 => 6,
            EngineLayout::V8 => 8,
            EngineLayout::V10 => 10,
            EngineLayout::V12 => 12,
            EngineLayout::W16 => 16,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EngineLayout::I3 => "I3",
            EngineLayout::I4 => "I4",
            EngineLayout::I5 => "I5",
            EngineLayout::V6 => "V6",
            EngineLayout::V8 => "V8",
            EngineLayout::V10 => "V10",
            EngineLayout::V12 => "V12",
            EngineLayout::W16 => "W16",
        }
    }
}

impl fmt::Display for EngineLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for EngineLayout {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        EngineLayout::ALL
            .into_iter()
            .find(|layout| layout.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| SimError::UnknownLayout(s.to_string()))
    }
}

impl TryFrom<String> for EngineLayout {
    type Error = SimError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub cycle: CycleKind,
    /// Total swept volume (L)
    pub displacement_l: f64,
    pub layout: EngineLayout,
    /// Falls back to the cycle's typical value when absent
    pub compression_ratio: Option<f64>,
    /// Before aspiration boost (Pa)
    pub intake_pressure: f64,
    pub aspiration: Aspiration,
    /// K
    pub intake_temperature: f64,
    pub alpha: f64,
    /// Atkinson expansion ratio = factor · compression ratio
    pub atkinson_expansion_factor: f64,
    pub cutoff_ratio: f64,
    pub rpm: f64,
    pub sampler: SamplerConfig,
    /// off, error, warn, info, debug or trace
    pub log_level: String,
    pub log_file: Option<PathBuf>,
    pub csv_path: Option<PathBuf>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            cycle: CycleKind::Otto,
            displacement_l: 2.0,
            layout: EngineLayout::I4,
            compression_ratio: None,
            intake_pressure: DEFAULT_INTAKE_PRESSURE,
            aspiration: Aspiration::Natural,
            intake_temperature: DEFAULT_INTAKE_TEMPERATURE,
            alpha: DEFAULT_ALPHA,
            atkinson_expansion_factor: DEFAULT_ATKINSON_EXPANSION_FACTOR,
            cutoff_ratio: DEFAULT_CUTOFF_RATIO,
            rpm: 3000.0,
            sampler: SamplerConfig::default(),
            log_level: "info".to_string(),
            log_file: None,
            csv_path: None,
        }
    }
}

impl SimulationConfig {
    pub fn load(path: &Path) -> SimResult<Self> {
        let text = fs::read_to_string(path)?;
        SimulationConfig::from_json(&text)
    }

    pub fn from_json(text: &str) -> SimResult<Self> {
        let config: SimulationConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks what the cycle solver does not see; cycle inputs are checked by the solver
    pub fn validate(&self) -> SimResult<()> {
        self.sampler.validate()?;
        self.log_level()?;
        if !self.rpm.is_finite() || self.rpm < 0.0 {
            return Err(SimError::invalid("rpm", format!("must be a finite non-negative speed, got {}", self.rpm)));
        }
        if self.cycle == CycleKind::Atkinson {
            require_positive("atkinson_expansion_factor", self.atkinson_expansion_factor)?;
        }
        Ok(())
    }

    pub fn compression_ratio(&self) -> f64 {
        self.compression_ratio.unwrap_or_else(|| default_compression_ratio(self.cycle))
    }

    pub fn cylinders(&self) -> u32 {
        self.layout.cylinders()
    }

    pub fn geometry(&self) -> EngineGeometry {
        EngineGeometry { total_displacement_l: self.displacement_l, cylinders: self.cylinders() }
    }

    /// Solver inputs with the aspiration boost applied
    pub fn cycle_parameters(&self) -> CycleParameters {
        let r = self.compression_ratio();
        let params = match self.cycle {
            CycleKind::Otto => CycleParameters::otto(r, self.alpha),
            CycleKind::Atkinson => {
                CycleParameters::atkinson(r, r * self.atkinson_expansion_factor, self.alpha)
            }
            CycleKind::Diesel => CycleParameters::diesel(r, self.cutoff_ratio),
        };
        params
            .with_intake(self.intake_pressure, self.intake_temperature)
            .with_aspiration(self.aspiration)
            .with_geometry(self.geometry())
    }

    pub fn log_level(&self) -> SimResult<LevelFilter> {
        LevelFilter::from_str(self.log_level.trim())
            .map_err(|_| SimError::invalid("log_level", format!("unknown level `{}`", self.log_level)))
    }
}
