//! Operating point of a single cycle evaluation.

use serde::{Deserialize, Serialize};
use simcore::{CycleKind, EngineGeometry};

/// Standard sea-level intake pressure (Pa)
pub const DEFAULT_INTAKE_PRESSURE: f64 = 101_325.0;
/// Intake charge temperature (K)
pub const DEFAULT_INTAKE_TEMPERATURE: f64 = 300.0;
/// Ratio T3/T2 of the constant-volume burn
pub const DEFAULT_ALPHA: f64 = 3.35;
/// Atkinson expansion ratio as a multiple of its compression ratio
pub const DEFAULT_ATKINSON_EXPANSION_FACTOR: f64 = 1.25;
pub const DEFAULT_CUTOFF_RATIO: f64 = 2.0;
/// Intake pressure multiplier for a turbocharged engine
pub const TURBO_BOOST_FACTOR: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Aspiration {
    #[default]
    Natural,
    Turbo,
}

impl Aspiration {
    pub fn boost_factor(&self) -> f64 {
        match self {
            Aspiration::Natural => 1.0,
            Aspiration::Turbo => TURBO_BOOST_FACTOR,
        }
    }
}

/// Inputs of one cycle evaluation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleParameters {
    /// r = V1 / V2
    pub compression_ratio: f64,
    /// Expansion ratio for Atkinson, cutoff ratio for Diesel. Unused by Otto.
    pub auxiliary_ratio: f64,
    /// P1 (Pa)
    pub intake_pressure: f64,
    /// T1 (K)
    pub intake_temperature: f64,
    /// Combustion intensity T3/T2 for the constant-volume cycles
    pub alpha: f64,
    #[serde(flatten)]
    pub geometry: EngineGeometry,
}

impl CycleParameters {
    pub fn otto(compression_ratio: f64, alpha: f64) -> Self {
        CycleParameters {
            compression_ratio,
            auxiliary_ratio: compression_ratio,
            intake_pressure: DEFAULT_INTAKE_PRESSURE,
            intake_temperature: DEFAULT_INTAKE_TEMPERATURE,
            alpha,
            geometry: EngineGeometry::default(),
        }
    }

    pub fn atkinson(compression_ratio: f64, expansion_ratio: f64, alpha: f64) -> Self {
        CycleParameters {
            auxiliary_ratio: expansion_ratio,
            ..CycleParameters::otto(compression_ratio, alpha)
        }
    }

    pub fn diesel(compression_ratio: f64, cutoff_ratio: f64) -> Self {
        CycleParameters {
            auxiliary_ratio: cutoff_ratio,
            ..CycleParameters::otto(compression_ratio, DEFAULT_ALPHA)
        }
    }

    /// Typical operating point for each cycle family
    pub fn defaults_for(kind: CycleKind) -> Self {
        let r = default_compression_ratio(kind);
        match kind {
            CycleKind::Otto => CycleParameters::otto(r, DEFAULT_ALPHA),
            CycleKind::Atkinson => {
                CycleParameters::atkinson(r, r * DEFAULT_ATKINSON_EXPANSION_FACTOR, DEFAULT_ALPHA)
            }
            CycleKind::Diesel => CycleParameters::diesel(r, DEFAULT_CUTOFF_RATIO),
        }
    }

    pub fn with_intake(mut self, pressure: f64, temperature: f64) -> Self {
        self.intake_pressure = pressure;
        self.intake_temperature = temperature;
        self
    }

    pub fn with_geometry(mut self, geometry: EngineGeometry) -> Self {
        self.geometry = geometry;
        self
    }

    pub fn with_displacement(mut self, total_displacement_l: f64, cylinders: u32) -> Self {
        self.geometry = EngineGeometry { total_displacement_l, cylinders };
        self
    }

    /// Scales the intake pressure by the aspiration boost
    pub fn with_aspiration(mut self, aspiration: Aspiration) -> Self {
        self.intake_pressure *= aspiration.boost_factor();
        self
    }
}

pub fn default_compression_ratio(kind: CycleKind) -> f64 {
    match kind {
        CycleKind::Otto => 10.0,
        CycleKind::Atkinson => 12.0,
        CycleKind::Diesel => 18.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_cycle() {
        let atkinson = CycleParameters::defaults_for(CycleKind::Atkinson);
        assert_eq!(atkinson.compression_ratio, 12.0);
        assert!((atkinson.auxiliary_ratio - 15.0).abs() < 1e-12);

        let diesel = CycleParameters::defaults_for(CycleKind::Diesel);
        assert_eq!(diesel.compression_ratio, 18.0);
        assert_eq!(diesel.auxiliary_ratio, 2.0);

        let otto = CycleParameters::defaults_for(CycleKind::Otto);
        assert_eq!(otto.intake_pressure, 101_325.0);
        assert_eq!(otto.geometry.cylinders, 4);
    }

    #[test]
    fn test_turbo_boosts_intake_pressure() {
        let params = CycleParameters::otto(10.0, 3.35).with_aspiration(Aspiration::Turbo);
        assert!((params.intake_pressure - 151_987.5).abs() < 1e-9);

        let natural = CycleParameters::otto(10.0, 3.35).with_aspiration(Aspiration::Natural);
        assert_eq!(natural.intake_pressure, DEFAULT_INTAKE_PRESSURE);
    }

    #[test]
    fn test_geometry_is_flattened_in_json() {
        let params = CycleParameters::otto(10.0, 3.35).with_displacement(1.6, 4);
        let json = serde_json::to_string(&params).unwrap();
        assert!(json.contains("\"total_displacement_l\":1.6"));
        assert!(!json.contains("geometry"));

        let back: CycleParameters = serde_json::from_str(&json).unwrap();
        assert_eq!(back, params);
    }
}
