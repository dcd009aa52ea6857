use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{require_positive, SimError, SimResult};

// Cycle Traits
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CycleKind {
    Otto,
    Diesel,
    Atkinson,
}

impl CycleKind {
    pub const ALL: [CycleKind; 3] = [CycleKind::Otto, CycleKind::Atkinson, CycleKind::Diesel];

    pub fn name(&self) -> &'static str {
        match self {
            CycleKind::Otto => "Otto",
            CycleKind::Diesel => "Diesel",
            CycleKind::Atkinson => "Atkinson",
        }
    }

    /// Spark-ignited cycles burn a premixed charge at constant volume.
    pub fn is_spark_ignited(&self) -> bool {
        !matches!(self, CycleKind::Diesel)
    }
}

impl fmt::Display for CycleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CycleKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "otto" => Ok(CycleKind::Otto),
            "diesel" => Ok(CycleKind::Diesel),
            "atkinson" => Ok(CycleKind::Atkinson),
            _ => Err(SimError::UnknownCycle(s.to_string())),
        }
    }
}

/// One corner point of a closed cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThermodynamicState {
    /// Absolute pressure (Pa)
    pub pressure: f64,
    /// Cylinder volume (m³)
    pub volume: f64,
    /// Absolute temperature (K)
    pub temperature: f64,
}

impl ThermodynamicState {
    pub fn new(pressure: f64, volume: f64, temperature: f64) -> Self {
        ThermodynamicState { pressure, volume, temperature }
    }

    /// P·V (J)
    pub fn pv(&self) -> f64 {
        self.pressure * self.volume
    }

    /// Relative mismatch of P·V against m·R·T; zero for an exact ideal-gas state.
    pub fn ideal_gas_residual(&self, mass: f64, gas_constant: f64) -> f64 {
        let mrt = mass * gas_constant * self.temperature;
        (self.pv() - mrt).abs() / mrt.abs().max(f64::MIN_POSITIVE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineGeometry {
    /// Swept volume of all cylinders together (L)
    pub total_displacement_l: f64,
    pub cylinders: u32,
}

impl EngineGeometry {
    pub fn new(total_displacement_l: f64, cylinders: u32) -> SimResult<Self> {
        let geometry = EngineGeometry { total_displacement_l, cylinders };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> SimResult<()> {
        require_positive("total_displacement_l", self.total_displacement_l)?;
        if self.cylinders == 0 {
            return Err(SimError::invalid("cylinders", "at least one cylinder is required"));
        }
        Ok(())
    }

    /// Swept volume of a single cylinder (m³)
    pub fn per_cylinder_displacement_m3(&self) -> f64 {
        (self.total_displacement_l / 1000.0) / self.cylinders as f64
    }
}

impl Default for EngineGeometry {
    fn default() -> Self {
        EngineGeometry { total_displacement_l: 2.0, cylinders: 4 }
    }
}

// General Traits
#[derive(Debug, Clone, Copy)]
pub struct SimContext {
    pub dt: f64,
    pub t: f64,
}

pub trait Model {
    fn reset(&mut self);
}

/// Presentation-side models advanced by a periodic tick.
pub trait AnimationModel: Model {
    fn step_animation(&mut self, ctx: SimContext);
}
