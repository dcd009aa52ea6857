//! Working-fluid constants for the air-standard cycle models.
//!
//! Each cycle family gets its own specific heat ratio, so the gas model is a
//! value handed to the solver rather than a process-wide constant.

use serde::{Deserialize, Serialize};

use crate::error::{require_greater, require_positive, SimResult};
use crate::traits::CycleKind;

/// Specific gas constant of dry air (J/(kg·K))
pub const GAS_CONSTANT_AIR: f64 = 287.0;

/// Specific heat ratio used for spark-ignition charges (Otto, Atkinson)
pub const GAMMA_SPARK_IGNITION: f64 = 1.40;

/// Specific heat ratio used for the Diesel charge
pub const GAMMA_DIESEL: f64 = 1.35;

/// Ideal, calorically perfect gas: constant R and γ.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GasProperties {
    /// Specific gas constant R (J/(kg·K))
    pub gas_constant: f64,
    /// Specific heat ratio γ = cp/cv
    pub gamma: f64,
}

impl GasProperties {
    pub fn new(gas_constant: f64, gamma: f64) -> Self {
        GasProperties { gas_constant, gamma }
    }

    pub fn air() -> Self {
        GasProperties::new(GAS_CONSTANT_AIR, GAMMA_SPARK_IGNITION)
    }

    pub fn diesel_charge() -> Self {
        GasProperties::new(GAS_CONSTANT_AIR, GAMMA_DIESEL)
    }

    pub fn for_cycle(kind: CycleKind) -> Self {
        match kind {
            CycleKind::Otto | CycleKind::Atkinson => GasProperties::air(),
            CycleKind::Diesel => GasProperties::diesel_charge(),
        }
    }

    /// Specific heat at constant volume, R/(γ−1)
    pub fn cv(&self) -> f64 {
        self.gas_constant / (self.gamma - 1.0)
    }

    /// Specific heat at constant pressure, γ·cv
    pub fn cp(&self) -> f64 {
        self.gamma * self.cv()
    }

    pub fn validate(&self) -> SimResult<()> {
        require_positive("gas_constant", self.gas_constant)?;
        require_greater("gamma", self.gamma, 1.0, "one")?;
        Ok(())
    }
}

impl Default for GasProperties {
    fn default() -> Self {
        GasProperties::air()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_air_specific_heats() {
        let air = GasProperties::air();
        // cv = 287 / 0.4 = 717.5, cp = 1.4 * 717.5 = 1004.5
        assert!((air.cv() - 717.5).abs() < 1e-9);
        assert!((air.cp() - 1004.5).abs() < 1e-9);
        assert!((air.cp() - air.cv() - air.gas_constant).abs() < 1e-9);
    }

    #[test]
    fn test_gamma_per_cycle() {
        assert_eq!(GasProperties::for_cycle(CycleKind::Otto).gamma, 1.40);
        assert_eq!(GasProperties::for_cycle(CycleKind::Atkinson).gamma, 1.40);
        assert_eq!(GasProperties::for_cycle(CycleKind::Diesel).gamma, 1.35);
    }

    #[test]
    fn test_validate_rejects_isothermal_gamma() {
        assert!(GasProperties::new(287.0, 1.0).validate().is_err());
        assert!(GasProperties::new(0.0, 1.4).validate().is_err());
        assert!(GasProperties::air().validate().is_ok());
    }
}
