//! Engine power from the net work of one cycle.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

/// A four-stroke cylinder fires once every two crank revolutions: f = rpm / 120
pub const FIRING_DIVISOR: f64 = 120.0;
/// Watts per metric horsepower
pub const WATTS_PER_HORSEPOWER: f64 = 735.5;

/// Indicated power of the whole engine at one speed
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PowerOutput {
    /// Cycles per second of one cylinder
    pub frequency_hz: f64,
    pub watts: f64,
    pub kilowatts: f64,
    /// Metric horsepower (cv)
    pub horsepower: f64,
    /// Mean crankshaft torque, P / ω
    pub indicated_torque_nm: f64,
}

/// Scales one cylinder's net work per cycle to engine power.
/// Non-positive speeds produce zero output.
pub fn derive_power(net_work: f64, rpm: f64, cylinders: u32) -> PowerOutput {
    if rpm.is_nan() || rpm <= 0.0 {
        return PowerOutput::default();
    }
    let frequency_hz = rpm / FIRING_DIVISOR;
    let watts = net_work * frequency_hz * cylinders as f64;
    let omega = 2.0 * PI * rpm / 60.0;
    PowerOutput {
        frequency_hz,
        watts,
        kilowatts: watts / 1000.0,
        horsepower: watts / WATTS_PER_HORSEPOWER,
        indicated_torque_nm: watts / omega,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_reference_power_point() {
        let power = derive_power(500.0, 3000.0, 4);
        assert_relative_eq!(power.frequency_hz, 25.0);
        assert_relative_eq!(power.watts, 50_000.0);
        assert_relative_eq!(power.kilowatts, 50.0);
        assert_relative_eq!(power.horsepower, 50_000.0 / 735.5);
    }

    #[test]
    fn test_torque_matches_work_per_revolution() {
        // Each cylinder fires every 4π rad of crank angle
        let power = derive_power(500.0, 3000.0, 4);
        assert_relative_eq!(power.indicated_torque_nm, 500.0 * 4.0 / (4.0 * PI), max_relative = 1e-12);
    }

    #[test]
    fn test_stopped_engine_makes_no_power() {
        assert_eq!(derive_power(500.0, 0.0, 4), PowerOutput::default());
        assert_eq!(derive_power(500.0, -100.0, 4).watts, 0.0);
        assert_eq!(derive_power(500.0, f64::NAN, 4).watts, 0.0);
    }

    #[test]
    fn test_power_is_linear_in_speed_and_cylinders() {
        let base = derive_power(420.0, 2000.0, 4);
        assert_relative_eq!(derive_power(420.0, 4000.0, 4).watts, 2.0 * base.watts);
        assert_relative_eq!(derive_power(420.0, 2000.0, 8).watts, 2.0 * base.watts);
    }
}
