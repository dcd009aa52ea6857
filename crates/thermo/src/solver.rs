//! Air-standard cycle solver
//!
//! Otto, Atkinson and Diesel share the geometry step and the adiabatic
//! compression 1→2. They differ only in how heat enters between 2 and 3
//! (`HeatAddition`) and in the ratio the charge expands by between 3 and 4.

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use simcore::{
    require_greater, require_positive, CycleKind, GasProperties, SimError, SimResult,
    ThermodynamicState,
};

use crate::params::CycleParameters;

/// Atkinson burns a leaner charge: alpha is scaled by this before use
pub const ATKINSON_ALPHA_DERATE: f64 = 0.82;

/// How heat enters the charge between states 2 and 3
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HeatAddition {
    /// Constant-volume burn: T3 = factor·T2, P3 = factor·P2
    Isochoric { factor: f64 },
    /// Constant-pressure burn: V3 = cutoff_ratio·V2, T3 = cutoff_ratio·T2
    Isobaric { cutoff_ratio: f64 },
}

/// Outcome of one cycle evaluation for a single cylinder
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CycleResult {
    pub kind: CycleKind,
    pub gas: GasProperties,
    /// Corner states; index 0 holds state 1
    pub states: [ThermodynamicState; 4],
    /// Trapped charge mass (kg)
    pub mass: f64,
    /// Qin (J)
    pub heat_in: f64,
    /// Qout (J)
    pub heat_out: f64,
    /// W = Qin − Qout (J per cycle per cylinder)
    pub net_work: f64,
    /// Closed-form thermal efficiency (0–1)
    pub efficiency: f64,
    pub compression_ratio: f64,
    /// Ratio the charge expands by between states 3 and 4
    pub expansion_ratio: f64,
    /// Expansion ratio for Atkinson, cutoff ratio for Diesel
    pub auxiliary_ratio: Option<f64>,
    pub heat_addition: HeatAddition,
}

impl CycleResult {
    /// Corner state by its 1-based label
    pub fn state(&self, corner: usize) -> Option<&ThermodynamicState> {
        corner.checked_sub(1).and_then(|i| self.states.get(i))
    }

    /// 1 − Qout/Qin
    pub fn energy_balance_efficiency(&self) -> f64 {
        1.0 - self.heat_out / self.heat_in
    }

    /// V1 − V2 (m³)
    pub fn displaced_volume(&self) -> f64 {
        self.states[0].volume - self.states[1].volume
    }

    /// Net work over swept volume (Pa)
    pub fn mean_effective_pressure(&self) -> f64 {
        self.net_work / self.displaced_volume()
    }

    pub fn peak_pressure(&self) -> f64 {
        self.states.iter().map(|s| s.pressure).fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn peak_temperature(&self) -> f64 {
        self.states.iter().map(|s| s.temperature).fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Finite and strictly positive in every coordinate
fn is_representable(state: &ThermodynamicState) -> bool {
    [state.pressure, state.volume, state.temperature]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
}

/// η = 1 − 1/r^(γ−1)
pub fn otto_efficiency(compression_ratio: f64, gamma: f64) -> f64 {
    1.0 - 1.0 / compression_ratio.powf(gamma - 1.0)
}

/// η = 1 − 1/r_exp^(γ−1); the expansion ratio sets Atkinson's efficiency
pub fn atkinson_efficiency(expansion_ratio: f64, gamma: f64) -> f64 {
    1.0 - 1.0 / expansion_ratio.powf(gamma - 1.0)
}

/// η = 1 − [1/r^(γ−1)]·[(rc^γ − 1)/(γ·(rc − 1))]
pub fn diesel_efficiency(compression_ratio: f64, cutoff_ratio: f64, gamma: f64) -> f64 {
    let load_term = (cutoff_ratio.powf(gamma) - 1.0) / (gamma * (cutoff_ratio - 1.0));
    1.0 - load_term / compression_ratio.powf(gamma - 1.0)
}

/// Single solver for all three cycle families
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSolver {
    kind: CycleKind,
    gas: GasProperties,
    atkinson_derate: f64,
}

impl CycleSolver {
    /// Solver using the standard working fluid for `kind`
    pub fn new(kind: CycleKind) -> Self {
        CycleSolver {
            kind,
            gas: GasProperties::for_cycle(kind),
            atkinson_derate: ATKINSON_ALPHA_DERATE,
        }
    }

    pub fn with_gas(mut self, gas: GasProperties) -> Self {
        self.gas = gas;
        self
    }

    pub fn kind(&self) -> CycleKind {
        self.kind
    }

    pub fn gas(&self) -> GasProperties {
        self.gas
    }

    pub fn solve(&self, params: &CycleParameters) -> SimResult<CycleResult> {
        if let Err(err) = self.validate(params) {
            warn!("{} cycle rejected: {}", self.kind, err);
            return Err(err);
        }
        debug!(
            "solving {} cycle: r={} aux={} P1={} Pa T1={} K alpha={} {} L / {} cyl",
            self.kind,
            params.compression_ratio,
            params.auxiliary_ratio,
            params.intake_pressure,
            params.intake_temperature,
            params.alpha,
            params.geometry.total_displacement_l,
            params.geometry.cylinders,
        );

        let gamma = self.gas.gamma;
        let cv = self.gas.cv();
        let r = params.compression_ratio;

        // Geometry
        let displaced = params.geometry.per_cylinder_displacement_m3();
        if displaced <= 0.0 {
            return Err(SimError::invalid(
                "total_displacement_l",
                format!("per-cylinder volume of {} L underflows", params.geometry.total_displacement_l),
            ));
        }
        let clearance = displaced / (r - 1.0);
        let v1 = displaced + clearance;
        let v2 = clearance;

        let state_1 = ThermodynamicState::new(params.intake_pressure, v1, params.intake_temperature);
        let mass = state_1.pv() / (self.gas.gas_constant * state_1.temperature);
        if !mass.is_finite() {
            return Err(self.unrepresentable("intake_temperature", mass));
        }
        if mass <= 0.0 {
            return Err(self.unrepresentable("intake_pressure", mass));
        }

        // 1 → 2, adiabatic compression
        let state_2 = ThermodynamicState::new(
            state_1.pressure * r.powf(gamma),
            v2,
            state_1.temperature * r.powf(gamma - 1.0),
        );
        if !is_representable(&state_2) {
            return Err(self.unrepresentable("compression_ratio", state_2.pressure));
        }

        // 2 → 3, heat addition
        let heat_addition = self.heat_addition(params);
        let (state_3, heat_in) = match heat_addition {
            HeatAddition::Isochoric { factor } => {
                let state_3 = ThermodynamicState::new(
                    state_2.pressure * factor,
                    state_2.volume,
                    state_2.temperature * factor,
                );
                (state_3, mass * cv * (state_3.temperature - state_2.temperature))
            }
            HeatAddition::Isobaric { cutoff_ratio } => {
                let state_3 = ThermodynamicState::new(
                    state_2.pressure,
                    state_2.volume * cutoff_ratio,
                    state_2.temperature * cutoff_ratio,
                );
                (state_3, mass * self.gas.cp() * (state_3.temperature - state_2.temperature))
            }
        };
        let combustion_field = match heat_addition {
            HeatAddition::Isochoric { .. } => "alpha",
            HeatAddition::Isobaric { .. } => "cutoff_ratio",
        };
        if !is_representable(&state_3) || !heat_in.is_finite() {
            return Err(self.unrepresentable(combustion_field, heat_in));
        }

        // 3 → 4, adiabatic expansion
        let expansion_ratio = match self.kind {
            CycleKind::Otto => r,
            CycleKind::Atkinson => params.auxiliary_ratio,
            CycleKind::Diesel => v1 / state_3.volume,
        };
        let v4 = match self.kind {
            CycleKind::Atkinson => v1 * (expansion_ratio / r),
            CycleKind::Otto | CycleKind::Diesel => v1,
        };
        let state_4 = ThermodynamicState::new(
            state_3.pressure / expansion_ratio.powf(gamma),
            v4,
            state_3.temperature / expansion_ratio.powf(gamma - 1.0),
        );

        if !is_representable(&state_4) {
            let field = match self.kind {
                CycleKind::Atkinson => "expansion_ratio",
                CycleKind::Otto | CycleKind::Diesel => "compression_ratio",
            };
            return Err(self.unrepresentable(field, state_4.pressure));
        }

        let heat_out = mass * cv * (state_4.temperature - state_1.temperature);
        let net_work = heat_in - heat_out;

        let (efficiency, auxiliary_ratio) = match self.kind {
            CycleKind::Otto => (otto_efficiency(r, gamma), None),
            CycleKind::Atkinson => (
                atkinson_efficiency(expansion_ratio, gamma),
                Some(params.auxiliary_ratio),
            ),
            CycleKind::Diesel => (
                diesel_efficiency(r, params.auxiliary_ratio, gamma),
                Some(params.auxiliary_ratio),
            ),
        };

        let result = CycleResult {
            kind: self.kind,
            gas: self.gas,
            states: [state_1, state_2, state_3, state_4],
            mass,
            heat_in,
            heat_out,
            net_work,
            efficiency,
            compression_ratio: r,
            expansion_ratio,
            auxiliary_ratio,
            heat_addition,
        };

        if !result.net_work.is_finite() || !result.efficiency.is_finite() {
            return Err(self.unrepresentable(combustion_field, result.net_work));
        }

        trace!(
            "{} cycle: Qin={:.3} J Qout={:.3} J W={:.3} J eta={:.5}",
            self.kind, result.heat_in, result.heat_out, result.net_work, result.efficiency
        );
        Ok(result)
    }

    fn unrepresentable(&self, field: &'static str, value: f64) -> SimError {
        warn!("{} cycle left the representable range at `{}` ({})", self.kind, field, value);
        SimError::invalid(field, format!("drives the {} cycle out of range ({value})", self.kind))
    }

    fn heat_addition(&self, params: &CycleParameters) -> HeatAddition {
        match self.kind {
            CycleKind::Otto => HeatAddition::Isochoric { factor: params.alpha },
            CycleKind::Atkinson => HeatAddition::Isochoric {
                factor: params.alpha * self.atkinson_derate,
            },
            CycleKind::Diesel => HeatAddition::Isobaric {
                cutoff_ratio: params.auxiliary_ratio,
            },
        }
    }

    /// Rejects out-of-domain inputs before any state is computed
    pub fn validate(&self, params: &CycleParameters) -> SimResult<()> {
        self.gas.validate()?;
        require_greater("compression_ratio", params.compression_ratio, 1.0, "one")?;
        require_positive("intake_pressure", params.intake_pressure)?;
        require_positive("intake_temperature", params.intake_temperature)?;
        params.geometry.validate()?;

        match self.kind {
            CycleKind::Otto => {
                require_greater("alpha", params.alpha, 1.0, "one")?;
            }
            CycleKind::Atkinson => {
                require_greater(
                    "expansion_ratio",
                    params.auxiliary_ratio,
                    params.compression_ratio,
                    "the compression ratio",
                )?;
                require_positive("alpha", params.alpha)?;
                let derated = params.alpha * self.atkinson_derate;
                if derated <= 1.0 {
                    return Err(SimError::invalid(
                        "alpha",
                        format!("derated combustion factor {derated} must exceed one"),
                    ));
                }
            }
            CycleKind::Diesel => {
                require_greater("cutoff_ratio", params.auxiliary_ratio, 1.0, "one")?;
                if params.auxiliary_ratio >= params.compression_ratio {
                    return Err(SimError::invalid(
                        "cutoff_ratio",
                        format!(
                            "must be below the compression ratio ({}), got {}",
                            params.compression_ratio, params.auxiliary_ratio
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}
