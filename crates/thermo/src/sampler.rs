//! Piecewise sampling of a solved cycle into a closed P-V-T loop.
//!
//! Every leg is sampled along its own process shape and its first and last
//! samples are the endpoint states themselves, so the corners never drift.

use std::ops::Range;

use serde::{Deserialize, Serialize};
use simcore::{SimError, SimResult, ThermodynamicState};

use crate::solver::{CycleResult, HeatAddition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Process {
    /// Cosmetic intake stroke at P1, V2 → V1
    Intake,
    Compression,
    Combustion,
    Expansion,
    /// Constant-volume blowdown after expansion
    Exhaust,
    /// Constant-pressure return to state 1 when state 4 lies beyond V1
    HeatRejection,
    /// Cosmetic exhaust stroke at P1, V1 → V2
    ExhaustStroke,
}

impl Process {
    /// Breathing legs close the picture only; they carry no cycle heat or work.
    pub fn is_breathing(&self) -> bool {
        matches!(self, Process::Intake | Process::ExhaustStroke)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Process::Intake => "intake",
            Process::Compression => "compression",
            Process::Combustion => "combustion",
            Process::Expansion => "expansion",
            Process::Exhaust => "exhaust",
            Process::HeatRejection => "heat rejection",
            Process::ExhaustStroke => "exhaust stroke",
        }
    }
}

/// Index range of one leg inside a `CurveSample`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegSpan {
    pub process: Process,
    pub start: usize,
    /// Exclusive
    pub end: usize,
}

impl LegSpan {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

/// Point counts per leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    pub compression_points: usize,
    pub combustion_points: usize,
    pub expansion_points: usize,
    pub exhaust_points: usize,
    pub breathing_points: usize,
    pub include_breathing: bool,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        SamplerConfig {
            compression_points: 50,
            combustion_points: 25,
            expansion_points: 50,
            exhaust_points: 25,
            breathing_points: 25,
            include_breathing: true,
        }
    }
}

impl SamplerConfig {
    /// Same point count on every leg
    pub fn uniform(points: usize) -> Self {
        SamplerConfig {
            compression_points: points,
            combustion_points: points,
            expansion_points: points,
            exhaust_points: points,
            breathing_points: points,
            include_breathing: true,
        }
    }

    pub fn with_breathing(mut self, include_breathing: bool) -> Self {
        self.include_breathing = include_breathing;
        self
    }

    pub fn validate(&self) -> SimResult<()> {
        let counts = [
            ("compression_points", self.compression_points),
            ("combustion_points", self.combustion_points),
            ("expansion_points", self.expansion_points),
            ("exhaust_points", self.exhaust_points),
            ("breathing_points", self.breathing_points),
        ];
        for (field, count) in counts {
            if count < 2 {
                return Err(SimError::invalid(field, format!("a leg needs at least 2 points, got {count}")));
            }
        }
        Ok(())
    }
}

/// Closed loop as parallel arrays, ordered intake → compression → combustion
/// → expansion → exhaust (→ exhaust stroke)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CurveSample {
    /// m³
    pub volumes: Vec<f64>,
    /// Pa
    pub pressures: Vec<f64>,
    /// K
    pub temperatures: Vec<f64>,
    pub legs: Vec<LegSpan>,
}

impl CurveSample {
    pub fn len(&self) -> usize {
        self.volumes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volumes.is_empty()
    }

    pub fn point(&self, index: usize) -> Option<ThermodynamicState> {
        Some(ThermodynamicState::new(
            *self.pressures.get(index)?,
            *self.volumes.get(index)?,
            *self.temperatures.get(index)?,
        ))
    }

    pub fn points(&self) -> impl Iterator<Item = ThermodynamicState> + '_ {
        (0..self.len()).filter_map(|i| self.point(i))
    }

    pub fn leg(&self, process: Process) -> Option<LegSpan> {
        self.legs.iter().copied().find(|leg| leg.process == process)
    }

    pub fn leg_points(&self, process: Process) -> Vec<ThermodynamicState> {
        self.leg(process)
            .map(|leg| leg.range().filter_map(|i| self.point(i)).collect())
            .unwrap_or_default()
    }

    /// Trapezoidal ∮P dV over the thermodynamic legs (J)
    pub fn enclosed_work(&self) -> f64 {
        self.legs
            .iter()
            .filter(|leg| !leg.process.is_breathing())
            .flat_map(|leg| (leg.start + 1)..leg.end)
            .map(|i| {
                let dv = self.volumes[i] - self.volumes[i - 1];
                0.5 * (self.pressures[i] + self.pressures[i - 1]) * dv
            })
            .sum()
    }

    pub fn volume_range(&self) -> (f64, f64) {
        min_max(&self.volumes)
    }

    pub fn pressure_range(&self) -> (f64, f64) {
        min_max(&self.pressures)
    }

    pub fn temperature_range(&self) -> (f64, f64) {
        min_max(&self.temperatures)
    }

    fn push_leg(&mut self, process: Process, states: Vec<ThermodynamicState>) {
        let start = self.len();
        for state in states {
            self.volumes.push(state.volume);
            self.pressures.push(state.pressure);
            self.temperatures.push(state.temperature);
        }
        self.legs.push(LegSpan { process, start, end: self.len() });
    }
}

fn min_max(values: &[f64]) -> (f64, f64) {
    values
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)))
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// `points` samples from `from` to `to`; interior samples come from `shape(t)`,
/// t ∈ (0, 1), and the two ends are the endpoint states verbatim.
fn sweep(
    from: ThermodynamicState,
    to: ThermodynamicState,
    points: usize,
    shape: impl Fn(f64) -> ThermodynamicState,
) -> Vec<ThermodynamicState> {
    let last = points.max(2) - 1;
    (0..=last)
        .map(|i| match i {
            0 => from,
            i if i == last => to,
            i => shape(i as f64 / last as f64),
        })
        .collect()
}

/// P·V^γ constant; volume swept linearly from `from` towards `to`
fn adiabatic_leg(from: ThermodynamicState, to: ThermodynamicState, gamma: f64, points: usize) -> Vec<ThermodynamicState> {
    sweep(from, to, points, |t| {
        let volume = lerp(from.volume, to.volume, t);
        let ratio = from.volume / volume;
        ThermodynamicState::new(
            from.pressure * ratio.powf(gamma),
            volume,
            from.temperature * ratio.powf(gamma - 1.0),
        )
    })
}

fn isochoric_leg(from: ThermodynamicState, to: ThermodynamicState, points: usize) -> Vec<ThermodynamicState> {
    sweep(from, to, points, |t| {
        ThermodynamicState::new(
            lerp(from.pressure, to.pressure, t),
            from.volume,
            lerp(from.temperature, to.temperature, t),
        )
    })
}

fn isobaric_leg(from: ThermodynamicState, to: ThermodynamicState, points: usize) -> Vec<ThermodynamicState> {
    sweep(from, to, points, |t| {
        ThermodynamicState::new(
            from.pressure,
            lerp(from.volume, to.volume, t),
            lerp(from.temperature, to.temperature, t),
        )
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CurveSampler {
    config: SamplerConfig,
}

impl CurveSampler {
    pub fn new() -> Self {
        CurveSampler::default()
    }

    pub fn with_config(config: SamplerConfig) -> SimResult<Self> {
        config.validate()?;
        Ok(CurveSampler { config })
    }

    pub fn config(&self) -> &SamplerConfig {
        &self.config
    }

    pub fn sample(&self, result: &CycleResult) -> CurveSample {
        let cfg = &self.config;
        let gamma = result.gas.gamma;
        let [state_1, state_2, state_3, state_4] = result.states;
        // Piston at top dead center with a fresh charge, for the breathing strokes
        let tdc_intake = ThermodynamicState::new(state_1.pressure, state_2.volume, state_1.temperature);

        let mut curve = CurveSample::default();

        if cfg.include_breathing {
            curve.push_leg(Process::Intake, isobaric_leg(tdc_intake, state_1, cfg.breathing_points));
        }

        curve.push_leg(
            Process::Compression,
            adiabatic_leg(state_1, state_2, gamma, cfg.compression_points),
        );

        let combustion = match result.heat_addition {
            HeatAddition::Isochoric { .. } => isochoric_leg(state_2, state_3, cfg.combustion_points),
            HeatAddition::Isobaric { .. } => isobaric_leg(state_2, state_3, cfg.combustion_points),
        };
        curve.push_leg(Process::Combustion, combustion);

        curve.push_leg(
            Process::Expansion,
            adiabatic_leg(state_3, state_4, gamma, cfg.expansion_points),
        );

        if state_4.volume > state_1.volume {
            // Blow down to P1 at V4, then return to V1 along the intake isobar
            let released = ThermodynamicState::new(
                state_1.pressure,
                state_4.volume,
                state_1.temperature * state_4.volume / state_1.volume,
            );
            curve.push_leg(Process::Exhaust, isochoric_leg(state_4, released, cfg.exhaust_points));
            curve.push_leg(Process::HeatRejection, isobaric_leg(released, state_1, cfg.exhaust_points));
        } else {
            curve.push_leg(Process::Exhaust, isochoric_leg(state_4, state_1, cfg.exhaust_points));
        }

        if cfg.include_breathing {
            curve.push_leg(Process::ExhaustStroke, isobaric_leg(state_1, tdc_intake, cfg.breathing_points));
        }

        curve
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::CycleParameters;
    use crate::solver::CycleSolver;
    use approx::assert_relative_eq;
    use simcore::CycleKind;

    fn solved(kind: CycleKind) -> CycleResult {
        CycleSolver::new(kind).solve(&CycleParameters::defaults_for(kind)).unwrap()
    }

    fn processes(curve: &CurveSample) -> Vec<Process> {
        curve.legs.iter().map(|leg| leg.process).collect()
    }

    #[test]
    fn test_leg_order() {
        let otto = CurveSampler::new().sample(&solved(CycleKind::Otto));
        assert_eq!(
            processes(&otto),
            vec![
                Process::Intake,
                Process::Compression,
                Process::Combustion,
                Process::Expansion,
                Process::Exhaust,
                Process::ExhaustStroke,
            ]
        );

        let atkinson = CurveSampler::new().sample(&solved(CycleKind::Atkinson));
        assert_eq!(
            processes(&atkinson),
            vec![
                Process::Intake,
                Process::Compression,
                Process::Combustion,
                Process::Expansion,
                Process::Exhaust,
                Process::HeatRejection,
                Process::ExhaustStroke,
            ]
        );
    }

    #[test]
    fn test_leg_boundaries_hit_corner_states_exactly() {
        for kind in CycleKind::ALL {
            let result = solved(kind);
            let curve = CurveSampler::new().sample(&result);
            let [s1, s2, s3, s4] = result.states;

            let compression = curve.leg_points(Process::Compression);
            assert_eq!(compression.first(), Some(&s1));
            assert_eq!(compression.last(), Some(&s2));

            let combustion = curve.leg_points(Process::Combustion);
            assert_eq!(combustion.first(), Some(&s2));
            assert_eq!(combustion.last(), Some(&s3));

            let expansion = curve.leg_points(Process::Expansion);
            assert_eq!(expansion.first(), Some(&s3));
            assert_eq!(expansion.last(), Some(&s4));

            let exhaust = curve.leg_points(Process::Exhaust);
            assert_eq!(exhaust.first(), Some(&s4));
        }
    }

    #[test]
    fn test_loop_closes_on_state_one() {
        for kind in CycleKind::ALL {
            let result = solved(kind);
            let sampler = CurveSampler::with_config(SamplerConfig::default().with_breathing(false)).unwrap();
            let curve = sampler.sample(&result);

            assert_eq!(curve.point(0), Some(result.states[0]));
            assert_eq!(curve.point(curve.len() - 1), Some(result.states[0]));
        }
    }

    #[test]
    fn test_sweep_direction() {
        for kind in CycleKind::ALL {
            let curve = CurveSampler::new().sample(&solved(kind));

            let compression = curve.leg_points(Process::Compression);
            assert!(compression.windows(2).all(|w| w[1].volume < w[0].volume));
            assert!(compression.windows(2).all(|w| w[1].pressure > w[0].pressure));

            let expansion = curve.leg_points(Process::Expansion);
            assert!(expansion.windows(2).all(|w| w[1].volume > w[0].volume));
            assert!(expansion.windows(2).all(|w| w[1].pressure < w[0].pressure));
        }
    }

    #[test]
    fn test_combustion_shape_per_cycle() {
        let otto = CurveSampler::new().sample(&solved(CycleKind::Otto));
        let leg = otto.leg_points(Process::Combustion);
        assert!(leg.iter().all(|s| s.volume == leg[0].volume));

        let diesel = CurveSampler::new().sample(&solved(CycleKind::Diesel));
        let leg = diesel.leg_points(Process::Combustion);
        assert!(leg.iter().all(|s| s.pressure == leg[0].pressure));
        assert!(leg.windows(2).all(|w| w[1].volume > w[0].volume));
    }

    #[test]
    fn test_sampled_points_obey_ideal_gas_law() {
        for kind in CycleKind::ALL {
            let result = solved(kind);
            let curve = CurveSampler::new().sample(&result);
            for leg in curve.legs.iter().filter(|leg| !leg.process.is_breathing()) {
                for i in leg.range() {
                    let state = curve.point(i).unwrap();
                    let residual = state.ideal_gas_residual(result.mass, result.gas.gas_constant);
                    assert!(residual < 1e-9, "{kind} {:?} sample {i}: residual {residual}", leg.process);
                }
            }
        }
    }

    #[test]
    fn test_breathing_legs_stay_on_intake_isobar() {
        let result = solved(CycleKind::Otto);
        let curve = CurveSampler::new().sample(&result);
        for process in [Process::Intake, Process::ExhaustStroke] {
            let leg = curve.leg_points(process);
            assert_eq!(leg.len(), 25);
            assert!(leg.iter().all(|s| s.pressure == result.states[0].pressure));
            assert!(leg.iter().all(|s| s.temperature == result.states[0].temperature));
        }
        let (v_min, v_max) = curve.volume_range();
        assert_eq!(v_min, result.states[1].volume);
        assert_eq!(v_max, result.states[0].volume);
    }

    #[test]
    fn test_atkinson_return_leg() {
        let result = solved(CycleKind::Atkinson);
        let curve = CurveSampler::new().sample(&result);

        let rejection = curve.leg_points(Process::HeatRejection);
        assert_eq!(rejection.last(), Some(&result.states[0]));
        assert!(rejection.iter().all(|s| s.pressure == result.states[0].pressure));
        let (_, v_max) = curve.volume_range();
        assert_eq!(v_max, result.states[3].volume);
    }

    #[test]
    fn test_enclosed_work_converges_to_net_work() {
        let sampler = CurveSampler::with_config(SamplerConfig::uniform(400)).unwrap();
        for kind in [CycleKind::Otto, CycleKind::Diesel] {
            let result = solved(kind);
            let curve = sampler.sample(&result);
            assert_relative_eq!(curve.enclosed_work(), result.net_work, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_point_counts_follow_config() {
        let config = SamplerConfig {
            compression_points: 7,
            combustion_points: 3,
            expansion_points: 9,
            exhaust_points: 4,
            breathing_points: 2,
            include_breathing: true,
        };
        let curve = CurveSampler::with_config(config).unwrap().sample(&solved(CycleKind::Diesel));
        assert_eq!(curve.len(), 2 + 7 + 3 + 9 + 4 + 2);
        assert_eq!(curve.leg(Process::Expansion).map(|leg| leg.len()), Some(9));
        assert_eq!(curve.pressures.len(), curve.temperatures.len());
    }

    #[test]
    fn test_rejects_single_point_legs() {
        let config = SamplerConfig { combustion_points: 1, ..SamplerConfig::default() };
        let err = CurveSampler::with_config(config).unwrap_err();
        assert_eq!(err.field(), Some("combustion_points"));
    }
}
