//! Property-based tests for the cycle solvers and the curve sampler.

use proptest::prelude::*;
use simcore::{CycleKind, GAMMA_DIESEL, GAMMA_SPARK_IGNITION};
use thermo::{
    diesel_efficiency, otto_efficiency, sample, solve, CurveSampler, CycleParameters, Process,
    SamplerConfig,
};

fn any_intake() -> impl Strategy<Value = (f64, f64)> {
    (50_000.0f64..300_000.0, 250.0f64..400.0)
}

/// Valid operating points for every cycle family
fn any_operating_point() -> impl Strategy<Value = (CycleKind, CycleParameters)> {
    let otto = (2.0f64..25.0, 1.5f64..5.0, any_intake())
        .prop_map(|(r, alpha, (p1, t1))| (CycleKind::Otto, CycleParameters::otto(r, alpha).with_intake(p1, t1)));
    let atkinson = (2.0f64..20.0, 1.05f64..1.6, 2.0f64..5.0, any_intake()).prop_map(
        |(r, factor, alpha, (p1, t1))| {
            (CycleKind::Atkinson, CycleParameters::atkinson(r, r * factor, alpha).with_intake(p1, t1))
        },
    );
    let diesel = (8.0f64..25.0, 1.1f64..3.0, any_intake())
        .prop_map(|(r, rc, (p1, t1))| (CycleKind::Diesel, CycleParameters::diesel(r, rc).with_intake(p1, t1)));
    prop_oneof![otto, atkinson, diesel]
}

// ── Solver Properties ────────────────────────────────────────────────

proptest! {
    /// For the cycles that reject heat at V1, the closed-form efficiency
    /// agrees with W/Qin from the corner states.
    #[test]
    fn closed_form_matches_energy_balance((kind, params) in any_operating_point()) {
        prop_assume!(kind != CycleKind::Atkinson);
        let result = solve(kind, &params).unwrap();
        let balance = result.energy_balance_efficiency();
        prop_assert!((result.efficiency - balance).abs() < 1e-9,
            "{} closed form {} vs balance {}", kind, result.efficiency, balance);
    }

    /// W = Qin − Qout holds for every cycle.
    #[test]
    fn first_law_holds((kind, params) in any_operating_point()) {
        let result = solve(kind, &params).unwrap();
        prop_assert!(result.heat_in > 0.0);
        prop_assert!((result.heat_in - result.heat_out - result.net_work).abs() <= 1e-9 * result.heat_in);
    }

    /// Every corner satisfies P·V = m·R·T.
    #[test]
    fn corners_are_ideal_gas_states((kind, params) in any_operating_point()) {
        let result = solve(kind, &params).unwrap();
        for (i, state) in result.states.iter().enumerate() {
            let residual = state.ideal_gas_residual(result.mass, result.gas.gas_constant);
            prop_assert!(residual < 1e-9, "{} state {}: residual {}", kind, i + 1, residual);
        }
    }

    /// Efficiency stays strictly between 0 and 1.
    #[test]
    fn efficiency_is_a_fraction((kind, params) in any_operating_point()) {
        let result = solve(kind, &params).unwrap();
        prop_assert!(result.efficiency > 0.0 && result.efficiency < 1.0);
        prop_assert!(result.net_work > 0.0);
    }

    /// Over-expanding past V1 recovers more work than the Otto cycle at the same r.
    #[test]
    fn atkinson_beats_otto(r in 2.0f64..20.0, factor in 1.05f64..1.6) {
        let otto = solve(CycleKind::Otto, &CycleParameters::otto(r, 3.35)).unwrap();
        let atkinson = solve(CycleKind::Atkinson, &CycleParameters::atkinson(r, r * factor, 3.35)).unwrap();
        prop_assert!(atkinson.efficiency > otto.efficiency);
    }

    /// A vanishing cutoff ratio degenerates to the constant-volume efficiency.
    #[test]
    fn diesel_converges_to_otto(r in 2.0f64..25.0) {
        let diesel = diesel_efficiency(r, 1.0 + 1e-6, GAMMA_DIESEL);
        let otto = otto_efficiency(r, GAMMA_DIESEL);
        prop_assert!((diesel - otto).abs() < 1e-5, "diesel {} otto {}", diesel, otto);
    }

    /// More compression, more efficiency.
    #[test]
    fn otto_efficiency_grows_with_compression(r in 2.0f64..24.0, step in 0.1f64..5.0) {
        prop_assert!(otto_efficiency(r + step, GAMMA_SPARK_IGNITION) > otto_efficiency(r, GAMMA_SPARK_IGNITION));
    }
}

// ── Sampler Properties ───────────────────────────────────────────────

proptest! {
    /// Leg ends coincide with the corner states bit for bit.
    #[test]
    fn legs_start_and_end_on_corners((kind, params) in any_operating_point()) {
        let result = solve(kind, &params).unwrap();
        let curve = sample(&result);
        let [s1, s2, s3, s4] = result.states;

        let legs = [
            (Process::Compression, s1, s2),
            (Process::Combustion, s2, s3),
            (Process::Expansion, s3, s4),
        ];
        for (process, first, last) in legs {
            let points = curve.leg_points(process);
            prop_assert_eq!(points.first().copied(), Some(first));
            prop_assert_eq!(points.last().copied(), Some(last));
        }
    }

    /// Compression sweeps V down and P up; expansion the reverse.
    #[test]
    fn adiabatic_legs_are_monotone((kind, params) in any_operating_point()) {
        let curve = sample(&solve(kind, &params).unwrap());

        let compression = curve.leg_points(Process::Compression);
        for w in compression.windows(2) {
            prop_assert!(w[1].volume < w[0].volume);
            prop_assert!(w[1].pressure > w[0].pressure);
        }
        let expansion = curve.leg_points(Process::Expansion);
        for w in expansion.windows(2) {
            prop_assert!(w[1].volume > w[0].volume);
            prop_assert!(w[1].pressure < w[0].pressure);
        }
    }

    /// The area enclosed by a finely sampled loop is the net work.
    #[test]
    fn enclosed_area_is_net_work(r in 4.0f64..20.0, alpha in 1.5f64..5.0) {
        let result = solve(CycleKind::Otto, &CycleParameters::otto(r, alpha)).unwrap();
        let curve = CurveSampler::with_config(SamplerConfig::uniform(400)).unwrap().sample(&result);
        let area = curve.enclosed_work();
        prop_assert!((area - result.net_work).abs() < 1e-3 * result.net_work,
            "area {} vs work {}", area, result.net_work);
    }

    /// Turning the breathing legs off removes exactly their samples.
    #[test]
    fn breathing_legs_are_optional((kind, params) in any_operating_point(), points in 2usize..60) {
        let result = solve(kind, &params).unwrap();
        let config = SamplerConfig::uniform(points);
        let with = CurveSampler::with_config(config).unwrap().sample(&result);
        let without = CurveSampler::with_config(config.with_breathing(false)).unwrap().sample(&result);

        prop_assert_eq!(with.len(), without.len() + 2 * points);
        prop_assert!(without.legs.iter().all(|leg| !leg.process.is_breathing()));
        prop_assert!((with.enclosed_work() - without.enclosed_work()).abs() <= 1e-12 * with.enclosed_work().abs());
    }
}
