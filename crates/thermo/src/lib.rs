//! Air-standard cycle thermodynamics
//!
//! This crate provides:
//! - Corner-state solvers for the Otto, Atkinson and Diesel cycles
//! - Piecewise P-V-T sampling of the closed loop for plotting
//! - Conversion of work per cycle into engine power

pub mod params;
pub mod power;
pub mod sampler;
pub mod solver;

pub use params::*;
pub use power::*;
pub use sampler::*;
pub use solver::*;

use simcore::{CycleKind, SimResult};

/// Solves `kind` with its standard working fluid
pub fn solve(kind: CycleKind, params: &CycleParameters) -> SimResult<CycleResult> {
    CycleSolver::new(kind).solve(params)
}

/// Samples the loop with the default point counts, breathing legs included
pub fn sample(result: &CycleResult) -> CurveSample {
    CurveSampler::new().sample(result)
}
