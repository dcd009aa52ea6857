//! Cycle solving and curve sampling

use numpy::ToPyArray;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use simcore::{CycleKind, EngineGeometry};
use thermo::{
    default_compression_ratio, CurveSampler, CycleParameters, CycleResult, CycleSolver,
    SamplerConfig, DEFAULT_ATKINSON_EXPANSION_FACTOR,
};

use crate::to_py_err;

/// Solved cycle for one cylinder
#[pyclass(name = "CycleResult")]
#[derive(Clone)]
pub struct PyCycleResult {
    inner: CycleResult,
}

#[pymethods]
impl PyCycleResult {
    #[getter]
    fn kind(&self) -> &'static str {
        self.inner.kind.name()
    }

    #[getter]
    fn efficiency(&self) -> f64 {
        self.inner.efficiency
    }

    #[getter]
    fn net_work(&self) -> f64 {
        self.inner.net_work
    }

    #[getter]
    fn heat_in(&self) -> f64 {
        self.inner.heat_in
    }

    #[getter]
    fn heat_out(&self) -> f64 {
        self.inner.heat_out
    }

    #[getter]
    fn mass(&self) -> f64 {
        self.inner.mass
    }

    #[getter]
    fn compression_ratio(&self) -> f64 {
        self.inner.compression_ratio
    }

    #[getter]
    fn expansion_ratio(&self) -> f64 {
        self.inner.expansion_ratio
    }

    #[getter]
    fn mean_effective_pressure(&self) -> f64 {
        self.inner.mean_effective_pressure()
    }

    /// Corner states as (pressure Pa, volume m³, temperature K)
    #[getter]
    fn states(&self) -> Vec<(f64, f64, f64)> {
        self.inner
            .states
            .iter()
            .map(|s| (s.pressure, s.volume, s.temperature))
            .collect()
    }

    /// Sampled loop as a dict of numpy arrays plus the leg spans
    #[pyo3(signature = (points=None, breathing=true))]
    fn sample<'py>(&self, py: Python<'py>, points: Option<usize>, breathing: bool) -> PyResult<Bound<'py, PyDict>> {
        let config = points
            .map(SamplerConfig::uniform)
            .unwrap_or_default()
            .with_breathing(breathing);
        let curve = CurveSampler::with_config(config).map_err(to_py_err)?.sample(&self.inner);

        let legs: Vec<(&'static str, usize, usize)> = curve
            .legs
            .iter()
            .map(|leg| (leg.process.label(), leg.start, leg.end))
            .collect();

        let dict = PyDict::new_bound(py);
        dict.set_item("volume", curve.volumes.to_pyarray_bound(py))?;
        dict.set_item("pressure", curve.pressures.to_pyarray_bound(py))?;
        dict.set_item("temperature", curve.temperatures.to_pyarray_bound(py))?;
        dict.set_item("legs", legs)?;
        dict.set_item("enclosed_work", curve.enclosed_work())?;
        Ok(dict)
    }

    fn __repr__(&self) -> String {
        format!(
            "CycleResult(kind={}, efficiency={:.4}, net_work={:.2} J)",
            self.inner.kind, self.inner.efficiency, self.inner.net_work
        )
    }
}

/// Solve one cycle. `expansion_ratio` applies to Atkinson, `cutoff_ratio` to Diesel.
#[pyfunction]
#[pyo3(signature = (
    kind,
    compression_ratio=None,
    intake_pressure=101325.0,
    intake_temperature=300.0,
    alpha=3.35,
    expansion_ratio=None,
    cutoff_ratio=2.0,
    displacement_l=2.0,
    cylinders=4
))]
#[allow(clippy::too_many_arguments)]
pub fn solve(
    kind: &str,
    compression_ratio: Option<f64>,
    intake_pressure: f64,
    intake_temperature: f64,
    alpha: f64,
    expansion_ratio: Option<f64>,
    cutoff_ratio: f64,
    displacement_l: f64,
    cylinders: u32,
) -> PyResult<PyCycleResult> {
    let kind: CycleKind = kind.parse().map_err(to_py_err)?;
    let r = compression_ratio.unwrap_or_else(|| default_compression_ratio(kind));
    let params = match kind {
        CycleKind::Otto => CycleParameters::otto(r, alpha),
        CycleKind::Atkinson => CycleParameters::atkinson(
            r,
            expansion_ratio.unwrap_or(r * DEFAULT_ATKINSON_EXPANSION_FACTOR),
            alpha,
        ),
        CycleKind::Diesel => CycleParameters::diesel(r, cutoff_ratio),
    }
    .with_intake(intake_pressure, intake_temperature)
    .with_geometry(EngineGeometry { total_displacement_l: displacement_l, cylinders });

    let inner = CycleSolver::new(kind).solve(&params).map_err(to_py_err)?;
    Ok(PyCycleResult { inner })
}

/// Engine power from work per cycle per cylinder, as (kW, cv)
#[pyfunction]
pub fn derive_power(work: f64, rpm: f64, cylinders: u32) -> (f64, f64) {
    let power = thermo::derive_power(work, rpm, cylinders);
    (power.kilowatts, power.horsepower)
}
