use kinematics::PistonAnimator;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use simcore::{CycleKind, Model};

use crate::to_py_err;

/// Tick-driven piston animation state
#[pyclass(name = "PistonAnimator")]
pub struct PyPistonAnimator {
    inner: PistonAnimator,
}

#[pymethods]
impl PyPistonAnimator {
    #[new]
    #[pyo3(signature = (kind="otto", rpm=3000.0))]
    fn new(kind: &str, rpm: f64) -> PyResult<Self> {
        let kind: CycleKind = kind.parse().map_err(to_py_err)?;
        Ok(PyPistonAnimator { inner: PistonAnimator::new(kind, rpm) })
    }

    #[getter]
    fn phase(&self) -> f64 {
        self.inner.phase()
    }

    fn set_rpm(&mut self, rpm: f64) {
        self.inner.set_rpm(rpm);
    }

    fn set_cycle_kind(&mut self, kind: &str) -> PyResult<()> {
        self.inner.set_cycle_kind(kind.parse().map_err(to_py_err)?);
        Ok(())
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    /// Advance by `n` timer ticks
    #[pyo3(signature = (n=1))]
    fn tick(&mut self, n: usize) {
        for _ in 0..n {
            self.inner.tick();
        }
    }

    /// Current frame as a dict
    fn frame<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let frame = self.inner.frame();
        let dict = PyDict::new_bound(py);
        dict.set_item("stroke", frame.stroke.label())?;
        dict.set_item("cycle_fraction", frame.cycle_fraction)?;
        dict.set_item("piston_position", frame.piston_position)?;
        dict.set_item("intake_valve_open", frame.intake_valve_open)?;
        dict.set_item("exhaust_valve_open", frame.exhaust_valve_open)?;
        dict.set_item("spark", frame.spark)?;
        dict.set_item("injection", frame.injection)?;
        dict.set_item("flame_intensity", frame.flame_intensity)?;
        dict.set_item("crank_offset", frame.crank_offset)?;
        Ok(dict)
    }
}
