//! Engine Cycle Simulator Python Bindings
//!
//! Solving happens entirely in Rust; curves come back as numpy arrays so a
//! whole P-V loop crosses the boundary in one call.

use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use simcore::SimError;

mod cycle;
mod piston;

pub use cycle::*;
pub use piston::*;

/// Bad inputs become `ValueError`; anything else is a `RuntimeError`
pub(crate) fn to_py_err(err: SimError) -> PyErr {
    match err {
        SimError::InvalidParameter { .. } | SimError::UnknownCycle(_) | SimError::UnknownLayout(_) => {
            PyValueError::new_err(err.to_string())
        }
        other => PyRuntimeError::new_err(other.to_string()),
    }
}

/// Python module for the engine cycle simulator
#[pymodule]
fn engine_sim_py(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Thermodynamic cycles
    m.add_class::<cycle::PyCycleResult>()?;
    m.add_function(wrap_pyfunction!(cycle::solve, m)?)?;
    m.add_function(wrap_pyfunction!(cycle::derive_power, m)?)?;

    // Piston animation
    m.add_class::<piston::PyPistonAnimator>()?;

    Ok(())
}
