//! Shared types for the engine cycle simulator
//!
//! This crate provides:
//! - Cycle, state and geometry value types
//! - Working-fluid constants per cycle family
//! - The error taxonomy shared by every crate
//! - `Model`/`AnimationModel` traits for tick-driven presentation models

pub mod error;
pub mod gas;
pub mod traits;

pub use error::*;
pub use gas::*;
pub use traits::*;
