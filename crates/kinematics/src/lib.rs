//! Piston and crank animation for the cycle viewer
//!
//! This crate provides:
//! - A tick-driven crank phase synchronized to engine speed
//! - Per-cycle stroke tables (piston travel, valves, ignition, flame)

pub mod piston;

pub use piston::*;
