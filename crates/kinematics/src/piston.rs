//! Piston Animator - cosmetic four-stroke state machine
//!
//! The crank phase advances by a fixed step per tick, scaled by engine speed.
//! Everything drawn (piston travel, valves, spark, flame, gas tint) is a pure
//! function of the cycle kind and `f = (phase mod 4π) / π`, which sweeps
//! [0, 4) once per two crank revolutions.

use std::f64::consts::PI;

use log::debug;
use serde::{Deserialize, Serialize};
use simcore::{AnimationModel, CycleKind, Model, SimContext};

/// Timing of the animation tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Wall time between ticks (s)
    pub tick_interval: f64,
    /// Phase advance per tick at `reference_rpm` (rad)
    pub phase_step: f64,
    pub reference_rpm: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        AnimationConfig {
            tick_interval: 0.05,
            phase_step: 0.15,
            reference_rpm: 3000.0,
        }
    }
}

impl AnimationConfig {
    /// Phase advance of one tick at `rpm` (rad)
    pub fn increment(&self, rpm: f64) -> f64 {
        (rpm / self.reference_rpm) * self.phase_step
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stroke {
    Intake,
    /// Atkinson: first half of the intake stroke
    PartialIntake,
    /// Atkinson: piston parked at bottom dead center with the intake still open
    LateIntake,
    Compression,
    /// Otto: burn and expansion together
    Power,
    /// Diesel: fuel spray and progressive burn
    Injection,
    Expansion,
    /// Atkinson: stroke 20% longer than compression
    ExtendedExpansion,
    Exhaust,
}

impl Stroke {
    pub fn label(&self) -> &'static str {
        match self {
            Stroke::Intake => "INTAKE",
            Stroke::PartialIntake => "INTAKE (partial)",
            Stroke::LateIntake => "LATE INTAKE",
            Stroke::Compression => "COMPRESSION",
            Stroke::Power => "POWER",
            Stroke::Injection => "INJECTION/COMBUSTION",
            Stroke::Expansion => "EXPANSION",
            Stroke::ExtendedExpansion => "EXPANSION+",
            Stroke::Exhaust => "EXHAUST",
        }
    }
}

/// Everything needed to draw one animation frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PistonFrame {
    pub kind: CycleKind,
    /// (phase mod 4π) / π, in [0, 4)
    pub cycle_fraction: f64,
    pub stroke: Stroke,
    /// 0 at top dead center, 1 at bottom dead center
    pub piston_position: f64,
    pub intake_valve_open: bool,
    pub exhaust_valve_open: bool,
    pub spark: bool,
    pub injection: bool,
    /// Flame overlay opacity, 0–1
    pub flame_intensity: f64,
    /// RGBA tint of the gas above the piston
    pub gas_rgba: [u8; 4],
    /// RGB of the flame overlay
    pub flame_rgb: [u8; 3],
    /// Crank pin position on a unit circle
    pub crank_offset: (f64, f64),
}

/// Frame for `kind` at crank `phase` (rad)
pub fn frame_at(kind: CycleKind, phase: f64) -> PistonFrame {
    let f = phase.rem_euclid(4.0 * PI) / PI;

    let (stroke, position, intake_open, gas_rgba) = match kind {
        CycleKind::Otto => {
            if f < 1.0 {
                (Stroke::Intake, f, true, [100, 150, 255, 100])
            } else if f < 2.0 {
                (Stroke::Compression, 2.0 - f, false, [150, 150, 255, 150])
            } else if f < 3.0 {
                (Stroke::Power, f - 2.0, false, [255, 150, 50, 200])
            } else {
                (Stroke::Exhaust, 4.0 - f, false, [120, 120, 120, 150])
            }
        }
        CycleKind::Diesel => {
            if f < 1.0 {
                (Stroke::Intake, f, true, [100, 200, 255, 120])
            } else if f < 2.0 {
                (Stroke::Compression, 2.0 - f, false, [150, 180, 255, 180])
            } else if f < 2.4 {
                (Stroke::Injection, f - 2.0, false, [255, 120, 30, 220])
            } else if f < 3.0 {
                (Stroke::Expansion, f - 2.0, false, [255, 150, 50, 180])
            } else {
                (Stroke::Exhaust, 4.0 - f, false, [80, 80, 80, 180])
            }
        }
        CycleKind::Atkinson => {
            if f < 0.5 {
                (Stroke::PartialIntake, 2.0 * f, true, [100, 150, 255, 80])
            } else if f < 1.5 {
                (Stroke::LateIntake, 1.0, f < 0.8, [100, 150, 255, 100])
            } else if f < 2.0 {
                (Stroke::Compression, 2.0 - f, false, [150, 150, 255, 150])
            } else if f < 3.2 {
                (Stroke::ExtendedExpansion, 1.2 * (f - 2.0), false, [255, 150, 50, 200])
            } else {
                (Stroke::Exhaust, 4.0 - f, false, [120, 120, 120, 150])
            }
        }
    };

    let (flame_intensity, flame_rgb) = match kind {
        CycleKind::Otto if (2.0..2.3).contains(&f) => (1.0 - (f - 2.0) / 0.3, [255, 200, 0]),
        CycleKind::Diesel if (2.0..2.5).contains(&f) => {
            ((200.0 / 255.0) * (1.0 - (f - 2.25).abs() / 0.25), [255, 150, 0])
        }
        CycleKind::Diesel => (0.0, [255, 150, 0]),
        _ => (0.0, [255, 200, 0]),
    };

    PistonFrame {
        kind,
        cycle_fraction: f,
        stroke,
        piston_position: position.clamp(0.0, 1.0),
        intake_valve_open: intake_open,
        exhaust_valve_open: f >= 3.0,
        spark: kind.is_spark_ignited() && (1.9..2.1).contains(&f),
        injection: kind == CycleKind::Diesel && (2.0..2.4).contains(&f),
        flame_intensity,
        gas_rgba,
        flame_rgb,
        crank_offset: (phase.cos(), phase.sin()),
    }
}

/// Crank phase integrator for one cylinder
#[derive(Debug, Clone)]
pub struct PistonAnimator {
    config: AnimationConfig,
    kind: CycleKind,
    rpm: f64,
    phase: f64,
}

impl PistonAnimator {
    pub fn new(kind: CycleKind, rpm: f64) -> Self {
        PistonAnimator {
            config: AnimationConfig::default(),
            kind,
            rpm,
            phase: 0.0,
        }
    }

    pub fn with_config(mut self, config: AnimationConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &AnimationConfig {
        &self.config
    }

    pub fn kind(&self) -> CycleKind {
        self.kind
    }

    pub fn rpm(&self) -> f64 {
        self.rpm
    }

    /// Accumulated crank angle (rad), not wrapped
    pub fn phase(&self) -> f64 {
        self.phase
    }

    pub fn set_rpm(&mut self, rpm: f64) {
        self.rpm = rpm;
    }

    /// Switches the stroke table and restarts the animation from phase 0
    pub fn set_cycle_kind(&mut self, kind: CycleKind) {
        debug!("piston animation switched {} -> {}", self.kind, kind);
        self.kind = kind;
        self.phase = 0.0;
    }

    /// One timer tick
    pub fn tick(&mut self) {
        self.phase += self.config.increment(self.rpm);
    }

    pub fn frame(&self) -> PistonFrame {
        frame_at(self.kind, self.phase)
    }
}

impl Default for PistonAnimator {
    fn default() -> Self {
        PistonAnimator::new(CycleKind::Otto, 3000.0)
    }
}

impl Model for PistonAnimator {
    fn reset(&mut self) {
        self.phase = 0.0;
    }
}

impl AnimationModel for PistonAnimator {
    /// Advances by `dt / tick_interval` ticks, fractional ticks included
    fn step_animation(&mut self, ctx: SimContext) {
        let ticks = ctx.dt / self.config.tick_interval;
        self.phase += ticks * self.config.increment(self.rpm);
    }
}
