// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Simulation configuration
//!
//! The host driver builds a [`SimulationConfig`] either in code or by
//! deserializing it (with the `serde` feature). Missing fields fall back to
//! their defaults:
//!
//! ```yaml
//! dt: 0.002
//! timesteps: 4000
//! softening: 0.001
//! record_frames: true
//! frame_every: 5
//! ```
//!
//! Validation happens once, when the simulation is constructed. Invalid
//! values are rejected, never clamped.

use crate::error::ConfigError;
use crate::physics::GRAVITATIONAL_CONSTANT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters for one simulation run
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimulationConfig {
    /// Timestep (years)
    pub dt: f64,
    /// Number of steps to take
    pub timesteps: usize,
    /// Softening length added in quadrature to every pairwise distance
    pub softening: f64,
    /// Compute and record conservation diagnostics
    pub enable_diagnostics: bool,
    /// Keep a copy of the synchronized state after every step
    pub record_history: bool,
    /// Keep position-only frames
    pub record_frames: bool,
    /// Frame stride in steps
    pub frame_every: usize,
    /// Diagnostics stride in steps
    pub diagnostics_every: usize,
    /// Gravitational constant in the simulation's unit system
    pub gravitational_constant: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            dt: 0.002,
            timesteps: 2000,
            softening: 1e-3,
            enable_diagnostics: true,
            record_history: false,
            record_frames: false,
            frame_every: 1,
            diagnostics_every: 1,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with the given step size, step count and
    /// softening; everything else takes its default
    pub fn new(dt: f64, timesteps: usize, softening: f64) -> Self {
        SimulationConfig {
            dt,
            timesteps,
            softening,
            ..SimulationConfig::default()
        }
    }

    /// Enable or disable diagnostics
    pub fn with_diagnostics(mut self, enabled: bool) -> Self {
        self.enable_diagnostics = enabled;
        self
    }

    /// Record diagnostics every `every` steps
    pub fn with_diagnostics_every(mut self, every: usize) -> Self {
        self.diagnostics_every = every;
        self
    }

    /// Record a synchronized state snapshot after every step
    pub fn with_history(mut self) -> Self {
        self.record_history = true;
        self
    }

    /// Record position frames every `every` steps
    pub fn with_frames(mut self, every: usize) -> Self {
        self.record_frames = true;
        self.frame_every = every;
        self
    }

    /// Override the gravitational constant
    pub fn with_gravitational_constant(mut self, g: f64) -> Self {
        self.gravitational_constant = g;
        self
    }

    /// Check every field
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(ConfigError::InvalidTimestep(self.dt));
        }
        if !(self.softening >= 0.0 && self.softening.is_finite()) {
            return Err(ConfigError::InvalidSoftening(self.softening));
        }
        if !(self.gravitational_constant > 0.0 && self.gravitational_constant.is_finite()) {
            return Err(ConfigError::InvalidGravitationalConstant(
                self.gravitational_constant,
            ));
        }
        if self.frame_every == 0 {
            return Err(ConfigError::InvalidStride { field: "frame_every" });
        }
        if self.diagnostics_every == 0 {
            return Err(ConfigError::InvalidStride {
                field: "diagnostics_every",
            });
        }
        Ok(())
    }

    /// Warnings for values that are valid but likely to misbehave
    ///
    /// Extremely small timesteps lose precision in f64 accumulation; large
    /// ones make orbital integrations unstable.
    pub fn stability_warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.dt < 1e-9 {
            warnings.push(format!(
                "Timestep {} is extremely small and may cause precision loss with f64",
                self.dt
            ));
        }
        if self.dt > 1.0 {
            warnings.push(format!(
                "Timestep {} is large and may cause instability",
                self.dt
            ));
        }
        if self.softening == 0.0 {
            warnings.push(
                "Softening is zero; close encounters can produce unbounded accelerations"
                    .to_string(),
            );
        }
        warnings
    }
}
