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
//! Conservation diagnostics
//!
//! # Drift definitions
//!
//! Every recorded step is compared against a [`Baseline`] taken from the
//! synchronized initial state:
//!
//! - **Energy**: `|E - E₀| / max(|E₀|, |K| + |U|, ENERGY_FLOOR)`
//! - **Angular momentum**: `(|L| - |L₀|) / |L₀|` when `|L₀|` exceeds
//!   [`ANGULAR_MOMENTUM_THRESHOLD`], otherwise the raw `|L|`
//! - **Linear momentum**: `|P|`, an absolute value since an isolated system
//!   normally starts at (or near) zero momentum
//! - **Center of mass**: `|COM - COM₀|`
//!
//! The energy denominator falls back to the scale of the current kinetic
//! and potential terms when the total energy is close to zero, as it is for
//! a marginally bound system.

use log::warn;

use crate::body::Body;
use crate::config::SimulationConfig;
use crate::physics::{angular_momentum, center_of_mass, kinetic_energy, linear_momentum, potential_energy};
use crate::vector::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Smallest denominator used for relative energy drift
pub const ENERGY_FLOOR: f64 = 1e-300;

/// Initial angular momentum magnitude below which drift is reported as an
/// absolute value
pub const ANGULAR_MOMENTUM_THRESHOLD: f64 = 1e-12;

/// Reference quantities every drift is measured against
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Baseline {
    /// Initial kinetic energy
    pub kinetic: f64,
    /// Initial potential energy
    pub potential: f64,
    /// Initial total energy
    pub energy: f64,
    /// Initial angular momentum magnitude
    pub angular_momentum: f64,
    /// Initial linear momentum
    pub linear_momentum: Vector3,
    /// Initial center of mass
    pub center_of_mass: Vector3,
}

impl Baseline {
    /// Measure a synchronized body set
    pub fn measure(bodies: &[Body], config: &SimulationConfig) -> Self {
        let kinetic = kinetic_energy(bodies);
        let potential = potential_energy(bodies, config.softening, config.gravitational_constant);
        Baseline {
            kinetic,
            potential,
            energy: kinetic + potential,
            angular_momentum: angular_momentum(bodies).norm(),
            linear_momentum: linear_momentum(bodies),
            center_of_mass: center_of_mass(bodies),
        }
    }
}

/// Per-step conservation history
///
/// All vectors are parallel: index `k` of every history refers to the same
/// recorded step. Histories only grow during a run and are cleared when the
/// next run starts.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostics {
    /// Step index of each record
    pub steps: Vec<usize>,
    /// Simulation time of each record
    pub times: Vec<f64>,
    /// Kinetic energy
    pub kinetic_history: Vec<f64>,
    /// Potential energy
    pub potential_history: Vec<f64>,
    /// Total energy
    pub energy_history: Vec<f64>,
    /// Relative energy drift
    pub energy_drift: Vec<f64>,
    /// Angular momentum magnitude
    pub angular_momentum_history: Vec<f64>,
    /// Angular momentum drift
    pub angular_momentum_drift: Vec<f64>,
    /// Total linear momentum
    pub linear_momentum_history: Vec<Vector3>,
    /// Linear momentum magnitude
    pub linear_momentum_drift: Vec<f64>,
    /// Center of mass
    pub com_history: Vec<Vector3>,
    /// Center of mass displacement from its initial position
    pub com_drift: Vec<f64>,
    baseline: Option<Baseline>,
    #[cfg_attr(feature = "serde", serde(skip))]
    reported_non_finite: bool,
}

impl Diagnostics {
    /// Create an empty recorder
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every record and the baseline
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Set the reference quantities for subsequent records
    pub fn set_baseline(&mut self, baseline: Baseline) {
        self.baseline = Some(baseline);
    }

    /// Reference quantities, once a run has started
    pub fn baseline(&self) -> Option<&Baseline> {
        self.baseline.as_ref()
    }

    /// Measure a synchronized body set and append one record
    ///
    /// If no baseline has been set yet, this body set becomes the baseline.
    pub fn record(&mut self, step: usize, bodies: &[Body], config: &SimulationConfig) {
        let baseline = *self
            .baseline
            .get_or_insert_with(|| Baseline::measure(bodies, config));

        let kinetic = kinetic_energy(bodies);
        let potential = potential_energy(bodies, config.softening, config.gravitational_constant);
        let energy = kinetic + potential;
        let l = angular_momentum(bodies).norm();
        let p = linear_momentum(bodies);
        let com = center_of_mass(bodies);

        let energy_scale = baseline
            .energy
            .abs()
            .max(kinetic.abs() + potential.abs())
            .max(ENERGY_FLOOR);
        let energy_drift = (energy - baseline.energy).abs() / energy_scale;

        let angular_momentum_drift = if baseline.angular_momentum > ANGULAR_MOMENTUM_THRESHOLD {
            (l - baseline.angular_momentum) / baseline.angular_momentum
        } else {
            l
        };

        let com_drift = (com - baseline.center_of_mass).norm();

        if !self.reported_non_finite && !(energy_drift.is_finite() && angular_momentum_drift.is_finite())
        {
            warn!(
                "Diagnostics became non-finite at step {} (energy drift {}, angular momentum drift {})",
                step, energy_drift, angular_momentum_drift
            );
            self.reported_non_finite = true;
        }

        self.steps.push(step);
        self.times.push(step as f64 * config.dt);
        self.kinetic_history.push(kinetic);
        self.potential_history.push(potential);
        self.energy_history.push(energy);
        self.energy_drift.push(energy_drift);
        self.angular_momentum_history.push(l);
        self.angular_momentum_drift.push(angular_momentum_drift);
        self.linear_momentum_history.push(p);
        self.linear_momentum_drift.push(p.norm());
        self.com_history.push(com);
        self.com_drift.push(com_drift);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// True when nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Largest absolute energy drift seen so far
    pub fn max_energy_drift(&self) -> Option<f64> {
        self.energy_drift
            .iter()
            .map(|d| d.abs())
            .fold(None, |max, d| Some(max.map_or(d, |m: f64| m.max(d))))
    }

    /// Energy drift of the most recent record
    pub fn final_energy_drift(&self) -> Option<f64> {
        self.energy_drift.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> SimulationConfig {
        SimulationConfig::new(0.5, 10, 0.0).with_gravitational_constant(1.0)
    }

    fn binary() -> Vec<Body> {
        vec![
            Body::new(1.0, [-0.5, 0.0, 0.0], [0.0, -1.0, 0.0]),
            Body::new(1.0, [0.5, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ]
    }

    #[test]
    fn test_baseline_measure() {
        let baseline = Baseline::measure(&binary(), &config());
        assert_eq!(baseline.kinetic, 1.0);
        assert_eq!(baseline.potential, -1.0);
        assert_eq!(baseline.energy, 0.0);
        assert_eq!(baseline.angular_momentum, 1.0);
        assert_eq!(baseline.linear_momentum, Vector3::zero());
        assert_eq!(baseline.center_of_mass, Vector3::zero());
    }

    #[test]
    fn test_unchanged_state_has_zero_drift() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(3, &binary(), &config());

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics.steps, vec![3]);
        assert_eq!(diagnostics.times, vec![1.5]);
        assert_eq!(diagnostics.energy_drift, vec![0.0]);
        assert_eq!(diagnostics.angular_momentum_drift, vec![0.0]);
        assert_eq!(diagnostics.linear_momentum_drift, vec![0.0]);
        assert_eq!(diagnostics.com_drift, vec![0.0]);
        assert!(diagnostics.baseline().is_some());
    }

    #[test]
    fn test_energy_drift_uses_component_scale_near_zero_energy() {
        // E₀ = 0 for this binary, so the denominator is |K| + |U|
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_baseline(Baseline::measure(&binary(), &config()));

        let mut faster = binary();
        faster[1].velocity = Vector3::new(0.0, 2.0, 0.0);
        diagnostics.record(1, &faster, &config());

        // K = 2.5, U = -1, E = 1.5
        assert!((diagnostics.energy_drift[0] - 1.5 / 3.5).abs() < 1e-15);
        assert_eq!(diagnostics.linear_momentum_drift[0], 1.0);
        assert!((diagnostics.angular_momentum_drift[0] - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_angular_momentum_below_threshold_is_absolute() {
        let at_rest = vec![
            Body::at_rest(1.0, [0.0, 0.0, 0.0]),
            Body::at_rest(1.0, [1.0, 0.0, 0.0]),
        ];
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_baseline(Baseline::measure(&at_rest, &config()));

        let mut spinning = at_rest.clone();
        spinning[1].velocity = Vector3::new(0.0, 0.25, 0.0);
        diagnostics.record(1, &spinning, &config());
        assert_eq!(diagnostics.angular_momentum_drift[0], 0.25);
    }

    #[test]
    fn test_com_drift() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_baseline(Baseline::measure(&binary(), &config()));

        let shifted: Vec<Body> = binary()
            .iter()
            .map(|b| b.with_position(b.position + Vector3::new(0.0, 0.0, 2.0)))
            .collect();
        diagnostics.record(1, &shifted, &config());
        assert_eq!(diagnostics.com_drift[0], 2.0);
        assert_eq!(diagnostics.com_history[0], Vector3::new(0.0, 0.0, 2.0));
    }

    #[test]
    fn test_empty_body_set() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.record(1, &[], &config());
        assert_eq!(diagnostics.energy_drift, vec![0.0]);
        assert_eq!(diagnostics.angular_momentum_drift, vec![0.0]);
    }

    #[test]
    fn test_non_finite_drift_is_recorded() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.set_baseline(Baseline::measure(&binary(), &config()));

        let mut broken = binary();
        broken[0].velocity = Vector3::new(f64::NAN, 0.0, 0.0);
        diagnostics.record(1, &broken, &config());
        diagnostics.record(2, &broken, &config());

        assert!(diagnostics.energy_drift[0].is_nan());
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_clear_and_summaries() {
        let mut diagnostics = Diagnostics::new();
        assert_eq!(diagnostics.max_energy_drift(), None);

        diagnostics.set_baseline(Baseline::measure(&binary(), &config()));
        diagnostics.record(1, &binary(), &config());
        let mut faster = binary();
        faster[1].velocity = Vector3::new(0.0, 2.0, 0.0);
        diagnostics.record(2, &faster, &config());
        diagnostics.record(3, &binary(), &config());

        assert_eq!(diagnostics.final_energy_drift(), Some(0.0));
        assert!(diagnostics.max_energy_drift().unwrap() > 0.4);

        diagnostics.clear();
        assert!(diagnostics.is_empty());
        assert!(diagnostics.baseline().is_none());
    }
}
