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
//! Kick-drift-kick Leapfrog integrator
//!
//! Velocities are stored half a step ahead of positions. Two consecutive
//! half-kicks from adjacent steps are fused into one full kick, so each step
//! costs a single force evaluation.
//!
//! # Algorithm
//!
//! ```text
//! initialize:   v(1/2)     = v(0) + 0.5*a(x(0))*dt
//! step:         x(n+1)     = x(n) + v(n+1/2)*dt
//!               v(n+3/2)   = v(n+1/2) + a(x(n+1))*dt
//! synchronize:  v(n)       = v(n+1/2) - 0.5*a(x(n))*dt
//! ```
//!
//! The accelerations at the current positions are cached on the state, so
//! `synchronize` does not evaluate them again.
//!
//! # Properties
//!
//! - **Symplectic**: Preserves phase space volume
//! - **Time-reversible**
//! - **Energy conservation**: Bounded energy error over long periods
//! - **Second-order accurate**: Global error O(dt²)
//!
//! # References
//!
//! - Hairer, E., Lubich, C., & Wanner, G. (2003). Geometric numerical
//!   integration illustrated by the Störmer–Verlet method. Acta Numerica,
//!   12, 399-450.
//! - Springel, V. (2005). The cosmological simulation code GADGET-2.
//!   MNRAS, 364, 1105-1134. Section 4.

use super::{AccelerationSource, Integrator};
use crate::body::Body;
use crate::config::SimulationConfig;
use crate::state::{Accelerations, SystemState};

/// Leapfrog (kick-drift-kick) integrator
///
/// # Example
///
/// ```
/// use nbody_sim::{Accelerations, Body, SimulationConfig, SystemState, Vector3};
/// use nbody_sim::integration::{Integrator, LeapfrogIntegrator};
///
/// let state = SystemState::new(vec![Body::new(1.0, [0.0; 3], [0.0; 3])]);
/// let config = SimulationConfig::new(0.5, 1, 0.0);
/// let mut push = |b: &[Body]| Accelerations::from_vec(vec![Vector3::new(2.0, 0.0, 0.0); b.len()]);
///
/// let leapfrog = LeapfrogIntegrator::new();
/// let internal = leapfrog.initialize(&state, &config, &mut push);
/// assert_eq!(internal.bodies()[0].velocity.x, 0.5); // half a kick ahead
///
/// let synced = leapfrog.synchronize(&internal, &config, &mut push);
/// assert_eq!(synced.bodies()[0].velocity.x, 0.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LeapfrogIntegrator;

impl LeapfrogIntegrator {
    /// Create a new Leapfrog integrator
    pub fn new() -> Self {
        LeapfrogIntegrator
    }
}

fn kick(bodies: &[Body], accels: &Accelerations, dt: f64) -> Vec<Body> {
    bodies
        .iter()
        .zip(accels.iter())
        .map(|(b, a)| Body {
            velocity: b.velocity + *a * dt,
            ..*b
        })
        .collect()
}

impl Integrator for LeapfrogIntegrator {
    fn name(&self) -> &str {
        "Leapfrog"
    }

    fn initialize(
        &self,
        state: &SystemState,
        config: &SimulationConfig,
        source: &mut dyn AccelerationSource,
    ) -> SystemState {
        let accels = source.accelerations(state.bodies());
        let bodies = kick(state.bodies(), &accels, 0.5 * config.dt);
        SystemState::with_accelerations(bodies, accels)
    }

    fn step(
        &self,
        state: &SystemState,
        config: &SimulationConfig,
        source: &mut dyn AccelerationSource,
    ) -> SystemState {
        let dt = config.dt;

        // Drift
        let drifted: Vec<Body> = state
            .bodies()
            .iter()
            .map(|b| Body {
                position: b.position + b.velocity * dt,
                ..*b
            })
            .collect();

        // Kick
        let accels = source.accelerations(&drifted);
        let bodies = kick(&drifted, &accels, dt);
        SystemState::with_accelerations(bodies, accels)
    }

    fn synchronize(
        &self,
        state: &SystemState,
        config: &SimulationConfig,
        source: &mut dyn AccelerationSource,
    ) -> SystemState {
        let recomputed;
        let accels = match state.cached_accelerations() {
            Some(cached) if cached.len() == state.len() => cached,
            _ => {
                recomputed = source.accelerations(state.bodies());
                &recomputed
            }
        };

        SystemState::new(kick(state.bodies(), accels, -0.5 * config.dt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vector::Vector3;

    // Unit-mass harmonic oscillator, a = -x
    fn spring(bodies: &[Body]) -> Accelerations {
        bodies.iter().map(|b| -b.position).collect()
    }

    fn oscillator() -> SystemState {
        SystemState::new(vec![Body::new(1.0, [1.0, 0.0, 0.0], [0.0, 0.0, 0.0])])
    }

    #[test]
    fn test_initialize_half_kicks_and_caches() {
        let config = SimulationConfig::new(0.1, 1, 0.0);
        let internal = LeapfrogIntegrator::new().initialize(&oscillator(), &config, &mut spring);

        assert_eq!(internal.bodies()[0].position, Vector3::new(1.0, 0.0, 0.0));
        assert!((internal.bodies()[0].velocity.x + 0.05).abs() < 1e-15);
        assert_eq!(
            internal.cached_accelerations().map(|a| a[0]),
            Some(Vector3::new(-1.0, 0.0, 0.0))
        );
    }

    #[test]
    fn test_step_drifts_then_kicks() {
        let config = SimulationConfig::new(0.1, 1, 0.0);
        let leapfrog = LeapfrogIntegrator::new();
        let internal = leapfrog.initialize(&oscillator(), &config, &mut spring);
        let next = leapfrog.step(&internal, &config, &mut spring);

        // x1 = 1 + 0.1 * (-0.05) = 0.995, v(3/2) = -0.05 + 0.1 * (-0.995)
        let b = next.bodies()[0];
        assert!((b.position.x - 0.995).abs() < 1e-15);
        assert!((b.velocity.x + 0.1495).abs() < 1e-15);
        assert_eq!(next.cached_accelerations().map(|a| a[0].x), Some(-b.position.x));
    }

    #[test]
    fn test_synchronize_uses_cache() {
        let config = SimulationConfig::new(0.1, 1, 0.0);
        let leapfrog = LeapfrogIntegrator::new();
        let mut calls = 0;
        let mut counted = |bodies: &[Body]| {
            calls += 1;
            spring(bodies)
        };

        let internal = leapfrog.initialize(&oscillator(), &config, &mut counted);
        let synced = leapfrog.synchronize(&internal, &config, &mut counted);
        drop(counted);

        assert_eq!(calls, 1);
        assert!(synced.bodies()[0].velocity.norm() < 1e-15);
        assert!(synced.cached_accelerations().is_none());
    }

    #[test]
    fn test_synchronize_recomputes_without_cache() {
        let config = SimulationConfig::new(0.1, 1, 0.0);
        let leapfrog = LeapfrogIntegrator::new();
        let internal = leapfrog.initialize(&oscillator(), &config, &mut spring);
        let stripped = internal.without_accelerations();

        let mut calls = 0;
        let mut counted = |bodies: &[Body]| {
            calls += 1;
            spring(bodies)
        };
        let synced = leapfrog.synchronize(&stripped, &config, &mut counted);
        drop(counted);

        assert_eq!(calls, 1);
        assert_eq!(synced, leapfrog.synchronize(&internal, &config, &mut spring));
    }

    #[test]
    fn test_synchronize_does_not_mutate_input() {
        let config = SimulationConfig::new(0.1, 1, 0.0);
        let leapfrog = LeapfrogIntegrator::new();
        let internal = leapfrog.initialize(&oscillator(), &config, &mut spring);
        let before = internal.copy();

        let _ = leapfrog.synchronize(&internal, &config, &mut spring);
        assert_eq!(internal, before);
    }

    #[test]
    fn test_oscillator_energy_bounded() {
        let config = SimulationConfig::new(0.02, 1, 0.0);
        let leapfrog = LeapfrogIntegrator::new();
        let energy = |s: &SystemState| {
            let b = s.bodies()[0];
            0.5 * b.velocity.norm_squared() + 0.5 * b.position.norm_squared()
        };

        let mut state = leapfrog.initialize(&oscillator(), &config, &mut spring);
        let mut worst: f64 = 0.0;
        for _ in 0..5000 {
            state = leapfrog.step(&state, &config, &mut spring);
            let synced = leapfrog.synchronize(&state, &config, &mut spring);
            worst = worst.max((energy(&synced) - 0.5).abs() / 0.5);
        }
        assert!(worst < 1e-3, "energy error {}", worst);
    }
}
