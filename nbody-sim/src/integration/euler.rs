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
//! Explicit Euler integrator
//!
//! # Algorithm
//!
//! ```text
//! a = a(x(t))
//! v(t + dt) = v(t) + a*dt
//! x(t + dt) = x(t) + v(t)*dt
//! ```
//!
//! The position update uses the velocity from the start of the step.
//!
//! # Properties
//!
//! - **Not symplectic**: Energy drifts secularly
//! - **First-order accurate**: Global error O(dt)
//!
//! Kept as a baseline to compare conservative methods against.

use super::{AccelerationSource, Integrator};
use crate::body::Body;
use crate::config::SimulationConfig;
use crate::state::SystemState;

/// Forward Euler integrator
///
/// # Example
///
/// ```
/// use nbody_sim::{Accelerations, Body, SimulationConfig, SystemState, Vector3};
/// use nbody_sim::integration::{EulerIntegrator, Integrator};
///
/// let state = SystemState::new(vec![Body::new(1.0, [0.0; 3], [1.0, 0.0, 0.0])]);
/// let config = SimulationConfig::new(0.5, 1, 0.0);
/// let mut push = |b: &[nbody_sim::Body]| Accelerations::from_vec(vec![Vector3::new(0.0, 2.0, 0.0); b.len()]);
///
/// let next = EulerIntegrator::new().step(&state, &config, &mut push);
/// assert_eq!(next.bodies()[0].position, Vector3::new(0.5, 0.0, 0.0));
/// assert_eq!(next.bodies()[0].velocity, Vector3::new(1.0, 1.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EulerIntegrator;

impl EulerIntegrator {
    /// Create a new Euler integrator
    pub fn new() -> Self {
        EulerIntegrator
    }
}

impl Integrator for EulerIntegrator {
    fn name(&self) -> &str {
        "Euler"
    }

    fn initialize(
        &self,
        state: &SystemState,
        _config: &SimulationConfig,
        _source: &mut dyn AccelerationSource,
    ) -> SystemState {
        state.copy()
    }

    fn step(
        &self,
        state: &SystemState,
        config: &SimulationConfig,
        source: &mut dyn AccelerationSource,
    ) -> SystemState {
        let dt = config.dt;
        let accels = source.accelerations(state.bodies());

        let bodies = state
            .bodies()
            .iter()
            .zip(accels.iter())
            .map(|(b, a)| Body {
                mass: b.mass,
                position: b.position + b.velocity * dt,
                velocity: b.velocity + *a * dt,
            })
            .collect();

        SystemState::new(bodies)
    }

    fn synchronize(
        &self,
        state: &SystemState,
        _config: &SimulationConfig,
        _source: &mut dyn AccelerationSource,
    ) -> SystemState {
        state.without_accelerations()
    }
}
