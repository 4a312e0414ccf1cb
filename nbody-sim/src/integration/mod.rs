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
//! Numerical integration methods for N-body simulation
//!
//! An integrator advances a [`SystemState`] by one timestep using
//! accelerations pulled from an [`AccelerationSource`]. Integrators are
//! stateless: everything they carry between steps lives in the state itself.
//!
//! # Integrators
//!
//! - **Euler**: First-order explicit method, one force evaluation per step
//! - **Leapfrog**: Second-order symplectic kick-drift-kick, one force
//!   evaluation per step
//!
//! # Internal and synchronized state
//!
//! Leapfrog keeps velocities half a step ahead of positions. The state it
//! returns from `initialize` and `step` is therefore not directly
//! measurable; `synchronize` produces a copy whose velocities refer to the
//! same instant as the positions. Euler's internal state is already
//! synchronized, so its `initialize` and `synchronize` are the identity.
//!
//! # Choosing an Integrator
//!
//! - **Euler**: Reference for comparison only. Energy drifts secularly and
//!   circular orbits spiral outwards.
//! - **Leapfrog**: Long-running orbital integrations. Energy error stays
//!   bounded and oscillates instead of growing.

use crate::config::SimulationConfig;
use crate::state::SystemState;

mod euler;
mod leapfrog;
mod source;

pub use euler::EulerIntegrator;
pub use leapfrog::LeapfrogIntegrator;
pub use source::{AccelerationField, AccelerationSource};

/// Trait for numerical integration methods
///
/// None of the methods mutate the state they are given; each returns a new
/// state.
pub trait Integrator: Send + Sync {
    /// Get the name of this integrator
    fn name(&self) -> &str;

    /// Prepare the internal representation from a synchronized initial state
    fn initialize(
        &self,
        state: &SystemState,
        config: &SimulationConfig,
        source: &mut dyn AccelerationSource,
    ) -> SystemState;

    /// Advance the internal state by `config.dt`
    fn step(
        &self,
        state: &SystemState,
        config: &SimulationConfig,
        source: &mut dyn AccelerationSource,
    ) -> SystemState;

    /// Synchronized copy of an internal state, for measurement
    ///
    /// The returned state never carries cached accelerations.
    fn synchronize(
        &self,
        state: &SystemState,
        config: &SimulationConfig,
        source: &mut dyn AccelerationSource,
    ) -> SystemState;
}
