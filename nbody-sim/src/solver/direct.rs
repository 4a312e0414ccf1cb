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
//! Exact pairwise solver

use super::Solver;
use crate::body::Body;
use crate::config::SimulationConfig;
use crate::physics::pairwise_accelerations;
use crate::state::Accelerations;

/// O(N²) pairwise summation
///
/// # Example
///
/// ```
/// use nbody_sim::{Body, SimulationConfig};
/// use nbody_sim::solver::{DirectSolver, Solver};
///
/// let bodies = vec![
///     Body::at_rest(1.0, [0.0, 0.0, 0.0]),
///     Body::at_rest(1.0, [1.0, 0.0, 0.0]),
/// ];
/// let config = SimulationConfig::new(0.01, 1, 0.0).with_gravitational_constant(1.0);
/// let accels = DirectSolver::new().accelerations(&bodies, &config);
/// assert_eq!(accels[0].x, 1.0);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectSolver;

impl DirectSolver {
    /// Create a new direct solver
    pub fn new() -> Self {
        DirectSolver
    }
}

impl Solver for DirectSolver {
    fn name(&self) -> &str {
        "Direct"
    }

    fn accelerations(&mut self, bodies: &[Body], config: &SimulationConfig) -> Accelerations {
        pairwise_accelerations(bodies, config.softening, config.gravitational_constant)
    }
}
