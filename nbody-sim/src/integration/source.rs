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
//! Where integrators get their accelerations from

use crate::body::Body;
use crate::config::SimulationConfig;
use crate::solver::Solver;
use crate::state::Accelerations;

/// Anything that can evaluate accelerations for a body set
///
/// Implemented by [`AccelerationField`] for real runs and by any
/// `FnMut(&[Body]) -> Accelerations` closure, which is convenient for tests
/// with analytic force laws.
pub trait AccelerationSource {
    /// Acceleration of every body, in body order
    fn accelerations(&mut self, bodies: &[Body]) -> Accelerations;

    /// Number of evaluations performed so far, if tracked
    fn evaluations(&self) -> usize {
        0
    }
}

impl<F> AccelerationSource for F
where
    F: FnMut(&[Body]) -> Accelerations,
{
    fn accelerations(&mut self, bodies: &[Body]) -> Accelerations {
        self(bodies)
    }
}

/// A solver bound to the configuration it should read softening and the
/// gravitational constant from
///
/// # Example
///
/// ```
/// use nbody_sim::{Body, SimulationConfig};
/// use nbody_sim::integration::{AccelerationField, AccelerationSource};
/// use nbody_sim::solver::DirectSolver;
///
/// let config = SimulationConfig::default();
/// let mut solver = DirectSolver::new();
/// let mut field = AccelerationField::new(&mut solver, &config);
///
/// let bodies = [Body::at_rest(1.0, [0.0, 0.0, 0.0])];
/// field.accelerations(&bodies);
/// assert_eq!(field.evaluations(), 1);
/// ```
pub struct AccelerationField<'a> {
    solver: &'a mut dyn Solver,
    config: &'a SimulationConfig,
    evaluations: usize,
}

impl<'a> AccelerationField<'a> {
    /// Bind a solver to a configuration
    pub fn new(solver: &'a mut dyn Solver, config: &'a SimulationConfig) -> Self {
        AccelerationField {
            solver,
            config,
            evaluations: 0,
        }
    }

    /// Name of the underlying solver
    pub fn solver_name(&self) -> &str {
        self.solver.name()
    }
}

impl AccelerationSource for AccelerationField<'_> {
    fn accelerations(&mut self, bodies: &[Body]) -> Accelerations {
        self.evaluations += 1;
        self.solver.accelerations(bodies, self.config)
    }

    fn evaluations(&self) -> usize {
        self.evaluations
    }
}
