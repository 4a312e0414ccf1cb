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
//! Barnes–Hut solver
//!
//! Every call builds one octree over the current positions and queries it
//! once per body. The tree's node storage is returned to an [`ArenaPool`]
//! afterwards, so repeated calls with a similar body count stop allocating.

use log::debug;

use super::Solver;
use crate::body::Body;
use crate::config::SimulationConfig;
use crate::error::ConfigError;
use crate::octree::{Bounds, Node, Octree};
use crate::pool::{ArenaPool, PoolConfig};
use crate::state::Accelerations;

/// Opening angle used when none is given
pub const DEFAULT_THETA: f64 = 0.7;

/// Octree-approximated solver
///
/// # Example
///
/// ```
/// use nbody_sim::solver::{BarnesHutSolver, DEFAULT_THETA};
///
/// let solver = BarnesHutSolver::default();
/// assert_eq!(solver.theta(), DEFAULT_THETA);
///
/// assert!(BarnesHutSolver::try_new(-1.0).is_err());
/// ```
#[derive(Debug)]
pub struct BarnesHutSolver {
    theta: f64,
    pool: ArenaPool<Node>,
}

impl BarnesHutSolver {
    /// Create a new Barnes–Hut solver
    ///
    /// # Panics
    ///
    /// Panics if theta is negative, NaN, or infinite. For fallible
    /// construction, use `try_new`.
    pub fn new(theta: f64) -> Self {
        assert!(
            theta >= 0.0 && theta.is_finite(),
            "Theta must be non-negative and finite"
        );
        Self::with_pool_config(theta, PoolConfig::default())
    }

    /// Try to create a new Barnes–Hut solver
    pub fn try_new(theta: f64) -> Result<Self, ConfigError> {
        if theta >= 0.0 && theta.is_finite() {
            Ok(Self::with_pool_config(theta, PoolConfig::default()))
        } else {
            Err(ConfigError::InvalidTheta(theta))
        }
    }

    fn with_pool_config(theta: f64, pool_config: PoolConfig) -> Self {
        BarnesHutSolver {
            theta,
            pool: ArenaPool::with_config(pool_config),
        }
    }

    /// Log whenever the node pool has to allocate
    pub fn with_pool_logging(mut self) -> Self {
        self.pool = ArenaPool::with_config(PoolConfig::default().with_logging());
        self
    }

    /// Opening angle
    pub fn theta(&self) -> f64 {
        self.theta
    }

    /// Node buffer pool, for inspecting reuse
    pub fn pool(&self) -> &ArenaPool<Node> {
        &self.pool
    }
}

impl Default for BarnesHutSolver {
    fn default() -> Self {
        Self::new(DEFAULT_THETA)
    }
}

impl Solver for BarnesHutSolver {
    fn name(&self) -> &str {
        "Barnes-Hut"
    }

    fn accelerations(&mut self, bodies: &[Body], config: &SimulationConfig) -> Accelerations {
        let bounds = match Bounds::enclosing(bodies) {
            Some(bounds) => bounds,
            None => return Accelerations::zeros(0),
        };

        let tree = Octree::build_in(self.pool.acquire(), bodies, bounds);
        if log::log_enabled!(log::Level::Debug) {
            debug!(
                "Built octree: {} bodies, {} nodes, depth {}",
                bodies.len(),
                tree.len(),
                tree.depth()
            );
        }

        let accels = (0..bodies.len())
            .map(|i| {
                tree.compute_acceleration(
                    i,
                    bodies,
                    self.theta,
                    config.softening,
                    config.gravitational_constant,
                )
            })
            .collect();

        self.pool.release(tree.into_buffer());
        accels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::pairwise_accelerations;

    fn cluster() -> Vec<Body> {
        let mut bodies = Vec::new();
        for i in 0..40 {
            let t = i as f64 * 0.37;
            bodies.push(Body::at_rest(
                1.0 + (i % 3) as f64,
                [t.cos() * (1.0 + 0.05 * i as f64), t.sin() * 0.8, (2.0 * t).sin() * 0.3],
            ));
        }
        bodies
    }

    #[test]
    fn test_theta_validation() {
        assert!(BarnesHutSolver::try_new(0.0).is_ok());
        assert_eq!(
            BarnesHutSolver::try_new(-0.5).unwrap_err(),
            ConfigError::InvalidTheta(-0.5)
        );
        assert!(BarnesHutSolver::try_new(f64::NAN).is_err());
        assert!(BarnesHutSolver::try_new(f64::INFINITY).is_err());
    }

    #[test]
    #[should_panic(expected = "Theta must be non-negative and finite")]
    fn test_negative_theta_panics() {
        BarnesHutSolver::new(-1.0);
    }

    #[test]
    fn test_empty_input() {
        let mut solver = BarnesHutSolver::default();
        let accels = solver.accelerations(&[], &SimulationConfig::default());
        assert!(accels.is_empty());
    }

    #[test]
    fn test_zero_theta_matches_direct() {
        let bodies = cluster();
        let config = SimulationConfig::default();
        let exact = pairwise_accelerations(&bodies, config.softening, config.gravitational_constant);
        let approx = BarnesHutSolver::new(0.0).accelerations(&bodies, &config);

        for i in 0..bodies.len() {
            let err = (approx[i] - exact[i]).norm() / exact[i].norm();
            assert!(err < 1e-10, "body {} relative error {}", i, err);
        }
    }

    #[test]
    fn test_default_theta_is_close() {
        let bodies = cluster();
        let config = SimulationConfig::default();
        let exact = pairwise_accelerations(&bodies, config.softening, config.gravitational_constant);
        let approx = BarnesHutSolver::default().accelerations(&bodies, &config);

        let mut err2 = 0.0;
        let mut norm2 = 0.0;
        for i in 0..bodies.len() {
            err2 += (approx[i] - exact[i]).norm_squared();
            norm2 += exact[i].norm_squared();
        }
        let err = (err2 / norm2).sqrt();
        assert!(err < 0.05, "aggregate relative error {}", err);
    }

    #[test]
    fn test_node_buffer_is_reused() {
        let bodies = cluster();
        let config = SimulationConfig::default();
        let mut solver = BarnesHutSolver::new(0.5);

        let first = solver.accelerations(&bodies, &config);
        let second = solver.accelerations(&bodies, &config);
        assert_eq!(first, second);

        let stats = solver.pool().stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
    }
}
