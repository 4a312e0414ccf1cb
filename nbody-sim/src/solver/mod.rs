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
//! Acceleration solvers
//!
//! A solver turns a body set into one acceleration per body. Two are
//! provided:
//!
//! - **Direct**: exact pairwise summation, O(N²)
//! - **Barnes–Hut**: octree approximation controlled by an opening angle θ,
//!   O(N log N)
//!
//! # Choosing a Solver
//!
//! - **Direct**: Small systems (up to a few hundred bodies) and any run where
//!   the force error must be zero. Also the reference for checking Barnes–Hut.
//! - **Barnes–Hut**: Large systems. θ around 0.5–0.7 keeps the relative force
//!   error near a percent; θ = 0 opens every node and reproduces the direct
//!   result at a higher cost than the direct solver itself.

use crate::body::Body;
use crate::config::SimulationConfig;
use crate::state::Accelerations;

mod barnes_hut;
mod direct;

pub use barnes_hut::{BarnesHutSolver, DEFAULT_THETA};
pub use direct::DirectSolver;

/// Trait for acceleration solvers
///
/// Solvers read softening and the gravitational constant from the
/// configuration on every call. They take `&mut self` so they can keep
/// scratch storage between calls; results must not depend on it.
pub trait Solver: Send {
    /// Get the name of this solver
    fn name(&self) -> &str;

    /// Acceleration of every body due to all others, in body order
    ///
    /// An empty body set yields an empty result.
    fn accelerations(&mut self, bodies: &[Body], config: &SimulationConfig) -> Accelerations;
}
