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
//! # N-body Simulation
//!
//! A gravitational N-body simulation core that measures how well different
//! numerical methods conserve the physical invariants of an isolated system.
//!
//! ## Features
//!
//! - **Force Law**: Softened Newtonian gravity with energy, momentum and
//!   angular momentum measurements
//! - **Solvers**: Exact O(N²) pairwise summation and O(N log N) Barnes–Hut
//!   approximation over an arena-backed octree
//! - **Integrators**: Explicit Euler and kick-drift-kick Leapfrog with a
//!   synchronized measurement state
//! - **Diagnostics**: Per-step energy, momentum, angular momentum and
//!   center-of-mass drift histories
//!
//! Units follow the astronomical convention (AU, solar masses, years), in
//! which the gravitational constant is 4π².
//!
//! ## Example
//!
//! ```rust
//! use nbody_sim::{Body, Simulation, SimulationConfig};
//! use nbody_sim::integration::LeapfrogIntegrator;
//!
//! let bodies = vec![
//!     Body::new(1.0, [-0.5, 0.0, 0.0], [0.0, -4.44, 0.0]),
//!     Body::new(1.0, [0.5, 0.0, 0.0], [0.0, 4.44, 0.0]),
//! ];
//! let config = SimulationConfig::new(0.002, 100, 0.0);
//!
//! let mut sim = Simulation::new(bodies, config)
//!     .unwrap()
//!     .with_integrator(Box::new(LeapfrogIntegrator::new()));
//! sim.run();
//!
//! assert_eq!(sim.diagnostics().energy_drift.len(), 100);
//! ```

#![warn(missing_docs)]

/// Three-component vector arithmetic
pub mod vector;

/// Point-mass bodies
pub mod body;

/// System snapshots and acceleration buffers
pub mod state;

/// Simulation configuration
pub mod config;

/// Configuration errors
pub mod error;

/// Gravitational force law and conserved quantities
pub mod physics;

/// Spatial octree for hierarchical force evaluation
pub mod octree;

/// Buffer pooling for reducing allocation churn
pub mod pool;

/// Acceleration solvers
pub mod solver;

/// Numerical integration methods
pub mod integration;

/// Simulation engine and diagnostics
pub mod engine;

pub use body::Body;
pub use config::SimulationConfig;
pub use engine::{Diagnostics, Simulation, StepControl};
pub use error::ConfigError;
pub use physics::GRAVITATIONAL_CONSTANT;
pub use state::{Accelerations, Frame, SystemState};
pub use vector::Vector3;
