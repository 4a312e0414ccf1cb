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
//! Gravitational force law and conserved quantities
//!
//! Everything here is a pure function of a body slice (plus softening and
//! the gravitational constant where relevant). Results are deterministic for
//! identical inputs.
//!
//! # Units
//!
//! Lengths in AU, masses in solar masses, time in years. In these units
//! Kepler's third law for a 1 M☉ primary reads T² = a³, which fixes
//! G = 4π² AU³ M☉⁻¹ yr⁻².

pub mod gravity;
pub mod invariants;

pub use gravity::{pairwise_accelerations, point_mass_acceleration, potential_energy};
pub use invariants::{
    angular_momentum, center_of_mass, kinetic_energy, linear_momentum, total_energy,
};

/// Gravitational constant in AU³ / (M☉ · yr²)
pub const GRAVITATIONAL_CONSTANT: f64 = 4.0 * std::f64::consts::PI * std::f64::consts::PI;
