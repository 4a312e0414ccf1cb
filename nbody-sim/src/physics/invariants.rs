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
//! Quantities conserved by an isolated gravitating system
//!
//! These should always be evaluated on a synchronized state, where position
//! and velocity refer to the same instant.

use super::gravity::potential_energy;
use crate::body::Body;
use crate::vector::Vector3;

/// Total kinetic energy Σ ½mᵢ|vᵢ|²
pub fn kinetic_energy(bodies: &[Body]) -> f64 {
    bodies.iter().map(Body::kinetic_energy).sum()
}

/// Kinetic plus potential energy
pub fn total_energy(bodies: &[Body], softening: f64, g: f64) -> f64 {
    kinetic_energy(bodies) + potential_energy(bodies, softening, g)
}

/// Total linear momentum Σ mᵢvᵢ
pub fn linear_momentum(bodies: &[Body]) -> Vector3 {
    bodies
        .iter()
        .fold(Vector3::zero(), |total, b| total + b.momentum())
}

/// Total angular momentum about the origin Σ mᵢ (xᵢ × vᵢ)
pub fn angular_momentum(bodies: &[Body]) -> Vector3 {
    bodies
        .iter()
        .fold(Vector3::zero(), |total, b| total + b.angular_momentum())
}

/// Mass-weighted mean position
///
/// Returns the origin for an empty body set.
pub fn center_of_mass(bodies: &[Body]) -> Vector3 {
    let mut weighted = Vector3::zero();
    let mut mass = 0.0;
    for b in bodies {
        weighted += b.position * b.mass;
        mass += b.mass;
    }
    if mass > 0.0 {
        weighted / mass
    } else {
        Vector3::zero()
    }
}
