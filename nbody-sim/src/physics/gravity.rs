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
//! Softened Newtonian gravity
//!
//! # Physics Background
//!
//! The acceleration of body *i* due to body *j* is
//!
//! **aᵢ = G · mⱼ · d / r³**, with **d = xⱼ − xᵢ** and **r² = |d|² + ε²**
//!
//! where ε is the softening length. Softening bounds the force when two
//! bodies pass close to each other and keeps coincident bodies finite.
//! With ε = 0 this is exactly Newton's law.
//!
//! The matching pair potential is **Uᵢⱼ = −G · mᵢ · mⱼ / r**.
//!
//! # References
//!
//! - Dehnen, W. (2001). "Towards optimal softening in three-dimensional N-body codes"
//! - Aarseth, S. J. (2003). "Gravitational N-Body Simulations"

use crate::body::Body;
use crate::state::Accelerations;
use crate::vector::Vector3;

/// Net acceleration on every body from every other body
///
/// Each unordered pair is visited once and both antisymmetric contributions
/// are applied, so the work is N(N−1)/2 kernel evaluations.
///
/// # Examples
///
/// ```
/// use nbody_sim::Body;
/// use nbody_sim::physics::pairwise_accelerations;
///
/// let bodies = vec![
///     Body::at_rest(1.0, [0.0, 0.0, 0.0]),
///     Body::at_rest(1.0, [1.0, 0.0, 0.0]),
/// ];
/// let accels = pairwise_accelerations(&bodies, 0.0, 1.0);
/// assert_eq!(accels[0].x, 1.0);
/// assert_eq!(accels[1].x, -1.0);
/// ```
pub fn pairwise_accelerations(bodies: &[Body], softening: f64, g: f64) -> Accelerations {
    let n = bodies.len();
    let mut accels = Accelerations::zeros(n);
    let soft2 = softening * softening;
    let acc = accels.as_mut_slice();

    for i in 0..n {
        let bi = &bodies[i];
        for j in (i + 1)..n {
            let bj = &bodies[j];

            let d = bj.position - bi.position;
            let r2 = d.norm_squared() + soft2;
            let r3 = r2 * r2.sqrt();

            // Force per unit mass, shared by both directions of the pair
            let f = g / r3;

            acc[i] += d * (f * bj.mass);
            acc[j] -= d * (f * bi.mass);
        }
    }

    accels
}

/// Acceleration at `target` due to a single point mass
///
/// This is the kernel the octree applies both to individual leaf bodies and
/// to whole nodes collapsed onto their center of mass.
pub fn point_mass_acceleration(
    target: Vector3,
    source: Vector3,
    source_mass: f64,
    softening: f64,
    g: f64,
) -> Vector3 {
    let d = source - target;
    let r2 = d.norm_squared() + softening * softening;
    let inv_r3 = 1.0 / (r2 * r2.sqrt());
    d * (g * source_mass * inv_r3)
}

/// Total gravitational potential energy over unordered pairs
pub fn potential_energy(bodies: &[Body], softening: f64, g: f64) -> f64 {
    let soft2 = softening * softening;
    let mut total = 0.0;

    for (i, bi) in bodies.iter().enumerate() {
        for bj in &bodies[i + 1..] {
            let d = bj.position - bi.position;
            let dist = (d.norm_squared() + soft2).sqrt();
            total -= g * bi.mass * bj.mass / dist;
        }
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_body_acceleration_is_attractive() {
        let bodies = vec![
            Body::at_rest(1.0, [-1.0, 0.0, 0.0]),
            Body::at_rest(3.0, [1.0, 0.0, 0.0]),
        ];
        let accels = pairwise_accelerations(&bodies, 0.0, 1.0);

        // |a| = G m / r², r = 2
        assert!((accels[0].x - 0.75).abs() < 1e-15);
        assert!((accels[1].x + 0.25).abs() < 1e-15);
        assert_eq!(accels[0].y, 0.0);
    }

    #[test]
    fn test_net_force_vanishes() {
        let bodies = vec![
            Body::at_rest(1.0, [0.0, 0.0, 0.0]),
            Body::at_rest(2.0, [1.0, 2.0, 0.0]),
            Body::at_rest(0.5, [-1.0, 0.5, 3.0]),
            Body::at_rest(4.0, [2.0, -1.0, -1.0]),
        ];
        let accels = pairwise_accelerations(&bodies, 0.01, 1.0);

        let mut net = Vector3::zero();
        for (b, a) in bodies.iter().zip(accels.iter()) {
            net += *a * b.mass;
        }
        assert!(net.norm() < 1e-12, "Newton's third law violated: {:?}", net);
    }

    #[test]
    fn test_softening_bounds_coincident_bodies() {
        let bodies = vec![
            Body::at_rest(1.0, [0.0, 0.0, 0.0]),
            Body::at_rest(1.0, [0.0, 0.0, 0.0]),
        ];
        let accels = pairwise_accelerations(&bodies, 0.1, 1.0);
        assert_eq!(accels[0], Vector3::zero());
        assert_eq!(accels[1], Vector3::zero());
    }

    #[test]
    fn test_softening_reduces_force() {
        let bodies = vec![
            Body::at_rest(1.0, [0.0, 0.0, 0.0]),
            Body::at_rest(1.0, [0.1, 0.0, 0.0]),
        ];
        let hard = pairwise_accelerations(&bodies, 0.0, 1.0);
        let soft = pairwise_accelerations(&bodies, 0.1, 1.0);
        assert!(soft[0].x < hard[0].x);
        assert!(soft[0].x > 0.0);
    }

    #[test]
    fn test_point_mass_matches_pairwise() {
        let bodies = vec![
            Body::at_rest(1.0, [0.3, -0.2, 0.1]),
            Body::at_rest(2.5, [1.0, 0.4, -0.7]),
        ];
        let pairwise = pairwise_accelerations(&bodies, 0.05, 2.0);
        let kernel = point_mass_acceleration(
            bodies[0].position,
            bodies[1].position,
            bodies[1].mass,
            0.05,
            2.0,
        );
        assert!((pairwise[0] - kernel).norm() < 1e-14);
    }

    #[test]
    fn test_potential_energy() {
        let bodies = vec![
            Body::at_rest(2.0, [0.0, 0.0, 0.0]),
            Body::at_rest(3.0, [2.0, 0.0, 0.0]),
        ];
        assert_eq!(potential_energy(&bodies, 0.0, 1.0), -3.0);

        // Softening raises (makes less negative) the potential
        assert!(potential_energy(&bodies, 1.0, 1.0) > -3.0);
    }

    #[test]
    fn test_empty_and_single_body() {
        assert!(pairwise_accelerations(&[], 0.0, 1.0).is_empty());
        let single = [Body::at_rest(1.0, [1.0, 1.0, 1.0])];
        assert_eq!(pairwise_accelerations(&single, 0.0, 1.0)[0], Vector3::zero());
        assert_eq!(potential_energy(&single, 0.0, 1.0), 0.0);
    }
}
