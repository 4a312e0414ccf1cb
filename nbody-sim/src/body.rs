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
//! Point-mass bodies
//!
//! A [`Body`] is a plain `Copy` value. Integrators never mutate the bodies
//! they are handed; each step builds a fresh set, so an intermediate
//! (drifted) body set can coexist with the state it was derived from.

use crate::vector::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A gravitating point mass
///
/// Mass is in solar masses, position in AU and velocity in AU/year when the
/// default gravitational constant is used.
///
/// # Examples
///
/// ```
/// use nbody_sim::Body;
///
/// let earth = Body::new(3.0e-6, [1.0, 0.0, 0.0], [0.0, 6.28, 0.0]);
/// assert!(earth.is_valid());
/// assert_eq!(earth.position.x, 1.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Body {
    /// Mass (strictly positive)
    pub mass: f64,
    /// Position
    pub position: Vector3,
    /// Velocity
    pub velocity: Vector3,
}

impl Body {
    /// Create a new body
    ///
    /// # Panics
    ///
    /// Panics if the mass is not strictly positive and finite. For fallible
    /// construction, use `try_new`.
    pub fn new(mass: f64, position: impl Into<Vector3>, velocity: impl Into<Vector3>) -> Self {
        assert!(mass > 0.0 && mass.is_finite(), "Mass must be positive and finite");
        Body {
            mass,
            position: position.into(),
            velocity: velocity.into(),
        }
    }

    /// Try to create a new body
    ///
    /// Returns `None` if the mass is not strictly positive and finite.
    pub fn try_new(
        mass: f64,
        position: impl Into<Vector3>,
        velocity: impl Into<Vector3>,
    ) -> Option<Self> {
        if mass > 0.0 && mass.is_finite() {
            Some(Body {
                mass,
                position: position.into(),
                velocity: velocity.into(),
            })
        } else {
            None
        }
    }

    /// Create a body with zero velocity
    pub fn at_rest(mass: f64, position: impl Into<Vector3>) -> Self {
        Body::new(mass, position, Vector3::zero())
    }

    /// Copy of this body with a different position
    pub fn with_position(&self, position: Vector3) -> Self {
        Body { position, ..*self }
    }

    /// Copy of this body with a different velocity
    pub fn with_velocity(&self, velocity: Vector3) -> Self {
        Body { velocity, ..*self }
    }

    /// Kinetic energy ½mv²
    pub fn kinetic_energy(&self) -> f64 {
        0.5 * self.mass * self.velocity.norm_squared()
    }

    /// Linear momentum mv
    pub fn momentum(&self) -> Vector3 {
        self.velocity * self.mass
    }

    /// Angular momentum about the origin, m(r × v)
    pub fn angular_momentum(&self) -> Vector3 {
        self.position.cross(self.velocity) * self.mass
    }

    /// Check that mass is positive and every coordinate is finite
    pub fn is_valid(&self) -> bool {
        self.mass > 0.0
            && self.mass.is_finite()
            && self.position.is_finite()
            && self.velocity.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_creation() {
        let body = Body::new(2.0, [1.0, 2.0, 3.0], [4.0, 5.0, 6.0]);
        assert_eq!(body.mass, 2.0);
        assert_eq!(body.position, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(body.velocity, Vector3::new(4.0, 5.0, 6.0));
    }

    #[test]
    fn test_body_try_new() {
        assert!(Body::try_new(1.0, [0.0; 3], [0.0; 3]).is_some());
        assert!(Body::try_new(0.0, [0.0; 3], [0.0; 3]).is_none());
        assert!(Body::try_new(-1.0, [0.0; 3], [0.0; 3]).is_none());
        assert!(Body::try_new(f64::NAN, [0.0; 3], [0.0; 3]).is_none());
        assert!(Body::try_new(f64::INFINITY, [0.0; 3], [0.0; 3]).is_none());
    }

    #[test]
    #[should_panic(expected = "Mass must be positive and finite")]
    fn test_zero_mass_panics() {
        Body::new(0.0, [0.0; 3], [0.0; 3]);
    }

    #[test]
    #[should_panic(expected = "Mass must be positive and finite")]
    fn test_negative_mass_panics() {
        Body::at_rest(-1.0, [0.0; 3]);
    }

    #[test]
    fn test_body_is_copy_value() {
        let original = Body::at_rest(1.0, [1.0, 0.0, 0.0]);
        let mut moved = original;
        moved.position.x = 5.0;
        assert_eq!(original.position.x, 1.0);
    }

    #[test]
    fn test_with_position_and_velocity() {
        let body = Body::new(1.0, [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]);
        let drifted = body.with_position(Vector3::new(2.0, 0.0, 0.0));
        let kicked = body.with_velocity(Vector3::new(0.0, 2.0, 0.0));

        assert_eq!(drifted.velocity, body.velocity);
        assert_eq!(drifted.position.x, 2.0);
        assert_eq!(kicked.position, body.position);
        assert_eq!(kicked.velocity.y, 2.0);
    }

    #[test]
    fn test_body_dynamics_quantities() {
        let body = Body::new(2.0, [1.0, 0.0, 0.0], [0.0, 3.0, 0.0]);
        assert_eq!(body.kinetic_energy(), 9.0);
        assert_eq!(body.momentum(), Vector3::new(0.0, 6.0, 0.0));
        assert_eq!(body.angular_momentum(), Vector3::new(0.0, 0.0, 6.0));
    }

    #[test]
    fn test_body_validation() {
        let mut body = Body::at_rest(1.0, [0.0; 3]);
        assert!(body.is_valid());

        body.velocity.y = f64::NAN;
        assert!(!body.is_valid());
    }
}
