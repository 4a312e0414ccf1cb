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
//! System snapshots
//!
//! [`SystemState`] is an ordered set of bodies plus an optional acceleration
//! cache. Body order is identity: index `i` refers to the same body for the
//! whole run and is never permuted.

use std::ops::Index;

use crate::body::Body;
use crate::vector::Vector3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One acceleration vector per body, in body order
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Accelerations {
    values: Vec<Vector3>,
}

impl Accelerations {
    /// Create `n` zero accelerations
    pub fn zeros(n: usize) -> Self {
        Accelerations {
            values: vec![Vector3::zero(); n],
        }
    }

    /// Wrap an existing vector of accelerations
    pub fn from_vec(values: Vec<Vector3>) -> Self {
        Accelerations { values }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when there are no entries
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Acceleration of body `i`
    pub fn get(&self, i: usize) -> Option<Vector3> {
        self.values.get(i).copied()
    }

    /// Iterate over the accelerations
    pub fn iter(&self) -> impl Iterator<Item = &Vector3> {
        self.values.iter()
    }

    /// Mutable access to the underlying slice
    pub fn as_mut_slice(&mut self) -> &mut [Vector3] {
        &mut self.values
    }

    /// Split into the `(ax, ay, az)` component arrays
    pub fn as_components(&self) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let ax = self.values.iter().map(|a| a.x).collect();
        let ay = self.values.iter().map(|a| a.y).collect();
        let az = self.values.iter().map(|a| a.z).collect();
        (ax, ay, az)
    }
}

impl Index<usize> for Accelerations {
    type Output = Vector3;

    fn index(&self, i: usize) -> &Vector3 {
        &self.values[i]
    }
}

impl FromIterator<Vector3> for Accelerations {
    fn from_iter<I: IntoIterator<Item = Vector3>>(iter: I) -> Self {
        Accelerations {
            values: iter.into_iter().collect(),
        }
    }
}

/// Ordered body set with an optional cached acceleration field
///
/// The cache is only populated by integrators that already hold the
/// accelerations for the current positions (Leapfrog), so that a following
/// `synchronize` or `step` does not evaluate them again.
///
/// # Examples
///
/// ```
/// use nbody_sim::{Body, SystemState};
///
/// let state = SystemState::new(vec![Body::at_rest(1.0, [0.0, 0.0, 0.0])]);
/// let mut snapshot = state.copy();
/// snapshot.bodies_mut()[0].position.x = 10.0;
/// assert_eq!(state.bodies()[0].position.x, 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SystemState {
    bodies: Vec<Body>,
    accelerations: Option<Accelerations>,
}

impl SystemState {
    /// Create a state from a list of bodies with no cached accelerations
    pub fn new(bodies: Vec<Body>) -> Self {
        SystemState {
            bodies,
            accelerations: None,
        }
    }

    /// Create a state that carries the accelerations at its positions
    pub fn with_accelerations(bodies: Vec<Body>, accelerations: Accelerations) -> Self {
        debug_assert_eq!(bodies.len(), accelerations.len());
        SystemState {
            bodies,
            accelerations: Some(accelerations),
        }
    }

    /// Deep copy
    ///
    /// Bodies and the acceleration cache are duplicated; nothing is shared
    /// with `self`. Identical to `clone`, named for the snapshot use case.
    pub fn copy(&self) -> Self {
        self.clone()
    }

    /// Same bodies with the acceleration cache dropped
    pub fn without_accelerations(&self) -> Self {
        SystemState::new(self.bodies.clone())
    }

    /// The bodies, in identity order
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    /// Mutable access to the bodies
    ///
    /// Editing positions invalidates the cache, so it is cleared here.
    pub fn bodies_mut(&mut self) -> &mut [Body] {
        self.accelerations = None;
        &mut self.bodies
    }

    /// Consume the state and return its bodies
    pub fn into_bodies(self) -> Vec<Body> {
        self.bodies
    }

    /// Cached accelerations, if present
    pub fn cached_accelerations(&self) -> Option<&Accelerations> {
        self.accelerations.as_ref()
    }

    /// Number of bodies
    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    /// True when there are no bodies
    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Positions in body order
    pub fn positions(&self) -> Vec<Vector3> {
        self.bodies.iter().map(|b| b.position).collect()
    }

    /// Sum of all masses
    pub fn total_mass(&self) -> f64 {
        self.bodies.iter().map(|b| b.mass).sum()
    }
}

/// Position-only snapshot used for trajectories and animation
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Step index this frame was taken at (0 is the initial state)
    pub step: usize,
    /// Body positions in identity order
    pub positions: Vec<Vector3>,
}

impl Frame {
    /// Capture the positions of a state
    pub fn capture(step: usize, state: &SystemState) -> Self {
        Frame {
            step,
            positions: state.positions(),
        }
    }

    /// Smallest distance between any two bodies in this frame
    pub fn closest_pair_distance(&self) -> Option<f64> {
        let mut closest: Option<f64> = None;
        for (i, a) in self.positions.iter().enumerate() {
            for b in &self.positions[i + 1..] {
                let d = (*b - *a).norm_squared();
                closest = Some(closest.map_or(d, |c| c.min(d)));
            }
        }
        closest.map(f64::sqrt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_bodies() -> Vec<Body> {
        vec![
            Body::new(1.0, [0.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            Body::new(2.0, [1.0, 0.0, 0.0], [0.0, -0.5, 0.0]),
        ]
    }

    #[test]
    fn test_copy_is_independent() {
        let accels = Accelerations::from_vec(vec![Vector3::new(1.0, 0.0, 0.0); 2]);
        let original = SystemState::with_accelerations(two_bodies(), accels);
        let mut copy = original.copy();

        copy.bodies_mut()[0].position.x = 42.0;
        assert_eq!(original.bodies()[0].position.x, 0.0);
        assert!(original.cached_accelerations().is_some());
        assert_eq!(copy.bodies()[0].position.x, 42.0);
    }

    #[test]
    fn test_copy_preserves_cache() {
        let accels = Accelerations::from_vec(vec![Vector3::new(0.0, 2.0, 0.0); 2]);
        let original = SystemState::with_accelerations(two_bodies(), accels.clone());
        let copy = original.copy();
        assert_eq!(copy.cached_accelerations(), Some(&accels));
        assert_eq!(copy, original);
    }

    #[test]
    fn test_bodies_mut_clears_cache() {
        let accels = Accelerations::zeros(2);
        let mut state = SystemState::with_accelerations(two_bodies(), accels);
        state.bodies_mut()[1].position.y = 1.0;
        assert!(state.cached_accelerations().is_none());
    }

    #[test]
    fn test_without_accelerations() {
        let state = SystemState::with_accelerations(two_bodies(), Accelerations::zeros(2));
        let plain = state.without_accelerations();
        assert!(plain.cached_accelerations().is_none());
        assert_eq!(plain.bodies(), state.bodies());
    }

    #[test]
    fn test_state_accessors() {
        let state = SystemState::new(two_bodies());
        assert_eq!(state.len(), 2);
        assert!(!state.is_empty());
        assert_eq!(state.total_mass(), 3.0);
        assert_eq!(state.positions()[1], Vector3::new(1.0, 0.0, 0.0));
        assert!(SystemState::default().is_empty());
    }

    #[test]
    fn test_accelerations_components() {
        let accels = Accelerations::from_vec(vec![
            Vector3::new(1.0, 2.0, 3.0),
            Vector3::new(4.0, 5.0, 6.0),
        ]);
        let (ax, ay, az) = accels.as_components();
        assert_eq!(ax, vec![1.0, 4.0]);
        assert_eq!(ay, vec![2.0, 5.0]);
        assert_eq!(az, vec![3.0, 6.0]);
        assert_eq!(accels[1].y, 5.0);
        assert_eq!(accels.get(2), None);
    }

    #[test]
    fn test_frame_closest_pair() {
        let state = SystemState::new(vec![
            Body::at_rest(1.0, [0.0, 0.0, 0.0]),
            Body::at_rest(1.0, [3.0, 4.0, 0.0]),
            Body::at_rest(1.0, [0.0, 0.0, 2.0]),
        ]);
        let frame = Frame::capture(7, &state);
        assert_eq!(frame.step, 7);
        assert_eq!(frame.closest_pair_distance(), Some(2.0));

        let single = Frame::capture(0, &SystemState::new(vec![Body::at_rest(1.0, [0.0; 3])]));
        assert_eq!(single.closest_pair_distance(), None);
    }
}
