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
//! Barnes–Hut octree
//!
//! Space is recursively split into eight equal cubes. Each node tracks the
//! total mass and center of mass of everything below it, so a distant group
//! of bodies can stand in for all of its members in a force evaluation.
//!
//! # Layout
//!
//! Nodes live in a single arena (`Vec<Node>`) and refer to each other by
//! index. The eight children of an internal node are allocated together, so
//! an internal node only stores the index of its first child. The root is
//! always node 0. A tree is built from scratch for every force evaluation
//! and is read-only afterwards.
//!
//! # Child ordering
//!
//! A point's octant is three independent comparisons against the node
//! center, packed into bits:
//!
//! - Bit 0 (value 1): `x >= center.x`
//! - Bit 1 (value 2): `y >= center.y`
//! - Bit 2 (value 4): `z >= center.z`
//!
//! # Coincident bodies
//!
//! Bodies at identical positions can never be separated by subdivision.
//! Splitting stops at [`MAX_DEPTH`]; a leaf that would need to split there
//! becomes a [`NodeContents::Bucket`] holding every body that reaches it, and
//! its contribution is summed body by body.
//!
//! # References
//!
//! - Barnes, J. & Hut, P. (1986). "A hierarchical O(N log N) force-calculation
//!   algorithm". Nature, 324, 446-449.

use std::ops::Range;

use crate::body::Body;
use crate::physics::point_mass_acceleration;
use crate::vector::Vector3;

/// Deepest level at which a node may still be subdivided
///
/// Below roughly 53 levels an f64 coordinate can no longer tell children
/// apart, so anything that reaches this depth is coincident in practice.
pub const MAX_DEPTH: usize = 64;

/// Padding added to the root half-width so the root cube never has zero
/// volume (single body, or all bodies coincident)
pub const BOUNDS_PADDING: f64 = 1e-10;

/// Index of a node in the arena
pub type NodeId = usize;

const ROOT: NodeId = 0;

/// Axis-aligned cube
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Center of the cube
    pub center: Vector3,
    /// Half the side length
    pub half_width: f64,
}

impl Bounds {
    /// Create a cube from its center and half-width
    pub fn new(center: Vector3, half_width: f64) -> Self {
        Bounds { center, half_width }
    }

    /// Smallest padded cube that contains every body
    ///
    /// The center is the midpoint of the per-axis extremes and the
    /// half-width is half the largest axis extent plus [`BOUNDS_PADDING`].
    /// Returns `None` for an empty body set.
    pub fn enclosing(bodies: &[Body]) -> Option<Self> {
        let first = bodies.first()?.position;
        let (min, max) = bodies
            .iter()
            .fold((first, first), |(min, max), b| {
                (min.min(b.position), max.max(b.position))
            });

        let center = (min + max) * 0.5;
        let half_width = 0.5 * (max - min).max_component() + BOUNDS_PADDING;
        Some(Bounds::new(center, half_width))
    }

    /// Side length of the cube
    pub fn side(&self) -> f64 {
        2.0 * self.half_width
    }

    /// Check whether a point lies inside the cube (boundary included)
    pub fn contains(&self, p: Vector3) -> bool {
        let d = p - self.center;
        d.x.abs() <= self.half_width && d.y.abs() <= self.half_width && d.z.abs() <= self.half_width
    }

    /// Octant index (0–7) of a point relative to the cube center
    pub fn octant(&self, p: Vector3) -> usize {
        let mut idx = 0;
        if p.x >= self.center.x {
            idx |= 1;
        }
        if p.y >= self.center.y {
            idx |= 2;
        }
        if p.z >= self.center.z {
            idx |= 4;
        }
        idx
    }

    /// The child cube for an octant index
    pub fn child(&self, octant: usize) -> Bounds {
        let quarter = 0.5 * self.half_width;
        let offset = |bit: usize| if octant & bit == 0 { -quarter } else { quarter };
        Bounds::new(
            self.center + Vector3::new(offset(1), offset(2), offset(4)),
            quarter,
        )
    }
}

/// What a node holds
#[derive(Debug, Clone, PartialEq)]
pub enum NodeContents {
    /// No bodies
    Empty,
    /// Exactly one body, by index into the body slice
    Leaf(usize),
    /// Several bodies that could not be separated before [`MAX_DEPTH`]
    Bucket(Vec<usize>),
    /// Eight children starting at the given arena index
    Internal(NodeId),
}

/// One cube of the octree
#[derive(Debug, Clone)]
pub struct Node {
    /// Spatial extent
    pub bounds: Bounds,
    /// Total mass of every body in the subtree
    pub mass: f64,
    /// Mass-weighted mean position of the subtree
    pub center_of_mass: Vector3,
    /// Leaf body, bucket, children, or nothing
    pub contents: NodeContents,
}

impl Node {
    fn empty(bounds: Bounds) -> Self {
        Node {
            bounds,
            mass: 0.0,
            center_of_mass: Vector3::zero(),
            contents: NodeContents::Empty,
        }
    }

    /// True for empty, single-body and bucket nodes
    pub fn is_leaf(&self) -> bool {
        !matches!(self.contents, NodeContents::Internal(_))
    }

    /// True when the node holds no mass
    pub fn is_empty(&self) -> bool {
        matches!(self.contents, NodeContents::Empty)
    }

    // new_com = (old_com * old_mass + pos * mass) / (old_mass + mass)
    fn accumulate(&mut self, position: Vector3, mass: f64) {
        if self.mass == 0.0 {
            self.center_of_mass = position;
            self.mass = mass;
        } else {
            let total = self.mass + mass;
            self.center_of_mass = (self.center_of_mass * self.mass + position * mass) / total;
            self.mass = total;
        }
    }
}

/// Arena-backed octree over a body slice
///
/// The tree stores body indices, not bodies, so it must be queried with the
/// same slice it was built from.
///
/// # Examples
///
/// ```
/// use nbody_sim::Body;
/// use nbody_sim::octree::{Bounds, Octree};
///
/// let bodies = vec![
///     Body::at_rest(1.0, [-1.0, -1.0, -1.0]),
///     Body::at_rest(1.0, [1.0, 1.0, 1.0]),
/// ];
/// let bounds = Bounds::enclosing(&bodies).unwrap();
/// let tree = Octree::build(&bodies, bounds);
///
/// assert_eq!(tree.root().mass, 2.0);
/// assert_eq!(tree.len(), 9); // root + 8 children
/// ```
#[derive(Debug, Clone)]
pub struct Octree {
    nodes: Vec<Node>,
}

impl Octree {
    /// Build a tree by inserting every body in order
    pub fn build(bodies: &[Body], bounds: Bounds) -> Self {
        Self::build_in(Vec::new(), bodies, bounds)
    }

    /// Build a tree reusing an existing node buffer
    pub fn build_in(mut buffer: Vec<Node>, bodies: &[Body], bounds: Bounds) -> Self {
        buffer.clear();
        buffer.push(Node::empty(bounds));

        let mut tree = Octree { nodes: buffer };
        for i in 0..bodies.len() {
            tree.insert(i, bodies);
        }
        tree
    }

    /// Insert `bodies[body_index]`
    ///
    /// Empty nodes take the body directly. A leaf that already holds a body
    /// splits into eight children and both bodies move down. Internal nodes
    /// route the body to the child matching its octant. Every node on the
    /// way down folds the body into its mass and center of mass.
    pub fn insert(&mut self, body_index: usize, bodies: &[Body]) {
        let body = &bodies[body_index];
        let mut id = ROOT;
        let mut depth = 0;

        loop {
            self.nodes[id].accumulate(body.position, body.mass);

            match self.nodes[id].contents {
                NodeContents::Empty => {
                    self.nodes[id].contents = NodeContents::Leaf(body_index);
                    return;
                }
                NodeContents::Leaf(resident) => {
                    if depth >= MAX_DEPTH {
                        self.nodes[id].contents = NodeContents::Bucket(vec![resident, body_index]);
                        return;
                    }

                    let bounds = self.nodes[id].bounds;
                    let first = self.subdivide(id);

                    let moved = &bodies[resident];
                    let slot = first + bounds.octant(moved.position);
                    self.nodes[slot].accumulate(moved.position, moved.mass);
                    self.nodes[slot].contents = NodeContents::Leaf(resident);

                    id = first + bounds.octant(body.position);
                }
                NodeContents::Bucket(ref mut residents) => {
                    residents.push(body_index);
                    return;
                }
                NodeContents::Internal(first) => {
                    id = first + self.nodes[id].bounds.octant(body.position);
                }
            }

            depth += 1;
        }
    }

    fn subdivide(&mut self, id: NodeId) -> NodeId {
        let bounds = self.nodes[id].bounds;
        let first = self.nodes.len();
        for octant in 0..8 {
            self.nodes.push(Node::empty(bounds.child(octant)));
        }
        self.nodes[id].contents = NodeContents::Internal(first);
        first
    }

    /// Net acceleration on `bodies[target]` from every other body in the tree
    ///
    /// A leaf, or an internal node whose side length `s` and (softened)
    /// distance `d` to the target satisfy `s / d < theta`, is treated as a
    /// single point mass at its center of mass. Other internal nodes are
    /// opened and their non-empty children summed, as is any internal node
    /// whose center of mass coincides with the target. The target never acts
    /// on itself. With `theta = 0` every internal node is opened and the result
    /// is the exact pairwise sum.
    pub fn compute_acceleration(
        &self,
        target: usize,
        bodies: &[Body],
        theta: f64,
        softening: f64,
        g: f64,
    ) -> Vector3 {
        let position = bodies[target].position;
        self.acceleration_from(ROOT, target, position, bodies, theta, softening, g)
    }

    #[allow(clippy::too_many_arguments)]
    fn acceleration_from(
        &self,
        id: NodeId,
        target: usize,
        position: Vector3,
        bodies: &[Body],
        theta: f64,
        softening: f64,
        g: f64,
    ) -> Vector3 {
        let node = &self.nodes[id];

        match &node.contents {
            NodeContents::Empty => Vector3::zero(),
            NodeContents::Leaf(resident) if *resident == target => Vector3::zero(),
            NodeContents::Bucket(residents) => {
                let mut acc = Vector3::zero();
                for &i in residents.iter().filter(|&&i| i != target) {
                    let source = &bodies[i];
                    if separated(position, source.position, softening) {
                        acc += point_mass_acceleration(position, source.position, source.mass, softening, g);
                    }
                }
                acc
            }
            NodeContents::Leaf(_) => {
                if !separated(position, node.center_of_mass, softening) {
                    return Vector3::zero();
                }
                point_mass_acceleration(position, node.center_of_mass, node.mass, softening, g)
            }
            NodeContents::Internal(first) => {
                if node.mass == 0.0 {
                    return Vector3::zero();
                }

                let d = node.center_of_mass - position;
                let dist = (d.norm_squared() + softening * softening).sqrt();

                // A target sitting on the center of mass always opens the node
                if dist > 0.0 && node.bounds.side() / dist < theta {
                    point_mass_acceleration(position, node.center_of_mass, node.mass, softening, g)
                } else {
                    let mut acc = Vector3::zero();
                    for child in *first..*first + 8 {
                        if self.nodes[child].mass > 0.0 {
                            acc += self.acceleration_from(child, target, position, bodies, theta, softening, g);
                        }
                    }
                    acc
                }
            }
        }
    }

    /// The root node
    pub fn root(&self) -> &Node {
        &self.nodes[ROOT]
    }

    /// Node by arena index
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id]
    }

    /// All nodes in arena order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Arena indices of a node's children, if it is internal
    pub fn children(&self, id: NodeId) -> Option<Range<NodeId>> {
        match self.nodes[id].contents {
            NodeContents::Internal(first) => Some(first..first + 8),
            _ => None,
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth of the deepest node (the root is depth 0)
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(ROOT, 0)];
        while let Some((id, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some(children) = self.children(id) {
                stack.extend(children.map(|child| (child, depth + 1)));
            }
        }
        deepest
    }

    /// Indices of every body stored in the subtree rooted at `id`
    pub fn body_indices(&self, id: NodeId) -> Vec<usize> {
        let mut found = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            match &self.nodes[current].contents {
                NodeContents::Empty => {}
                NodeContents::Leaf(i) => found.push(*i),
                NodeContents::Bucket(residents) => found.extend_from_slice(residents),
                NodeContents::Internal(first) => stack.extend(*first..*first + 8),
            }
        }
        found
    }

    /// Give the node storage back for reuse
    pub fn into_buffer(self) -> Vec<Node> {
        self.nodes
    }
}

// Coincident points with zero softening have no defined direction
fn separated(a: Vector3, b: Vector3, softening: f64) -> bool {
    (b - a).norm_squared() + softening * softening > 0.0
}
