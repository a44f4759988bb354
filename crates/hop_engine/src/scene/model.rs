//! Mesh geometry attached to nodes
//!
//! Only vertex positions are kept; the rendering collaborator owns
//! everything else. Collision setup derives local boxes from the merged
//! bounds of a model's primitives.

use crate::foundation::math::Vec3;
use crate::physics::AABB;

/// One drawable chunk of a mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitive {
    /// Vertex positions in the owning node's local space
    pub positions: Vec<Vec3>,
}

impl Primitive {
    /// Wrap a list of vertex positions
    pub fn new(positions: Vec<Vec3>) -> Self {
        Self { positions }
    }

    /// Axis-aligned cube of half-size `half_extent` centered on the origin
    pub fn cube(half_extent: f32) -> Self {
        Self::new(AABB::cube(half_extent).corners().to_vec())
    }

    /// Local bounds of the vertices, `None` when there are none
    pub fn local_bounds(&self) -> Option<AABB> {
        AABB::from_points(&self.positions)
    }
}

/// Mesh component: a set of primitives
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Model {
    /// Primitives making up the mesh
    pub primitives: Vec<Primitive>,
}

impl Model {
    /// Model with the given primitives
    pub fn new(primitives: Vec<Primitive>) -> Self {
        Self { primitives }
    }

    /// Union of every primitive's bounds
    pub fn merged_bounds(&self) -> Option<AABB> {
        AABB::merge_all(self.primitives.iter().filter_map(Primitive::local_bounds))
    }
}
