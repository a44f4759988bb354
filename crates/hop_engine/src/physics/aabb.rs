//! Axis-aligned bounding boxes
//!
//! Boxes are stored in a node's local space and moved into world space on
//! demand by transforming all eight corners and taking the componentwise
//! min/max, so rotated and scaled parents still produce a conservative box.

use crate::foundation::math::{Mat4, Mat4Ext, Vec3};

/// Axis-Aligned Bounding Box for collision queries
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AABB {
    /// Minimum corner of the bounding box
    pub min: Vec3,
    /// Maximum corner of the bounding box
    pub max: Vec3,
}

impl AABB {
    /// Create a new AABB from min and max points
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB centered at a point with given extents
    pub fn from_center_extents(center: Vec3, extents: Vec3) -> Self {
        Self {
            min: center - extents,
            max: center + extents,
        }
    }

    /// Cube of half-size `half_extent` centered on the origin
    pub fn cube(half_extent: f32) -> Self {
        Self::from_center_extents(Vec3::zeros(), Vec3::repeat(half_extent))
    }

    /// Smallest box enclosing every point, or `None` for an empty set
    pub fn from_points<'a, I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a Vec3>,
    {
        let mut iter = points.into_iter();
        let first = *iter.next()?;
        Some(iter.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.inf(p),
            max: acc.max.sup(p),
        }))
    }

    /// Smallest box enclosing every box, or `None` for an empty set
    pub fn merge_all<I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = AABB>,
    {
        boxes.into_iter().reduce(|a, b| a.merge(&b))
    }

    /// Smallest box enclosing both boxes
    pub fn merge(&self, other: &AABB) -> AABB {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }

    /// Get the center of the AABB
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Get the extents (half-size) of the AABB
    pub fn extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    /// The eight corners, min-x/min-y/min-z first
    pub fn corners(&self) -> [Vec3; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vec3::new(lo.x, lo.y, lo.z),
            Vec3::new(lo.x, lo.y, hi.z),
            Vec3::new(lo.x, hi.y, lo.z),
            Vec3::new(lo.x, hi.y, hi.z),
            Vec3::new(hi.x, lo.y, lo.z),
            Vec3::new(hi.x, lo.y, hi.z),
            Vec3::new(hi.x, hi.y, lo.z),
            Vec3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Box enclosing this box after transformation by `matrix`
    pub fn transformed(&self, matrix: &Mat4) -> AABB {
        let corners = self.corners().map(|c| matrix.transform_vec3(&c));
        // Eight corners are never empty.
        Self::from_points(corners.iter()).unwrap_or(*self)
    }

    /// Check if this AABB contains a point
    pub fn contains_point(&self, point: Vec3) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }

    /// Check if this AABB intersects another AABB
    ///
    /// Touching faces count as overlapping.
    pub fn intersects(&self, other: &AABB) -> bool {
        (0..3).all(|i| intervals_overlap(self.min[i], self.max[i], other.min[i], other.max[i]))
    }

    /// Damped positional correction separating `self` from `other`
    ///
    /// For each axis the signed imbalance between the two overlap spans,
    /// `(a.max - b.min) - (b.max - a.min)`, scaled by `damping`. Adding the
    /// result to the owner of `self` and subtracting it from the owner of
    /// `other` pushes the two apart. Swapping the arguments negates it.
    pub fn separation_offset(&self, other: &AABB, damping: f32) -> Vec3 {
        Vec3::from_fn(|i, _| {
            let delta = (self.max[i] - other.min[i]) - (other.max[i] - self.min[i]);
            delta * damping
        })
    }
}

/// Closed-interval overlap test
pub fn intervals_overlap(min_a: f32, max_a: f32, min_b: f32, max_b: f32) -> bool {
    !(min_a > max_b || min_b > max_a)
}
