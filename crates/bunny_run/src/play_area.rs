//! Rectangular play areas derived from plane nodes

use hop_engine::prelude::*;
use rand::Rng;

use crate::components::GameScene;

/// Side length of an unscaled plane mesh
pub const PLANE_EXTENT: f32 = 10.0;

/// Horizontal footprint of a plane node
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayArea {
    /// Plane translation
    pub center: Vec3,
    /// Extent along X
    pub size_x: f32,
    /// Extent along Z
    pub size_z: f32,
}

impl PlayArea {
    /// Footprint of a plane with the given transform
    pub fn from_transform(transform: &TransformComponent) -> Self {
        Self {
            center: transform.translation,
            size_x: PLANE_EXTENT * transform.scale.x,
            size_z: PLANE_EXTENT * transform.scale.z,
        }
    }

    /// Footprint of the plane node `id`
    pub fn of_node(scene: &GameScene, id: NodeId) -> Self {
        Self::from_transform(transform_of(scene, id))
    }

    /// Uniform sample on the footprint at height `y`
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R, y: f32) -> Vec3 {
        let x = rng.gen::<f32>() * self.size_x - self.size_x / 2.0;
        let z = rng.gen::<f32>() * self.size_z - self.size_z / 2.0;
        Vec3::new(self.center.x + x, y, self.center.z + z)
    }

    /// Clamp X and Z into the footprint, keeping `low_margin` from the low
    /// edges and `high_margin` from the high edges
    pub fn clamp(&self, position: Vec3, low_margin: f32, high_margin: f32) -> Vec3 {
        let (half_x, half_z) = (self.size_x / 2.0, self.size_z / 2.0);
        let x = position.x - self.center.x;
        let z = position.z - self.center.z;
        Vec3::new(
            self.center.x + x.min(half_x - high_margin).max(-half_x + low_margin),
            position.y,
            self.center.z + z.min(half_z - high_margin).max(-half_z + low_margin),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn area() -> PlayArea {
        PlayArea::from_transform(
            &TransformComponent::from_translation(Vec3::new(5.0, 0.0, -5.0)).with_scale(Vec3::new(2.0, 1.0, 1.0)),
        )
    }

    #[test]
    fn test_footprint_scales_with_plane() {
        let area = area();
        assert_eq!(area.size_x, 20.0);
        assert_eq!(area.size_z, 10.0);
    }

    #[test]
    fn test_samples_stay_on_footprint() {
        let area = area();
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..200 {
            let p = area.sample(&mut rng, 1.5);
            assert!((-5.0..=15.0).contains(&p.x));
            assert!((-10.0..=0.0).contains(&p.z));
            assert_eq!(p.y, 1.5);
        }
    }

    #[test]
    fn test_clamp_uses_asymmetric_margins() {
        let area = area();
        let clamped = area.clamp(Vec3::new(100.0, 2.0, -100.0), 1.0, 3.0);
        assert_eq!(clamped, Vec3::new(12.0, 2.0, -9.0));
        let inside = Vec3::new(6.0, 0.0, -4.0);
        assert_eq!(area.clamp(inside, 1.0, 3.0), inside);
    }
}
