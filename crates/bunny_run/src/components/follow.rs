//! Camera that trails another node

use hop_engine::prelude::*;

use super::GameScene;
use crate::config::CameraConfig;

/// Keeps its node at a fixed horizontal offset from a target, at a fixed height
#[derive(Debug, Clone, PartialEq)]
pub struct FollowCamera {
    /// Node being tracked
    pub target: NodeId,
    /// X offset from the target
    pub offset_x: f32,
    /// Z offset from the target
    pub offset_z: f32,
    /// Fixed height
    pub height: f32,
}

impl FollowCamera {
    /// Track `target` with the configured offsets
    pub fn new(target: NodeId, config: &CameraConfig) -> Self {
        Self {
            target,
            offset_x: config.offset_x,
            offset_z: config.offset_z,
            height: config.height,
        }
    }

    /// Camera position for a target at `target`
    pub fn position_for(&self, target: Vec3) -> Vec3 {
        Vec3::new(target.x + self.offset_x, self.height, target.z + self.offset_z)
    }
}

/// Move the camera on node `id` next to its target
pub fn update_follow_camera(scene: &mut GameScene, id: NodeId) {
    let Some(camera) = scene[id].component::<FollowCamera>() else {
        return;
    };
    let position = camera.position_for(world_position(scene, camera.target));
    transform_of_mut(scene, id).translation = position;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_target_at_fixed_height() {
        let mut scene = GameScene::new("Scene");
        let car = scene.spawn_child(scene.root(), "Car");
        scene[car].add_component(TransformComponent::from_translation(Vec3::new(4.0, 1.35, -2.0)).into());
        let camera = scene.spawn_child(scene.root(), "Main Camera");
        scene[camera].add_component(TransformComponent::identity().into());
        scene[camera].add_component(FollowCamera::new(car, &CameraConfig::default()).into());

        update_follow_camera(&mut scene, camera);
        assert_eq!(transform_of(&scene, camera).translation, Vec3::new(-16.0, 30.0, -22.0));
    }
}
