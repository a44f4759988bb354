//! Directional light casting shadows over the play area

use hop_engine::prelude::*;

use super::GameScene;
use crate::config::LightConfig;

/// Orthographic volume of the light's shadow pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthoBounds {
    /// Left bound
    pub left: f32,
    /// Right bound
    pub right: f32,
    /// Bottom bound
    pub bottom: f32,
    /// Top bound
    pub top: f32,
    /// Near plane
    pub near: f32,
    /// Far plane
    pub far: f32,
}

/// Light looking at the origin from its node's position
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    /// RGB color, 0-255 per channel
    pub color: Vec3,
    /// Up vector of the light's view
    pub direction: Vec3,
    /// Shadow volume
    pub bounds: OrthoBounds,
    /// Projection times view, valid after the last [`update`](Self::update)
    pub view_projection: Mat4,
}

impl DirectionalLight {
    /// Light with the configured color, direction and volume
    pub fn new(config: &LightConfig) -> Self {
        Self {
            color: Vec3::from(config.color),
            direction: Vec3::from(config.direction),
            bounds: OrthoBounds {
                left: config.left,
                right: config.right,
                bottom: config.bottom,
                top: config.top,
                near: config.near,
                far: config.far,
            },
            view_projection: Mat4::identity(),
        }
    }

    /// Recompute the view-projection for a light placed at `position`
    pub fn update(&mut self, position: Vec3) {
        let b = self.bounds;
        let view = Mat4::look_at(position, Vec3::zeros(), self.direction);
        let projection = Mat4::orthographic(b.left, b.right, b.bottom, b.top, b.near, b.far);
        self.view_projection = projection * view;
    }
}

/// Refresh the light on node `id` from the node's world position
pub fn update_light(scene: &mut GameScene, id: NodeId) {
    let position = world_position(scene, id);
    if let Some(light) = scene[id].component_mut::<DirectionalLight>() {
        light.update(position);
    }
}
