//! Procedurally built stand-in for an authored scene
//!
//! Produces the node layout an imported level would have: play planes, the
//! car with its collider and wheels, camera, light, and pools of bunny,
//! carrot and hole templates for the spawner to pick from.

use hop_engine::prelude::*;

use crate::components::GameScene;
use crate::config::GameplayConfig;
use crate::roles::{
    AGENT_PLANE, AGENT_PREFIX, CAMERA, HAZARD_COLLIDER, ITEM_BODY, ITEM_COLLIDER, ITEM_PLANE, LIGHT, PLANE,
    TARGET_BODY, TARGET_COLLIDER, TARGET_PLANE, VEHICLE, WHEEL_MARKER,
};

/// Half extents of the car's collision box
pub const CAR_HALF_EXTENTS: [f32; 3] = [1.5, 1.0, 2.5];
/// Half size of a carrot's collision cube
pub const CARROT_HALF_EXTENT: f32 = 0.5;
/// Half extents of a hole's collision box
pub const HOLE_HALF_EXTENTS: [f32; 3] = [1.5, 0.5, 1.5];

/// Size of the template pools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoLayout {
    /// Bunny templates
    pub bunnies: usize,
    /// Carrot templates
    pub carrots: usize,
    /// Hole templates
    pub holes: usize,
}

impl DemoLayout {
    /// Pools large enough for `config`, with `spare` unused templates of each kind
    pub fn for_config(config: &GameplayConfig, spare: usize) -> Self {
        Self {
            bunnies: config.bunny_count + spare,
            carrots: config.carrot_count + spare,
            holes: config.hole_count + spare,
        }
    }
}

/// Full level: [`arena`] plus template pools at their authoring positions
pub fn build(layout: &DemoLayout) -> GameScene {
    let mut scene = arena();
    for i in 0..layout.bunnies {
        add_bunny(&mut scene, i, Vec3::new(0.0, 0.5, 0.0));
    }
    for i in 0..layout.carrots {
        add_carrot(&mut scene, i, Vec3::new(0.0, 1.0, 0.0));
    }
    for i in 0..layout.holes {
        add_hole(&mut scene, i, Vec3::zeros());
    }
    scene
}

/// Planes, camera, light and the car parked in the far corner
pub fn arena() -> GameScene {
    let mut scene = GameScene::new("Scene");
    let root = scene.root();
    scene[root].add_component(TransformComponent::identity().into());

    add_plane(&mut scene, PLANE, Vec3::zeros(), Vec3::new(10.0, 1.0, 10.0));
    add_plane(&mut scene, AGENT_PLANE, Vec3::zeros(), Vec3::new(8.0, 1.0, 8.0));
    add_plane(&mut scene, ITEM_PLANE, Vec3::new(30.0, 0.0, 30.0), Vec3::new(3.0, 1.0, 3.0));
    add_plane(&mut scene, TARGET_PLANE, Vec3::new(-30.0, 0.0, -30.0), Vec3::new(4.0, 1.0, 1.0));

    add_car(&mut scene, Vec3::new(40.0, 1.35, 40.0));

    let camera = scene.spawn_child(root, CAMERA);
    scene[camera].add_component(TransformComponent::identity().into());
    let light = scene.spawn_child(root, LIGHT);
    scene[light].add_component(TransformComponent::identity().into());
    scene
}

/// Flat plane node with a `PLANE_EXTENT`-sized mesh scaled by `scale`
pub fn add_plane(scene: &mut GameScene, name: &str, center: Vec3, scale: Vec3) -> NodeId {
    let plane = scene.spawn_child(scene.root(), name);
    scene[plane].add_component(TransformComponent::from_translation(center).with_scale(scale).into());
    scene[plane].add_component(Model::new(vec![Primitive::new(vec![
        Vec3::new(-5.0, 0.0, -5.0),
        Vec3::new(5.0, 0.0, -5.0),
        Vec3::new(5.0, 0.0, 5.0),
        Vec3::new(-5.0, 0.0, 5.0),
    ])]).into());
    plane
}

/// The car: body node with a hazard collider and four wheels
pub fn add_car(scene: &mut GameScene, at: Vec3) -> NodeId {
    let car = scene.spawn_child(scene.root(), VEHICLE);
    scene[car].add_component(TransformComponent::from_translation(at).into());

    let collider = scene.spawn_child(car, HAZARD_COLLIDER);
    scene[collider].add_component(TransformComponent::identity().into());
    scene[collider].add_component(box_model(Vec3::from(CAR_HALF_EXTENTS)).into());

    for (label, x, z) in [("FL", 1.2, 1.8), ("FR", -1.2, 1.8), ("RL", 1.2, -1.8), ("RR", -1.2, -1.8)] {
        let wheel = scene.spawn_child(car, format!("{WHEEL_MARKER} {label}"));
        scene[wheel].add_component(TransformComponent::from_translation(Vec3::new(x, -0.9, z)).into());
    }
    car
}

/// Bunny template `index`; its first child is the visual mesh
pub fn add_bunny(scene: &mut GameScene, index: usize, at: Vec3) -> NodeId {
    let bunny = scene.spawn_child(scene.root(), format!("{AGENT_PREFIX}.{index:03}"));
    scene[bunny].add_component(TransformComponent::from_translation(at).into());
    let mesh = scene.spawn_child(bunny, format!("Mesh.{index:03}"));
    scene[mesh].add_component(TransformComponent::identity().into());
    scene[mesh].add_component(box_model(Vec3::repeat(0.8)).into());
    bunny
}

/// Carrot template `index`; returns the body, whose first child is the collider
pub fn add_carrot(scene: &mut GameScene, index: usize, at: Vec3) -> NodeId {
    let body = scene.spawn_child(scene.root(), format!("{ITEM_BODY}.{index:03}"));
    scene[body].add_component(TransformComponent::from_translation(at).into());
    let collider = scene.spawn_child(body, format!("{ITEM_COLLIDER}.{index:03}"));
    scene[collider].add_component(TransformComponent::identity().into());
    scene[collider].add_component(box_model(Vec3::repeat(CARROT_HALF_EXTENT)).into());
    body
}

/// Hole template `index`; returns the body, whose first child is the collider
pub fn add_hole(scene: &mut GameScene, index: usize, at: Vec3) -> NodeId {
    let body = scene.spawn_child(scene.root(), format!("{TARGET_BODY}.{index:03}"));
    scene[body].add_component(TransformComponent::from_translation(at).into());
    let collider = scene.spawn_child(body, format!("{TARGET_COLLIDER}.{index:03}"));
    scene[collider].add_component(TransformComponent::identity().into());
    scene[collider].add_component(box_model(Vec3::from(HOLE_HALF_EXTENTS)).into());
    body
}

fn box_model(half_extents: Vec3) -> Model {
    let corners = AABB::from_center_extents(Vec3::zeros(), half_extents).corners();
    Model::new(vec![Primitive::new(corners.to_vec())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roles::Role;

    #[test]
    fn test_layout_contains_pools_and_fixtures() {
        let scene = build(&DemoLayout { bunnies: 3, carrots: 2, holes: 1 });
        let root = scene.root();
        let count = |role: Role| scene.filter(root, |n| role.matches(&n.name)).len();
        assert_eq!(count(Role::Agent), 3);
        assert_eq!(count(Role::Item), 2);
        assert_eq!(count(Role::Target), 1);
        assert_eq!(count(Role::Hazard), 1);
        for name in [PLANE, AGENT_PLANE, ITEM_PLANE, TARGET_PLANE, VEHICLE, CAMERA, LIGHT] {
            assert!(scene.find_by_name(name).is_some(), "missing {name}");
        }
        assert!(scene.verify_links().is_ok());
    }

    #[test]
    fn test_collider_is_first_child_of_body() {
        let mut scene = arena();
        let body = add_carrot(&mut scene, 7, Vec3::zeros());
        let collider = scene[body].children()[0];
        assert_eq!(scene[collider].name, "Carrot Cube.007");
        assert_eq!(
            scene[collider].component::<Model>().and_then(Model::merged_bounds),
            Some(AABB::cube(CARROT_HALF_EXTENT))
        );
    }
}
