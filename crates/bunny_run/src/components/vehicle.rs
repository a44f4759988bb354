//! Player-driven car

use hop_engine::prelude::*;

use super::GameScene;
use crate::config::VehicleConfig;
use crate::play_area::PlayArea;

/// Keyboard-driven car with a scalar forward speed
#[derive(Debug, Clone, PartialEq)]
pub struct VehicleController {
    /// Heading about +Y in radians
    pub yaw: f32,
    /// Signed forward speed, units per tick
    pub speed: f32,
    /// Input is ignored while set
    pub disabled: bool,
    /// Wheel nodes spun for show
    pub wheels: Vec<NodeId>,
    /// Handling parameters
    pub tuning: VehicleConfig,
}

impl Default for VehicleController {
    fn default() -> Self {
        Self::new(VehicleConfig::default(), Vec::new())
    }
}

impl VehicleController {
    /// Create a stopped car facing +Z
    pub fn new(tuning: VehicleConfig, wheels: Vec<NodeId>) -> Self {
        Self {
            yaw: 0.0,
            speed: 0.0,
            disabled: false,
            wheels,
            tuning,
        }
    }

    /// Apply one tick of input to yaw and speed
    pub fn steer(&mut self, keys: &KeyState, dt: f32) {
        let tuning = &self.tuning;
        if keys.is_pressed(KeyCode::D) {
            self.yaw -= tuning.turn_rate * dt;
        }
        if keys.is_pressed(KeyCode::A) {
            self.yaw += tuning.turn_rate * dt;
        }

        let forward = keys.is_pressed(KeyCode::W);
        let backward = keys.is_pressed(KeyCode::S);
        if forward {
            self.speed += tuning.acceleration * dt;
        }
        if backward {
            self.speed -= tuning.acceleration * dt;
        }
        if !forward && !backward {
            self.speed *= 1.0 - tuning.decay;
        }
        self.speed = self.speed.clamp(-tuning.max_speed, tuning.max_speed);
    }

    /// Heading as a rotation
    pub fn rotation(&self) -> Quat {
        utils::yaw(self.yaw)
    }

    /// Unit heading in the parent's frame
    pub fn forward(&self) -> Vec3 {
        self.rotation() * Vec3::z()
    }
}

/// Node carrying the controller that drives `id`: `id` itself or its
/// closest ancestor with one
pub fn controller_of(scene: &GameScene, id: NodeId) -> Option<NodeId> {
    let mut current = Some(id);
    while let Some(node) = current {
        if scene[node].has_component::<VehicleController>() {
            return Some(node);
        }
        current = scene[node].parent();
    }
    None
}

/// Advance the car on node `id` by `dt` seconds
pub fn update_vehicle(scene: &mut GameScene, id: NodeId, keys: &KeyState, dt: f32, area: &PlayArea) {
    let Some(controller) = scene[id].component_mut::<VehicleController>() else {
        return;
    };
    controller.steer(keys, dt);
    let (rotation, velocity, speed) = (controller.rotation(), controller.forward() * controller.speed, controller.speed);
    let (low, high) = (controller.tuning.low_margin, controller.tuning.high_margin);
    let spin = controller.tuning.wheel_spin * speed * dt;
    let wheels = controller.wheels.clone();

    let transform = transform_of_mut(scene, id);
    transform.rotation = rotation;
    transform.translation = area.clamp(transform.translation + velocity, low, high);

    if speed.abs() > 0.0 {
        for wheel in wheels {
            if let Some(t) = scene[wheel].component_mut::<TransformComponent>() {
                t.rotation *= utils::pitch(spin);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::GameComponent;
    use approx::assert_relative_eq;

    fn setup() -> (GameScene, NodeId, NodeId, PlayArea) {
        let mut scene = GameScene::new("Scene");
        let car = scene.spawn_child(scene.root(), "Car");
        scene[car].add_component(TransformComponent::identity().into());
        let wheel = scene.spawn_child(car, "Wheel FL");
        scene[wheel].add_component(TransformComponent::identity().into());
        scene[car].add_component(GameComponent::Vehicle(VehicleController::new(VehicleConfig::default(), vec![wheel])));
        let area = PlayArea::from_transform(&TransformComponent::identity().with_uniform_scale(10.0));
        (scene, car, wheel, area)
    }

    #[test]
    fn test_throttle_accelerates_and_clamps() {
        let mut vehicle = VehicleController::default();
        let mut keys = KeyState::new();
        keys.set(KeyCode::W, true);
        vehicle.steer(&keys, 1.0);
        assert_relative_eq!(vehicle.speed, 0.18);
        for _ in 0..10 {
            vehicle.steer(&keys, 1.0);
        }
        assert_relative_eq!(vehicle.speed, 0.5);
    }

    #[test]
    fn test_speed_decays_without_throttle() {
        let mut vehicle = VehicleController::default();
        vehicle.speed = 0.4;
        vehicle.steer(&KeyState::new(), 1.0 / 60.0);
        assert_relative_eq!(vehicle.speed, 0.38, epsilon = 1e-6);
    }

    #[test]
    fn test_a_and_d_turn_opposite_ways() {
        let mut vehicle = VehicleController::default();
        let mut keys = KeyState::new();
        keys.set(KeyCode::A, true);
        vehicle.steer(&keys, 0.1);
        assert_relative_eq!(vehicle.yaw, 0.25, epsilon = 1e-6);
        keys.set(KeyCode::A, false);
        keys.set(KeyCode::D, true);
        vehicle.steer(&keys, 0.2);
        assert_relative_eq!(vehicle.yaw, -0.25, epsilon = 1e-6);
    }

    #[test]
    fn test_update_moves_car_and_spins_wheels() {
        let (mut scene, car, wheel, area) = setup();
        let mut keys = KeyState::new();
        keys.set(KeyCode::W, true);

        update_vehicle(&mut scene, car, &keys, 1.0, &area);

        assert_relative_eq!(transform_of(&scene, car).translation, Vec3::new(0.0, 0.0, 0.18), epsilon = 1e-6);
        assert_ne!(transform_of(&scene, wheel).rotation, Quat::identity());
    }

    #[test]
    fn test_car_is_clamped_with_asymmetric_margins() {
        let (mut scene, car, _, area) = setup();
        transform_of_mut(&mut scene, car).translation = Vec3::new(100.0, 1.35, -100.0);
        update_vehicle(&mut scene, car, &KeyState::new(), 0.016, &area);
        let t = transform_of(&scene, car).translation;
        assert_relative_eq!(t, Vec3::new(43.0, 1.35, -45.0));
    }

    #[test]
    fn test_controller_found_on_ancestor() {
        let (mut scene, car, wheel, _) = setup();
        let collider = scene.spawn_child(car, "Cube");
        assert_eq!(controller_of(&scene, collider), Some(car));
        assert_eq!(controller_of(&scene, wheel), Some(car));
        assert_eq!(controller_of(&scene, scene.root()), None);
    }
}
