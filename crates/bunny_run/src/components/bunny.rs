//! Carrying bunny behaviour
//!
//! A bunny hops continuously. During the middle of each hop it moves
//! towards the node it pursues: a bait carrot, a hole while carrying, or
//! another bunny that is carrying (whose heading it copies).

use hop_engine::prelude::*;

use super::GameScene;
use crate::config::BunnyConfig;
use crate::play_area::PlayArea;

/// Per-bunny pursuit and hop state
#[derive(Debug, Clone, PartialEq)]
pub struct BunnyBehavior {
    /// Horizontal speed in units per second
    pub speed: f32,
    /// Length of one hop in seconds
    pub hop_duration: f32,
    /// Peak height of a hop
    pub hop_height: f32,
    /// Time spent hopping
    pub hop_timer: f32,
    /// Resting height
    pub base_height: f32,
    /// Carrot body being carried
    pub carrying: Option<NodeId>,
    /// Node currently pursued; `None` means stand idle
    pub follow: Option<NodeId>,
    /// Carrot bodies still available
    pub baits: Vec<NodeId>,
    /// Hole bodies carrots are delivered to
    pub holes: Vec<NodeId>,
    /// Last horizontal heading
    pub direction: Vec3,
    /// Skipped by the per-tick update
    pub disabled: bool,
}

impl Default for BunnyBehavior {
    fn default() -> Self {
        Self::new(&BunnyConfig::default(), 0.0)
    }
}

impl BunnyBehavior {
    /// Create an idle bunny resting at `base_height`
    pub fn new(config: &BunnyConfig, base_height: f32) -> Self {
        Self {
            speed: config.speed,
            hop_duration: config.hop_duration,
            hop_height: config.hop_height,
            hop_timer: 0.0,
            base_height,
            carrying: None,
            follow: None,
            baits: Vec::new(),
            holes: Vec::new(),
            direction: Vec3::zeros(),
            disabled: false,
        }
    }

    /// Whether a carrot is being carried
    pub fn is_holding(&self) -> bool {
        self.carrying.is_some()
    }

    /// Progress through the current hop, in `[0, 1)`
    pub fn hop_phase(&self) -> f32 {
        (self.hop_timer % self.hop_duration) / self.hop_duration
    }

    /// Height above rest at the current phase
    pub fn hop_offset(&self) -> f32 {
        (self.hop_phase() * constants::PI).sin() * self.hop_height
    }

    /// Whether the bunny is in the air far enough to move
    pub fn in_stride(&self) -> bool {
        let phase = self.hop_phase();
        phase > 0.2 && phase < 0.8
    }
}

/// Bunny state of `id`
///
/// # Panics
/// If the node is not a bunny.
pub fn behavior(scene: &GameScene, id: NodeId) -> &BunnyBehavior {
    let node = &scene[id];
    node.component::<BunnyBehavior>()
        .unwrap_or_else(|| panic!("node '{}' has no bunny behaviour", node.name))
}

/// Bunny state of `id`, mutably
///
/// # Panics
/// If the node is not a bunny.
pub fn behavior_mut(scene: &mut GameScene, id: NodeId) -> &mut BunnyBehavior {
    let node = &mut scene[id];
    let name = node.name.clone();
    node.component_mut::<BunnyBehavior>()
        .unwrap_or_else(|| panic!("node '{name}' has no bunny behaviour"))
}

/// Candidate nearest to `from`; the first one wins ties, `None` when empty
pub fn find_closest(scene: &GameScene, from: Vec3, candidates: &[NodeId]) -> Option<NodeId> {
    let mut closest = None;
    let mut min_distance = f32::MAX;
    for &candidate in candidates {
        let distance = (world_position(scene, candidate) - from).norm();
        if distance < min_distance {
            min_distance = distance;
            closest = Some(candidate);
        }
    }
    closest
}

/// Advance the bunny on node `id` by `dt` seconds
pub fn update_bunny(scene: &mut GameScene, id: NodeId, dt: f32, area: &PlayArea, config: &BunnyConfig) {
    let state = behavior_mut(scene, id);
    state.hop_timer += dt;
    let (follow, in_stride, lift) = (state.follow, state.in_stride(), state.base_height + state.hop_offset());

    if let (Some(target), true) = (follow, in_stride) {
        let position = world_position(scene, id);
        let leader = scene[target]
            .component::<BunnyBehavior>()
            .map(|leader| (leader.is_holding(), leader.direction));
        let direction = match leader {
            Some((true, heading)) => heading,
            Some((false, _)) => {
                // The leader delivered its carrot; go back to baits.
                let state = behavior(scene, id);
                let next = find_closest(scene, position, &state.baits);
                behavior_mut(scene, id).follow = next;
                Vec3::zeros()
            }
            None => {
                let mut towards = world_position(scene, target) - position;
                towards.y = 0.0;
                towards.try_normalize(1e-6).unwrap_or_else(Vec3::zeros)
            }
        };

        let state = behavior_mut(scene, id);
        state.direction = direction;
        let step = direction * state.speed * dt;
        let turn = (dt * state.speed).clamp(0.0, 1.0);

        let transform = transform_of_mut(scene, id);
        let moved = area.clamp(transform.translation + step, config.plane_margin, config.plane_margin);
        transform.translation.x = moved.x;
        transform.translation.z = moved.z;

        if direction != Vec3::zeros() {
            let heading = utils::yaw((-direction.z).atan2(direction.x) - constants::HALF_PI);
            let current = transform.rotation;
            transform.rotation = current
                .try_slerp(&heading, turn, 1e-6)
                .unwrap_or_else(|| current.nlerp(&heading, turn));
        }
    }

    transform_of_mut(scene, id).translation.y = lift + config.ground_offset;
}
