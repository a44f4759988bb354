//! Collision and interaction engine
//!
//! Every tick each bunny in play is tested against carrots, holes, later
//! bunnies and the car, in that order. A pair is only boxed and tested when
//! the distance between its anchors is under the class threshold; the
//! anchor of a collider is its parent (the visual body), a bunny anchors
//! itself.
//!
//! Resolutions are discrete state transitions. Each one leaves the scene
//! untouched when its pair does not overlap, and reports what it changed as
//! a [`GameEvent`]. Population-changing events refresh the collider lists
//! before the next pair is read.

use hop_engine::prelude::*;

use crate::components::{
    behavior, behavior_mut, controller_of, find_closest, BunnyBehavior, GameScene, VehicleController,
};
use crate::config::InteractionConfig;
use crate::events::GameEvent;
use crate::roles::Role;
use crate::session::Counts;

/// Cached collider lists and the rules applied to them
#[derive(Debug, Clone)]
pub struct InteractionEngine {
    config: InteractionConfig,
    agents: Vec<NodeId>,
    items: Vec<NodeId>,
    targets: Vec<NodeId>,
    hazards: Vec<NodeId>,
}

impl InteractionEngine {
    /// Create an engine with lists taken from `scene`
    pub fn new(scene: &GameScene, config: InteractionConfig) -> Self {
        let mut engine = Self {
            config,
            agents: Vec::new(),
            items: Vec::new(),
            targets: Vec::new(),
            hazards: Vec::new(),
        };
        engine.refresh(scene);
        engine
    }

    /// Tuning in use
    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Rebuild the collider lists from the active nodes of the tree
    pub fn refresh(&mut self, scene: &GameScene) {
        let root = scene.root();
        let collect = |role: Role| scene.filter(root, |n| n.active && role.matches(&n.name));
        self.agents = collect(Role::Agent);
        self.items = collect(Role::Item);
        self.targets = collect(Role::Target);
        self.hazards = collect(Role::Hazard);
        log::trace!(
            "Colliders: {} bunnies, {} carrots, {} holes, {} hazards",
            self.agents.len(),
            self.items.len(),
            self.targets.len(),
            self.hazards.len()
        );
    }

    /// Bunnies in play
    pub fn agents(&self) -> &[NodeId] {
        &self.agents
    }

    /// Carrot colliders not yet deposited
    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    /// Hole colliders
    pub fn targets(&self) -> &[NodeId] {
        &self.targets
    }

    /// Car colliders
    pub fn hazards(&self) -> &[NodeId] {
        &self.hazards
    }

    /// Live population as of the last refresh
    pub fn counts(&self) -> Counts {
        Counts {
            agents: self.agents.len(),
            items: self.items.len(),
        }
    }

    /// Test and resolve every pair once
    pub fn update(&mut self, scene: &mut GameScene) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let agents = self.agents.clone();
        let config = self.config.clone();

        for (index, &agent) in agents.iter().enumerate() {
            for item in self.items.clone() {
                if in_range(scene, agent, item, config.item_threshold) {
                    let event = self.resolve_pick_up(scene, agent, item);
                    self.record(scene, event, &mut events);
                }
            }
            for target in self.targets.clone() {
                if in_range(scene, agent, target, config.target_threshold) {
                    let event = self.resolve_deposit(scene, agent, target);
                    self.record(scene, event, &mut events);
                }
            }
            for &other in &agents[index + 1..] {
                if in_range(scene, agent, other, config.agent_threshold) {
                    let event = self.resolve_separation(scene, agent, other);
                    self.record(scene, event, &mut events);
                }
            }
            for hazard in self.hazards.clone() {
                if in_range(scene, hazard, agent, config.hazard_threshold) {
                    let event = self.resolve_hazard(scene, hazard, agent);
                    self.record(scene, event, &mut events);
                }
            }
        }
        events
    }

    fn record(&mut self, scene: &GameScene, event: Option<GameEvent>, events: &mut Vec<GameEvent>) {
        if let Some(event) = event {
            if event.changes_population() {
                self.refresh(scene);
            }
            events.push(event);
        }
    }

    /// Bunny grabs the carrot whose collider is `item`
    ///
    /// The carrot body is reparented under the bunny at the carry offset,
    /// its collider stops colliding, every bunny forgets it as bait and the
    /// picker heads for the nearest hole.
    pub fn resolve_pick_up(&mut self, scene: &mut GameScene, agent: NodeId, item: NodeId) -> Option<GameEvent> {
        if !scene[item].is_dynamic || behavior(scene, agent).is_holding() || !overlapping(scene, agent, item) {
            return None;
        }
        let body = anchor(scene, item);

        behavior_mut(scene, agent).carrying = Some(body);
        scene[item].is_dynamic = false;
        scene.add_child(agent, body);
        transform_of_mut(scene, body).translation = self.config.carry_offset();

        self.withdraw_bait(scene, body);
        let position = world_position(scene, agent);
        let hole = find_closest(scene, position, &behavior(scene, agent).holes);
        behavior_mut(scene, agent).follow = hole;

        log::debug!("'{}' picked up '{}'", scene[agent].name, scene[body].name);
        Some(GameEvent::PickedUp { agent, item: body })
    }

    /// Bunny drops its carrot into the hole whose collider is `target`
    ///
    /// The carrot is reparented under the hole body in the deposited pose
    /// and its collider is switched off for good.
    pub fn resolve_deposit(&mut self, scene: &mut GameScene, agent: NodeId, target: NodeId) -> Option<GameEvent> {
        let body = behavior(scene, agent).carrying?;
        if !overlapping(scene, agent, target) {
            return None;
        }
        let hole = anchor(scene, target);

        behavior_mut(scene, agent).carrying = None;
        scene.add_child(hole, body);
        let pose = transform_of_mut(scene, body);
        pose.translation = self.config.deposit_offset();
        pose.rotation *= utils::roll(self.config.deposit_tilt);
        pose.scale = self.config.deposit_scale();
        if let Some(&collider) = scene[body].children().first() {
            scene[collider].active = false;
        }

        let position = world_position(scene, agent);
        let bait = find_closest(scene, position, &behavior(scene, agent).baits);
        behavior_mut(scene, agent).follow = bait;

        log::debug!("'{}' deposited '{}' into '{}'", scene[agent].name, scene[body].name, scene[hole].name);
        Some(GameEvent::Deposited { agent, item: body, target: hole })
    }

    /// Push two overlapping bunnies apart by equal and opposite amounts
    pub fn resolve_separation(&mut self, scene: &mut GameScene, first: NodeId, second: NodeId) -> Option<GameEvent> {
        let (a, b) = (world_aabb(scene, first), world_aabb(scene, second));
        if !a.intersects(&b) {
            return None;
        }
        let offset = a.separation_offset(&b, self.config.separation_damping);
        transform_of_mut(scene, first).translation += offset;
        transform_of_mut(scene, second).translation -= offset;

        log::trace!("Separated '{}' and '{}' by {offset:?}", scene[first].name, scene[second].name);
        Some(GameEvent::Separated { first, second, offset })
    }

    /// Car collider `hazard` hits bunny `agent`
    ///
    /// The car loses speed either way. Above the lethal speed for the hit
    /// angle the bunny is eliminated, otherwise it is nudged aside.
    pub fn resolve_hazard(&mut self, scene: &mut GameScene, hazard: NodeId, agent: NodeId) -> Option<GameEvent> {
        let (hazard_box, agent_box) = (world_aabb(scene, hazard), world_aabb(scene, agent));
        if !hazard_box.intersects(&agent_box) {
            return None;
        }

        let car = anchor(scene, hazard);
        let forward = world_matrix(scene, car)
            .transform_vector(&Vec3::z())
            .try_normalize(1e-6)
            .unwrap_or_else(Vec3::zeros);
        let to_agent = (world_position(scene, agent) - world_position(scene, car))
            .try_normalize(1e-6)
            .unwrap_or_else(Vec3::zeros);
        let lethal_speed = self.config.lethal_speed(forward.dot(&to_agent));

        let mut speed = 0.0;
        if let Some(controller) = controller_of(scene, hazard).and_then(|id| scene[id].component_mut::<VehicleController>()) {
            speed = controller.speed;
            controller.speed *= self.config.hazard_speed_damping;
        }

        if speed > lethal_speed {
            return Some(self.eliminate(scene, hazard, agent));
        }

        let offset = hazard_box.separation_offset(&agent_box, self.config.separation_damping);
        transform_of_mut(scene, agent).translation -= offset;
        log::debug!("'{}' deflected '{}' at speed {speed}", scene[hazard].name, scene[agent].name);
        Some(GameEvent::Deflected { hazard, agent, offset })
    }

    fn eliminate(&mut self, scene: &mut GameScene, hazard: NodeId, agent: NodeId) -> GameEvent {
        let dropped = behavior_mut(scene, agent).carrying.take();
        if let Some(body) = dropped {
            let at = world_position(scene, agent);
            let root = scene.root();
            scene.add_child(root, body);
            let pose = transform_of_mut(scene, body);
            pose.translation.x = at.x;
            pose.translation.z = at.z;
            if let Some(&collider) = scene[body].children().first() {
                scene[collider].is_dynamic = true;
            }
        }

        scene.detach(agent);
        let node = &mut scene[agent];
        node.active = false;
        node.is_dynamic = false;
        log::debug!("'{}' eliminated '{}'", scene[hazard].name, scene[agent].name);

        if let Some(body) = dropped {
            offer_bait(scene, body);
        }
        GameEvent::Eliminated { hazard, agent, dropped }
    }

    fn withdraw_bait(&self, scene: &mut GameScene, body: NodeId) {
        for bunny in bunnies_in_tree(scene) {
            let state = behavior_mut(scene, bunny);
            state.baits.retain(|&bait| bait != body);
            if state.follow != Some(body) {
                continue;
            }

            let position = world_position(scene, bunny);
            let baits = &behavior(scene, bunny).baits;
            let next = if baits.is_empty() {
                let holders: Vec<NodeId> = self
                    .agents
                    .iter()
                    .copied()
                    .filter(|&other| other != bunny && scene[other].active && behavior(scene, other).is_holding())
                    .collect();
                find_closest(scene, position, &holders)
            } else {
                find_closest(scene, position, baits)
            };
            behavior_mut(scene, bunny).follow = next;
        }
    }
}

/// Hand a dropped carrot back to every bunny; idle-handed ones go for the
/// nearest bait
fn offer_bait(scene: &mut GameScene, body: NodeId) {
    for bunny in bunnies_in_tree(scene) {
        let position = world_position(scene, bunny);
        let state = behavior_mut(scene, bunny);
        state.baits.push(body);
        if state.is_holding() {
            continue;
        }
        let next = find_closest(scene, position, &behavior(scene, bunny).baits);
        behavior_mut(scene, bunny).follow = next;
    }
}

fn bunnies_in_tree(scene: &GameScene) -> Vec<NodeId> {
    scene.filter(scene.root(), |n| n.has_component::<BunnyBehavior>())
}

/// Whether both nodes take part in collisions and their anchors are
/// closer than `threshold`
fn in_range(scene: &GameScene, a: NodeId, b: NodeId, threshold: f32) -> bool {
    let takes_part = |id: NodeId| scene[id].active && scene[id].is_dynamic;
    takes_part(a)
        && takes_part(b)
        && (world_position(scene, anchor(scene, a)) - world_position(scene, anchor(scene, b))).norm() < threshold
}

/// Node whose position stands for `id` in distance checks
///
/// # Panics
/// If a carrot, hole or car collider has no parent.
fn anchor(scene: &GameScene, id: NodeId) -> NodeId {
    let node = &scene[id];
    match Role::classify(&node.name) {
        Some(Role::Item | Role::Target | Role::Hazard) => node
            .parent()
            .unwrap_or_else(|| panic!("collider '{}' has no parent to anchor it", node.name)),
        _ => id,
    }
}

/// Local box of `id` carried into world space
///
/// # Panics
/// If the node has no bounding box.
pub fn world_aabb(scene: &GameScene, id: NodeId) -> AABB {
    let node = &scene[id];
    let local = node
        .aabb
        .unwrap_or_else(|| panic!("node '{}' has no bounding box", node.name));
    local.transformed(&world_matrix(scene, id))
}

/// Exact world-space overlap test between two colliders
pub fn overlapping(scene: &GameScene, a: NodeId, b: NodeId) -> bool {
    world_aabb(scene, a).intersects(&world_aabb(scene, b))
}
