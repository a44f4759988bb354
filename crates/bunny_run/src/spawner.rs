//! Entity registry
//!
//! Runs once before a round: picks how many of each template pool take
//! part, scatters them over their spawn planes, and gives every collider its
//! local box.
//!
//! Placement is bounded. Each object gets a fixed number of samples; when
//! they are exhausted the minimum separation is relaxed, and once the
//! relaxation budget is spent the spawn fails with
//! [`SpawnError::PlacementInfeasible`].

use hop_engine::prelude::*;
use rand::Rng;
use thiserror::Error;

use crate::components::{find_closest, BunnyBehavior, GameComponent, GameScene};
use crate::config::{BunnyConfig, GameConfig, GameplayConfig};
use crate::error::{GameError, GameResult};
use crate::play_area::PlayArea;
use crate::roles::{Role, AGENT_PLANE, AGENT_PREFIX, ITEM_BODY, ITEM_PLANE, TARGET_BODY, TARGET_PLANE};

/// Spawner errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpawnError {
    /// No template node carries the requested name prefix
    #[error("no template nodes named '{0}*'")]
    NoTemplates(String),

    /// The spawn area cannot hold the batch at the minimum separation
    #[error(
        "placed {placed} of {requested} '{batch}' nodes; no free spot at separation {min_distance} \
         after {attempts} attempts"
    )]
    PlacementInfeasible {
        /// Template prefix of the batch
        batch: String,
        /// Objects placed before giving up
        placed: usize,
        /// Objects requested
        requested: usize,
        /// Separation in force when placement gave up
        min_distance: f32,
        /// Samples tried for the failing object at that separation
        attempts: usize,
    },
}

/// Nodes selected for the round
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    /// Bunny nodes
    pub agents: Vec<NodeId>,
    /// Carrot body nodes
    pub items: Vec<NodeId>,
    /// Hole body nodes
    pub targets: Vec<NodeId>,
}

/// Look up a node the game needs by exact name
pub fn find_node(scene: &GameScene, name: &str) -> GameResult<NodeId> {
    scene
        .find_by_name(name)
        .ok_or_else(|| GameError::MissingNode(name.to_string()))
}

/// Select, place and equip everything the round needs
pub fn spawn<R: Rng + ?Sized>(scene: &mut GameScene, config: &GameConfig, rng: &mut R) -> GameResult<Population> {
    let gameplay = &config.gameplay;
    let population = Population {
        agents: select_templates(scene, AGENT_PREFIX, gameplay.bunny_count)?,
        items: select_templates(scene, ITEM_BODY, gameplay.carrot_count)?,
        targets: select_templates(scene, TARGET_BODY, gameplay.hole_count)?,
    };

    for (nodes, plane) in [
        (&population.agents, AGENT_PLANE),
        (&population.items, ITEM_PLANE),
        (&population.targets, TARGET_PLANE),
    ] {
        let area = PlayArea::of_node(scene, find_node(scene, plane)?);
        place_randomly(scene, nodes, &area, gameplay, rng)?;
    }

    prepare(scene, &population, &config.bunny);
    log::info!(
        "Spawned {} bunnies, {} carrots, {} holes",
        population.agents.len(),
        population.items.len(),
        population.targets.len()
    );
    Ok(population)
}

/// Give colliders their boxes and the selected bunnies their behaviour
pub fn prepare(scene: &mut GameScene, population: &Population, bunny: &BunnyConfig) {
    assign_bounds(scene, bunny);
    equip_bunnies(scene, population, bunny);
}

/// Activate the first `count` nodes whose name starts with `prefix` and
/// retire the rest, together with each node's first child
pub fn select_templates(scene: &mut GameScene, prefix: &str, count: usize) -> Result<Vec<NodeId>, SpawnError> {
    let templates = scene.filter(scene.root(), |n| n.name.starts_with(prefix));
    if templates.is_empty() && count > 0 {
        return Err(SpawnError::NoTemplates(prefix.to_string()));
    }
    if templates.len() < count {
        log::warn!("Only {} '{prefix}' templates for {count} requested", templates.len());
    }

    for (index, &id) in templates.iter().enumerate() {
        set_in_play(scene, id, index < count);
    }
    Ok(templates.into_iter().take(count).collect())
}

fn set_in_play(scene: &mut GameScene, id: NodeId, in_play: bool) {
    let node = &mut scene[id];
    node.active = in_play;
    node.visible = in_play;
    if let Some(&first) = node.children().first() {
        scene[first].active = in_play;
    }
}

/// Move `nodes` to separated random spots on `area`, keeping their heights
pub fn place_randomly<R: Rng + ?Sized>(
    scene: &mut GameScene,
    nodes: &[NodeId],
    area: &PlayArea,
    config: &GameplayConfig,
    rng: &mut R,
) -> Result<(), SpawnError> {
    let Some(&first) = nodes.first() else {
        return Ok(());
    };
    let batch = scene[first].name.clone();
    let heights: Vec<f32> = nodes.iter().map(|&id| transform_of(scene, id).translation.y).collect();
    let positions = sample_positions(area, &heights, config, rng, &batch)?;
    for (&id, position) in nodes.iter().zip(positions) {
        transform_of_mut(scene, id).translation = position;
    }
    Ok(())
}

/// One position per entry of `heights`, pairwise at least the (possibly
/// relaxed) minimum separation apart
pub fn sample_positions<R: Rng + ?Sized>(
    area: &PlayArea,
    heights: &[f32],
    config: &GameplayConfig,
    rng: &mut R,
    batch: &str,
) -> Result<Vec<Vec3>, SpawnError> {
    let mut placed: Vec<Vec3> = Vec::with_capacity(heights.len());
    let mut min_distance = config.min_separation;
    let mut relaxations = 0;

    for &y in heights {
        loop {
            let free = (0..config.placement_attempts)
                .map(|_| area.sample(rng, y))
                .find(|candidate| placed.iter().all(|p| (p - candidate).norm() >= min_distance));
            if let Some(position) = free {
                placed.push(position);
                break;
            }

            if relaxations >= config.max_relaxations {
                return Err(SpawnError::PlacementInfeasible {
                    batch: batch.to_string(),
                    placed: placed.len(),
                    requested: heights.len(),
                    min_distance,
                    attempts: config.placement_attempts,
                });
            }
            relaxations += 1;
            let relaxed = min_distance * config.relax_factor;
            log::warn!(
                "'{batch}': no free spot after {} attempts, relaxing separation {min_distance} -> {relaxed}",
                config.placement_attempts
            );
            min_distance = relaxed;
        }
    }
    Ok(placed)
}

/// Fixed cube on every bunny; merged mesh bounds on every collider
///
/// # Panics
/// If a carrot, hole or car collider has no mesh to take bounds from.
pub fn assign_bounds(scene: &mut GameScene, bunny: &BunnyConfig) {
    for id in scene.linearize(scene.root()) {
        let node = &mut scene[id];
        let bounds = match Role::classify(&node.name) {
            Some(Role::Agent) => AABB::cube(bunny.half_extent),
            Some(Role::Item | Role::Target | Role::Hazard) => node
                .component::<Model>()
                .and_then(Model::merged_bounds)
                .unwrap_or_else(|| panic!("collider '{}' has no mesh to take bounds from", node.name)),
            None => continue,
        };
        node.aabb = Some(bounds);
        node.is_dynamic = true;
    }
}

/// Attach fresh bunny behaviour to every selected bunny, pursuing the
/// nearest carrot
pub fn equip_bunnies(scene: &mut GameScene, population: &Population, config: &BunnyConfig) {
    for &id in &population.agents {
        let position = world_position(scene, id);
        let mut behavior = BunnyBehavior::new(config, transform_of(scene, id).translation.y);
        behavior.baits = population.items.clone();
        behavior.holes = population.targets.clone();
        behavior.follow = find_closest(scene, position, &behavior.baits);

        let node = &mut scene[id];
        node.remove_components_where(|c| matches!(c, GameComponent::Bunny(_)));
        node.add_component(behavior.into());
    }
}
