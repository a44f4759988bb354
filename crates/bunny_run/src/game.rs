//! Game: round setup and the per-tick update
//!
//! One tick runs every enabled behaviour on active nodes in tree order,
//! then resolves collisions, then updates the session and publishes the
//! tick's events to the registered handlers.

use hop_engine::prelude::*;
use rand::Rng;

use crate::components::{
    update_bunny, update_follow_camera, update_light, update_vehicle, BehaviorKind, DirectionalLight,
    FollowCamera, GameComponent, GameScene, VehicleController,
};
use crate::config::GameConfig;
use crate::error::GameResult;
use crate::events::{EventBus, GameEvent};
use crate::interaction::InteractionEngine;
use crate::play_area::PlayArea;
use crate::roles::{CAMERA, LIGHT, PLANE, VEHICLE, WHEEL_MARKER};
use crate::session::Session;
use crate::spawner::{self, find_node, Population};

/// A scene under simulation plus everything derived from it
pub struct Game {
    config: GameConfig,
    scene: GameScene,
    keys: KeyState,
    interactions: InteractionEngine,
    session: Session,
    events: EventBus,
    play_area: PlayArea,
    population: Population,
}

impl Game {
    /// Wrap a constructed scene
    ///
    /// Fails when the scene has no main plane to bound movement.
    pub fn new(scene: GameScene, config: GameConfig) -> GameResult<Self> {
        log::info!("Creating game over a scene of {} nodes...", scene.node_count());
        let play_area = PlayArea::of_node(&scene, find_node(&scene, PLANE)?);
        let interactions = InteractionEngine::new(&scene, config.interaction.clone());
        let session = Session::new(interactions.counts());
        Ok(Self {
            config,
            scene,
            keys: KeyState::new(),
            interactions,
            session,
            events: EventBus::new(),
            play_area,
            population: Population::default(),
        })
    }

    /// Spawn the configured population and start the round
    pub fn setup<R: Rng + ?Sized>(&mut self, rng: &mut R) -> GameResult<()> {
        self.population = spawner::spawn(&mut self.scene, &self.config, rng)?;
        self.start_round()
    }

    /// Equip the car, camera and light, then count the population
    ///
    /// Expects bunnies and colliders to be prepared already. The camera and
    /// light are optional; the car is not. A round that starts without
    /// bunnies or without carrots is over at once.
    pub fn start_round(&mut self) -> GameResult<()> {
        let car = find_node(&self.scene, VEHICLE)?;
        let wheels = self.scene.filter(car, |n| n.name.contains(WHEEL_MARKER));
        log::info!("Equipping '{VEHICLE}' with {} wheels", wheels.len());
        let node = &mut self.scene[car];
        node.remove_components_where(|c| matches!(c, GameComponent::Vehicle(_)));
        node.add_component(VehicleController::new(self.config.vehicle.clone(), wheels).into());

        match self.scene.find_by_name(CAMERA) {
            Some(camera) => {
                let node = &mut self.scene[camera];
                node.remove_components_where(|c| matches!(c, GameComponent::FollowCamera(_)));
                node.add_component(FollowCamera::new(car, &self.config.camera).into());
                update_follow_camera(&mut self.scene, camera);
            }
            None => log::warn!("Scene has no '{CAMERA}'; nothing follows the car"),
        }

        match self.scene.find_by_name(LIGHT) {
            Some(light) => {
                transform_of_mut(&mut self.scene, light).translation = Vec3::from(self.config.light.position);
                let node = &mut self.scene[light];
                node.remove_components_where(|c| matches!(c, GameComponent::Light(_)));
                node.add_component(DirectionalLight::new(&self.config.light).into());
                update_light(&mut self.scene, light);
            }
            None => log::warn!("Scene has no '{LIGHT}'; shadows stay unset"),
        }

        self.interactions.refresh(&self.scene);
        self.session = Session::new(self.interactions.counts());
        self.keys.clear();
        self.scene.print_tree(self.scene.root());

        let counts = self.session.counts();
        log::info!("Round started: {} bunnies, {} carrots", counts.agents, counts.items);

        // An empty side ends the round before the first tick.
        let signals = self.session.update_counts(counts);
        self.end_round_on(&signals);
        for signal in signals {
            self.events.send(signal);
        }
        self.events.dispatch();
        Ok(())
    }

    /// Forward a key transition to the car
    pub fn set_key(&mut self, key: KeyCode, pressed: bool) {
        self.keys.set(key, pressed);
    }

    /// Advance the simulation by one tick of `dt` seconds
    ///
    /// Returns the tick's events after they were dispatched.
    pub fn update(&mut self, time: f64, dt: f32) -> Vec<GameEvent> {
        log::trace!("Tick at {time:.3}s");
        for id in self.scene.linearize(self.scene.root()) {
            let node = &self.scene[id];
            if !node.active {
                continue;
            }
            let kinds: Vec<BehaviorKind> = node
                .components()
                .iter()
                .filter(|c| !c.is_disabled())
                .filter_map(GameComponent::behavior)
                .collect();
            for kind in kinds {
                self.run_behavior(id, kind, dt);
            }
        }

        let mut events = self.interactions.update(&mut self.scene);
        for event in &events {
            self.session.record(event);
        }
        if events.iter().any(GameEvent::changes_population) {
            self.interactions.refresh(&self.scene);
            let signals = self.session.update_counts(self.interactions.counts());
            self.end_round_on(&signals);
            events.extend(signals);
        }

        for event in &events {
            self.events.send(event.clone());
        }
        self.events.dispatch();
        events
    }

    fn run_behavior(&mut self, id: NodeId, kind: BehaviorKind, dt: f32) {
        match kind {
            BehaviorKind::Bunny => update_bunny(&mut self.scene, id, dt, &self.play_area, &self.config.bunny),
            BehaviorKind::Vehicle => update_vehicle(&mut self.scene, id, &self.keys, dt, &self.play_area),
            BehaviorKind::FollowCamera => update_follow_camera(&mut self.scene, id),
            BehaviorKind::Light => update_light(&mut self.scene, id),
        }
    }

    fn end_round_on(&mut self, signals: &[GameEvent]) {
        if signals.iter().any(|s| matches!(s, GameEvent::RoundEnded(_))) {
            self.disable_vehicles();
        }
    }

    fn disable_vehicles(&mut self) {
        let root = self.scene.root();
        self.scene.traverse_mut(root, |node| {
            if let Some(vehicle) = node.component_mut::<VehicleController>() {
                vehicle.disabled = true;
            }
        });
        self.keys.clear();
        log::info!("Vehicle input disabled");
    }

    /// Scene being simulated
    pub fn scene(&self) -> &GameScene {
        &self.scene
    }

    /// Scene being simulated, mutably
    pub fn scene_mut(&mut self) -> &mut GameScene {
        &mut self.scene
    }

    /// Round state
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Event bus, for registering handlers
    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Collision engine
    pub fn interactions(&self) -> &InteractionEngine {
        &self.interactions
    }

    /// Configuration in use
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Nodes selected by the last [`Game::setup`]
    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Main plane movement is clamped to
    pub fn play_area(&self) -> &PlayArea {
        &self.play_area
    }
}
