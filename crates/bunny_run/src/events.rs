//! Gameplay events and their delivery
//!
//! Interaction resolution only mutates the scene and reports what changed
//! as [`GameEvent`]s. Anything outside the simulation (score display, sound
//! cues) subscribes through [`EventBus::register_handler`]:
//! - handlers are registered per [`EventKind`];
//! - a handler returning `true` consumes the event, stopping delivery to
//!   later handlers of that kind.

use std::collections::HashMap;

use hop_engine::foundation::math::Vec3;
use hop_engine::scene::NodeId;

use crate::session::{Counts, RoundOutcome};

/// Something that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// A bunny grabbed a carrot
    PickedUp {
        /// Bunny node
        agent: NodeId,
        /// Carrot body node
        item: NodeId,
    },
    /// A bunny dropped its carrot into a hole
    Deposited {
        /// Bunny node
        agent: NodeId,
        /// Carrot body node
        item: NodeId,
        /// Hole body node
        target: NodeId,
    },
    /// Two bunnies were pushed apart
    Separated {
        /// Bunny moved by `+offset`
        first: NodeId,
        /// Bunny moved by `-offset`
        second: NodeId,
        /// Correction applied
        offset: Vec3,
    },
    /// The car nudged a bunny aside without stopping it
    Deflected {
        /// Car collider node
        hazard: NodeId,
        /// Bunny node
        agent: NodeId,
        /// Correction subtracted from the bunny
        offset: Vec3,
    },
    /// The car removed a bunny from play
    Eliminated {
        /// Car collider node
        hazard: NodeId,
        /// Bunny node
        agent: NodeId,
        /// Carrot body dropped back into the world
        dropped: Option<NodeId>,
    },
    /// The live population changed
    CountsChanged(Counts),
    /// The round ended
    RoundEnded(RoundOutcome),
}

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// [`GameEvent::PickedUp`]
    PickedUp,
    /// [`GameEvent::Deposited`]
    Deposited,
    /// [`GameEvent::Separated`]
    Separated,
    /// [`GameEvent::Deflected`]
    Deflected,
    /// [`GameEvent::Eliminated`]
    Eliminated,
    /// [`GameEvent::CountsChanged`]
    CountsChanged,
    /// [`GameEvent::RoundEnded`]
    RoundEnded,
}

impl GameEvent {
    /// Kind used for handler registration
    pub fn kind(&self) -> EventKind {
        match self {
            Self::PickedUp { .. } => EventKind::PickedUp,
            Self::Deposited { .. } => EventKind::Deposited,
            Self::Separated { .. } => EventKind::Separated,
            Self::Deflected { .. } => EventKind::Deflected,
            Self::Eliminated { .. } => EventKind::Eliminated,
            Self::CountsChanged(_) => EventKind::CountsChanged,
            Self::RoundEnded(_) => EventKind::RoundEnded,
        }
    }

    /// Whether the event changes which nodes take part in collisions
    pub fn changes_population(&self) -> bool {
        matches!(self, Self::PickedUp { .. } | Self::Deposited { .. } | Self::Eliminated { .. })
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &GameEvent) -> bool;
}

/// Queue of pending events plus the handlers registered for each kind
#[derive(Default)]
pub struct EventBus {
    queue: Vec<GameEvent>,
    handlers: HashMap<EventKind, Vec<Box<dyn EventHandler>>>,
}

impl EventBus {
    /// Create a new empty event bus
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for a specific event kind
    pub fn register_handler(&mut self, kind: EventKind, handler: Box<dyn EventHandler>) {
        self.handlers.entry(kind).or_default().push(handler);
    }

    /// Queue an event for the next dispatch
    pub fn send(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    /// Number of queued events
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Deliver every queued event in order
    pub fn dispatch(&mut self) {
        for event in std::mem::take(&mut self.queue) {
            if let Some(handlers) = self.handlers.get_mut(&event.kind()) {
                for handler in handlers.iter_mut() {
                    if handler.on_event(&event) {
                        break;
                    }
                }
            }
        }
    }

    /// Drop queued events without delivering them
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

/// Writes round progress to the log in place of an on-screen HUD
#[derive(Debug, Default)]
pub struct HudLogger;

impl EventHandler for HudLogger {
    fn on_event(&mut self, event: &GameEvent) -> bool {
        match event {
            GameEvent::CountsChanged(counts) => {
                log::info!("HUD: bunnies {} | carrots {}", counts.agents, counts.items);
            }
            GameEvent::RoundEnded(RoundOutcome::Won) => log::info!("HUD: you won"),
            GameEvent::RoundEnded(RoundOutcome::Lost) => log::info!("HUD: game over"),
            GameEvent::Eliminated { .. } => log::debug!("HUD: splash"),
            _ => {}
        }
        false
    }
}
