//! Game-specific components
//!
//! [`GameComponent`] is the closed set of component kinds a node of the
//! game scene can carry. Engine code looks them up through
//! [`AsComponent`], so transforms and models stay engine types.

mod bunny;
mod follow;
mod light;
mod vehicle;

pub use bunny::{behavior, behavior_mut, find_closest, update_bunny, BunnyBehavior};
pub use follow::{update_follow_camera, FollowCamera};
pub use light::{update_light, DirectionalLight, OrthoBounds};
pub use vehicle::{controller_of, update_vehicle, VehicleController};

use hop_engine::scene::{AsComponent, Component, Model, SceneTree, TransformComponent};

/// Scene tree of the game
pub type GameScene = SceneTree<GameComponent>;

/// Per-tick update a component asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BehaviorKind {
    /// [`update_bunny`]
    Bunny,
    /// [`update_vehicle`]
    Vehicle,
    /// [`update_follow_camera`]
    FollowCamera,
    /// [`update_light`]
    Light,
}

/// Every component kind a game node can carry
#[derive(Debug, Clone)]
pub enum GameComponent {
    /// Local transform
    Transform(TransformComponent),
    /// Mesh geometry
    Model(Model),
    /// Carrying bunny state
    Bunny(BunnyBehavior),
    /// Player-driven car
    Vehicle(VehicleController),
    /// Camera tracking another node
    FollowCamera(FollowCamera),
    /// Shadow-casting light
    Light(DirectionalLight),
}

impl Component for GameComponent {}

impl GameComponent {
    /// Whether the per-tick update skips this component
    pub fn is_disabled(&self) -> bool {
        match self {
            Self::Bunny(bunny) => bunny.disabled,
            Self::Vehicle(vehicle) => vehicle.disabled,
            _ => false,
        }
    }

    /// Update to run for this component, `None` for plain data
    pub fn behavior(&self) -> Option<BehaviorKind> {
        match self {
            Self::Transform(_) | Self::Model(_) => None,
            Self::Bunny(_) => Some(BehaviorKind::Bunny),
            Self::Vehicle(_) => Some(BehaviorKind::Vehicle),
            Self::FollowCamera(_) => Some(BehaviorKind::FollowCamera),
            Self::Light(_) => Some(BehaviorKind::Light),
        }
    }
}

macro_rules! component_kind {
    ($variant:ident, $ty:ty) => {
        impl AsComponent<$ty> for GameComponent {
            fn as_component(&self) -> Option<&$ty> {
                match self {
                    Self::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn as_component_mut(&mut self) -> Option<&mut $ty> {
                match self {
                    Self::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for GameComponent {
            fn from(inner: $ty) -> Self {
                Self::$variant(inner)
            }
        }
    };
}

component_kind!(Transform, TransformComponent);
component_kind!(Model, Model);
component_kind!(Bunny, BunnyBehavior);
component_kind!(Vehicle, VehicleController);
component_kind!(FollowCamera, FollowCamera);
component_kind!(Light, DirectionalLight);
