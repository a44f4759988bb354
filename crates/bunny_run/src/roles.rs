//! Node naming conventions
//!
//! Scene authors tag gameplay roles through node names. Colliders are
//! children of a visual body node; the body's transform is the collider's
//! anchor.

/// Prefix of bunny nodes
pub const AGENT_PREFIX: &str = "Bunny";
/// Prefix of carrot colliders
pub const ITEM_COLLIDER: &str = "Carrot Cube";
/// Prefix of hole colliders
pub const TARGET_COLLIDER: &str = "Hole Cube";
/// Prefix of car colliders
pub const HAZARD_COLLIDER: &str = "Cube";

/// Marker contained in carrot body template names
pub const ITEM_BODY: &str = "Carrot body";
/// Marker contained in hole body template names
pub const TARGET_BODY: &str = "Hole body";

/// The player's car
pub const VEHICLE: &str = "Car";
/// Marker contained in the names of the car's wheels
pub const WHEEL_MARKER: &str = "Wheel";
/// Camera following the car
pub const CAMERA: &str = "Main Camera";
/// Shadow-casting light
pub const LIGHT: &str = "Directional Light";

/// Plane bounding car and bunny movement
pub const PLANE: &str = "Plane";
/// Spawn area for bunnies
pub const AGENT_PLANE: &str = "Plane Bunny";
/// Spawn area for carrots
pub const ITEM_PLANE: &str = "Plane Carrot";
/// Spawn area for holes
pub const TARGET_PLANE: &str = "Plane Hole";

/// Collision role of a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// Carrying bunny
    Agent,
    /// Carrot collider
    Item,
    /// Hole collider
    Target,
    /// Car collider
    Hazard,
}

impl Role {
    /// Classify a node by its name, `None` for nodes without a role
    pub fn classify(name: &str) -> Option<Self> {
        if name.starts_with(ITEM_COLLIDER) {
            Some(Self::Item)
        } else if name.starts_with(TARGET_COLLIDER) {
            Some(Self::Target)
        } else if name.starts_with(HAZARD_COLLIDER) {
            Some(Self::Hazard)
        } else if name.starts_with(AGENT_PREFIX) {
            Some(Self::Agent)
        } else {
            None
        }
    }

    /// Whether `name` carries this role
    pub fn matches(self, name: &str) -> bool {
        Self::classify(name) == Some(self)
    }
}
