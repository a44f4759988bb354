//! # Hop Engine
//!
//! Simulation core for small 3D scene games: an arena scene graph with
//! hierarchical transforms, axis-aligned collision boxes, keyboard state
//! and file-backed configuration. Rendering and asset loading live with the
//! host.
//!
//! ## Quick Start
//!
//! ```rust
//! use hop_engine::prelude::*;
//!
//! #[derive(Debug, Clone)]
//! enum Part {
//!     Transform(TransformComponent),
//! }
//!
//! impl Component for Part {}
//!
//! impl AsComponent<TransformComponent> for Part {
//!     fn as_component(&self) -> Option<&TransformComponent> {
//!         let Part::Transform(t) = self;
//!         Some(t)
//!     }
//!
//!     fn as_component_mut(&mut self) -> Option<&mut TransformComponent> {
//!         let Part::Transform(t) = self;
//!         Some(t)
//!     }
//! }
//!
//! let mut scene = SceneTree::<Part>::new("Scene");
//! let parent = scene.spawn_child(scene.root(), "Parent");
//! scene[parent].add_component(Part::Transform(TransformComponent::from_translation(Vec3::new(1.0, 0.0, 0.0))));
//! let child = scene.spawn_child(parent, "Child");
//! scene[child].add_component(Part::Transform(TransformComponent::from_translation(Vec3::new(0.0, 2.0, 0.0))));
//!
//! assert_eq!(world_position(&scene, child), Vec3::new(1.0, 2.0, 0.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod input;
pub mod physics;
pub mod scene;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError, ConfigFormat},
        foundation::math::{constants, utils, Mat4, Mat4Ext, Quat, Vec3},
        input::{KeyCode, KeyState},
        physics::AABB,
        scene::{
            local_matrix, transform_of, transform_of_mut, world_matrix, world_position, AsComponent,
            Component, DetachPolicy, Model, Node, NodeId, Primitive, SceneTree, TransformComponent,
        },
    };
}
