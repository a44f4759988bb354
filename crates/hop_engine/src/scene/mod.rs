//! Scene graph
//!
//! An arena-backed tree of named nodes. Each node owns its children by
//! handle and holds non-owning handles to its parent and to the root of
//! the tree it belongs to. Components are supplied by the game as a single
//! closed sum type and looked up by capability through [`AsComponent`].
//!
//! ## Layout
//!
//! ```text
//! SceneTree<C>
//!   └── Node<C> { name, active, aabb, components: Vec<C>, children }
//!         ├── TransformComponent  (local TRS, composed up the parent chain)
//!         └── Model               (primitive positions for collision setup)
//! ```

mod model;
mod node;
mod transform;
mod tree;

pub use model::{Model, Primitive};
pub use node::{AsComponent, Component, Node, NodeId};
pub use transform::{
    local_matrix, transform_of, transform_of_mut, world_matrix, world_position, TransformComponent,
};
pub use tree::{DetachPolicy, SceneError, SceneTree};
