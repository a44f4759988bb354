//! Transform component and hierarchical transform composition
//!
//! A node may carry several [`TransformComponent`]s; its local matrix is
//! their product in insertion order. World matrices are never cached: each
//! query walks the parent chain, so a reparent is visible to the very next
//! query in the same tick.

use super::node::{AsComponent, NodeId};
use super::tree::SceneTree;
use crate::foundation::math::{Mat4, Mat4Ext, Quat, Vec3};

/// Translation / rotation / scale relative to the parent node
#[derive(Debug, Clone, PartialEq)]
pub struct TransformComponent {
    /// Position relative to the parent
    pub translation: Vec3,

    /// Rotation relative to the parent
    pub rotation: Quat,

    /// Scale factors
    pub scale: Vec3,
}

impl Default for TransformComponent {
    fn default() -> Self {
        Self {
            translation: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl TransformComponent {
    /// Create identity transform
    pub fn identity() -> Self {
        Self::default()
    }

    /// Create from translation only
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Default::default()
        }
    }

    /// Builder pattern: Set rotation from quaternion
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Builder pattern: Set scale (uniform)
    pub fn with_uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::new(scale, scale, scale);
        self
    }

    /// Builder pattern: Set scale (non-uniform)
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert to transformation matrix (TRS order)
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::new_translation(&self.translation)
            * self.rotation.to_homogeneous()
            * Mat4::new_nonuniform_scaling(&self.scale)
    }

    /// Local +Z axis rotated into the parent's frame
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::new(0.0, 0.0, 1.0)
    }
}

/// Product of every transform on `id`, first attached applied outermost
pub fn local_matrix<C>(tree: &SceneTree<C>, id: NodeId) -> Mat4
where
    C: AsComponent<TransformComponent>,
{
    tree[id]
        .components_of::<TransformComponent>()
        .fold(Mat4::identity(), |acc, t| acc * t.to_matrix())
}

/// Composition of local matrices from the topmost ancestor down to `id`
pub fn world_matrix<C>(tree: &SceneTree<C>, id: NodeId) -> Mat4
where
    C: AsComponent<TransformComponent>,
{
    let mut matrix = local_matrix(tree, id);
    let mut current = tree[id].parent();
    while let Some(ancestor) = current {
        matrix = local_matrix(tree, ancestor) * matrix;
        current = tree[ancestor].parent();
    }
    matrix
}

/// World-space origin of `id`
pub fn world_position<C>(tree: &SceneTree<C>, id: NodeId) -> Vec3
where
    C: AsComponent<TransformComponent>,
{
    world_matrix(tree, id).translation_part()
}

/// The first transform on `id`
///
/// # Panics
/// If the node carries no transform. Nodes the simulation moves are set up
/// with one; a missing transform is a scene construction bug.
pub fn transform_of<C>(tree: &SceneTree<C>, id: NodeId) -> &TransformComponent
where
    C: AsComponent<TransformComponent>,
{
    let node = &tree[id];
    node.component::<TransformComponent>()
        .unwrap_or_else(|| panic!("node '{}' has no transform", node.name))
}

/// The first transform on `id`, mutably
///
/// # Panics
/// If the node carries no transform.
pub fn transform_of_mut<C>(tree: &mut SceneTree<C>, id: NodeId) -> &mut TransformComponent
where
    C: AsComponent<TransformComponent>,
{
    let node = &mut tree[id];
    let name = node.name.clone();
    node.component_mut::<TransformComponent>()
        .unwrap_or_else(|| panic!("node '{name}' has no transform"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{constants::HALF_PI, utils};
    use crate::scene::Component;
    use approx::assert_relative_eq;

    #[derive(Debug, Clone)]
    enum Part {
        Transform(TransformComponent),
        Label,
    }

    impl Component for Part {}

    impl AsComponent<TransformComponent> for Part {
        fn as_component(&self) -> Option<&TransformComponent> {
            match self {
                Part::Transform(t) => Some(t),
                Part::Label => None,
            }
        }

        fn as_component_mut(&mut self) -> Option<&mut TransformComponent> {
            match self {
                Part::Transform(t) => Some(t),
                Part::Label => None,
            }
        }
    }

    fn at(x: f32, y: f32, z: f32) -> Part {
        Part::Transform(TransformComponent::from_translation(Vec3::new(x, y, z)))
    }

    #[test]
    fn test_local_matrix_without_transform_is_identity() {
        let mut tree = SceneTree::<Part>::new("Scene");
        let node = tree.spawn_child(tree.root(), "Bare");
        tree[node].add_component(Part::Label);
        assert_eq!(local_matrix(&tree, node), Mat4::identity());
    }

    #[test]
    fn test_multiple_transforms_compose_in_order() {
        let mut tree = SceneTree::<Part>::new("Scene");
        let node = tree.spawn_child(tree.root(), "Layered");
        tree[node].add_component(at(1.0, 0.0, 0.0));
        tree[node].add_component(Part::Transform(
            TransformComponent::identity().with_rotation(utils::yaw(HALF_PI)),
        ));
        tree[node].add_component(at(0.0, 0.0, 1.0));

        // translate * rotate * translate: (0,0,1) rotated onto +x, then shifted by 1
        let origin = local_matrix(&tree, node).transform_vec3(&Vec3::zeros());
        assert_relative_eq!(origin, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_world_matrix_follows_parent_chain() {
        let mut tree = SceneTree::<Part>::new("Scene");
        let root = tree.root();
        tree[root].add_component(at(100.0, 0.0, 0.0));
        let parent = tree.spawn_child(root, "Parent");
        tree[parent].add_component(Part::Transform(
            TransformComponent::from_translation(Vec3::new(0.0, 5.0, 0.0)).with_uniform_scale(2.0),
        ));
        let child = tree.spawn_child(parent, "Child");
        tree[child].add_component(at(1.0, 0.0, 0.0));

        assert_relative_eq!(world_position(&tree, child), Vec3::new(102.0, 5.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_reparent_is_visible_immediately() {
        let mut tree = SceneTree::<Part>::new("Scene");
        let root = tree.root();
        let a = tree.spawn_child(root, "A");
        tree[a].add_component(at(10.0, 0.0, 0.0));
        let b = tree.spawn_child(root, "B");
        tree[b].add_component(at(-10.0, 0.0, 0.0));
        let item = tree.spawn_child(a, "Item");
        tree[item].add_component(at(0.0, 1.0, 0.0));

        assert_relative_eq!(world_position(&tree, item).x, 10.0);
        tree.add_child(b, item);
        assert_relative_eq!(world_position(&tree, item).x, -10.0);
    }

    #[test]
    fn test_forward_of_yawed_transform() {
        let t = TransformComponent::identity().with_rotation(utils::yaw(-HALF_PI));
        assert_relative_eq!(t.forward(), Vec3::new(-1.0, 0.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    #[should_panic(expected = "has no transform")]
    fn test_missing_transform_is_a_precondition_violation() {
        let mut tree = SceneTree::<Part>::new("Scene");
        let node = tree.spawn_child(tree.root(), "Bare");
        let _ = transform_of(&tree, node);
    }

    #[test]
    fn test_transform_of_mut_writes_through() {
        let mut tree = SceneTree::<Part>::new("Scene");
        let node = tree.spawn_child(tree.root(), "Mover");
        tree[node].add_component(at(0.0, 0.0, 0.0));
        transform_of_mut(&mut tree, node).translation.x = 3.0;
        assert_relative_eq!(transform_of(&tree, node).translation.x, 3.0);
    }
}
