//! Scene nodes and the component capability traits

use crate::foundation::collections::new_key_type;
use crate::physics::AABB;

new_key_type! {
    /// Stable handle of a node inside a [`SceneTree`](super::SceneTree)
    pub struct NodeId;
}

/// Marker trait for component types stored on scene nodes
///
/// A game defines one closed sum type over all of its component kinds and
/// implements [`AsComponent`] once per kind it wants to look up.
pub trait Component: 'static {}

/// Capability lookup: borrow the `T` held by a component, if it holds one
///
/// Only [`Component`] types can be looked up.
pub trait AsComponent<T>: Component {
    /// Shared view of the inner `T`
    fn as_component(&self) -> Option<&T>;

    /// Mutable view of the inner `T`
    fn as_component_mut(&mut self) -> Option<&mut T>;
}

/// Element of the scene tree
///
/// Owning edges (`children`) and non-owning back-references (`parent`,
/// `root`) are plain handles; only [`SceneTree`](super::SceneTree) rewires
/// them so the root reference stays consistent across reparenting.
#[derive(Debug, Clone)]
pub struct Node<C> {
    pub(crate) id: NodeId,
    /// Semantic name; name prefixes classify gameplay roles
    pub name: String,
    /// Participates in update and collision
    pub active: bool,
    /// Read by the rendering collaborator
    pub visible: bool,
    /// Local-space collision box, present only on collidable nodes
    pub aabb: Option<AABB>,
    /// Gates collision participation
    pub is_dynamic: bool,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) root: NodeId,
    pub(crate) components: Vec<C>,
}

impl<C> Node<C> {
    pub(crate) fn new(id: NodeId, name: String) -> Self {
        Self {
            id,
            name,
            active: true,
            visible: true,
            aabb: None,
            is_dynamic: false,
            children: Vec::new(),
            parent: None,
            root: id,
            components: Vec::new(),
        }
    }

    /// Handle of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Ordered child handles
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Current parent, `None` for the tree root and detached nodes
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Cached root of the tree this node was last attached to
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether this node is a collider taking part in collision tests
    pub fn is_collidable(&self) -> bool {
        self.active && self.is_dynamic && self.aabb.is_some()
    }

    /// All components, in insertion order
    pub fn components(&self) -> &[C] {
        &self.components
    }

    /// Attach a component and return a reference to it
    pub fn add_component(&mut self, component: C) -> &mut C {
        self.components.push(component);
        let last = self.components.len() - 1;
        &mut self.components[last]
    }

    /// Drop every component matching `predicate`
    pub fn remove_components_where<P>(&mut self, mut predicate: P)
    where
        P: FnMut(&C) -> bool,
    {
        self.components.retain(|c| !predicate(c));
    }

    /// First component of kind `T`
    pub fn component<T>(&self) -> Option<&T>
    where
        C: AsComponent<T>,
    {
        self.components.iter().find_map(AsComponent::as_component)
    }

    /// First component of kind `T`, mutably
    pub fn component_mut<T>(&mut self) -> Option<&mut T>
    where
        C: AsComponent<T>,
    {
        self.components.iter_mut().find_map(AsComponent::as_component_mut)
    }

    /// Every component of kind `T`, in insertion order
    pub fn components_of<'a, T: 'a>(&'a self) -> impl Iterator<Item = &'a T>
    where
        C: AsComponent<T>,
    {
        self.components.iter().filter_map(AsComponent::as_component)
    }

    /// Whether any component of kind `T` is attached
    pub fn has_component<T>(&self) -> bool
    where
        C: AsComponent<T>,
    {
        self.component::<T>().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneTree;

    #[derive(Debug, Clone, PartialEq)]
    enum Part {
        Label(&'static str),
        Weight(u32),
    }

    impl Component for Part {}

    impl AsComponent<u32> for Part {
        fn as_component(&self) -> Option<&u32> {
            match self {
                Part::Weight(w) => Some(w),
                Part::Label(_) => None,
            }
        }

        fn as_component_mut(&mut self) -> Option<&mut u32> {
            match self {
                Part::Weight(w) => Some(w),
                Part::Label(_) => None,
            }
        }
    }

    #[test]
    fn test_component_lookup_by_kind() {
        let mut tree = SceneTree::<Part>::new("Scene");
        let id = tree.spawn_child(tree.root(), "Crate");
        let node = &mut tree[id];
        node.add_component(Part::Label("crate"));
        node.add_component(Part::Weight(3));
        node.add_component(Part::Weight(5));

        assert!(node.has_component::<u32>());
        assert_eq!(node.component::<u32>(), Some(&3));
        assert_eq!(node.components_of::<u32>().copied().collect::<Vec<_>>(), vec![3, 5]);

        *node.component_mut::<u32>().unwrap() += 1;
        assert_eq!(node.component::<u32>(), Some(&4));

        node.remove_components_where(|c| matches!(c, Part::Weight(_)));
        assert!(!node.has_component::<u32>());
        assert_eq!(node.components(), &[Part::Label("crate")]);
    }
}
