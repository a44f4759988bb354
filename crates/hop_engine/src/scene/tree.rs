//! Arena-backed scene tree
//!
//! Nodes live in a slot map and reference each other by [`NodeId`]. Every
//! structural edit goes through [`SceneTree::add_child`] and
//! [`SceneTree::remove_child`], which keep three invariants:
//!
//! - a node appears in at most one child list, and its `parent` names that list's owner;
//! - `root` of an attached node equals `root` of its parent, transitively;
//! - the tree root is its own root.

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use thiserror::Error;

use super::node::{Node, NodeId};
use crate::foundation::collections::Arena;

/// What happens to the cached root of a node detached by `remove_child`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetachPolicy {
    /// Keep the last root until the node is attached elsewhere
    #[default]
    RetainRoot,
    /// Make the detached node the root of its own subtree
    ResetRoot,
}

/// Structural inconsistency found by [`SceneTree::verify_links`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneError {
    /// A child list names a node whose `parent` points elsewhere
    #[error("node '{child}' is listed under '{listed_under}' but its parent is {actual:?}")]
    BrokenParentLink {
        /// Child name
        child: String,
        /// Name of the node whose child list contains it
        listed_under: String,
        /// Name of the node its parent field points to
        actual: Option<String>,
    },

    /// A node appears in more than one child list
    #[error("node '{0}' appears in more than one child list")]
    MultipleParents(String),

    /// An attached node caches a root different from its parent's
    #[error("node '{0}' caches a root different from its parent's")]
    RootMismatch(String),
}

/// Hierarchical scene graph owning every node and its components
#[derive(Debug, Clone)]
pub struct SceneTree<C> {
    nodes: Arena<NodeId, Node<C>>,
    root: NodeId,
    detach_policy: DetachPolicy,
}

impl<C> SceneTree<C> {
    /// Create a tree containing only a root node named `root_name`
    pub fn new(root_name: impl Into<String>) -> Self {
        let mut nodes = Arena::with_key();
        let name = root_name.into();
        let root = nodes.insert_with_key(|id| Node::new(id, name));
        Self {
            nodes,
            root,
            detach_policy: DetachPolicy::default(),
        }
    }

    /// Builder pattern: choose how `remove_child` treats the detached root
    pub fn with_detach_policy(mut self, policy: DetachPolicy) -> Self {
        self.detach_policy = policy;
        self
    }

    /// Active detach policy
    pub fn detach_policy(&self) -> DetachPolicy {
        self.detach_policy
    }

    /// Handle of the tree root
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, attached or not
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds nothing but the root
    pub fn has_only_root(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Whether `id` names a node of this tree
    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Look up a node
    pub fn get(&self, id: NodeId) -> Option<&Node<C>> {
        self.nodes.get(id)
    }

    /// Look up a node mutably
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<C>> {
        self.nodes.get_mut(id)
    }

    /// Allocate a detached node; it is its own root until attached
    pub fn create_node(&mut self, name: impl Into<String>) -> NodeId {
        let name = name.into();
        self.nodes.insert_with_key(|id| Node::new(id, name))
    }

    /// Allocate a node and attach it under `parent`
    pub fn spawn_child(&mut self, parent: NodeId, name: impl Into<String>) -> NodeId {
        let child = self.create_node(name);
        self.add_child(parent, child);
        child
    }

    /// Attach `child` as the last child of `parent`
    ///
    /// Detaches `child` from its previous parent first, then propagates
    /// `parent`'s root to `child` and all of its descendants.
    ///
    /// # Panics
    /// If either handle is unknown, or if `child` is `parent` or one of its
    /// ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        assert!(
            !self.is_ancestor_or_self(child, parent),
            "cannot attach '{}' under its own descendant '{}'",
            self[child].name,
            self[parent].name
        );

        if let Some(old_parent) = self[child].parent {
            self.unlink(old_parent, child);
        }

        self[parent].children.push(child);
        self[child].parent = Some(parent);

        let new_root = self[parent].root;
        self.set_subtree_root(child, new_root);
    }

    /// Detach `child` from `parent`
    ///
    /// Returns `false` (and changes nothing) when `child` is not a child of
    /// `parent`. The detached node keeps or resets its cached root according
    /// to the tree's [`DetachPolicy`].
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        if !self.unlink(parent, child) {
            return false;
        }
        if self.detach_policy == DetachPolicy::ResetRoot {
            self.set_subtree_root(child, child);
        }
        true
    }

    /// Detach `node` from whatever parent it has
    pub fn detach(&mut self, node: NodeId) -> bool {
        match self[node].parent {
            Some(parent) => self.remove_child(parent, node),
            None => false,
        }
    }

    /// Whether `ancestor` lies on the parent chain of `node`
    pub fn is_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = self[node].parent;
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self[id].parent;
        }
        false
    }

    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        ancestor == node || self.is_ancestor(ancestor, node)
    }

    fn unlink(&mut self, parent: NodeId, child: NodeId) -> bool {
        let children = &mut self[parent].children;
        match children.iter().position(|&c| c == child) {
            Some(index) => {
                children.remove(index);
                self[child].parent = None;
                true
            }
            None => false,
        }
    }

    fn set_subtree_root(&mut self, subtree: NodeId, new_root: NodeId) {
        for id in self.linearize(subtree) {
            self[id].root = new_root;
        }
    }

    /// Depth-first walk: `before` on a node, then its subtree, then `after`
    pub fn traverse<B, A>(&self, id: NodeId, before: &mut B, after: &mut A)
    where
        B: FnMut(&Node<C>),
        A: FnMut(&Node<C>),
    {
        let node = &self[id];
        before(node);
        for &child in &node.children {
            self.traverse(child, before, after);
        }
        after(node);
    }

    /// Pre-order visit with mutable access to each node
    ///
    /// The visiting order is fixed before the first callback runs.
    pub fn traverse_mut<F>(&mut self, id: NodeId, mut visit: F)
    where
        F: FnMut(&mut Node<C>),
    {
        for node in self.linearize(id) {
            visit(&mut self[node]);
        }
    }

    /// Pre-order list of `id` and all of its descendants
    pub fn linearize(&self, id: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            order.push(current);
            stack.extend(self[current].children.iter().rev());
        }
        order
    }

    /// First node of the subtree, in pre-order, matching `predicate`
    pub fn find<P>(&self, id: NodeId, mut predicate: P) -> Option<NodeId>
    where
        P: FnMut(&Node<C>) -> bool,
    {
        self.linearize(id).into_iter().find(|&n| predicate(&self[n]))
    }

    /// Every node of the subtree, in pre-order, matching `predicate`
    pub fn filter<P>(&self, id: NodeId, mut predicate: P) -> Vec<NodeId>
    where
        P: FnMut(&Node<C>) -> bool,
    {
        self.linearize(id).into_iter().filter(|&n| predicate(&self[n])).collect()
    }

    /// Apply `transform` to every node of the subtree, in pre-order
    pub fn map<T, F>(&self, id: NodeId, mut transform: F) -> Vec<T>
    where
        F: FnMut(&Node<C>) -> T,
    {
        self.linearize(id).into_iter().map(|n| transform(&self[n])).collect()
    }

    /// First node anywhere under the tree root with exactly this name
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.find(self.root, |n| n.name == name)
    }

    /// Log the subtree at debug level, one indented line per node
    pub fn print_tree(&self, id: NodeId) {
        self.print_subtree(id, 0);
    }

    fn print_subtree(&self, id: NodeId, level: usize) {
        let node = &self[id];
        log::debug!("{}{}", "  ".repeat(level), node.name);
        for &child in &node.children {
            self.print_subtree(child, level + 1);
        }
    }

    /// Check parent links, single ownership and root consistency for every
    /// node reachable from an attached parent
    pub fn verify_links(&self) -> Result<(), SceneError> {
        let mut owners: HashMap<NodeId, NodeId> = HashMap::new();
        for (id, node) in &self.nodes {
            for &child in &node.children {
                if owners.insert(child, id).is_some() {
                    return Err(SceneError::MultipleParents(self[child].name.clone()));
                }
                let child_node = &self[child];
                if child_node.parent != Some(id) {
                    return Err(SceneError::BrokenParentLink {
                        child: child_node.name.clone(),
                        listed_under: node.name.clone(),
                        actual: child_node.parent.map(|p| self[p].name.clone()),
                    });
                }
                if child_node.root != node.root {
                    return Err(SceneError::RootMismatch(child_node.name.clone()));
                }
            }
        }
        if self[self.root].root != self.root {
            return Err(SceneError::RootMismatch(self[self.root].name.clone()));
        }
        Ok(())
    }
}

impl<C> Index<NodeId> for SceneTree<C> {
    type Output = Node<C>;

    fn index(&self, id: NodeId) -> &Node<C> {
        self.nodes
            .get(id)
            .unwrap_or_else(|| panic!("node {id:?} is not part of this scene tree"))
    }
}

impl<C> IndexMut<NodeId> for SceneTree<C> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<C> {
        self.nodes
            .get_mut(id)
            .unwrap_or_else(|| panic!("node {id:?} is not part of this scene tree"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Tree = SceneTree<()>;

    fn sample() -> (Tree, NodeId, NodeId, NodeId) {
        let mut tree = Tree::new("Scene");
        let root = tree.root();
        let a = tree.spawn_child(root, "A");
        let b = tree.spawn_child(a, "B");
        let c = tree.spawn_child(b, "C");
        (tree, a, b, c)
    }

    #[test]
    fn test_root_is_its_own_root() {
        let tree = Tree::new("Scene");
        assert_eq!(tree[tree.root()].root(), tree.root());
        assert!(tree.verify_links().is_ok());
    }

    #[test]
    fn test_node_count_includes_root() {
        let mut tree = Tree::new("Scene");
        assert_eq!(tree.node_count(), 1);
        assert!(tree.has_only_root());

        let child = tree.spawn_child(tree.root(), "A");
        assert_eq!(tree.node_count(), 2);
        assert!(!tree.has_only_root());

        tree.detach(child);
        assert_eq!(tree.node_count(), 2);
    }

    #[test]
    fn test_add_child_propagates_root_to_descendants() {
        let mut tree = Tree::new("Scene");
        let loose = tree.create_node("Loose");
        let inner = tree.create_node("Inner");
        let leaf = tree.create_node("Leaf");
        tree.add_child(loose, inner);
        tree.add_child(inner, leaf);
        assert_eq!(tree[leaf].root(), loose);

        tree.add_child(tree.root(), loose);
        for id in [loose, inner, leaf] {
            assert_eq!(tree[id].root(), tree.root());
        }
        assert!(tree.verify_links().is_ok());
    }

    #[test]
    fn test_reparent_moves_between_child_lists() {
        let (mut tree, a, b, c) = sample();
        tree.add_child(a, c);

        assert_eq!(tree[c].parent(), Some(a));
        assert_eq!(tree[a].children(), &[b, c]);
        assert!(tree[b].children().is_empty());
        assert!(tree.verify_links().is_ok());
    }

    #[test]
    fn test_nested_reparenting_keeps_invariants() {
        let (mut tree, a, b, c) = sample();
        let root = tree.root();
        let other = tree.create_node("Other");

        tree.add_child(other, b);
        assert_eq!(tree[c].root(), other);
        tree.add_child(root, other);
        assert_eq!(tree[c].root(), root);
        tree.add_child(c, a);
        assert_eq!(tree[a].parent(), Some(c));
        assert_eq!(tree.linearize(root), vec![root, other, b, c, a]);
        assert!(tree.verify_links().is_ok());
    }

    #[test]
    fn test_remove_child_retains_root_by_default() {
        let (mut tree, a, b, c) = sample();
        assert!(tree.remove_child(a, b));

        assert_eq!(tree[b].parent(), None);
        assert_eq!(tree[b].root(), tree.root());
        assert_eq!(tree[c].root(), tree.root());
        assert!(tree.verify_links().is_ok());
    }

    #[test]
    fn test_remove_child_reset_root_policy() {
        let (tree, a, b, c) = sample();
        let mut tree = tree.with_detach_policy(DetachPolicy::ResetRoot);
        assert!(tree.remove_child(a, b));

        assert_eq!(tree[b].root(), b);
        assert_eq!(tree[c].root(), b);
        assert!(tree.verify_links().is_ok());
    }

    #[test]
    fn test_remove_missing_child_is_noop() {
        let (mut tree, a, _b, c) = sample();
        assert!(!tree.remove_child(a, c));
        assert!(tree[c].parent().is_some());
    }

    #[test]
    #[should_panic(expected = "own descendant")]
    fn test_cycle_is_rejected() {
        let (mut tree, a, _b, c) = sample();
        tree.add_child(c, a);
    }

    #[test]
    fn test_traverse_order() {
        let (tree, ..) = sample();
        let events = std::cell::RefCell::new(Vec::new());
        tree.traverse(
            tree.root(),
            &mut |n: &Node<()>| events.borrow_mut().push(format!("+{}", n.name)),
            &mut |n: &Node<()>| events.borrow_mut().push(format!("-{}", n.name)),
        );
        assert_eq!(events.into_inner(), ["+Scene", "+A", "+B", "+C", "-C", "-B", "-A", "-Scene"]);
    }

    #[test]
    fn test_find_filter_map() {
        let (mut tree, a, ..) = sample();
        tree.spawn_child(a, "B2");
        let root = tree.root();

        let found = tree.find(root, |n| n.name.starts_with('B'));
        assert_eq!(found.map(|id| tree[id].name.as_str()), Some("B"));
        assert_eq!(tree.filter(root, |n| n.name.starts_with('B')).len(), 2);
        assert_eq!(tree.map(root, |n| n.name.len()), vec![5, 1, 1, 1, 2]);
        assert!(tree.find_by_name("Missing").is_none());
    }

    #[test]
    fn test_traverse_mut_reaches_every_node() {
        let (mut tree, ..) = sample();
        let root = tree.root();
        tree.traverse_mut(root, |n| n.visible = false);
        assert!(tree.map(root, |n| n.visible).iter().all(|v| !v));
    }
}
