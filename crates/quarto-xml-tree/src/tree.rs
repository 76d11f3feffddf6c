//! Arena holding the nodes of one document.
//!
//! Every node lives in a `Vec<Node>` owned by the [`Tree`] and is addressed
//! by [`NodeId`]. Child lists own the structure; the parent link is a plain
//! index used to detach a node before it is re-attached elsewhere. Removing a
//! node from its parent leaves it in the arena as a detached, still usable
//! subtree.

use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

use serde::de::DeserializeOwned;

use crate::node::{Attribute, Node, NodeId, NodeKind, QName, parse_bool, parse_or_default};
use crate::serializer::Serializer;
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// A tree containing only its root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(NodeKind::Root)],
            root: NodeId(0),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes in the arena, detached ones included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// `true` when the root has no children. Detached nodes are not counted.
    pub fn is_empty(&self) -> bool {
        self.nodes[self.root.0].children.is_empty()
    }

    /// # Panics
    ///
    /// Panics if `id` was not created by this tree.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// # Panics
    ///
    /// Panics if `id` was not created by this tree.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn get(&self, id: NodeId) -> Option<NodeRef<'_>> {
        (id.0 < self.nodes.len()).then_some(NodeRef { tree: self, id })
    }

    /// Borrowed view of a node, for navigation and display.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not created by this tree.
    pub fn node_ref(&self, id: NodeId) -> NodeRef<'_> {
        assert!(id.0 < self.nodes.len(), "node {:?} is not in this tree", id);
        NodeRef { tree: self, id }
    }

    pub fn root_ref(&self) -> NodeRef<'_> {
        self.node_ref(self.root)
    }

    /// Create a detached node. A tree has exactly one root, so asking for
    /// another yields an unnamed empty element instead.
    pub fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let kind = match kind {
            NodeKind::Root => {
                tracing::warn!("Refusing to create a second root node");
                NodeKind::Element {
                    name: QName::default(),
                    attributes: Vec::new(),
                    value: String::new(),
                }
            }
            kind => kind,
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(kind));
        id
    }

    pub fn create_element(&mut self, name: QName, attributes: Vec<Attribute>) -> NodeId {
        self.create_node(NodeKind::Element {
            name,
            attributes,
            value: String::new(),
        })
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Comment(text.into()))
    }

    pub fn create_directive(&mut self, text: impl Into<String>) -> NodeId {
        self.create_node(NodeKind::Directive(text.into()))
    }

    pub fn create_processing_instruction(
        &mut self,
        target: impl Into<String>,
        value: impl Into<String>,
    ) -> NodeId {
        self.create_node(NodeKind::ProcessingInstruction {
            target: target.into(),
            value: value.into(),
        })
    }

    /// Append `child` to `parent`'s children, detaching it from its current
    /// parent first.
    ///
    /// The caller must not make a node its own ancestor; no cycle check is
    /// performed. The root can never become a child: that request is logged
    /// and ignored.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        if child == self.root {
            tracing::warn!("Ignoring attempt to add the root node as a child");
            return;
        }
        if let Some(old_parent) = self.nodes[child.0].parent {
            self.remove_child(old_parent, child);
        }
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Detach `child` from `parent`. Does nothing if `child` is not one of
    /// `parent`'s children.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        let children = &mut self.nodes[parent.0].children;
        let Some(pos) = children.iter().position(|&c| c == child) else {
            return;
        };
        children.remove(pos);
        self.nodes[child.0].parent = None;
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// `from` and all of its descendants in document (pre-order) order.
    pub fn descendants(&self, from: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            stack: vec![from],
        }
    }

    /// Text value of the first node matching `namespace:name` at or below
    /// `from`, or `""` when there is none.
    pub fn value(&self, from: NodeId, namespace: &str, name: &str) -> &str {
        self.select_node(from, namespace, name)
            .map_or("", |id| self.nodes[id.0].value())
    }

    /// [`value`](Self::value) parsed as `T`, or `T::default()`.
    pub fn value_as<T>(&self, from: NodeId, namespace: &str, name: &str) -> T
    where
        T: FromStr + Default,
    {
        parse_or_default(self.value(from, namespace, name))
    }

    /// [`value`](Self::value) parsed as a boolean, or `false`.
    pub fn value_bool(&self, from: NodeId, namespace: &str, name: &str) -> bool {
        parse_bool(self.value(from, namespace, name)).unwrap_or(false)
    }
}

/// Pre-order iterator over a subtree.
pub struct Descendants<'t> {
    tree: &'t Tree,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// A node together with the tree it lives in.
///
/// Dereferences to [`Node`]; its `Display` renders the subtree in compact
/// form.
#[derive(Clone, Copy)]
pub struct NodeRef<'t> {
    tree: &'t Tree,
    id: NodeId,
}

impl<'t> NodeRef<'t> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    pub fn parent(&self) -> Option<NodeRef<'t>> {
        self.tree.parent(self.id).map(|id| self.tree.node_ref(id))
    }

    pub fn children(self) -> impl Iterator<Item = NodeRef<'t>> + 't {
        let tree = self.tree;
        tree.children(self.id).iter().map(move |&id| tree.node_ref(id))
    }

    pub fn select_node(&self, namespace: &str, name: &str) -> Option<NodeRef<'t>> {
        self.tree
            .select_node(self.id, namespace, name)
            .map(|id| self.tree.node_ref(id))
    }

    pub fn select_nodes(&self, namespace: &str, name: &str) -> Vec<NodeRef<'t>> {
        self.tree
            .select_nodes(self.id, namespace, name)
            .into_iter()
            .map(|id| self.tree.node_ref(id))
            .collect()
    }

    pub fn select_nodes_recursive(&self, namespace: &str, name: &str) -> Vec<NodeRef<'t>> {
        self.tree
            .select_nodes_recursive(self.id, namespace, name)
            .into_iter()
            .map(|id| self.tree.node_ref(id))
            .collect()
    }

    /// Text value of the first descendant (self included) named
    /// `namespace:name`, or `""`.
    pub fn value_of(&self, namespace: &str, name: &str) -> &'t str {
        self.tree.value(self.id, namespace, name)
    }

    /// Deserialize this subtree into `T` with quick-xml's serde support.
    ///
    /// The subtree is rendered in compact form first, so text and attribute
    /// values containing `<` or `&` do not survive the trip.
    pub fn unmarshal<T: DeserializeOwned>(&self) -> Result<T> {
        let markup = self.to_string();
        tracing::trace!(bytes = markup.len(), "Unmarshalling subtree");
        Ok(quick_xml::de::from_str(&markup)?)
    }
}

impl<'t> Deref for NodeRef<'t> {
    type Target = Node;

    fn deref(&self) -> &Node {
        self.tree.node(self.id)
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("kind", self.tree.node(self.id).kind())
            .finish()
    }
}

impl fmt::Display for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Serializer::compact(self.tree).write_node(f, self.id)
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}
