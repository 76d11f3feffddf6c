//! Name-based search over a [`Tree`].
//!
//! All searches walk the tree depth-first in document order, starting with
//! the node they are called on. Only elements match. A local name of
//! [`WILDCARD`] matches any element; a namespace of [`WILDCARD`] matches any
//! namespace, and any other namespace must be equal (`""` meaning none).

use crate::node::{Node, NodeId, NodeKind};
use crate::tree::Tree;

/// Matches any local name or any namespace.
pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy)]
struct NameTest<'q> {
    namespace: &'q str,
    local: &'q str,
}

impl<'q> NameTest<'q> {
    fn new(namespace: &'q str, local: &'q str) -> Self {
        Self { namespace, local }
    }

    fn matches(&self, node: &Node) -> bool {
        let NodeKind::Element { name, .. } = node.kind() else {
            return false;
        };
        (self.namespace == WILDCARD || self.namespace == name.namespace)
            && (self.local == WILDCARD || self.local == name.local)
    }
}

impl Tree {
    /// First matching node at or below `from`, in document order.
    pub fn select_node(&self, from: NodeId, namespace: &str, name: &str) -> Option<NodeId> {
        let test = NameTest::new(namespace, name);
        self.descendants(from).find(|&id| test.matches(self.node(id)))
    }

    /// Every matching node at or below `from`, in document order, without
    /// looking inside nodes that already matched.
    ///
    /// Searching `<a><a/></a>` for `a` returns only the outer element; use
    /// [`select_nodes_recursive`](Self::select_nodes_recursive) to get both.
    pub fn select_nodes(&self, from: NodeId, namespace: &str, name: &str) -> Vec<NodeId> {
        let test = NameTest::new(namespace, name);
        let mut found = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if test.matches(self.node(id)) {
                found.push(id);
                continue;
            }
            stack.extend(self.children(id).iter().rev().copied());
        }
        found
    }

    /// Every matching node at or below `from`, in document order, including
    /// matches nested inside other matches.
    pub fn select_nodes_recursive(&self, from: NodeId, namespace: &str, name: &str) -> Vec<NodeId> {
        let test = NameTest::new(namespace, name);
        self.descendants(from)
            .filter(|&id| test.matches(self.node(id)))
            .collect()
    }
}
