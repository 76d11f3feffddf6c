//! Node types stored in a [`Tree`](crate::Tree).

use std::fmt;
use std::str::FromStr;

/// Index of a node inside the arena of the [`Tree`](crate::Tree) that created it.
///
/// A `NodeId` is only meaningful for the tree it came from, and only until
/// the owning document is loaded again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in its arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// A (namespace, local name) pair.
///
/// The namespace is the literal prefix written in the markup (`ns` in
/// `<ns:item>`); an empty namespace means "no namespace". Prefixes are never
/// resolved against `xmlns` declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    pub namespace: String,
    pub local: String,
}

impl QName {
    pub fn new(namespace: impl Into<String>, local: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            local: local.into(),
        }
    }

    /// A name without namespace.
    pub fn local(local: impl Into<String>) -> Self {
        Self::new(String::new(), local)
    }

    /// Split a raw `prefix:local` name at its first colon. A colon in the
    /// first or last position belongs to the local name.
    pub fn parse(raw: &str) -> Self {
        match raw.find(':') {
            Some(i) if i > 0 && i + 1 < raw.len() => Self::new(&raw[..i], &raw[i + 1..]),
            _ => Self::local(raw),
        }
    }

    pub fn is(&self, namespace: &str, local: &str) -> bool {
        self.namespace == namespace && self.local == local
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace.is_empty() {
            f.write_str(&self.local)
        } else {
            write!(f, "{}:{}", self.namespace, self.local)
        }
    }
}

/// An attribute of an element. Values are stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QName,
    pub value: String,
}

impl Attribute {
    pub fn new(name: QName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// The five kinds of node, each with its own payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The single top-level container of a document.
    Root,

    /// `<!...>` declarations such as `DOCTYPE`.
    Directive(String),

    /// `<?target value?>`, for any target other than `xml`.
    ProcessingInstruction { target: String, value: String },

    Comment(String),

    /// An element. `value` holds the last run of character data seen
    /// directly inside it; earlier runs are overwritten.
    Element {
        name: QName,
        attributes: Vec<Attribute>,
        value: String,
    },
}

/// A node in the arena.
///
/// Structure (parent and children) is changed through
/// [`Tree::add_child`](crate::Tree::add_child) and
/// [`Tree::remove_child`](crate::Tree::remove_child) so that the parent link
/// and the child lists always agree.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
}

impl Node {
    pub(crate) fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            parent: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    /// Parent node, `None` for the root and for detached nodes.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in document order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }

    /// Qualified name; only elements have one.
    pub fn name(&self) -> Option<&QName> {
        match &self.kind {
            NodeKind::Element { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Text payload: element text, comment or directive body, or
    /// processing-instruction value. Empty for the root.
    pub fn value(&self) -> &str {
        match &self.kind {
            NodeKind::Root => "",
            NodeKind::Directive(text) | NodeKind::Comment(text) => text,
            NodeKind::ProcessingInstruction { value, .. } | NodeKind::Element { value, .. } => {
                value
            }
        }
    }

    /// Replace the text payload. Returns `false` for the root, which has
    /// nowhere to store text.
    pub fn set_value(&mut self, text: impl Into<String>) -> bool {
        match &mut self.kind {
            NodeKind::Root => false,
            NodeKind::Directive(value)
            | NodeKind::Comment(value)
            | NodeKind::ProcessingInstruction { value, .. }
            | NodeKind::Element { value, .. } => {
                *value = text.into();
                true
            }
        }
    }

    /// Attributes in document order; empty for non-elements.
    pub fn attributes(&self) -> &[Attribute] {
        match &self.kind {
            NodeKind::Element { attributes, .. } => attributes,
            _ => &[],
        }
    }

    /// Append an attribute. Existing attributes with the same name are kept.
    /// Returns `false` if this node is not an element.
    pub fn set_attribute(&mut self, name: QName, value: impl Into<String>) -> bool {
        match &mut self.kind {
            NodeKind::Element { attributes, .. } => {
                attributes.push(Attribute::new(name, value));
                true
            }
            _ => false,
        }
    }

    /// Value of the first attribute named `namespace:name`.
    pub fn attribute(&self, namespace: &str, name: &str) -> Option<&str> {
        self.attributes()
            .iter()
            .find(|a| a.name.is(namespace, name))
            .map(|a| a.value.as_str())
    }

    pub fn has_attribute(&self, namespace: &str, name: &str) -> bool {
        self.attribute(namespace, name).is_some()
    }

    /// Attribute parsed as `T`, or `T::default()` if it is missing or does
    /// not parse.
    pub fn attribute_as<T>(&self, namespace: &str, name: &str) -> T
    where
        T: FromStr + Default,
    {
        self.attribute(namespace, name)
            .map(parse_or_default)
            .unwrap_or_default()
    }

    /// Attribute parsed as a boolean, `false` if missing or unparseable.
    pub fn attribute_bool(&self, namespace: &str, name: &str) -> bool {
        self.attribute(namespace, name)
            .is_some_and(|v| parse_bool(v).unwrap_or(false))
    }
}

pub(crate) fn parse_or_default<T>(text: &str) -> T
where
    T: FromStr + Default,
{
    text.parse().unwrap_or_default()
}

/// Parse the spellings `1 t T TRUE true True` and `0 f F FALSE false False`.
pub fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
