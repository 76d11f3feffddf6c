//! The [`Document`]: declaration metadata, entity definitions and one tree.

use std::fmt;
use std::io::{Read, Write};
use std::path::Path;

use crate::builder::TreeBuilder;
use crate::config::TreeConfig;
use crate::entity::{EntityMap, load_html4_entities};
use crate::node::NodeId;
use crate::serializer::Serializer;
use crate::token::{Token, Tokenizer};
use crate::tree::{NodeRef, Tree};
use crate::Result;

/// An XML document held entirely in memory.
///
/// A document starts out empty, is filled by one of the `load_*` methods
/// (each load replaces the previous tree) and can be saved any number of
/// times. A failed load leaves the document untouched.
///
/// # Example
///
/// ```rust
/// use quarto_xml_tree::Document;
///
/// let mut doc = Document::new();
/// doc.save_declaration = false;
/// doc.load_str(r#"<a><b/><c x="1">hi</c></a>"#).unwrap();
///
/// let c = doc.select_node("", "c").unwrap();
/// assert_eq!(c.attribute("", "x"), Some("1"));
/// assert_eq!(c.value(), "hi");
/// assert_eq!(doc.to_string(), r#"<a><b /><c x="1">hi</c></a>"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Written into the declaration on save; never read from input.
    pub version: String,
    /// Written into the declaration on save; never read from input.
    pub encoding: String,
    /// `standalone` value of the last loaded declaration, or the default.
    pub standalone: String,
    /// Whether saving emits the `<?xml ...?>` declaration.
    pub save_declaration: bool,
    /// Indentation unit for saving; `None` saves the compact form.
    pub indent: Option<String>,
    /// Reject unbalanced markup instead of tolerating it.
    pub strict: bool,
    /// Entity definitions handed to the tokenizer on every load.
    pub entities: EntityMap,
    tree: Tree,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            version: "1.0".to_string(),
            encoding: "utf-8".to_string(),
            standalone: "yes".to_string(),
            save_declaration: true,
            indent: None,
            strict: false,
            entities: EntityMap::new(),
            tree: Tree::new(),
        }
    }

    /// An empty document set up from `config`.
    pub fn with_config(config: &TreeConfig) -> Self {
        let mut doc = Self::new();
        if config.load.extended_entities {
            doc.load_extended_entity_map();
        }
        doc.entities.extend(
            config
                .load
                .entities
                .iter()
                .map(|(name, value)| (name.clone(), value.clone())),
        );
        doc.strict = config.load.strict;
        doc.save_declaration = config.save.declaration;
        doc.indent = config.save.indent.clone();
        doc
    }

    /// Add the HTML 4 entity set to [`entities`](Self::entities).
    pub fn load_extended_entity_map(&mut self) {
        load_html4_entities(&mut self.entities);
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Mutable access for [`Tree::add_child`], [`Tree::remove_child`] and
    /// node creation.
    pub fn tree_mut(&mut self) -> &mut Tree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeRef<'_> {
        self.tree.root_ref()
    }

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        self.tree.node_ref(id)
    }

    pub fn select_node(&self, namespace: &str, name: &str) -> Option<NodeRef<'_>> {
        self.root().select_node(namespace, name)
    }

    pub fn select_nodes(&self, namespace: &str, name: &str) -> Vec<NodeRef<'_>> {
        self.root().select_nodes(namespace, name)
    }

    pub fn select_nodes_recursive(&self, namespace: &str, name: &str) -> Vec<NodeRef<'_>> {
        self.root().select_nodes_recursive(namespace, name)
    }

    /// Replace the tree with the one described by `tokens`.
    ///
    /// This is the entry point for token sources other than the built-in
    /// [`Tokenizer`].
    pub fn load_tokens<I>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = Result<Token>>,
    {
        let built = TreeBuilder::new().strict(self.strict).build(tokens)?;
        self.tree = built.tree;
        if let Some(standalone) = built.standalone {
            self.standalone = standalone;
        }
        Ok(())
    }

    pub fn load_str(&mut self, text: &str) -> Result<()> {
        tracing::debug!(bytes = text.len(), strict = self.strict, "Loading document");
        let tokenizer = Tokenizer::new(text, &self.entities).strict(self.strict);
        let built = TreeBuilder::new().strict(self.strict).build(tokenizer)?;
        self.tree = built.tree;
        if let Some(standalone) = built.standalone {
            self.standalone = standalone;
        }
        Ok(())
    }

    /// Load UTF-8 encoded bytes.
    pub fn load_bytes(&mut self, bytes: Vec<u8>) -> Result<()> {
        let text = String::from_utf8(bytes)?;
        self.load_str(&text)
    }

    /// Read `reader` to the end and load its content.
    pub fn load_reader<R: Read>(&mut self, mut reader: R) -> Result<()> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        self.load_bytes(bytes)
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Reading document");
        let bytes = std::fs::read(path)?;
        self.load_bytes(bytes)
    }

    /// Serialize using the document's declaration and indentation settings.
    pub fn save_string(&self) -> String {
        let mut out = String::new();
        let _ = self.write_to(&mut out);
        out
    }

    pub fn save_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        writer.write_all(self.save_string().as_bytes())?;
        writer.flush()?;
        Ok(())
    }

    pub fn save_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "Writing document");
        std::fs::write(path, self.save_string())?;
        Ok(())
    }

    fn write_to<W: fmt::Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        let serializer = Serializer::with_indent(&self.tree, self.indent.as_deref());
        if self.save_declaration {
            serializer.write_declaration(out, &self.version, &self.encoding, &self.standalone)?;
        }
        serializer.write_node(out, self.tree.root())
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_to(f)
    }
}
