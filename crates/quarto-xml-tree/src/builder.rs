//! Builds a [`Tree`] from a token stream.

use crate::node::{NodeId, NodeKind};
use crate::token::Token;
use crate::tree::Tree;
use crate::{Error, Result};

/// The result of a successful build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuiltTree {
    pub tree: Tree,
    /// `standalone` pseudo-attribute of the XML declaration, if present.
    pub standalone: Option<String>,
}

/// Consumes tokens and attaches nodes below a moving cursor.
///
/// Start tags descend, end tags ascend. Character data overwrites the
/// cursor's text. By default the builder is permissive: an end tag at the
/// top level ends the build successfully, and elements left open at the end
/// of the stream are accepted as they are. [`strict`](Self::strict) turns
/// both into errors.
#[derive(Debug)]
pub struct TreeBuilder {
    tree: Tree,
    cursor: NodeId,
    standalone: Option<String>,
    strict: bool,
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

enum Flow {
    Continue,
    Stop,
}

impl TreeBuilder {
    pub fn new() -> Self {
        let tree = Tree::new();
        let cursor = tree.root();
        Self {
            tree,
            cursor,
            standalone: None,
            strict: false,
        }
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Consume `tokens` until the stream ends or a token fails.
    pub fn build<I>(mut self, tokens: I) -> Result<BuiltTree>
    where
        I: IntoIterator<Item = Result<Token>>,
    {
        let mut count = 0usize;
        for token in tokens {
            count += 1;
            if let Flow::Stop = self.handle(token?)? {
                break;
            }
        }

        if self.cursor != self.tree.root() {
            let name = self
                .tree
                .node(self.cursor)
                .name()
                .map(ToString::to_string)
                .unwrap_or_default();
            if self.strict {
                return Err(Error::UnclosedElement { name });
            }
            tracing::warn!(element = %name, "Input ended with unclosed elements");
        }

        tracing::debug!(tokens = count, nodes = self.tree.len(), "Built document tree");
        Ok(BuiltTree {
            tree: self.tree,
            standalone: self.standalone,
        })
    }

    fn handle(&mut self, token: Token) -> Result<Flow> {
        tracing::trace!(?token, "Token");
        match token {
            Token::CharData(text) => {
                self.tree.node_mut(self.cursor).set_value(text.trim());
            }
            Token::Comment(text) => {
                self.attach(NodeKind::Comment(text.trim().to_string()));
            }
            Token::Directive(text) => {
                self.attach(NodeKind::Directive(text.trim().to_string()));
            }
            Token::StartTag { name, attributes } => {
                self.cursor = self.attach(NodeKind::Element {
                    name,
                    attributes,
                    value: String::new(),
                });
            }
            Token::EndTag { name } => match self.tree.parent(self.cursor) {
                Some(parent) => self.cursor = parent,
                None if self.strict => {
                    return Err(Error::UnexpectedEndTag {
                        name: name.to_string(),
                    });
                }
                None => {
                    tracing::warn!(tag = %name, "Closing tag without open element; ignoring the rest of the input");
                    return Ok(Flow::Stop);
                }
            },
            Token::ProcessingInstruction { target, text } if target == "xml" => {
                if let Some(value) = pseudo_attribute(&text, "standalone") {
                    self.standalone = Some(value.to_string());
                }
            }
            Token::ProcessingInstruction { target, text } => {
                self.attach(NodeKind::ProcessingInstruction {
                    target: target.trim().to_string(),
                    value: text.trim().to_string(),
                });
            }
        }
        Ok(Flow::Continue)
    }

    fn attach(&mut self, kind: NodeKind) -> NodeId {
        let id = self.tree.create_node(kind);
        self.tree.add_child(self.cursor, id);
        id
    }
}

/// Value of `name="..."` inside a declaration body.
fn pseudo_attribute<'t>(text: &'t str, name: &str) -> Option<&'t str> {
    let pattern = format!("{}=\"", name);
    let start = text.find(&pattern)? + pattern.len();
    let len = text[start..].find('"')?;
    Some(&text[start..start + len])
}
