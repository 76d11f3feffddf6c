//! Markup output for trees and subtrees.
//!
//! The compact form is the persisted format and must stay byte-for-byte
//! stable:
//!
//! - elements as `<ns:name attr="value">children text</ns:name>`, or
//!   `<ns:name attr="value" />` when they have neither children nor text;
//! - comments as `<!-- text -->`;
//! - directives as `<!text!>`;
//! - processing instructions as `<?target value?>`.
//!
//! Attribute values and text are written exactly as stored, without
//! escaping. The indented form only moves tags onto their own lines.

use std::fmt::{self, Write};

use crate::node::{NodeId, NodeKind, QName};
use crate::tree::Tree;

/// Pending work of the output loop.
#[derive(Debug, Clone, Copy)]
enum Step {
    Open(NodeId, usize),
    Close(NodeId, usize),
}

/// Renders nodes of one tree.
#[derive(Debug, Clone, Copy)]
pub struct Serializer<'t> {
    tree: &'t Tree,
    indent: Option<&'t str>,
}

impl<'t> Serializer<'t> {
    pub fn compact(tree: &'t Tree) -> Self {
        Self { tree, indent: None }
    }

    /// One node per line, each nesting level prefixed with `unit`.
    pub fn indented(tree: &'t Tree, unit: &'t str) -> Self {
        Self {
            tree,
            indent: Some(unit),
        }
    }

    pub fn with_indent(tree: &'t Tree, indent: Option<&'t str>) -> Self {
        Self { tree, indent }
    }

    pub fn to_string(&self, id: NodeId) -> String {
        let mut out = String::new();
        let _ = self.write_node(&mut out, id);
        out
    }

    pub fn write_node<W: Write + ?Sized>(&self, out: &mut W, id: NodeId) -> fmt::Result {
        let mut stack = vec![Step::Open(id, 0)];
        while let Some(step) = stack.pop() {
            match step {
                Step::Open(id, depth) => self.open(out, &mut stack, id, depth)?,
                Step::Close(id, depth) => self.close(out, id, depth)?,
            }
        }
        Ok(())
    }

    /// Write the `<?xml ...?>` declaration line.
    pub fn write_declaration<W: Write + ?Sized>(
        &self,
        out: &mut W,
        version: &str,
        encoding: &str,
        standalone: &str,
    ) -> fmt::Result {
        write!(
            out,
            r#"<?xml version="{}" encoding="{}" standalone="{}"?>"#,
            version, encoding, standalone
        )?;
        self.end_line(out)
    }

    /// Write everything up to the children of `id`, scheduling the children
    /// and the closing tag on `stack`.
    fn open<W: Write + ?Sized>(
        &self,
        out: &mut W,
        stack: &mut Vec<Step>,
        id: NodeId,
        depth: usize,
    ) -> fmt::Result {
        let node = self.tree.node(id);
        match node.kind() {
            NodeKind::Root => {
                stack.extend(node.children().iter().rev().map(|&c| Step::Open(c, depth)));
                Ok(())
            }
            NodeKind::ProcessingInstruction { target, value } => {
                self.pad(out, depth)?;
                write!(out, "<?{} {}?>", target, value)?;
                self.end_line(out)
            }
            NodeKind::Comment(text) => {
                self.pad(out, depth)?;
                write!(out, "<!-- {} -->", text)?;
                self.end_line(out)
            }
            NodeKind::Directive(text) => {
                self.pad(out, depth)?;
                write!(out, "<!{}!>", text)?;
                self.end_line(out)
            }
            NodeKind::Element {
                name,
                attributes,
                value,
            } => {
                self.pad(out, depth)?;
                out.write_char('<')?;
                write_qname(out, name)?;
                for attr in attributes {
                    out.write_char(' ')?;
                    write_qname(out, &attr.name)?;
                    write!(out, "=\"{}\"", attr.value)?;
                }

                let children = node.children();
                if children.is_empty() && value.is_empty() {
                    out.write_str(" />")?;
                    return self.end_line(out);
                }
                out.write_char('>')?;

                if children.is_empty() {
                    out.write_str(value)?;
                    return self.end_tag(out, name);
                }
                self.end_line(out)?;
                stack.push(Step::Close(id, depth));
                stack.extend(children.iter().rev().map(|&c| Step::Open(c, depth + 1)));
                Ok(())
            }
        }
    }

    /// Trailing text and closing tag of an element with children.
    fn close<W: Write + ?Sized>(&self, out: &mut W, id: NodeId, depth: usize) -> fmt::Result {
        let NodeKind::Element { name, value, .. } = self.tree.node(id).kind() else {
            return Ok(());
        };
        if !value.is_empty() {
            self.pad(out, depth + 1)?;
            out.write_str(value)?;
            self.end_line(out)?;
        }
        self.pad(out, depth)?;
        self.end_tag(out, name)
    }

    fn end_tag<W: Write + ?Sized>(&self, out: &mut W, name: &QName) -> fmt::Result {
        out.write_str("</")?;
        write_qname(out, name)?;
        out.write_char('>')?;
        self.end_line(out)
    }

    fn pad<W: Write + ?Sized>(&self, out: &mut W, depth: usize) -> fmt::Result {
        if let Some(unit) = self.indent {
            for _ in 0..depth {
                out.write_str(unit)?;
            }
        }
        Ok(())
    }

    fn end_line<W: Write + ?Sized>(&self, out: &mut W) -> fmt::Result {
        if self.indent.is_some() {
            out.write_char('\n')?;
        }
        Ok(())
    }
}

fn write_qname<W: Write + ?Sized>(out: &mut W, name: &QName) -> fmt::Result {
    if !name.namespace.is_empty() {
        out.write_str(&name.namespace)?;
        out.write_char(':')?;
    }
    out.write_str(&name.local)
}
