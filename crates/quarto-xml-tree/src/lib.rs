//! In-memory XML document trees.
//!
//! A [`Document`] is loaded from text, bytes, a reader or a file into a
//! [`Tree`] of nodes, queried by namespace and local name, edited through
//! [`Tree::add_child`] and [`Tree::remove_child`], and saved back out in a
//! fixed, byte-stable format.
//!
//! # Overview
//!
//! - [`Token`] and [`Tokenizer`]: the lexical layer, built on [`quick_xml`]
//! - [`TreeBuilder`]: turns any `Result<Token>` stream into a [`Tree`]
//! - [`Tree`], [`Node`], [`NodeRef`]: arena storage, node data and borrowed handles
//! - [`Serializer`]: compact or indented markup output
//! - [`TreeConfig`]: load and save options, readable from JSON
//!
//! # Example
//!
//! ```rust
//! use quarto_xml_tree::{Document, QName};
//!
//! let mut doc = Document::new();
//! doc.load_str(r#"<?xml version="1.0" standalone="no"?>
//! <feed>
//!   <entry id="1"><title>First</title></entry>
//!   <entry id="2"><title>Second</title></entry>
//! </feed>"#).unwrap();
//!
//! assert_eq!(doc.standalone, "no");
//! let entries = doc.select_nodes_recursive("", "entry");
//! assert_eq!(entries.len(), 2);
//! assert_eq!(entries[1].attribute_as::<i64>("", "id"), 2);
//! assert_eq!(entries[1].value_of("", "title"), "Second");
//!
//! let feed = doc.select_node("", "feed").unwrap().id();
//! let tree = doc.tree_mut();
//! let entry = tree.create_element(QName::local("entry"), Vec::new());
//! tree.add_child(feed, entry);
//! assert_eq!(doc.select_nodes_recursive("", "entry").len(), 3);
//! ```

pub mod builder;
pub mod config;
pub mod document;
pub mod entity;
pub mod error;
pub mod node;
pub mod search;
pub mod serializer;
pub mod token;
pub mod tree;

pub use builder::{BuiltTree, TreeBuilder};
pub use config::{LoadOptions, SaveOptions, TreeConfig};
pub use document::Document;
pub use entity::EntityMap;
pub use error::{Error, Result};
pub use node::{Attribute, Node, NodeId, NodeKind, QName};
pub use search::WILDCARD;
pub use serializer::Serializer;
pub use token::{Token, Tokenizer};
pub use tree::{NodeRef, Tree};
