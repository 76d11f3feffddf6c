//! Info command implementation

use std::collections::BTreeMap;

use anyhow::Result;
use quarto_xml_tree::{NodeKind, Tree};

use super::LoadArgs;

/// Execute the info command
pub fn execute(args: &LoadArgs) -> Result<()> {
    let config = args.config()?;
    let doc = args.load(&config)?;

    println!("file:       {}", args.file.display());
    println!("standalone: {}", doc.standalone);
    for (kind, count) in count_kinds(doc.tree()) {
        println!("{:<11} {}", format!("{}:", kind), count);
    }
    Ok(())
}

/// Attached nodes below the root, counted per kind.
fn count_kinds(tree: &Tree) -> BTreeMap<&'static str, usize> {
    let mut counts = BTreeMap::new();
    for id in tree.descendants(tree.root()) {
        let kind = match tree.node(id).kind() {
            NodeKind::Root => continue,
            NodeKind::Element { .. } => "elements",
            NodeKind::Comment(_) => "comments",
            NodeKind::Directive(_) => "directives",
            NodeKind::ProcessingInstruction { .. } => "instructions",
        };
        *counts.entry(kind).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarto_xml_tree::Document;

    #[test]
    fn test_count_kinds() {
        let mut doc = Document::new();
        doc.load_str("<!DOCTYPE r><?pi x?><r><!-- c --><a/><b><c/></b></r>")
            .unwrap();
        let counts = count_kinds(doc.tree());
        assert_eq!(counts.get("elements"), Some(&4));
        assert_eq!(counts.get("comments"), Some(&1));
        assert_eq!(counts.get("directives"), Some(&1));
        assert_eq!(counts.get("instructions"), Some(&1));
    }

    #[test]
    fn test_empty_tree_has_no_counts() {
        assert!(count_kinds(&Tree::new()).is_empty());
    }
}
