//! Select command implementation

use std::io::Write;

use anyhow::Result;
use quarto_xml_tree::NodeRef;

use super::LoadArgs;

/// Arguments for the select command
#[derive(Debug)]
pub struct SelectArgs {
    pub load: LoadArgs,
    pub name: String,
    pub namespace: String,
    pub recursive: bool,
    pub first: bool,
}

/// Execute the select command
pub fn execute(args: SelectArgs) -> Result<()> {
    let config = args.load.config()?;
    let doc = args.load.load(&config)?;

    let matches: Vec<NodeRef<'_>> = if args.first {
        doc.select_node(&args.namespace, &args.name)
            .into_iter()
            .collect()
    } else if args.recursive {
        doc.select_nodes_recursive(&args.namespace, &args.name)
    } else {
        doc.select_nodes(&args.namespace, &args.name)
    };

    if matches.is_empty() {
        tracing::info!(namespace = %args.namespace, name = %args.name, "No matching elements");
    }

    let mut stdout = std::io::stdout().lock();
    for node in matches {
        writeln!(stdout, "{}", node)?;
    }
    Ok(())
}
