//! Command implementations for the xml-tree CLI
//!
//! Every command loads one document through [`LoadArgs::load`] and then
//! reads or re-serializes it.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use quarto_xml_tree::{Document, TreeConfig};

pub mod format;
pub mod info;
pub mod select;

/// Input options shared by every command
#[derive(Debug, Args)]
pub struct LoadArgs {
    /// XML file to read
    pub file: PathBuf,

    /// JSON file with load and save options
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Resolve HTML 4 named entities such as &nbsp;
    #[arg(long)]
    pub extended_entities: bool,

    /// Reject stray end tags and unclosed elements
    #[arg(long)]
    pub strict: bool,
}

impl LoadArgs {
    /// Options from `--config`, overridden by the command-line flags.
    pub fn config(&self) -> Result<TreeConfig> {
        let mut config = match &self.config {
            Some(path) => TreeConfig::from_file(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?,
            None => TreeConfig::default(),
        };
        config.load.strict |= self.strict;
        config.load.extended_entities |= self.extended_entities;
        Ok(config)
    }

    pub fn load(&self, config: &TreeConfig) -> Result<Document> {
        let mut doc = Document::with_config(config);
        doc.load_file(&self.file)
            .with_context(|| format!("Failed to load {}", self.file.display()))?;
        tracing::info!(
            file = %self.file.display(),
            nodes = doc.tree().len(),
            "Loaded document"
        );
        Ok(doc)
    }
}
