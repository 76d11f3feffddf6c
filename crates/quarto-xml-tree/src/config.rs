//! Load and save options.
//!
//! Options can be built in code or read from a JSON file:
//!
//! ```json
//! {
//!   "load": { "strict": false, "extendedEntities": true, "entities": { "brand": "Quarto" } },
//!   "save": { "declaration": true, "indent": "  " }
//! }
//! ```
//!
//! Every field is optional.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::Result;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TreeConfig {
    pub load: LoadOptions,
    pub save: SaveOptions,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoadOptions {
    /// Reject stray end tags, unclosed elements, mismatched end-tag names
    /// and duplicate attributes instead of tolerating them.
    pub strict: bool,

    /// Resolve the HTML 4 entity set (`&nbsp;`, `&euro;`, ...).
    pub extended_entities: bool,

    /// Additional entity definitions; these win over the HTML 4 set.
    pub entities: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SaveOptions {
    /// Emit the `<?xml ...?>` declaration.
    pub declaration: bool,

    /// Indentation unit; `None` writes the compact form.
    pub indent: Option<String>,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            declaration: true,
            indent: None,
        }
    }
}

impl TreeConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
