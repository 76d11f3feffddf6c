//! Format command implementation

use std::io::Write;

use anyhow::Result;

use super::LoadArgs;

/// Arguments for the format command
#[derive(Debug)]
pub struct FormatArgs {
    pub load: LoadArgs,
    /// Spaces per nesting level; overrides the config file
    pub indent: Option<usize>,
    pub no_declaration: bool,
}

/// Execute the format command
pub fn execute(args: FormatArgs) -> Result<()> {
    let mut config = args.load.config()?;
    if let Some(width) = args.indent {
        config.save.indent = Some(" ".repeat(width));
    }
    if args.no_declaration {
        config.save.declaration = false;
    }

    let doc = args.load.load(&config)?;
    let mut stdout = std::io::stdout().lock();
    doc.save_writer(&mut stdout)?;
    if doc.indent.is_none() {
        writeln!(stdout)?;
    }
    Ok(())
}
