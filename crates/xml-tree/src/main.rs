//! xml-tree CLI - Main entry point

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::LoadArgs;

#[derive(Parser)]
#[command(name = "xml-tree")]
#[command(version)]
#[command(about = "Format and query XML documents", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Re-serialize a document
    Format {
        #[command(flatten)]
        load: LoadArgs,

        /// Indent nested nodes by N spaces
        #[arg(long, value_name = "N")]
        indent: Option<usize>,

        /// Omit the <?xml ...?> declaration
        #[arg(long)]
        no_declaration: bool,
    },

    /// Print every element matching a name, one per line
    Select {
        #[command(flatten)]
        load: LoadArgs,

        /// Local name to match ("*" matches any)
        #[arg(long)]
        name: String,

        /// Namespace prefix to match ("*" matches any)
        #[arg(long, default_value = "")]
        namespace: String,

        /// Include matches nested inside other matches
        #[arg(long, conflicts_with = "first")]
        recursive: bool,

        /// Print only the first match
        #[arg(long)]
        first: bool,
    },

    /// Show declaration metadata and node counts
    Info {
        #[command(flatten)]
        load: LoadArgs,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "xml_tree=info,quarto_xml_tree=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Format {
            load,
            indent,
            no_declaration,
        } => commands::format::execute(commands::format::FormatArgs {
            load,
            indent,
            no_declaration,
        }),
        Commands::Select {
            load,
            name,
            namespace,
            recursive,
            first,
        } => commands::select::execute(commands::select::SelectArgs {
            load,
            name,
            namespace,
            recursive,
            first,
        }),
        Commands::Info { load } => commands::info::execute(&load),
    }
}
