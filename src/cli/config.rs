use clap::{Parser, Subcommand};

use crate::config::options::{VisualEditOptions, load_options};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "visual-edit",
    version,
    about = "Source-location tagging and overlay runtime for in-browser visual editing"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to options file (default: visual-edit.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stamp source-location attributes onto a markup tree (JSON)
    Tag {
        /// Markup tree JSON produced by the parser
        #[arg(long)]
        input: String,

        /// Source path the tree was parsed from, e.g. src/App.tsx
        #[arg(long)]
        path: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Exclusion regex; repeat to replace the configured list
        #[arg(long)]
        exclude: Vec<String>,

        /// Source root directory name
        #[arg(long)]
        source_root: Option<String>,
    },

    /// Inject the overlay runtime bootstrap into an HTML document
    Inject {
        /// HTML document to rewrite
        #[arg(long)]
        html: String,

        /// Build mode: development or production
        #[arg(long, default_value = "development")]
        mode: String,

        /// Build command: serve or build
        #[arg(long, default_value = "build")]
        command: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Print the resolved runtime configuration as JSON
    Config,

    /// Replay scripted overlay sessions against a static page
    Replay {
        /// Script file (YAML/JSON) or directory of scripts
        #[arg(long)]
        script: String,

        /// Append engine transitions to this JSON-lines file
        #[arg(long)]
        trace: Option<String>,
    },
}

// ============================================================================
// Option Resolution (file + CLI overrides)
// ============================================================================

/// Load the options file and apply subcommand overrides on top.
pub fn resolve_options(cli: &Cli) -> VisualEditOptions {
    let mut options = load_options(cli.config.as_deref());

    if let Commands::Tag {
        exclude,
        source_root,
        ..
    } = &cli.command
    {
        if !exclude.is_empty() {
            options.exclude = exclude.clone();
        }
        if let Some(root) = source_root {
            options.source_root = root.clone();
        }
    }

    options
}
