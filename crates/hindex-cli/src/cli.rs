use clap::{Parser, Subcommand, ValueEnum};
use hindex_core::ExportFormat;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "hindex")]
#[command(version, about = "Track your publications and their H-index from the terminal", long_about = None)]
pub struct Cli {
    /// Config file to use instead of the default location
    #[arg(long, global = true, env = "HINDEX_CONFIG")]
    pub config: Option<PathBuf>,

    /// SQLite database holding the article store
    #[arg(long, global = true, env = "HINDEX_DB")]
    pub db: Option<PathBuf>,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long, global = true)]
    pub ephemeral: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Commands {
    /// Add an article to the active collection
    Add {
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        citations: Option<u64>,
    },
    /// Remove an article by its number in `list`
    Remove { index: usize },
    /// Change an article's title or citations
    Edit {
        /// Article number as shown by `list`
        index: usize,
        #[arg(long)]
        title: Option<String>,
        /// Raw citation input; junk and negatives count as 0
        #[arg(long, allow_hyphen_values = true)]
        citations: Option<String>,
    },
    /// Remove every article from the active collection (the next command re-seeds the examples)
    Clear {
        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// List the articles in the active collection
    List {
        #[arg(long)]
        json: bool,
    },
    /// Compute the H-index of the active collection
    Compute {
        #[arg(long)]
        json: bool,
    },
    /// Create a collection and switch to it
    AddCollection {
        /// Leave out to get "Collection N"
        name: Option<String>,
    },
    /// Delete a collection
    DeleteCollection {
        name: String,
        /// Don't ask for confirmation
        #[arg(long, short)]
        yes: bool,
    },
    /// Make another collection active
    Switch { name: String },
    /// Rename a collection
    Rename { old: String, new: String },
    /// List all collections with their articles
    Collections {
        #[arg(long)]
        json: bool,
    },
    /// Print the active collection's name
    Current,
    /// Write the active collection to a file
    Export {
        /// Output file (default from config: hindex_articles.json)
        path: Option<PathBuf>,
        /// Output format; guessed from the extension when left out
        #[arg(long, value_enum)]
        format: Option<FormatArg>,
    },
    /// Show where things are stored
    Info,
    /// Serve the static site
    Serve {
        #[arg(long)]
        bind: Option<String>,
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Open the interactive terminal UI (the default)
    Tui,
    /// Show or create the config file
    Config {
        /// Write a config file with the defaults
        #[arg(long)]
        init: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Json,
    Csv,
    Md,
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Md => ExportFormat::Markdown,
        }
    }
}
