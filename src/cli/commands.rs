//! CLI command definitions using clap.
//!
//! - list: show the board grouped by status
//! - add / edit / delete: manual record management
//! - move: one lifecycle step forward or backward
//! - intake: create a tool from free text
//! - lang: show or switch the UI language
//! - serve: run the tool REST API

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use tooltrack::domain::{Direction, ToolStatus};
use tooltrack::i18n::Language;

/// Tooltrack - construction-site tool inventory
#[derive(Parser, Debug)]
#[command(name = "tooltrack")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Optional config file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// Check if verbose mode is enabled
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// Main subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show all tools grouped by status
    List,

    /// Add a tool by hand
    Add {
        /// Tool name
        #[arg(short, long)]
        name: String,

        /// Inventory or serial code
        #[arg(long)]
        code: String,

        #[arg(short, long)]
        description: Option<String>,

        /// Person or team holding the tool
        #[arg(long)]
        holder: Option<String>,

        /// Site, vehicle or warehouse
        #[arg(short, long)]
        location: Option<String>,
    },

    /// Edit fields of an existing tool
    Edit {
        /// Tool ID
        id: String,

        #[arg(short, long)]
        name: Option<String>,

        #[arg(long)]
        code: Option<String>,

        /// New description (empty string clears it)
        #[arg(short, long)]
        description: Option<String>,

        /// New holder (empty string clears it)
        #[arg(long)]
        holder: Option<String>,

        /// New location (empty string clears it)
        #[arg(short, long)]
        location: Option<String>,

        /// Set status directly (in-stock, issued, in-repair)
        #[arg(short, long)]
        status: Option<ToolStatus>,
    },

    /// Move a tool one step along its lifecycle
    Move {
        /// Tool ID
        id: String,

        /// forward or backward
        direction: Direction,
    },

    /// Delete a tool
    Delete {
        /// Tool ID
        id: String,
    },

    /// Create a tool from a free-text description
    Intake {
        /// e.g. "new hammer drill inv #H78-B, assign to Dave at the North Site"
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show or switch the UI language
    Lang {
        /// en or ru
        language: Option<Language>,
    },

    /// Run the tool REST API
    Serve {
        /// Bind host (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Bind port (overrides config)
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file (overrides config)
        #[arg(long)]
        database: Option<PathBuf>,
    },
}
