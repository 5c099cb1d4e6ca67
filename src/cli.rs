//! Command-line argument parsing
//!
//! Every subcommand works on the persisted document set in the data directory.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use twinmark::Space;

/// Dual-view markdown document tool
#[derive(Parser, Debug)]
#[command(name = "twinmark", version, about = "Dual-view markdown documents with undoable replacements")]
pub struct CliArgs {
    /// Directory holding the persisted documents (defaults to the config data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Subcommand, Debug)]
pub enum CliCommand {
    /// List documents; the active one is marked with `*`
    List,
    /// Print a document's markdown
    Show {
        /// Document id (defaults to the active document)
        #[arg(long)]
        id: Option<u64>,
    },
    /// Create a new document and make it active
    New,
    /// Rename a document
    Rename { id: u64, name: String },
    /// Delete a document
    Delete { id: u64 },
    /// Replace a range of a document with new text
    Replace {
        /// Range start, in the coordinates of --mode
        #[arg(long)]
        from: usize,
        /// Range end (exclusive)
        #[arg(long)]
        to: usize,
        /// Replacement markdown; empty deletes the range
        #[arg(long)]
        text: String,
        /// Coordinate space of the range
        #[arg(long, value_enum, default_value_t = ModeArg::Text)]
        mode: ModeArg,
        /// Document id (defaults to the active document)
        #[arg(long)]
        id: Option<u64>,
    },
    /// Print a document in canonical structured-view form
    Normalize {
        /// Document id (defaults to the active document)
        #[arg(long)]
        id: Option<u64>,
    },
    /// Write the effective configuration to the config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Character offsets into the markdown source
    Text,
    /// Positions in the structured document tree
    Structured,
}

impl From<ModeArg> for Space {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Text => Space::Text,
            ModeArg::Structured => Space::Structured,
        }
    }
}
