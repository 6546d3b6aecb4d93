//! CLI argument parsing for braid.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "braid",
    about = "Draw commit graphs in the terminal",
    version = env!("GIT_DESCRIBE"),
    after_help = "Logs are written to: ~/.local/share/braid/logs/braid.log"
)]
pub struct Cli {
    /// Config file (default: ~/.config/braid/config.yaml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Draw the graph in a JSON-lines commit file
    Show {
        /// Commit file, or '-' for stdin
        file: PathBuf,

        /// Start from these commits (default: commits that are nobody's parent)
        #[arg(long = "head", value_name = "ID")]
        heads: Vec<String>,

        #[command(flatten)]
        flags: LayoutFlags,
    },

    /// Draw the history of a git repository
    Git {
        /// Repository directory
        #[arg(short, long, default_value = ".")]
        repo: PathBuf,

        /// Limit the number of commits read
        #[arg(short = 'n', long)]
        max_count: Option<usize>,

        /// Revisions to start from (default: HEAD)
        revs: Vec<String>,

        #[command(flatten)]
        flags: LayoutFlags,
    },

    /// Print computed rows and columns as JSON
    Coords {
        /// Commit file, or '-' for stdin
        file: PathBuf,

        /// Start from these commits (default: commits that are nobody's parent)
        #[arg(long = "head", value_name = "ID")]
        heads: Vec<String>,

        #[command(flatten)]
        flags: LayoutFlags,
    },
}

#[derive(Args, Debug, Clone, Copy)]
pub struct LayoutFlags {
    /// Interleave sibling branches instead of walking them one at a time
    #[arg(long)]
    pub mingle: bool,

    /// Process heads in reverse order
    #[arg(long)]
    pub flip: bool,

    /// Mirror the graph horizontally
    #[arg(long)]
    pub hflip: bool,

    /// Print the graph bottom-up
    #[arg(long)]
    pub vflip: bool,
}
