//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Build attribute-table API docs for Python projects and scaffold bots
#[derive(Parser, Debug)]
#[command(name = "cogwright")]
#[command(about = "Build attribute-table API docs for Python projects and scaffold bots")]
#[command(version)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the HTML documentation
    Build {
        /// Config file path
        #[arg(short, long, default_value = "cogwright.toml")]
        config: PathBuf,

        /// Root of the Python sources
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Directory holding the documentation pages
        #[arg(short, long)]
        docs: Option<PathBuf>,

        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Glob patterns to exclude (can be repeated)
        #[arg(long)]
        exclude: Vec<String>,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Create a command bot project quickly
    Newbot {
        /// The bot project name
        name: String,

        /// The directory to place it in (default: .)
        directory: Option<String>,

        /// The bot prefix
        #[arg(long, default_value = "$", value_name = "PREFIX")]
        prefix: String,

        /// Use AutoShardedBot
        #[arg(long)]
        sharded: bool,

        /// Do not create a .gitignore file
        #[arg(long)]
        no_git: bool,
    },

    /// Create a new cog template quickly
    Newcog {
        /// The cog name
        name: String,

        /// The directory to place it in
        #[arg(default_value = "cogs")]
        directory: String,

        /// The class name of the cog (default: <name>)
        #[arg(long)]
        class_name: Option<String>,

        /// The cog name shown in help
        #[arg(long)]
        display_name: Option<String>,

        /// Hide all commands in the cog
        #[arg(long)]
        hide_commands: bool,

        /// Include the special cog methods
        #[arg(long)]
        full: bool,
    },

    /// Show version information
    Version,
}
