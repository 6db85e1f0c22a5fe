//! Command-line interface
//!
//! Runs the search engine over a JSON dataset file for one-shot queries,
//! suggestions, and analytics inspection.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::access::{Context, Role};

/// SmartSearch CLI
#[derive(Parser)]
#[command(name = "smartsearch")]
#[command(about = "Role-aware fuzzy search over a JSON dataset", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-error output (no short flag to avoid conflicts)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// State file for history and preferences (defaults to the user cache dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub state: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a ranked search and print the scored results as JSON
    Search(SearchArgs),
    /// Print autocomplete suggestions for a partial query
    Suggest(SuggestArgs),
    /// Print aggregated search analytics
    Analytics,
}

/// Search command arguments
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Path to a JSON file holding an array of records
    #[arg(short = 'd', long)]
    pub data: PathBuf,

    /// Search terms (case-insensitive)
    #[arg(short = 'q', long)]
    pub query: String,

    /// Role to search as
    #[arg(short = 'r', long, value_enum)]
    pub role: Role,

    /// Context to search in
    #[arg(short = 'c', long, value_enum)]
    pub context: Context,

    /// Actor id, matched against ownership and assignment fields
    #[arg(long)]
    pub actor_id: Option<String>,

    /// Actor department
    #[arg(long)]
    pub department: Option<String>,

    /// Actor shop id
    #[arg(long)]
    pub shop_id: Option<String>,

    /// Maximum number of results (default 50)
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,
}

/// Suggest command arguments
#[derive(Parser, Debug)]
pub struct SuggestArgs {
    /// Path to a JSON file holding an array of records
    #[arg(short = 'd', long)]
    pub data: PathBuf,

    /// Partial query to complete
    #[arg(short = 'q', long)]
    pub query: String,

    /// Maximum number of suggestions (default 10)
    #[arg(short = 'l', long)]
    pub limit: Option<usize>,
}
