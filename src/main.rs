//! smartsearch CLI
//!
//! One-shot search, autocomplete, and analytics over a JSON dataset file.
//! History and preferences persist in a state file between invocations.

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing::debug;

use smartsearch::access::Actor;
use smartsearch::cli::{Cli, Commands, SearchArgs, SuggestArgs};
use smartsearch::engine::{SearchOptions, SmartSearch};
use smartsearch::record::Record;
use smartsearch::storage::{FileStore, KeyValueStore, SystemClock};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity flags
    let log_level = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr) // Log to stderr to keep stdout clean
        .init();

    let store: Arc<dyn KeyValueStore> = match &cli.state {
        Some(path) => Arc::new(FileStore::open(path.clone())?),
        None => Arc::new(FileStore::open_default()?),
    };
    let mut engine = SmartSearch::new(store, Arc::new(SystemClock));

    let result = match cli.command {
        Commands::Search(args) => execute_search(&mut engine, args),
        Commands::Suggest(args) => execute_suggest(&mut engine, args),
        Commands::Analytics => execute_analytics(&engine),
    };

    match result {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(exit_code(&e));
        }
    }
}

fn load_dataset(path: &std::path::Path) -> Result<Vec<Record>> {
    let raw = fs::read_to_string(path)?;
    let json: serde_json::Value = serde_json::from_str(&raw)?;
    let records = Record::from_json_many(&json);
    if records.is_empty() {
        anyhow::bail!("{} holds no searchable objects", path.display());
    }
    debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

fn execute_search(engine: &mut SmartSearch, args: SearchArgs) -> Result<String> {
    engine.set_data(load_dataset(&args.data)?);

    let mut actor = match args.actor_id {
        Some(id) => Actor::with_id(id),
        None => Actor::anonymous(),
    };
    actor.department = args.department;
    actor.shop_id = args.shop_id;

    let mut options = SearchOptions::new(args.context, args.role).with_actor(actor);
    if let Some(limit) = args.limit {
        options = options.with_limit(limit);
    }

    let results = engine.search(&args.query, &options)?;
    Ok(serde_json::to_string_pretty(&results)?)
}

fn execute_suggest(engine: &mut SmartSearch, args: SuggestArgs) -> Result<String> {
    engine.set_data(load_dataset(&args.data)?);
    let suggestions = engine.autocomplete_suggestions(&args.query, args.limit);
    Ok(serde_json::to_string_pretty(&suggestions)?)
}

fn execute_analytics(engine: &SmartSearch) -> Result<String> {
    Ok(serde_json::to_string_pretty(&engine.search_analytics())?)
}

/// Map errors to exit codes
fn exit_code(err: &anyhow::Error) -> i32 {
    if let Some(search_err) = err.downcast_ref::<smartsearch::SearchError>() {
        match search_err.error_code() {
            "invalid_role" | "invalid_query" => 1,
            "access_denied" | "filter_rule_missing" => 3,
            "storage_error" => 4,
            _ => 5,
        }
    } else {
        5
    }
}
