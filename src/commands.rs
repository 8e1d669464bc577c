//! Command handlers for muisti CLI.

use std::process::ExitCode;

use muisti::{Error, MemoryStore};

use crate::output::*;

/// Commands supported by muisti CLI.
#[derive(clap::Subcommand)]
pub enum Commands {
    Add {
        /// Memory text content
        text: String,

        /// Tag to attach (repeatable)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,

        /// Optional JSON object metadata
        #[arg(short = 'm', long)]
        metadata: Option<String>,
    },
    Search {
        /// Search query text
        query: String,

        /// Maximum number of results (default: 5)
        #[arg(short = 'l', long, default_value = "5")]
        limit: usize,

        /// Only consider memories carrying this tag (repeatable, OR)
        #[arg(short = 't', long = "tag")]
        tags: Vec<String>,
    },
    List,
    Delete {
        /// Memory id
        id: i64,
    },
    Clear {
        /// Confirm removal of all memories
        #[arg(long)]
        yes: bool,
    },
    Stats,
    Version,
}

/// Execute a CLI command.
pub fn execute(command: &Commands, store: &MemoryStore, json: bool) -> Result<ExitCode, Error> {
    match command {
        Commands::Add {
            text,
            tags,
            metadata,
        } => handle_add(store, text, tags, metadata.as_deref(), json),
        Commands::Search { query, limit, tags } => handle_search(store, query, *limit, tags, json),
        Commands::List => handle_list(store, json),
        Commands::Delete { id } => handle_delete(store, *id, json),
        Commands::Clear { yes } => handle_clear(store, *yes, json),
        Commands::Stats => handle_stats(store, json),
        Commands::Version => handle_version(json),
    }
}

fn handle_add(
    store: &MemoryStore,
    text: &str,
    tags: &[String],
    metadata: Option<&str>,
    json: bool,
) -> Result<ExitCode, Error> {
    let metadata_value = metadata
        .map(serde_json::from_str::<serde_json::Value>)
        .transpose()
        .map_err(|e| Error::InvalidInput(format!("Metadata is not valid JSON: {}", e)))?;

    let tags = (!tags.is_empty()).then_some(tags);
    let id = store.add(text, tags, metadata_value.as_ref())?;

    if json {
        print_json(&AddResponse {
            status: "added".to_string(),
            id,
        });
    } else {
        println!("Added memory: {}", id);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_search(
    store: &MemoryStore,
    query: &str,
    limit: usize,
    tags: &[String],
    json: bool,
) -> Result<ExitCode, Error> {
    let tags = (!tags.is_empty()).then_some(tags);
    let results = store.search(query, limit, tags)?;

    if json {
        let results: Vec<SearchResultItem> = results
            .into_iter()
            .map(|r| SearchResultItem {
                id: r.id,
                content: r.content,
                similarity: r.similarity,
                created_at: r.created_at,
                tags: r.tags,
                metadata: r.metadata,
            })
            .collect();
        print_json(&SearchResponse { results });
    } else {
        for result in results {
            println!(
                "{} [score: {:.3}]\n  {}\n",
                result.id, result.similarity, result.content
            );
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_list(store: &MemoryStore, json: bool) -> Result<ExitCode, Error> {
    let records = store.list_all()?;
    if json {
        let items: Vec<ListItem> = records
            .into_iter()
            .map(|r| ListItem {
                id: r.id,
                content: r.content,
                created_at: r.created_at,
                tags: r.tags,
                metadata: r.metadata,
            })
            .collect();
        print_json(&ListResponse { memories: items });
    } else {
        for record in records {
            if record.tags.is_empty() {
                println!("{}: {}", record.id, record.content);
            } else {
                println!(
                    "{}: {} [{}]",
                    record.id,
                    record.content,
                    record.tags.join(", ")
                );
            }
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_delete(store: &MemoryStore, id: i64, json: bool) -> Result<ExitCode, Error> {
    let deleted = store.delete(id)?;
    if deleted {
        if json {
            print_json(&DeleteResponse {
                status: "deleted".to_string(),
                id,
            });
        } else {
            println!("Deleted memory: {}", id);
        }
        Ok(ExitCode::SUCCESS)
    } else {
        Err(Error::NotFound(id))
    }
}

fn handle_clear(store: &MemoryStore, yes: bool, json: bool) -> Result<ExitCode, Error> {
    if !yes {
        eprintln!("This removes every stored memory. Re-run with --yes to confirm.");
        return Ok(ExitCode::from(2));
    }

    let removed = store.clear_all()?;
    if json {
        print_json(&ClearResponse {
            status: "cleared".to_string(),
            removed,
        });
    } else {
        println!("Removed {} memories", removed);
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_stats(store: &MemoryStore, json: bool) -> Result<ExitCode, Error> {
    let stats = store.statistics()?;
    if json {
        print_json(&StatsResponse {
            total_memories: stats.total_memories,
            tag_distribution: stats.tag_distribution,
            earliest_memory: stats.earliest_memory,
            latest_memory: stats.latest_memory,
        });
    } else {
        println!("Total memories: {}", stats.total_memories);
        if !stats.tag_distribution.is_empty() {
            println!("Tags:");
            for (tag, count) in &stats.tag_distribution {
                println!("  {}: {}", tag, count);
            }
        }
        match (&stats.earliest_memory, &stats.latest_memory) {
            (Some(earliest), Some(latest)) => {
                println!("Earliest: {}", earliest);
                println!("Latest: {}", latest);
            }
            _ => println!("Store is empty"),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn handle_version(json: bool) -> Result<ExitCode, Error> {
    if json {
        print_json(&serde_json::json!({
            "version": env!("CARGO_PKG_VERSION"),
            "name": env!("CARGO_PKG_NAME")
        }));
    } else {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
    }
    Ok(ExitCode::SUCCESS)
}
