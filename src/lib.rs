//! muisti - A local semantic memory store for AI agents.
//!
//! Persists short text records next to embedding vectors fetched from a
//! remote provider, and serves similarity-ranked retrieval with tag
//! filtering. All operations are synchronous (no async/await required);
//! provider calls are blocking with an explicit timeout.
//!
//! # Example
//!
//! ```no_run
//! use muisti::{Config, MemoryStore};
//!
//! // Initialize memory store (credentials come from config/env)
//! let config = Config::load().expect("Failed to load config");
//! let store = MemoryStore::new(config).expect("Failed to initialize store");
//!
//! // Add a memory; the generated id is returned
//! let tags = vec!["user-preference".to_string(), "fitness".to_string()];
//! let id = store
//!     .add("User prefers chest and back training", Some(&tags), None)
//!     .expect("Failed to add memory");
//! println!("Added memory: {}", id);
//!
//! // Search memories
//! let results = store.search("what training does the user like", 5, None).unwrap();
//! for result in results {
//!     println!("{:.2}: {}", result.similarity, result.content);
//! }
//! ```

pub mod config;
pub mod errors;
pub mod memory;
pub mod memory_types;
pub mod provider;
mod sqlite;

// Re-export public API
pub use config::Config;
pub use errors::Error;
pub use memory::store::{MAX_CONTENT_LENGTH, MAX_SEARCH_LIMIT};
pub use memory::MemoryStore;
pub use memory_types::{MemoryRecord, SearchResult, StatsSummary};
pub use provider::{EmbeddingProvider, HttpEmbeddingProvider};
pub use sqlite::Error as StorageError;
