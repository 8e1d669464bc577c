//! Core memory store orchestrating embedding retrieval and SQLite
//! persistence.
//!
//! Provides the public API for storing, searching, listing, and deleting
//! memories, with embeddings fetched from the configured provider.

mod crud;
mod search;

pub(crate) mod store;

pub use store::MemoryStore;

#[cfg(test)]
mod tests;
