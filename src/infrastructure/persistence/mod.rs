//! Mapping store implementations.
//!
//! - [`SqliteMappingStore`] - Production store over SQLx + SQLite
//! - [`InMemoryMappingStore`] - Reference store backed by `DashMap`, used by tests
//! - [`open_pool`] - Pool construction and migrations

pub mod memory_mapping_store;
pub mod sqlite_mapping_store;
pub mod sqlite_pool;

pub use memory_mapping_store::InMemoryMappingStore;
pub use sqlite_mapping_store::SqliteMappingStore;
pub use sqlite_pool::open_pool;
