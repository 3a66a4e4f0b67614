//! Dedup store implementations.
//!
//! - `MemoryWarrantStore` - in-memory, for tests
//! - `SqliteWarrantStore` - single-file SQLite, used by the importer binary

pub mod memory;
pub mod sqlite;

pub use memory::MemoryWarrantStore;
pub use sqlite::SqliteWarrantStore;
