//! Database layer (in-memory, transactional).

pub mod memory;

pub use memory::{ActivityQueryCursor, MemoryDb, Transaction};
