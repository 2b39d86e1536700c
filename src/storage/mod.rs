//! Durable store implementations

pub mod file;
pub mod in_memory;

pub use file::FileStore;
pub use in_memory::InMemoryStore;
