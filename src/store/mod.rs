// Process-local storage backend

pub mod memory;

pub use memory::InMemoryStore;
