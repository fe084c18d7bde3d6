//! In-memory adapters for task storage.

mod store;

pub use store::InMemoryTaskStore;
