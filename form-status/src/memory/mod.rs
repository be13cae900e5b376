//! An in-memory content repository.
//!
//! `MemoryTree` stores nodes and properties, `MemoryRepository` runs commit
//! hooks over it the way a content repository does. Together they let the
//! status engine run without an external store.

mod tree;
pub use tree::{MemoryTree, UNSTRUCTURED_TYPE};

mod json;
pub use json::LoadError;

mod repository;
pub use repository::{ChildChange, MemoryRepository, child_changes, process_commit};
