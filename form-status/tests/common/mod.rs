//! Shared setup for the integration tests.

#![allow(dead_code)]

use anyhow::Result;
use example_forms::content_tree;
use form_status::memory::{MemoryRepository, MemoryTree};
use form_status::{CommitInfo, StatusEngine, StatusFlags, TreeError};
use tracing_subscriber::EnvFilter;

/// Route engine logs through the test harness. Set `RUST_LOG` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn flags(names: &[&str]) -> StatusFlags {
    names.iter().copied().collect()
}

pub fn info() -> CommitInfo {
    CommitInfo::new("test-session").with_user("nurse")
}

/// A repository whose content was set up by `setup`, with `engine` registered.
/// The setup itself is not run through the hooks.
pub fn repository<Q>(engine: StatusEngine, setup: impl FnOnce(&mut MemoryTree) -> Result<Q>) -> (MemoryRepository, Q) {
    init_tracing();
    let mut tree = content_tree().unwrap();
    let built = setup(&mut tree).unwrap();
    let mut repository = MemoryRepository::with_tree(tree);
    repository.register(engine.editor_provider());
    (repository, built)
}

/// Commit `edit` and return what it built.
pub fn commit<T>(repository: &mut MemoryRepository, edit: impl FnOnce(&mut MemoryTree) -> Result<T>) -> T {
    let mut built = None;
    repository
        .commit(&info(), |tree| {
            built = Some(edit(tree).map_err(TreeError::backend)?);
            Ok(())
        })
        .unwrap();
    built.unwrap()
}
