use crate::NodePath;

/// Error type for tree access operations.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("Node not found: {0}")]
    NodeNotFound(NodePath),

    #[error("Type mismatch for property '{name}' of {path}: expected {expected}, got {actual}")]
    TypeMismatch {
        path: NodePath,
        name: String,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("Node {path} already has a child named '{name}'")]
    DuplicateChild { path: NodePath, name: String },

    /// Store-specific failure (I/O, corrupted state, etc.)
    #[error("Store error: {0}")]
    Backend(#[from] anyhow::Error),
}

impl TreeError {
    /// Create a backend error from any error type.
    pub fn backend(err: impl Into<anyhow::Error>) -> Self {
        Self::Backend(err.into())
    }

    /// Check if this error means the node simply isn't there.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_))
    }
}

/// Error type for a commit hook. Returning one makes the host discard the whole commit.
#[derive(Debug, thiserror::Error)]
pub enum CommitError {
    /// The commit conflicted with a concurrent one and may be retried.
    #[error("Commit conflict at {0}")]
    Conflict(NodePath),

    #[error(transparent)]
    Tree(#[from] TreeError),

    /// Hook-specific failure.
    #[error("Commit hook failed: {0}")]
    Hook(#[from] anyhow::Error),
}

impl CommitError {
    /// Create a hook error from any error type.
    pub fn hook(err: impl Into<anyhow::Error>) -> Self {
        Self::Hook(err.into())
    }
}
