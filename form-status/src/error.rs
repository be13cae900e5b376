use form_status_types::{NodePath, TreeError};

use crate::operator::UnknownOperator;

/// Error type for reading and evaluating section conditions.
#[derive(Debug, thiserror::Error)]
pub enum ConditionError {
    #[error("{operator} in {path}")]
    UnknownOperator {
        path: NodePath,
        #[source]
        operator: UnknownOperator,
    },

    #[error("Conditional {0} has no comparator")]
    MissingComparator(NodePath),

    #[error("{0} is not a conditional or conditional group")]
    NotACondition(NodePath),

    #[error(transparent)]
    Tree(#[from] TreeError),
}

impl ConditionError {
    /// Check if the error fails the whole Form pass.
    ///
    /// Only an unknown operator does. Any other unreadable condition is logged
    /// and its section applies.
    pub fn fails_the_pass(&self) -> bool {
        matches!(self, Self::UnknownOperator { .. })
    }
}

/// Error type for loading a `StatusConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid status configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
