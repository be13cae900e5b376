use std::rc::Rc;

use crate::{ChangeSet, CommitError, NodeStore, ReadSession};

/// Metadata about the commit being processed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitInfo {
    /// Identifies the session that issued the commit.
    pub session_id: String,

    /// The user on whose behalf the commit is made, if known.
    pub user_id: Option<String>,
}

impl CommitInfo {
    /// Create commit metadata for the given session.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            user_id: None,
        }
    }

    /// Set the user.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }
}

/// What an editor gets to see and touch during one callback.
pub struct CommitContext<'a> {
    /// The tree as it was before the commit.
    pub before: &'a dyn NodeStore,

    /// The in-flight tree; writes made here become part of the commit.
    pub builder: &'a mut dyn ChangeSet,

    pub info: &'a CommitInfo,
}

/// Callbacks invoked by the host while it walks the changes of a commit.
///
/// The host calls `enter` on arrival at a node, then one child callback per
/// added, changed or deleted child, then `leave`. A child callback returning
/// an editor makes the host descend into that child with it; `None` stops the
/// descent there.
pub trait Editor {
    fn enter(&mut self, _cx: &mut CommitContext<'_>) -> Result<(), CommitError> {
        Ok(())
    }

    fn child_added(
        &mut self,
        name: &str,
        cx: &mut CommitContext<'_>,
    ) -> Result<Option<Box<dyn Editor>>, CommitError>;

    fn child_changed(
        &mut self,
        name: &str,
        cx: &mut CommitContext<'_>,
    ) -> Result<Option<Box<dyn Editor>>, CommitError>;

    fn child_deleted(
        &mut self,
        _name: &str,
        _cx: &mut CommitContext<'_>,
    ) -> Result<Option<Box<dyn Editor>>, CommitError> {
        Ok(None)
    }

    fn leave(&mut self, _cx: &mut CommitContext<'_>) -> Result<(), CommitError> {
        Ok(())
    }
}

/// A commit hook registered with the host.
///
/// Called once per commit. Returning `None` means the provider has no
/// interest in this commit.
pub trait EditorProvider {
    fn editor(
        &self,
        before: &dyn NodeStore,
        after: &dyn NodeStore,
        session: Rc<dyn ReadSession>,
        info: &CommitInfo,
    ) -> Option<Box<dyn Editor>>;
}
