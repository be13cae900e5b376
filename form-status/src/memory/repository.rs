use std::rc::Rc;

use form_status_types::{
    CommitContext, CommitError, CommitInfo, Editor, EditorProvider, NodePath, NodeStore, ReadSession,
    TreeError,
};
use tracing::{debug, trace, warn};

use super::tree::MemoryTree;

/// One child-level difference between two trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildChange {
    Added(String),
    Changed(String),
    Deleted(String),
}

/// The differences between the children of `path` in `before` and `after`.
///
/// Added and changed children come in `after` order, deleted ones last in
/// `before` order.
pub fn child_changes(before: &MemoryTree, after: &MemoryTree, path: &NodePath) -> Vec<ChildChange> {
    let old = before.child_names(path).unwrap_or_default();
    let new = after.child_names(path).unwrap_or_default();

    let mut changes = Vec::new();
    for name in &new {
        if !old.contains(name) {
            changes.push(ChildChange::Added(name.clone()));
        } else if !after.subtree_eq(before, &path.child(name)) {
            changes.push(ChildChange::Changed(name.clone()));
        }
    }
    for name in old {
        if !new.contains(&name) {
            changes.push(ChildChange::Deleted(name));
        }
    }
    changes
}

/// Drive one provider's editor over the differences between two trees.
///
/// `after` is the in-flight tree; whatever the editors write lands there.
pub fn process_commit(
    provider: &dyn EditorProvider,
    before: &MemoryTree,
    after: &mut MemoryTree,
    session: Rc<dyn ReadSession>,
    info: &CommitInfo,
) -> Result<(), CommitError> {
    let Some(mut editor) = provider.editor(before, &*after, session, info) else {
        trace!(session = %info.session_id, "Provider not interested in commit");
        return Ok(());
    };
    walk(&mut *editor, &NodePath::root(), before, after, info)
}

fn walk(
    editor: &mut dyn Editor,
    path: &NodePath,
    before: &MemoryTree,
    after: &mut MemoryTree,
    info: &CommitInfo,
) -> Result<(), CommitError> {
    let changes = child_changes(before, after, path);
    editor.enter(&mut CommitContext {
        before,
        builder: &mut *after,
        info,
    })?;

    for change in changes {
        let mut cx = CommitContext {
            before,
            builder: &mut *after,
            info,
        };
        let (name, child) = match &change {
            ChildChange::Added(name) => (name, editor.child_added(name, &mut cx)?),
            ChildChange::Changed(name) => (name, editor.child_changed(name, &mut cx)?),
            ChildChange::Deleted(name) => (name, editor.child_deleted(name, &mut cx)?),
        };
        match (child, &change) {
            // Deleted subtrees have nothing left to walk.
            (Some(_), ChildChange::Deleted(_)) | (None, _) => {}
            (Some(mut child), _) => walk(&mut *child, &path.child(name), before, after, info)?,
        }
    }

    editor.leave(&mut CommitContext {
        before,
        builder: after,
        info,
    })
}

/// An in-memory repository running commit hooks, in the way a content
/// repository would.
///
/// ```rust
/// use form_status::memory::MemoryRepository;
/// use form_status::{CommitInfo, NodePath, NodeStore, StatusEngine, FORM_TYPE};
///
/// let mut repository = MemoryRepository::new();
/// repository.register(StatusEngine::new().editor_provider());
/// repository
///     .commit(&CommitInfo::new("admin"), |tree| {
///         tree.add_node(&NodePath::root(), "f1", FORM_TYPE)?;
///         Ok(())
///     })
///     .unwrap();
///
/// // An empty form is incomplete.
/// let flags = repository.head().status_flags(&NodePath::new("/f1"));
/// assert_eq!(flags.to_string(), "[DRAFT, INCOMPLETE]");
/// ```
pub struct MemoryRepository {
    head: MemoryTree,
    providers: Vec<Box<dyn EditorProvider>>,
    revision: u64,
}

impl Default for MemoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryRepository {
    /// An empty repository without hooks.
    pub fn new() -> Self {
        Self::with_tree(MemoryTree::new())
    }

    /// A repository starting from existing content. No hooks run on it.
    pub fn with_tree(tree: MemoryTree) -> Self {
        Self {
            head: tree,
            providers: Vec::new(),
            revision: 0,
        }
    }

    /// Register a commit hook. Hooks run in registration order.
    pub fn register(&mut self, provider: impl EditorProvider + 'static) {
        self.providers.push(Box::new(provider));
    }

    /// The current committed tree.
    pub fn head(&self) -> &MemoryTree {
        &self.head
    }

    /// Number of successful commits.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply `edit` to a copy of the head, run every hook, and make the result
    /// the new head. If the edit or any hook fails, the head stays as it was.
    pub fn commit<F>(&mut self, info: &CommitInfo, edit: F) -> Result<(), CommitError>
    where
        F: FnOnce(&mut MemoryTree) -> Result<(), TreeError>,
    {
        let mut after = self.head.clone();
        edit(&mut after)?;

        let session: Rc<dyn ReadSession> = Rc::new(self.head.clone());
        for provider in &self.providers {
            if let Err(err) = process_commit(&**provider, &self.head, &mut after, Rc::clone(&session), info) {
                warn!(session = %info.session_id, %err, "Commit rejected by hook");
                return Err(err);
            }
        }

        self.head = after;
        self.revision += 1;
        debug!(revision = self.revision, session = %info.session_id, "Committed");
        Ok(())
    }
}
