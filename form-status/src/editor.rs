//! The commit hook: finds the Forms touched by a commit and recomputes them.

use std::rc::Rc;

use form_status_types::{
    CommitContext, CommitError, CommitInfo, Editor, EditorProvider, NodeKind, NodePath, NodeStore,
    ReadSession,
};
use tracing::{debug, error, trace};

use crate::engine::StatusEngine;

/// Where an editor sits relative to the Forms in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// The root of the commit.
    Root,

    /// Somewhere above any Form.
    OutsideForm,

    /// On a Form. The whole Form is recomputed here and nothing below is visited.
    AtForm,
}

impl Position {
    fn of(kind: &NodeKind) -> Self {
        if *kind == NodeKind::Form {
            Self::AtForm
        } else {
            Self::OutsideForm
        }
    }
}

struct Shared {
    engine: StatusEngine,
    session: Rc<dyn ReadSession>,
}

/// Walks a commit down to the Forms it touched.
pub struct StatusEditor {
    path: NodePath,
    position: Position,
    shared: Rc<Shared>,
}

impl StatusEditor {
    pub fn position(&self) -> Position {
        self.position
    }

    pub fn path(&self) -> &NodePath {
        &self.path
    }

    /// The editor for the root of a commit; `after` is the in-flight tree.
    fn root(engine: StatusEngine, session: Rc<dyn ReadSession>, after: &dyn NodeStore) -> Self {
        let path = NodePath::root();
        let position = match after.kind(&path) {
            Ok(NodeKind::Form) => Position::AtForm,
            _ => Position::Root,
        };
        Self {
            path,
            position,
            shared: Rc::new(Shared { engine, session }),
        }
    }

    fn descend(&self, name: &str, cx: &CommitContext<'_>) -> Option<StatusEditor> {
        if self.position == Position::AtForm {
            return None;
        }
        let path = self.path.child(name);
        let position = match cx.builder.kind(&path) {
            Ok(kind) => Position::of(&kind),
            Err(err) => {
                debug!(%path, %err, "Not descending into unreadable node");
                return None;
            }
        };
        trace!(%path, ?position, "Descending");
        Some(StatusEditor {
            path,
            position,
            shared: Rc::clone(&self.shared),
        })
    }

    fn boxed_child(&self, name: &str, cx: &CommitContext<'_>) -> Option<Box<dyn Editor>> {
        self.descend(name, cx).map(|editor| Box::new(editor) as Box<dyn Editor>)
    }
}

impl Editor for StatusEditor {
    fn enter(&mut self, cx: &mut CommitContext<'_>) -> Result<(), CommitError> {
        if self.position != Position::AtForm {
            return Ok(());
        }
        let Shared { engine, session } = &*self.shared;
        // A failed pass leaves the stored flags as they were and never fails the commit.
        if let Err(err) = engine.recompute_form(&mut *cx.builder, Some(cx.before), &**session, &self.path) {
            error!(form = %self.path, session = %cx.info.session_id, %err, "Could not recompute form status");
        }
        Ok(())
    }

    fn child_added(
        &mut self,
        name: &str,
        cx: &mut CommitContext<'_>,
    ) -> Result<Option<Box<dyn Editor>>, CommitError> {
        Ok(self.boxed_child(name, cx))
    }

    fn child_changed(
        &mut self,
        name: &str,
        cx: &mut CommitContext<'_>,
    ) -> Result<Option<Box<dyn Editor>>, CommitError> {
        Ok(self.boxed_child(name, cx))
    }
}

/// Registers the status engine as a commit hook.
#[derive(Debug, Clone)]
pub struct StatusEditorProvider {
    engine: StatusEngine,
}

impl StatusEditorProvider {
    pub fn new(engine: StatusEngine) -> Self {
        Self { engine }
    }
}

impl EditorProvider for StatusEditorProvider {
    fn editor(
        &self,
        _before: &dyn NodeStore,
        after: &dyn NodeStore,
        session: Rc<dyn ReadSession>,
        info: &CommitInfo,
    ) -> Option<Box<dyn Editor>> {
        if !self.engine.config().enabled {
            return None;
        }
        let editor = StatusEditor::root(self.engine.clone(), session, after);
        trace!(session = %info.session_id, position = ?editor.position, "Status editor created");
        Some(Box::new(editor))
    }
}
