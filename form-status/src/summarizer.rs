//! The bottom-up form pass: validate answers, then aggregate flags upwards.

use std::collections::{BTreeMap, HashMap};

use form_status_types::{
    AsNodeStore, ChangeSet, NodeKind, NodePath, NodeStore, ReadSession, STATUS_FLAGS, StatusFlag, StatusFlags,
    TreeError,
};
use tracing::{debug, trace, warn};

use crate::ConditionError;
use crate::condition::Condition;
use crate::config::OperandMatching;
use crate::metadata::{FormIndex, FormResolver, QuestionnaireLookup};
use crate::validator::{AnswerNode, QuestionNode, ValidatorRegistry};

/// The flags computed by one form pass, not yet written anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormStatus {
    pub form: NodePath,
    pub flags: BTreeMap<NodePath, StatusFlags>,
}

impl FormStatus {
    /// The flags computed for the Form itself.
    pub fn form_flags(&self) -> StatusFlags {
        self.flags.get(&self.form).cloned().unwrap_or_default()
    }

    /// Write every computed set that differs from what is stored.
    ///
    /// Returns the number of nodes written.
    pub fn write(&self, builder: &mut dyn ChangeSet) -> Result<usize, TreeError> {
        let mut written = 0;
        for (path, flags) in &self.flags {
            if stored_flags(builder.as_node_store(), path)? != *flags {
                builder.set_property(path, STATUS_FLAGS, flags.to_property())?;
                written += 1;
            }
        }
        Ok(written)
    }
}

fn stored_flags(store: &dyn NodeStore, path: &NodePath) -> Result<StatusFlags, TreeError> {
    Ok(store
        .property(path, STATUS_FLAGS)?
        .map(|p| StatusFlags::from_property(&p))
        .unwrap_or_default())
}

/// One pass over one Form.
///
/// Answers are validated first, then every AnswerSection is summarized
/// bottom-up, then the Form itself. Nothing is written to the tree; the result
/// is a `FormStatus` the caller writes once the whole pass succeeded.
pub struct Summarizer<'a> {
    form_store: &'a dyn NodeStore,
    before: Option<&'a dyn NodeStore>,
    lookup: QuestionnaireLookup<'a>,
    validators: &'a ValidatorRegistry,
    matching: OperandMatching,
    form: NodePath,
    index: FormIndex,
    /// Parsed conditions by Section path; `None` for unconditional sections.
    conditions: HashMap<NodePath, Option<Condition>>,
    staged: BTreeMap<NodePath, StatusFlags>,
}

impl<'a> Summarizer<'a> {
    pub fn new(
        form_store: &'a dyn NodeStore,
        session: &'a dyn ReadSession,
        validators: &'a ValidatorRegistry,
        matching: OperandMatching,
        form: &NodePath,
    ) -> Self {
        Self {
            form_store,
            before: None,
            lookup: QuestionnaireLookup::new(session),
            validators,
            matching,
            form: form.clone(),
            index: FormIndex::build(form_store, form),
            conditions: HashMap::new(),
            staged: BTreeMap::new(),
        }
    }

    /// The tree as it was before the commit, used to tell new answers apart.
    pub fn with_before(mut self, before: &'a dyn NodeStore) -> Self {
        self.before = Some(before);
        self
    }

    /// Run the whole pass.
    pub fn run(mut self) -> Result<FormStatus, ConditionError> {
        let form = self.form.clone();
        debug!(%form, "Recomputing form status");
        self.visit(&form)?;
        self.summarize(&form)?;
        Ok(FormStatus {
            form,
            flags: self.staged,
        })
    }

    /// Post-order walk below `parent`.
    fn visit(&mut self, parent: &NodePath) -> Result<(), ConditionError> {
        for name in self.form_store.child_names(parent)? {
            let child = parent.child(&name);
            match self.form_store.kind(&child) {
                Ok(NodeKind::Answer) => self.validate_answer(&child),
                Ok(NodeKind::AnswerSection) => {
                    self.visit(&child)?;
                    self.summarize(&child)?;
                }
                Ok(_) => {}
                Err(err) => warn!(node = %child, %err, "Could not read node kind"),
            }
        }
        Ok(())
    }

    /// Run the validators over one Answer and stage the result.
    pub fn validate_answer(&mut self, answer: &NodePath) {
        let Some(question) = self.lookup.question_for_answer(self.form_store, answer) else {
            debug!(%answer, "Question not found, keeping stored flags");
            return;
        };
        let is_new = self.before.is_some_and(|before| !before.exists(answer));
        let stored = self.flags_of(answer);
        let flags = self.validators.run(
            &AnswerNode {
                path: answer,
                store: self.form_store,
            },
            &QuestionNode {
                path: &question,
                session: self.lookup.session(),
            },
            is_new,
            &stored,
        );
        trace!(%answer, %flags, "Validated answer");
        self.staged.insert(answer.clone(), flags);
    }

    /// Aggregate the flags of a Form's or AnswerSection's children and stage them.
    pub fn summarize(&mut self, node: &NodePath) -> Result<StatusFlags, ConditionError> {
        let children = self.form_store.child_names(node)?;
        let mut invalid = false;
        let mut incomplete = false;

        for name in &children {
            let child = node.child(name);
            let kind = match self.form_store.kind(&child) {
                Ok(kind) => kind,
                Err(err) => {
                    warn!(node = %child, %err, "Could not read node kind");
                    continue;
                }
            };
            // Stray flags on other nodes never count.
            if !kind.carries_status() {
                continue;
            }
            if kind == NodeKind::AnswerSection && !self.is_applicable(&child)? {
                trace!(section = %child, "Section not applicable, skipped");
                continue;
            }
            let flags = self.flags_of(&child);
            invalid |= flags.contains(StatusFlag::Invalid);
            incomplete |= flags.contains(StatusFlag::Incomplete);
        }

        if children.is_empty() && matches!(self.form_store.kind(node), Ok(NodeKind::Form)) {
            incomplete = true;
        }

        let mut flags = StatusFlags::new();
        if invalid {
            flags.insert(StatusFlag::Invalid);
        }
        if incomplete {
            flags.insert(StatusFlag::Incomplete);
        }
        if invalid || incomplete {
            flags.insert(StatusFlag::Draft);
        }
        self.staged.insert(node.clone(), flags.clone());
        Ok(flags)
    }

    /// Decide whether an AnswerSection applies, from its Section's condition.
    ///
    /// Sections that can't be resolved, or have no condition, apply.
    pub fn is_applicable(&mut self, answer_section: &NodePath) -> Result<bool, ConditionError> {
        let Some(section) = self.lookup.section_for(self.form_store, answer_section) else {
            warn!(%answer_section, "Section not found, treating it as applicable");
            return Ok(true);
        };
        if !self.conditions.contains_key(&section) {
            let condition = self.parse_condition(&section)?;
            self.conditions.insert(section.clone(), condition);
        }
        let Some(Some(condition)) = self.conditions.get(&section) else {
            return Ok(true);
        };

        let mut resolver = FormResolver {
            lookup: self.lookup,
            form: self.form_store,
            questionnaire: self.lookup.questionnaire_of(&section),
            index: &mut self.index,
        };
        let applicable = condition.evaluate(&mut resolver, self.matching);
        trace!(%answer_section, applicable, "Evaluated section condition");
        Ok(applicable)
    }

    fn parse_condition(&self, section: &NodePath) -> Result<Option<Condition>, ConditionError> {
        let session = self.lookup.session().as_node_store();
        let path = match Condition::find_in_section(session, section) {
            Ok(Some(path)) => path,
            Ok(None) => return Ok(None),
            Err(err) => {
                warn!(%section, %err, "Could not look for a section condition");
                return Ok(None);
            }
        };
        match Condition::parse(session, &path) {
            Ok(condition) => Ok(Some(condition)),
            Err(err) if err.fails_the_pass() => Err(err),
            Err(err) => {
                warn!(condition = %path, %err, "Could not read section condition");
                Ok(None)
            }
        }
    }

    /// The staged flags of a node, or its stored ones if the pass hasn't reached it.
    fn flags_of(&self, node: &NodePath) -> StatusFlags {
        if let Some(flags) = self.staged.get(node) {
            return flags.clone();
        }
        stored_flags(self.form_store, node).unwrap_or_else(|err| {
            warn!(%node, %err, "Could not read stored flags");
            StatusFlags::new()
        })
    }
}
