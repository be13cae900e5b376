//! Questionnaire lookups and the per-form answer index.

use std::collections::HashMap;

use form_status_types::{NodeKind, NodePath, NodeStore, PropertyValue, ReadSession, TreeError, props};
use tracing::{trace, warn};

use crate::operand::ReferenceResolver;

/// Read-only lookups into the questionnaire side of the tree.
#[derive(Clone, Copy)]
pub struct QuestionnaireLookup<'a> {
    session: &'a dyn ReadSession,
}

impl<'a> QuestionnaireLookup<'a> {
    pub fn new(session: &'a dyn ReadSession) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &'a dyn ReadSession {
        self.session
    }

    /// The Question an Answer refers to.
    pub fn question_for_answer(&self, form: &dyn NodeStore, answer: &NodePath) -> Option<NodePath> {
        self.follow(form, answer, props::QUESTION)
    }

    /// The Section an AnswerSection refers to.
    pub fn section_for(&self, form: &dyn NodeStore, answer_section: &NodePath) -> Option<NodePath> {
        self.follow(form, answer_section, props::SECTION)
    }

    /// Follow a reference property stored on a form node into the questionnaire.
    fn follow(&self, form: &dyn NodeStore, node: &NodePath, property: &str) -> Option<NodePath> {
        let resolved = form
            .reference_property(node, property)
            .and_then(|id| match id {
                Some(id) => self.session.resolve_identifier(&id),
                None => Ok(None),
            });
        match resolved {
            Ok(path) => path,
            Err(err) => {
                warn!(%node, property, %err, "Could not resolve reference");
                None
            }
        }
    }

    /// The Questionnaire a Section (or Question) belongs to.
    pub fn questionnaire_of(&self, node: &NodePath) -> Option<NodePath> {
        node.ancestors()
            .find(|ancestor| matches!(self.session.kind(ancestor), Ok(NodeKind::Questionnaire)))
    }

    /// Every Question under a Questionnaire or Section, in pre-order, with its name.
    pub fn questions(&self, parent: &NodePath) -> Vec<(String, NodePath)> {
        let mut found = Vec::new();
        if let Err(err) = collect_questions(self.session, parent, &mut found) {
            warn!(%parent, %err, "Could not list questions");
        }
        found
    }
}

fn collect_questions(
    session: &dyn ReadSession,
    parent: &NodePath,
    found: &mut Vec<(String, NodePath)>,
) -> Result<(), TreeError> {
    for name in session.child_names(parent)? {
        let child = parent.child(&name);
        match session.kind(&child)? {
            NodeKind::Question => found.push((name, child)),
            NodeKind::Section => collect_questions(session, &child, found)?,
            _ => {}
        }
    }
    Ok(())
}

/// Indexes of one form, built once per form pass.
#[derive(Debug, Default)]
pub struct FormIndex {
    /// Question identifier to the first Answer for it, in pre-order.
    answers: HashMap<String, NodePath>,

    /// Per Questionnaire: question name to question identifier. Filled lazily.
    question_ids: HashMap<NodePath, HashMap<String, String>>,
}

impl FormIndex {
    /// Index every Answer under a Form, recursing into AnswerSections.
    pub fn build(form: &dyn NodeStore, root: &NodePath) -> Self {
        let mut index = Self::default();
        index.add_answers(form, root);
        index
    }

    fn add_answers(&mut self, form: &dyn NodeStore, parent: &NodePath) {
        let children = match form.child_names(parent) {
            Ok(children) => children,
            Err(err) => {
                warn!(%parent, %err, "Could not list children while indexing answers");
                return;
            }
        };
        for name in children {
            let child = parent.child(&name);
            match form.kind(&child) {
                Ok(NodeKind::AnswerSection) => self.add_answers(form, &child),
                Ok(_) => match form.reference_property(&child, props::QUESTION) {
                    Ok(Some(question)) => {
                        self.answers.entry(question).or_insert(child);
                    }
                    Ok(None) => {}
                    Err(err) => warn!(node = %child, %err, "Unreadable question reference"),
                },
                Err(err) => warn!(node = %child, %err, "Could not read node kind"),
            }
        }
    }

    /// The first Answer given for a Question.
    pub fn answer_for(&self, question_id: &str) -> Option<&NodePath> {
        self.answers.get(question_id)
    }

    /// Look up a question identifier by simple name within a Questionnaire.
    pub fn question_id(
        &mut self,
        lookup: &QuestionnaireLookup<'_>,
        questionnaire: &NodePath,
        name: &str,
    ) -> Option<String> {
        let names = self
            .question_ids
            .entry(questionnaire.clone())
            .or_insert_with(|| {
                trace!(%questionnaire, "Indexing question names");
                let mut names = HashMap::new();
                for (question_name, path) in lookup.questions(questionnaire) {
                    match lookup.session().identifier(&path) {
                        Ok(Some(id)) => {
                            names.entry(question_name).or_insert(id);
                        }
                        Ok(None) => {}
                        Err(err) => warn!(%path, %err, "Could not read question identifier"),
                    }
                }
                names
            });
        names.get(name).cloned()
    }
}

/// Resolves reference operands against one form, for conditions of one Questionnaire.
pub struct FormResolver<'a> {
    pub lookup: QuestionnaireLookup<'a>,
    pub form: &'a dyn NodeStore,
    pub questionnaire: Option<NodePath>,
    pub index: &'a mut FormIndex,
}

impl ReferenceResolver for FormResolver<'_> {
    fn resolve_reference(&mut self, question_name: &str) -> Vec<PropertyValue> {
        let Some(questionnaire) = &self.questionnaire else {
            return Vec::new();
        };
        let Some(question_id) = self.index.question_id(&self.lookup, questionnaire, question_name) else {
            trace!(question_name, "No question with this name");
            return Vec::new();
        };
        let Some(answer) = self.index.answer_for(&question_id) else {
            return Vec::new();
        };
        match self.form.property(answer, props::VALUE) {
            Ok(Some(value)) => value.values().to_vec(),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(%answer, %err, "Could not read answer value");
                Vec::new()
            }
        }
    }
}
