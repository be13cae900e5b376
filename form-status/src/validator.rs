//! The answer validator pipeline.

use std::fmt;

use form_status_types::{
    NodePath, NodeStore, PropertyValue, ReadSession, StatusFlagMap, StatusFlags, TreeError, props,
};

/// An Answer being validated, read from the in-flight tree.
#[derive(Clone, Copy)]
pub struct AnswerNode<'a> {
    pub path: &'a NodePath,
    pub store: &'a dyn NodeStore,
}

impl AnswerNode<'_> {
    /// The stored values; an absent `value` property means no values.
    pub fn values(&self) -> Result<Vec<PropertyValue>, TreeError> {
        Ok(self
            .store
            .property(self.path, props::VALUE)?
            .map(|p| p.values().to_vec())
            .unwrap_or_default())
    }

    /// How many values the answer holds.
    pub fn value_count(&self) -> Result<usize, TreeError> {
        Ok(self
            .store
            .property(self.path, props::VALUE)?
            .map_or(0, |p| p.len()))
    }
}

/// The Question an Answer refers to, read from the metadata session.
#[derive(Clone, Copy)]
pub struct QuestionNode<'a> {
    pub path: &'a NodePath,
    pub session: &'a dyn ReadSession,
}

impl QuestionNode<'_> {
    /// The `minAnswers`/`maxAnswers` bounds, missing ones as 0.
    pub fn answer_bounds(&self) -> Result<AnswerBounds, TreeError> {
        let bound = |name: &str| -> Result<usize, TreeError> {
            let value = self.session.long_property(self.path, name)?.unwrap_or(0);
            Ok(usize::try_from(value).unwrap_or(0))
        };
        Ok(AnswerBounds {
            min: bound(props::MIN_ANSWERS)?,
            max: bound(props::MAX_ANSWERS)?,
        })
    }

    /// The declared `dataType`, if any.
    pub fn data_type(&self) -> Result<Option<String>, TreeError> {
        self.session.string_property(self.path, props::DATA_TYPE)
    }
}

/// How many values an answer may hold. A bound of 0 means no bound on that side.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnswerBounds {
    pub min: usize,
    pub max: usize,
}

impl AnswerBounds {
    pub fn contains(&self, count: usize) -> bool {
        (self.min == 0 || count >= self.min) && (self.max == 0 || count <= self.max)
    }
}

/// A rule that inspects one answer and raises or clears status flags.
///
/// `flags` starts out with every stored flag of the answer mapped to `false`.
/// Once all validators ran, the answer keeps exactly the flags mapped to `true`.
pub trait AnswerValidator {
    /// Validators with a higher priority run first.
    fn priority(&self) -> i32;

    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    fn validate(
        &self,
        answer: &AnswerNode<'_>,
        question: &QuestionNode<'_>,
        is_new: bool,
        flags: &mut StatusFlagMap,
    );
}

/// The registered validators, kept in descending priority order.
#[derive(Default)]
pub struct ValidatorRegistry {
    validators: Vec<Box<dyn AnswerValidator>>,
}

impl ValidatorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a validator. Validators of equal priority keep their registration order.
    pub fn register(&mut self, validator: Box<dyn AnswerValidator>) {
        self.validators.push(validator);
        self.validators.sort_by_key(|v| std::cmp::Reverse(v.priority()));
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn AnswerValidator> {
        self.validators.iter().map(|v| v.as_ref())
    }

    /// Run every validator over an answer, starting from its stored flags.
    pub fn run(
        &self,
        answer: &AnswerNode<'_>,
        question: &QuestionNode<'_>,
        is_new: bool,
        stored: &StatusFlags,
    ) -> StatusFlags {
        let mut flags = StatusFlagMap::from_stored(stored);
        for validator in self.iter() {
            validator.validate(answer, question, is_new, &mut flags);
        }
        flags.into_flags()
    }
}

impl fmt::Debug for ValidatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|v| (v.name(), v.priority())))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTree;
    use form_status_types::{ANSWER_TYPE, QUESTION_TYPE, StatusFlag};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recording {
        priority: i32,
        raises: Option<StatusFlag>,
        log: Rc<RefCell<Vec<i32>>>,
    }

    impl AnswerValidator for Recording {
        fn priority(&self) -> i32 {
            self.priority
        }

        fn validate(&self, _: &AnswerNode<'_>, _: &QuestionNode<'_>, _: bool, flags: &mut StatusFlagMap) {
            self.log.borrow_mut().push(self.priority);
            if let Some(flag) = self.raises {
                flags.raise(flag);
            }
        }
    }

    #[test]
    fn bounds_ignore_zero() {
        assert!(AnswerBounds { min: 0, max: 0 }.contains(7));
        assert!(AnswerBounds { min: 1, max: 0 }.contains(7));
        assert!(!AnswerBounds { min: 1, max: 0 }.contains(0));
        assert!(!AnswerBounds { min: 0, max: 2 }.contains(3));
        assert!(AnswerBounds { min: 1, max: 1 }.contains(1));
    }

    #[test]
    fn registry_runs_by_descending_priority() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut registry = ValidatorRegistry::new();
        for (priority, raises) in [(10, None), (100, Some(StatusFlag::Invalid)), (50, None)] {
            registry.register(Box::new(Recording {
                priority,
                raises,
                log: Rc::clone(&log),
            }));
        }
        assert!(registry.iter().all(|v| v.name().ends_with("Recording")));

        let mut tree = MemoryTree::new();
        let q = tree.add_node(&NodePath::root(), "q", QUESTION_TYPE).unwrap();
        let a = tree.add_node(&NodePath::root(), "a", ANSWER_TYPE).unwrap();
        let answer = AnswerNode { path: &a, store: &tree };
        let question = QuestionNode { path: &q, session: &tree };

        let stored: StatusFlags = ["INCOMPLETE", "CUSTOM"].into_iter().collect();
        let flags = registry.run(&answer, &question, false, &stored);

        assert_eq!(*log.borrow(), vec![100, 50, 10]);
        // Stored flags nobody re-raised are dropped.
        assert_eq!(flags, ["INVALID"].into_iter().collect::<StatusFlags>());
    }

    #[test]
    fn missing_bounds_are_unbounded() {
        let mut tree = MemoryTree::new();
        let q = tree.add_node(&NodePath::root(), "q", QUESTION_TYPE).unwrap();
        tree.set(&q, props::MAX_ANSWERS, PropertyValue::Long(3)).unwrap();
        let question = QuestionNode { path: &q, session: &tree };
        assert_eq!(question.answer_bounds().unwrap(), AnswerBounds { min: 0, max: 3 });
    }
}
