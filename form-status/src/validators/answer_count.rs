use form_status_types::{StatusFlag, StatusFlagMap};
use tracing::warn;

use crate::validator::{AnswerNode, AnswerValidator, QuestionNode};

/// Checks the number of values against the question's `minAnswers`/`maxAnswers`.
///
/// An answer outside the bounds is both `INVALID` and `INCOMPLETE`, except for a
/// freshly created, still empty answer, which is only `INCOMPLETE`.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnswerCountValidator;

impl AnswerCountValidator {
    pub const PRIORITY: i32 = 100;
}

impl AnswerValidator for AnswerCountValidator {
    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn name(&self) -> &str {
        "answer count"
    }

    fn validate(
        &self,
        answer: &AnswerNode<'_>,
        question: &QuestionNode<'_>,
        is_new: bool,
        flags: &mut StatusFlagMap,
    ) {
        let (bounds, count) = match (question.answer_bounds(), answer.value_count()) {
            (Ok(bounds), Ok(count)) => (bounds, count),
            (Err(err), _) | (_, Err(err)) => {
                warn!(answer = %answer.path, %err, "Could not count answer values");
                return;
            }
        };

        if bounds.contains(count) {
            flags.set(StatusFlag::Invalid, false);
            flags.set(StatusFlag::Incomplete, false);
        } else if is_new && count == 0 {
            flags.set(StatusFlag::Invalid, false);
            flags.raise(StatusFlag::Incomplete);
        } else {
            flags.raise(StatusFlag::Invalid);
            flags.raise(StatusFlag::Incomplete);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryTree;
    use form_status_types::{
        ANSWER_TYPE, NodePath, Property, PropertyValue, QUESTION_TYPE, StatusFlags, props,
    };

    fn run(min: i64, max: i64, values: &[&str], is_new: bool) -> StatusFlags {
        let mut tree = MemoryTree::new();
        let q = tree.add_node(&NodePath::root(), "q", QUESTION_TYPE).unwrap();
        tree.set(&q, props::MIN_ANSWERS, PropertyValue::Long(min)).unwrap();
        tree.set(&q, props::MAX_ANSWERS, PropertyValue::Long(max)).unwrap();
        let a = tree.add_node(&NodePath::root(), "a", ANSWER_TYPE).unwrap();
        if !values.is_empty() {
            tree.set(&a, props::VALUE, Property::strings(values.iter().copied())).unwrap();
        }

        let mut flags = StatusFlagMap::new();
        AnswerCountValidator.validate(
            &AnswerNode { path: &a, store: &tree },
            &QuestionNode { path: &q, session: &tree },
            is_new,
            &mut flags,
        );
        flags.into_flags()
    }

    fn flags(names: &[&str]) -> StatusFlags {
        names.iter().copied().collect()
    }

    #[test]
    fn missing_required_value_is_invalid_and_incomplete() {
        assert_eq!(run(1, 1, &[], false), flags(&["INCOMPLETE", "INVALID"]));
    }

    #[test]
    fn new_empty_answer_is_only_incomplete() {
        assert_eq!(run(1, 1, &[], true), flags(&["INCOMPLETE"]));
    }

    #[test]
    fn new_answer_with_too_many_values_is_invalid() {
        assert_eq!(run(1, 1, &["a", "b"], true), flags(&["INCOMPLETE", "INVALID"]));
    }

    #[test]
    fn in_range_clears_both() {
        assert_eq!(run(1, 1, &["a"], false), flags(&[]));
        assert_eq!(run(0, 0, &[], false), flags(&[]));
        assert_eq!(run(1, 0, &["a", "b", "c"], false), flags(&[]));
    }

    #[test]
    fn too_many_values() {
        assert_eq!(run(0, 2, &["a", "b", "c"], false), flags(&["INCOMPLETE", "INVALID"]));
    }
}
