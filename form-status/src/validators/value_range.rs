use std::cmp::Ordering;

use form_status_types::{NodeStore, PropertyValue, StatusFlag, StatusFlagMap, TreeError, props};
use tracing::warn;

use crate::validator::{AnswerNode, AnswerValidator, QuestionNode};
use crate::value::{ComparableValue, OperandType};

/// Checks numeric answers against the question's `minValue`/`maxValue`.
///
/// Only ever raises `INVALID`; answers in range are left alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueRangeValidator;

impl ValueRangeValidator {
    pub const PRIORITY: i32 = 50;

    fn out_of_range(answer: &AnswerNode<'_>, question: &QuestionNode<'_>) -> Result<bool, TreeError> {
        let data_type = match question.data_type()?.map(|t| t.to_ascii_lowercase()).as_deref() {
            Some("long") => OperandType::Long,
            Some("double") => OperandType::Double,
            Some("decimal") => OperandType::Decimal,
            _ => return Ok(false),
        };
        let bound = |name: &str| -> Result<Option<ComparableValue>, TreeError> {
            let value = question.session.property(question.path, name)?;
            Ok(value
                .as_ref()
                .and_then(|p| p.first())
                .map(|v| data_type.coerce(v))
                .filter(|v| !matches!(v, ComparableValue::Text(_))))
        };
        let (min, max) = (bound(props::MIN_VALUE)?, bound(props::MAX_VALUE)?);
        if min.is_none() && max.is_none() {
            return Ok(false);
        }

        let outside = |value: &PropertyValue| {
            let value = data_type.coerce(value);
            let below = min.as_ref().is_some_and(|m| value.compare(m) == Some(Ordering::Less));
            let above = max.as_ref().is_some_and(|m| value.compare(m) == Some(Ordering::Greater));
            below || above
        };
        Ok(answer.values()?.iter().any(outside))
    }
}

impl AnswerValidator for ValueRangeValidator {
    fn priority(&self) -> i32 {
        Self::PRIORITY
    }

    fn name(&self) -> &str {
        "value range"
    }

    fn validate(
        &self,
        answer: &AnswerNode<'_>,
        question: &QuestionNode<'_>,
        _is_new: bool,
        flags: &mut StatusFlagMap,
    ) {
        match Self::out_of_range(answer, question) {
            Ok(true) => flags.raise(StatusFlag::Invalid),
            Ok(false) => {}
            Err(err) => warn!(answer = %answer.path, %err, "Could not check answer range"),
        }
    }
}
