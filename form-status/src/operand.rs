//! Condition operands: how they are defined and how they resolve to values.

use form_status_types::{NodeKind, NodePath, NodeStore, PropertyValue, TreeError, props};
use tracing::warn;

use crate::value::{ComparableValue, OperandType};

/// A resolved operand: the typed values one side of a comparison works with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Operand {
    values: Vec<ComparableValue>,
    is_reference: bool,
    require_all: bool,
}

impl Operand {
    /// An empty, non-reference operand.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn literal(values: Vec<ComparableValue>, require_all: bool) -> Self {
        Self {
            values,
            is_reference: false,
            require_all,
        }
    }

    pub fn reference(values: Vec<ComparableValue>, require_all: bool) -> Self {
        Self {
            values,
            is_reference: true,
            require_all,
        }
    }

    pub fn values(&self) -> &[ComparableValue] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Whether the values were looked up from an answer in the form.
    pub fn is_reference(&self) -> bool {
        self.is_reference
    }

    /// The `requireAll` hint, used by pairwise matching.
    pub fn require_all(&self) -> bool {
        self.require_all
    }
}

/// Looks up the values answered for a question, by the question's simple name.
pub trait ReferenceResolver {
    /// The stored values of the answer, or an empty list if there is no such
    /// question or answer.
    fn resolve_reference(&mut self, question_name: &str) -> Vec<PropertyValue>;
}

/// Where an operand takes its values from.
#[derive(Debug, Clone, PartialEq)]
pub enum OperandSource {
    /// The definition node is missing or incomplete.
    Missing,

    /// Values stored on the definition node itself.
    Literal(Vec<PropertyValue>),

    /// The answer to the question with this (sanitized) name.
    Reference(String),
}

/// One operand of a conditional, as defined in the questionnaire.
#[derive(Debug, Clone, PartialEq)]
pub struct OperandDefinition {
    pub source: OperandSource,
    pub require_all: bool,
}

impl OperandDefinition {
    pub fn missing() -> Self {
        Self {
            source: OperandSource::Missing,
            require_all: false,
        }
    }

    pub fn literal(values: Vec<PropertyValue>) -> Self {
        Self {
            source: OperandSource::Literal(values),
            require_all: false,
        }
    }

    pub fn reference(question_name: &str) -> Self {
        Self {
            source: OperandSource::Reference(sanitize_name(question_name)),
            require_all: false,
        }
    }

    pub fn with_require_all(mut self, require_all: bool) -> Self {
        self.require_all = require_all;
        self
    }

    /// Read an operand definition node.
    ///
    /// A node that doesn't exist, isn't a conditional value, or lacks its
    /// `value` property gives a missing operand. So does a tree failure, which is
    /// logged.
    pub fn read(store: &dyn NodeStore, path: &NodePath) -> Self {
        match Self::try_read(store, path) {
            Ok(Some(definition)) => definition,
            Ok(None) => Self::missing(),
            Err(err) => {
                warn!(%path, %err, "Could not read operand, treating it as empty");
                Self::missing()
            }
        }
    }

    fn try_read(store: &dyn NodeStore, path: &NodePath) -> Result<Option<Self>, TreeError> {
        if !store.exists(path) || store.kind(path)? != NodeKind::ConditionalValue {
            return Ok(None);
        }
        let Some(value) = store.property(path, props::VALUE)? else {
            return Ok(None);
        };
        let is_reference = store.bool_property(path, props::IS_REFERENCE)?.unwrap_or(false);
        let require_all = store.bool_property(path, props::REQUIRE_ALL)?.unwrap_or(false);

        let source = if is_reference {
            match value.first() {
                Some(name) => OperandSource::Reference(sanitize_name(&name.to_text())),
                None => OperandSource::Missing,
            }
        } else {
            OperandSource::Literal(value.values().to_vec())
        };
        Ok(Some(Self {
            source,
            require_all,
        }))
    }

    /// Resolve the operand to typed values.
    pub fn resolve(&self, data_type: OperandType, resolver: &mut dyn ReferenceResolver) -> Operand {
        let coerce = |values: &[PropertyValue]| -> Vec<ComparableValue> {
            values.iter().map(|v| data_type.coerce(v)).collect()
        };
        match &self.source {
            OperandSource::Missing => Operand::empty(),
            OperandSource::Literal(values) => Operand::literal(coerce(values), self.require_all),
            OperandSource::Reference(name) => {
                let values = resolver.resolve_reference(name);
                Operand::reference(coerce(&values), self.require_all)
            }
        }
    }
}

/// Strip a question name down to `[a-z0-9 _-]`, ignoring case.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .filter(|c| {
            let c = c.to_ascii_lowercase();
            c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, ' ' | '_' | '-')
        })
        .collect()
}
