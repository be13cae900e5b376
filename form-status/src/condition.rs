//! Section conditions: parsing and evaluation.

use form_status_types::{NodeKind, NodePath, NodeStore, TreeError, props};

use crate::config::OperandMatching;
use crate::operand::{OperandDefinition, ReferenceResolver};
use crate::operator::Operator;
use crate::value::OperandType;
use crate::ConditionError;

/// A single comparison between two operands.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    pub operator: Operator,
    pub data_type: OperandType,
    pub left: OperandDefinition,
    pub right: OperandDefinition,
}

/// A parsed condition expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    Comparison(Comparison),

    /// All (`require_all`) or any of the children must hold.
    Group {
        require_all: bool,
        children: Vec<Condition>,
    },
}

impl Condition {
    /// Parse the Conditional or ConditionalGroup at `path`.
    ///
    /// Unknown operators fail here, not at evaluation time. Group children that
    /// are not conditions are ignored.
    pub fn parse(store: &dyn NodeStore, path: &NodePath) -> Result<Self, ConditionError> {
        match store.kind(path)? {
            NodeKind::Conditional => {
                let comparator = store
                    .string_property(path, props::COMPARATOR)?
                    .ok_or_else(|| ConditionError::MissingComparator(path.clone()))?;
                let operator = comparator
                    .parse::<Operator>()
                    .map_err(|operator| ConditionError::UnknownOperator {
                        path: path.clone(),
                        operator,
                    })?;
                let data_type = store.string_property(path, props::DATA_TYPE)?;
                Ok(Self::Comparison(Comparison {
                    operator,
                    data_type: OperandType::parse(data_type.as_deref()),
                    left: OperandDefinition::read(store, &path.child(props::OPERAND_A)),
                    right: OperandDefinition::read(store, &path.child(props::OPERAND_B)),
                }))
            }
            NodeKind::ConditionalGroup => {
                let require_all = store.bool_property(path, props::REQUIRE_ALL)?.unwrap_or(false);
                let mut children = Vec::new();
                for name in store.child_names(path)? {
                    let child = path.child(&name);
                    if store.kind(&child)?.is_condition() {
                        children.push(Self::parse(store, &child)?);
                    }
                }
                Ok(Self::Group {
                    require_all,
                    children,
                })
            }
            _ => Err(ConditionError::NotACondition(path.clone())),
        }
    }

    /// The first condition directly under a Section, if any.
    pub fn find_in_section(store: &dyn NodeStore, section: &NodePath) -> Result<Option<NodePath>, TreeError> {
        for name in store.child_names(section)? {
            let child = section.child(&name);
            if store.kind(&child)?.is_condition() {
                return Ok(Some(child));
            }
        }
        Ok(None)
    }

    pub fn evaluate(&self, resolver: &mut dyn ReferenceResolver, matching: OperandMatching) -> bool {
        match self {
            Self::Comparison(comparison) => comparison.evaluate(resolver, matching),
            Self::Group {
                require_all: true,
                children,
            } => children.iter().all(|c| c.evaluate(resolver, matching)),
            Self::Group {
                require_all: false,
                children,
            } => children.iter().any(|c| c.evaluate(resolver, matching)),
        }
    }
}

impl Comparison {
    pub fn evaluate(&self, resolver: &mut dyn ReferenceResolver, matching: OperandMatching) -> bool {
        let left = self.left.resolve(self.data_type, resolver);
        let right = self.right.resolve(self.data_type, resolver);
        match matching {
            OperandMatching::Set => self.operator.evaluate(&left, &right),
            OperandMatching::Pairwise => self.operator.evaluate_pairwise(&left, &right),
        }
    }
}
