//! The comparison operators available to conditionals.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::operand::Operand;
use crate::value::ComparableValue;

/// Error returned when a conditional names an operator that doesn't exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown operator: {0}")]
pub struct UnknownOperator(pub String);

/// A comparison operator, as stored in a conditional's `comparator` property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// Both operands hold the same set of values.
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// Both operands are empty.
    Empty,
    NotEmpty,
    /// The left operand holds every value of the right one.
    Includes,
    /// The left operand holds at least one value of the right one.
    IncludesAny,
    /// The left operand holds none of the values of the right one.
    Excludes,
    /// The left operand misses at least one value of the right one.
    ExcludesAny,
}

impl Operator {
    pub const ALL: [Operator; 12] = [
        Self::Eq,
        Self::NotEq,
        Self::Lt,
        Self::LtEq,
        Self::Gt,
        Self::GtEq,
        Self::Empty,
        Self::NotEmpty,
        Self::Includes,
        Self::IncludesAny,
        Self::Excludes,
        Self::ExcludesAny,
    ];

    /// The stored form of this operator.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Empty => "is empty",
            Self::NotEmpty => "is not empty",
            Self::Includes => "includes",
            Self::IncludesAny => "includes any",
            Self::Excludes => "excludes",
            Self::ExcludesAny => "excludes any",
        }
    }

    /// Whether the operator is defined for operands with more than one value.
    pub fn supports_multivalue(self) -> bool {
        !matches!(self, Self::Lt | Self::LtEq | Self::Gt | Self::GtEq)
    }

    /// Evaluate the operator with set semantics.
    ///
    /// Operators that don't support multiple values are false whenever either
    /// operand has more than one value.
    pub fn evaluate(self, left: &Operand, right: &Operand) -> bool {
        if !self.supports_multivalue() && (left.len() > 1 || right.len() > 1) {
            return false;
        }
        let (l, r) = (left.values(), right.values());
        match self {
            Self::Eq => covers(r, l) && covers(l, r),
            Self::NotEq => !Self::Eq.evaluate(left, right),
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => match (l, r) {
                ([a], [b]) => self.holds_for(a, b),
                _ => false,
            },
            Self::Empty => l.is_empty() && r.is_empty(),
            Self::NotEmpty => !Self::Empty.evaluate(left, right),
            Self::Includes => covers(l, r),
            Self::IncludesAny => r.iter().any(|vr| contains(l, vr)),
            Self::Excludes => !r.iter().any(|vr| contains(l, vr)),
            Self::ExcludesAny => r.iter().any(|vr| !contains(l, vr)),
        }
    }

    /// Evaluate the operator pair by pair, honouring the operands' `requireAll` flags.
    ///
    /// With `requireAll` on either side every (left, right) pair must satisfy the
    /// operator; otherwise one satisfying pair is enough. `is empty` holds when
    /// either side is empty. Set-membership operators keep their set semantics.
    pub fn evaluate_pairwise(self, left: &Operand, right: &Operand) -> bool {
        match self {
            Self::Empty => left.is_empty() || right.is_empty(),
            Self::NotEmpty => !Self::Empty.evaluate_pairwise(left, right),
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => {
                let require_all = left.require_all() || right.require_all();
                let mut pairs = right
                    .values()
                    .iter()
                    .flat_map(|b| left.values().iter().map(move |a| (a, b)));
                if require_all {
                    pairs.all(|(a, b)| self.holds_for(a, b))
                } else {
                    pairs.any(|(a, b)| self.holds_for(a, b))
                }
            }
            Self::Includes | Self::IncludesAny | Self::Excludes | Self::ExcludesAny => {
                self.evaluate(left, right)
            }
        }
    }

    /// The operator applied to a single pair of values.
    fn holds_for(self, a: &ComparableValue, b: &ComparableValue) -> bool {
        let ordering = a.compare(b);
        match self {
            Self::Eq => ordering == Some(Ordering::Equal),
            Self::NotEq => ordering != Some(Ordering::Equal),
            Self::Lt => ordering == Some(Ordering::Less),
            Self::LtEq => matches!(ordering, Some(Ordering::Less | Ordering::Equal)),
            Self::Gt => ordering == Some(Ordering::Greater),
            Self::GtEq => matches!(ordering, Some(Ordering::Greater | Ordering::Equal)),
            _ => false,
        }
    }
}

fn contains(values: &[ComparableValue], value: &ComparableValue) -> bool {
    values.iter().any(|v| v.matches(value))
}

/// Every value of `needles` has a match in `haystack`.
fn covers(haystack: &[ComparableValue], needles: &[ComparableValue]) -> bool {
    needles.iter().all(|v| contains(haystack, v))
}

impl FromStr for Operator {
    type Err = UnknownOperator;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.symbol() == s)
            .ok_or_else(|| UnknownOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
