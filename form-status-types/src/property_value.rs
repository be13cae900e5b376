use chrono::{DateTime, FixedOffset, SecondsFormat};
use rust_decimal::Decimal;

/// A single typed value stored in a node property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// A string value.
    String(String),

    /// A 64-bit integer value.
    Long(i64),

    /// A floating-point value.
    Double(f64),

    /// An arbitrary-precision decimal value.
    Decimal(Decimal),

    /// A boolean value.
    Boolean(bool),

    /// A point in time.
    Date(DateTime<FixedOffset>),

    /// The stable identifier of another node.
    Reference(String),
}

impl PropertyValue {
    /// Try to get this value as a string reference.
    ///
    /// References are identifiers, so they are also returned here.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) | Self::Reference(s) => Some(s),
            _ => None,
        }
    }

    /// Try to get this value as a long.
    pub fn as_long(&self) -> Option<i64> {
        match self {
            Self::Long(l) => Some(*l),
            _ => None,
        }
    }

    /// Try to get this value as a double.
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }

    /// Try to get this value as a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get the type name of this value for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::String(_) => "String",
            Self::Long(_) => "Long",
            Self::Double(_) => "Double",
            Self::Decimal(_) => "Decimal",
            Self::Boolean(_) => "Boolean",
            Self::Date(_) => "Date",
            Self::Reference(_) => "Reference",
        }
    }

    /// The canonical string form, as the store would serialize it.
    pub fn to_text(&self) -> String {
        match self {
            Self::String(s) | Self::Reference(s) => s.clone(),
            Self::Long(l) => l.to_string(),
            Self::Double(d) => format!("{d:?}"),
            Self::Decimal(d) => d.to_string(),
            Self::Boolean(b) => b.to_string(),
            Self::Date(d) => d.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(l: i64) -> Self {
        Self::Long(l)
    }
}

impl From<i32> for PropertyValue {
    fn from(l: i32) -> Self {
        Self::Long(i64::from(l))
    }
}

impl From<f64> for PropertyValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

impl From<Decimal> for PropertyValue {
    fn from(d: Decimal) -> Self {
        Self::Decimal(d)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl From<DateTime<FixedOffset>> for PropertyValue {
    fn from(d: DateTime<FixedOffset>) -> Self {
        Self::Date(d)
    }
}

/// A node property: either a single value or an ordered list of values.
///
/// Multi-valued properties may be empty; single-valued ones always hold exactly one value.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    Single(PropertyValue),
    Multiple(Vec<PropertyValue>),
}

impl Property {
    /// Create a single-valued property.
    pub fn single(value: impl Into<PropertyValue>) -> Self {
        Self::Single(value.into())
    }

    /// Create a multi-valued string property.
    pub fn strings<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Multiple(
            values
                .into_iter()
                .map(|s| PropertyValue::String(s.into()))
                .collect(),
        )
    }

    /// Create a reference property pointing at the given identifier.
    pub fn reference(identifier: impl Into<String>) -> Self {
        Self::Single(PropertyValue::Reference(identifier.into()))
    }

    /// All values, in order. A single-valued property yields one value.
    pub fn values(&self) -> &[PropertyValue] {
        match self {
            Self::Single(v) => std::slice::from_ref(v),
            Self::Multiple(vs) => vs,
        }
    }

    /// The first value, if any.
    pub fn first(&self) -> Option<&PropertyValue> {
        self.values().first()
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.values().len()
    }

    /// Check if this property holds no values.
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Check if this is a multi-valued property.
    pub fn is_multiple(&self) -> bool {
        matches!(self, Self::Multiple(_))
    }

    /// The text form of every value.
    pub fn as_strings(&self) -> Vec<String> {
        self.values().iter().map(PropertyValue::to_text).collect()
    }
}

impl From<PropertyValue> for Property {
    fn from(value: PropertyValue) -> Self {
        Self::Single(value)
    }
}

impl From<Vec<PropertyValue>> for Property {
    fn from(values: Vec<PropertyValue>) -> Self {
        Self::Multiple(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_property_has_one_value() {
        let property = Property::single(42i64);
        assert_eq!(property.len(), 1);
        assert!(!property.is_multiple());
        assert_eq!(property.first().and_then(PropertyValue::as_long), Some(42));
    }

    #[test]
    fn empty_multi_value_property() {
        let property = Property::Multiple(Vec::new());
        assert!(property.is_empty());
        assert!(property.is_multiple());
    }

    #[test]
    fn text_forms() {
        assert_eq!(PropertyValue::Double(1.0).to_text(), "1.0");
        assert_eq!(PropertyValue::Boolean(true).to_text(), "true");
        let date = DateTime::parse_from_rfc3339("2021-03-04T00:00:00Z").unwrap();
        assert_eq!(PropertyValue::Date(date).to_text(), "2021-03-04T00:00:00.000Z");
    }

    #[test]
    fn strings_constructor() {
        let property = Property::strings(["a", "b"]);
        assert_eq!(property.as_strings(), vec!["a".to_string(), "b".to_string()]);
    }
}
