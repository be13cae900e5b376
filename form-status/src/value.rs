//! Typed, comparable values for condition operands.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use form_status_types::PropertyValue;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// The data type declared on a conditional (its `dataType` property).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OperandType {
    #[default]
    Text,
    Date,
    Long,
    Decimal,
    Double,
}

impl OperandType {
    /// Parse the stored label. Unknown or missing labels mean `Text`.
    pub fn parse(label: Option<&str>) -> Self {
        match label.map(str::to_ascii_uppercase).as_deref() {
            Some("DATE") => Self::Date,
            Some("LONG") => Self::Long,
            Some("DECIMAL") => Self::Decimal,
            Some("DOUBLE") => Self::Double,
            _ => Self::Text,
        }
    }

    /// Convert a stored value into this type.
    ///
    /// Values that cannot be converted fall back to their text form, which
    /// then never matches a properly typed value.
    pub fn coerce(self, value: &PropertyValue) -> ComparableValue {
        let converted = match self {
            Self::Text => Some(ComparableValue::Text(value.to_text())),
            Self::Long => to_long(value).map(ComparableValue::Long),
            Self::Double => to_double(value).map(ComparableValue::Double),
            Self::Decimal => to_decimal(value).map(ComparableValue::Decimal),
            Self::Date => to_date(value).map(ComparableValue::Date),
        };
        converted.unwrap_or_else(|| ComparableValue::Text(value.to_text()))
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Text => "TEXT",
            Self::Date => "DATE",
            Self::Long => "LONG",
            Self::Decimal => "DECIMAL",
            Self::Double => "DOUBLE",
        };
        f.write_str(label)
    }
}

/// A value ready for comparison, in one of the operand types.
#[derive(Debug, Clone, PartialEq)]
pub enum ComparableValue {
    Text(String),
    Date(DateTime<FixedOffset>),
    Long(i64),
    Decimal(Decimal),
    Double(f64),
}

impl ComparableValue {
    /// Compare two values using their natural ordering.
    ///
    /// Values of different kinds are incomparable.
    pub fn compare(&self, other: &ComparableValue) -> Option<Ordering> {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => Some(a.cmp(b)),
            (Self::Date(a), Self::Date(b)) => Some(a.cmp(b)),
            (Self::Long(a), Self::Long(b)) => Some(a.cmp(b)),
            (Self::Decimal(a), Self::Decimal(b)) => Some(a.cmp(b)),
            (Self::Double(a), Self::Double(b)) => Some(a.total_cmp(b)),
            _ => None,
        }
    }

    /// Check whether two values are equal under their natural ordering.
    pub fn matches(&self, other: &ComparableValue) -> bool {
        self.compare(other) == Some(Ordering::Equal)
    }
}

impl From<&str> for ComparableValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<i64> for ComparableValue {
    fn from(l: i64) -> Self {
        Self::Long(l)
    }
}

impl From<f64> for ComparableValue {
    fn from(d: f64) -> Self {
        Self::Double(d)
    }
}

fn to_long(value: &PropertyValue) -> Option<i64> {
    match value {
        PropertyValue::Long(l) => Some(*l),
        // Truncates, like a cast.
        PropertyValue::Double(d) if d.is_finite() => Some(*d as i64),
        PropertyValue::Decimal(d) => d.trunc().to_i64(),
        PropertyValue::Date(d) => Some(d.timestamp_millis()),
        PropertyValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_double(value: &PropertyValue) -> Option<f64> {
    match value {
        PropertyValue::Double(d) => Some(*d),
        PropertyValue::Long(l) => Some(*l as f64),
        PropertyValue::Decimal(d) => d.to_f64(),
        PropertyValue::Date(d) => Some(d.timestamp_millis() as f64),
        PropertyValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn to_decimal(value: &PropertyValue) -> Option<Decimal> {
    match value {
        PropertyValue::Decimal(d) => Some(*d),
        PropertyValue::Long(l) => Some(Decimal::from(*l)),
        PropertyValue::Double(d) => Decimal::try_from(*d).ok(),
        PropertyValue::Date(d) => Some(Decimal::from(d.timestamp_millis())),
        PropertyValue::String(s) => Decimal::from_str(s.trim()).ok(),
        _ => None,
    }
}

fn to_date(value: &PropertyValue) -> Option<DateTime<FixedOffset>> {
    match value {
        PropertyValue::Date(d) => Some(*d),
        PropertyValue::Long(millis) => from_millis(*millis),
        PropertyValue::Double(millis) if millis.is_finite() => from_millis(*millis as i64),
        PropertyValue::String(s) => parse_date(s),
        _ => None,
    }
}

fn from_millis(millis: i64) -> Option<DateTime<FixedOffset>> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|d| d.fixed_offset())
}

/// Parse a stored date: full RFC 3339, or `yyyy-MM-dd` optionally followed by a time part
/// that is ignored. Date-only values are taken as midnight UTC.
pub fn parse_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();
    if let Ok(date) = DateTime::parse_from_rfc3339(text) {
        return Some(date);
    }
    let day = text.split('T').next()?;
    let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()?;
    let midnight = date.and_hms_opt(0, 0, 0)?;
    Some(Utc.from_utc_datetime(&midnight).fixed_offset())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_type_labels() {
        assert_eq!(OperandType::parse(Some("long")), OperandType::Long);
        assert_eq!(OperandType::parse(Some("Decimal")), OperandType::Decimal);
        assert_eq!(OperandType::parse(Some("boolean")), OperandType::Text);
        assert_eq!(OperandType::parse(None), OperandType::Text);
    }

    #[test]
    fn strings_coerce_to_numbers() {
        let value = PropertyValue::from("42");
        assert_eq!(OperandType::Long.coerce(&value), ComparableValue::Long(42));
        assert_eq!(OperandType::Double.coerce(&value), ComparableValue::Double(42.0));
        assert_eq!(
            OperandType::Decimal.coerce(&value),
            ComparableValue::Decimal(Decimal::from(42))
        );
    }

    #[test]
    fn unparseable_values_fall_back_to_text() {
        let value = PropertyValue::from("forty-two");
        assert_eq!(
            OperandType::Long.coerce(&value),
            ComparableValue::Text("forty-two".to_string())
        );
        assert!(
            !OperandType::Long
                .coerce(&value)
                .matches(&ComparableValue::Long(42))
        );
    }

    #[test]
    fn decimals_compare_regardless_of_scale() {
        let a = OperandType::Decimal.coerce(&PropertyValue::from("1.50"));
        let b = OperandType::Decimal.coerce(&PropertyValue::from("1.5"));
        assert!(a.matches(&b));
    }

    #[test]
    fn dates_ignore_time_suffix() {
        let a = parse_date("2020-05-17T13:45").unwrap();
        let b = parse_date("2020-05-17").unwrap();
        assert_eq!(a, b);
        assert!(parse_date("17/05/2020").is_none());
    }

    #[test]
    fn rfc3339_dates_keep_their_instant() {
        let a = parse_date("2020-05-17T10:00:00+02:00").unwrap();
        let b = parse_date("2020-05-17T08:00:00Z").unwrap();
        assert_eq!(ComparableValue::Date(a).compare(&ComparableValue::Date(b)), Some(Ordering::Equal));
    }

    #[test]
    fn mixed_kinds_are_incomparable() {
        assert_eq!(ComparableValue::Long(1).compare(&ComparableValue::from("1")), None);
    }

    #[test]
    fn doubles_truncate_to_longs() {
        assert_eq!(
            OperandType::Long.coerce(&PropertyValue::Double(3.9)),
            ComparableValue::Long(3)
        );
    }
}
