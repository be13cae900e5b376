use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

use crate::Property;

/// The property holding a node's status flags.
pub const STATUS_FLAGS: &str = "statusFlags";

/// One of the derived status flags written onto form nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StatusFlag {
    /// Something required has not been answered yet.
    Incomplete,

    /// Something was answered in a way that breaks a rule.
    Invalid,

    /// Present iff either of the other two is present.
    Draft,
}

impl StatusFlag {
    pub const ALL: [StatusFlag; 3] = [Self::Incomplete, Self::Invalid, Self::Draft];

    /// The stored string form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Incomplete => "INCOMPLETE",
            Self::Invalid => "INVALID",
            Self::Draft => "DRAFT",
        }
    }
}

impl fmt::Display for StatusFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown status flag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown status flag: {0}")]
pub struct UnknownStatusFlag(pub String);

impl FromStr for StatusFlag {
    type Err = UnknownStatusFlag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flag| flag.as_str() == s)
            .ok_or_else(|| UnknownStatusFlag(s.to_string()))
    }
}

/// The set of flags stored on one node.
///
/// Flags are kept as strings because validators may raise flags of their own;
/// the set is ordered so the stored property is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFlags {
    flags: BTreeSet<String>,
}

impl StatusFlags {
    /// Create an empty flag set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the flags from a stored property.
    pub fn from_property(property: &Property) -> Self {
        property.as_strings().into_iter().collect()
    }

    /// The property to store for this flag set.
    pub fn to_property(&self) -> Property {
        Property::strings(self.flags.iter().cloned())
    }

    /// Check whether a well-known flag is present.
    pub fn contains(&self, flag: StatusFlag) -> bool {
        self.flags.contains(flag.as_str())
    }

    /// Check whether a flag, given by name, is present.
    pub fn contains_name(&self, flag: &str) -> bool {
        self.flags.contains(flag)
    }

    /// Add a well-known flag.
    pub fn insert(&mut self, flag: StatusFlag) {
        self.flags.insert(flag.as_str().to_string());
    }

    /// Iterate over the flag names, in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.flags.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for StatusFlags {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self {
            flags: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl fmt::Display for StatusFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, flag) in self.flags.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{flag}")?;
        }
        write!(f, "]")
    }
}

/// Candidate flags passed through the answer validators.
///
/// Starts with every stored flag mapped to `false`. Validators raise or clear
/// entries; afterwards the answer keeps exactly the entries mapped to `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusFlagMap {
    entries: BTreeMap<String, bool>,
}

impl StatusFlagMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the map from the currently stored flags, all as removal candidates.
    pub fn from_stored(stored: &StatusFlags) -> Self {
        Self {
            entries: stored.iter().map(|flag| (flag.to_string(), false)).collect(),
        }
    }

    /// Set a flag's value.
    pub fn set(&mut self, flag: StatusFlag, value: bool) {
        self.set_name(flag.as_str(), value);
    }

    /// Set a flag's value by name.
    pub fn set_name(&mut self, flag: impl Into<String>, value: bool) {
        self.entries.insert(flag.into(), value);
    }

    /// Raise a flag.
    pub fn raise(&mut self, flag: StatusFlag) {
        self.set(flag, true);
    }

    /// Remove a flag's entry altogether.
    pub fn remove(&mut self, flag: StatusFlag) -> Option<bool> {
        self.entries.remove(flag.as_str())
    }

    /// The value of a flag, or `None` if there is no entry.
    pub fn get(&self, flag: StatusFlag) -> Option<bool> {
        self.entries.get(flag.as_str()).copied()
    }

    pub fn contains_key(&self, flag: StatusFlag) -> bool {
        self.entries.contains_key(flag.as_str())
    }

    /// Check whether a flag is currently raised.
    pub fn is_raised(&self, flag: StatusFlag) -> bool {
        self.get(flag).unwrap_or(false)
    }

    /// The flags mapped to `true`.
    pub fn into_flags(self) -> StatusFlags {
        self.entries
            .into_iter()
            .filter_map(|(flag, raised)| raised.then_some(flag))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_ordered() {
        let mut flags = StatusFlags::new();
        flags.insert(StatusFlag::Invalid);
        flags.insert(StatusFlag::Draft);
        flags.insert(StatusFlag::Incomplete);
        let names: Vec<_> = flags.iter().collect();
        assert_eq!(names, vec!["DRAFT", "INCOMPLETE", "INVALID"]);
    }

    #[test]
    fn property_round_trip_keeps_custom_flags() {
        let flags: StatusFlags = ["SUBMITTED", "INVALID"].into_iter().collect();
        let restored = StatusFlags::from_property(&flags.to_property());
        assert_eq!(restored, flags);
        assert!(restored.contains_name("SUBMITTED"));
    }

    #[test]
    fn map_keeps_only_raised_flags() {
        let stored: StatusFlags = ["INVALID", "INCOMPLETE"].into_iter().collect();
        let mut map = StatusFlagMap::from_stored(&stored);
        assert_eq!(map.get(StatusFlag::Invalid), Some(false));
        map.raise(StatusFlag::Incomplete);
        let flags = map.into_flags();
        assert!(flags.contains(StatusFlag::Incomplete));
        assert!(!flags.contains(StatusFlag::Invalid));
    }

    #[test]
    fn parse_flag() {
        assert_eq!("DRAFT".parse::<StatusFlag>(), Ok(StatusFlag::Draft));
        assert!("draft".parse::<StatusFlag>().is_err());
    }
}
