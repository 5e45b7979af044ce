//! Ordered CMake define collection
//!
//! A [`DefineSet`] keeps defines in insertion order and never overwrites a
//! name once it has a value.

use std::fmt;

/// A single `NAME=VALUE` define; the name may carry a `:TYPE` suffix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    pub value: String,
}

impl Define {
    /// Command-line token, e.g. `-DCMAKE_BUILD_TYPE=Debug`
    pub fn to_arg(&self) -> String {
        format!("-D{}={}", self.name, self.value)
    }
}

impl fmt::Display for Define {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

/// Insertion-ordered, first-write-wins define map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineSet {
    entries: Vec<Define>,
}

impl DefineSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `name` unless it is already set
    ///
    /// Returns `true` when the value was stored. An existing value is kept
    /// untouched.
    pub fn set_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) -> bool {
        let name = name.into();
        if self.contains(&name) {
            return false;
        }
        self.entries.push(Define {
            name,
            value: value.into(),
        });
        true
    }

    #[cfg(test)]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|d| d.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Define> {
        self.entries.iter()
    }

    /// Names in insertion order
    #[cfg(test)]
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|d| d.name.as_str()).collect()
    }

    /// One `-DNAME=VALUE` token per define, in insertion order
    pub fn to_args(&self) -> Vec<String> {
        self.entries.iter().map(Define::to_arg).collect()
    }
}

/// CMake boolean spelling
pub fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_write_wins() {
        let mut defines = DefineSet::new();
        assert!(defines.set_if_absent("CMAKE_BUILD_TYPE", "Debug"));
        assert!(!defines.set_if_absent("CMAKE_BUILD_TYPE", "Release"));
        assert_eq!(defines.get("CMAKE_BUILD_TYPE"), Some("Debug"));
        assert_eq!(defines.len(), 1);
    }

    #[test]
    fn test_insertion_order_is_kept() {
        let mut defines = DefineSet::new();
        defines.set_if_absent("B", "1");
        defines.set_if_absent("A", "2");
        defines.set_if_absent("C", "3");
        defines.set_if_absent("A", "4");
        assert_eq!(defines.names(), vec!["B", "A", "C"]);
        assert_eq!(defines.to_args(), vec!["-DB=1", "-DA=2", "-DC=3"]);
    }

    #[test]
    fn test_typed_name_is_kept_verbatim() {
        let mut defines = DefineSet::new();
        defines.set_if_absent("HDF5_DIR:PATH", "/opt/hdf5");
        assert_eq!(defines.to_args(), vec!["-DHDF5_DIR:PATH=/opt/hdf5"]);
        assert!(defines.get("HDF5_DIR").is_none());
    }

    #[test]
    fn test_on_off() {
        assert_eq!(on_off(true), "ON");
        assert_eq!(on_off(false), "OFF");
    }
}
