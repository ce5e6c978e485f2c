//! Parsed node paths
//!
//! A `NodePath` is a pre-parsed path such as `/root/Player:position:x`. Node
//! names are separated by `/`, property subnames follow the first `:`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::string_name::StringName;

#[derive(Debug, Clone, Default)]
struct Parsed {
    text: String,
    names: Vec<StringName>,
    subnames: Vec<StringName>,
    absolute: bool,
}

/// Immutable, shared node path.
#[derive(Clone, Default)]
pub struct NodePath(Arc<Parsed>);

impl NodePath {
    /// Parse a path. Empty segments are dropped.
    pub fn new(text: &str) -> Self {
        let absolute = text.starts_with('/');
        let (node_part, sub_part) = match text.find(':') {
            Some(i) => (&text[..i], Some(&text[i + 1..])),
            None => (text, None),
        };

        let names = node_part
            .split('/')
            .filter(|s| !s.is_empty())
            .map(StringName::new)
            .collect();
        let subnames = sub_part
            .map(|s| s.split(':').filter(|s| !s.is_empty()).map(StringName::new).collect())
            .unwrap_or_default();

        NodePath(Arc::new(Parsed {
            text: text.to_string(),
            names,
            subnames,
            absolute,
        }))
    }

    /// Source text
    pub fn as_str(&self) -> &str {
        &self.0.text
    }

    /// Whether the path starts at the root
    pub fn is_absolute(&self) -> bool {
        self.0.absolute
    }

    /// Whether the path has no node names and no subnames
    pub fn is_empty(&self) -> bool {
        self.0.names.is_empty() && self.0.subnames.is_empty()
    }

    /// Node name segments
    pub fn names(&self) -> &[StringName] {
        &self.0.names
    }

    /// Property subname segments
    pub fn subnames(&self) -> &[StringName] {
        &self.0.subnames
    }

    /// Whether both paths share the same parsed storage
    pub fn ptr_eq(&self, other: &NodePath) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for NodePath {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.0.text == other.0.text
    }
}

impl Eq for NodePath {}

impl Hash for NodePath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.text.hash(state)
    }
}

impl From<&str> for NodePath {
    fn from(s: &str) -> Self {
        NodePath::new(s)
    }
}

impl From<String> for NodePath {
    fn from(s: String) -> Self {
        NodePath::new(&s)
    }
}

impl fmt::Debug for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodePath({:?})", self.as_str())
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_absolute_with_subnames() {
        let p = NodePath::new("/root/Player:position:x");
        assert!(p.is_absolute());
        assert_eq!(p.names(), &[StringName::new("root"), StringName::new("Player")]);
        assert_eq!(p.subnames(), &[StringName::new("position"), StringName::new("x")]);
    }

    #[test]
    fn test_parse_relative() {
        let p = NodePath::new("../Sibling");
        assert!(!p.is_absolute());
        assert_eq!(p.names().len(), 2);
        assert!(p.subnames().is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(NodePath::default().is_empty());
        assert!(NodePath::new("").is_empty());
        assert!(!NodePath::new(":x").is_empty());
    }

    #[test]
    fn test_equality_by_text() {
        let a = NodePath::new("a/b");
        let b = NodePath::new("a/b");
        assert!(!a.ptr_eq(&b));
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "a/b");
    }
}
