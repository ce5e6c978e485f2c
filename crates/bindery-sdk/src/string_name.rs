//! Interned symbols and copy-on-write strings
//!
//! `StringName` is the key type for every registry map. Names are interned in a
//! process-wide table, so equality is usually a pointer comparison. Lookups by
//! `&str` do not touch the interner: `StringName` hashes and borrows as its
//! string contents.

use std::borrow::Borrow;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rustc_hash::FxHashSet;

static INTERNER: Lazy<Mutex<FxHashSet<Arc<str>>>> = Lazy::new(|| Mutex::new(FxHashSet::default()));

// ============================================================================
// StringName
// ============================================================================

/// Interned, immutable symbol.
#[derive(Clone)]
pub struct StringName(Arc<str>);

impl StringName {
    /// Intern a string.
    pub fn new(s: &str) -> Self {
        let mut table = INTERNER.lock();
        if let Some(existing) = table.get(s) {
            return StringName(existing.clone());
        }
        let interned: Arc<str> = Arc::from(s);
        table.insert(interned.clone());
        StringName(interned)
    }

    /// The empty name
    pub fn empty() -> Self {
        StringName::new("")
    }

    /// Borrow the symbol text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the empty name
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct names interned so far (diagnostics)
    pub fn interned_count() -> usize {
        INTERNER.lock().len()
    }
}

impl PartialEq for StringName {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0) || *self.0 == *other.0
    }
}

impl Eq for StringName {}

impl Hash for StringName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Must match `str`'s hash so `Borrow<str>` lookups work.
        self.as_str().hash(state)
    }
}

impl PartialOrd for StringName {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for StringName {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_str().cmp(other.as_str())
    }
}

impl Borrow<str> for StringName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for StringName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StringName {
    fn from(s: &str) -> Self {
        StringName::new(s)
    }
}

impl From<String> for StringName {
    fn from(s: String) -> Self {
        StringName::new(&s)
    }
}

impl From<&String> for StringName {
    fn from(s: &String) -> Self {
        StringName::new(s)
    }
}

impl From<&StringName> for StringName {
    fn from(s: &StringName) -> Self {
        s.clone()
    }
}

impl PartialEq<str> for StringName {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for StringName {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

impl Default for StringName {
    fn default() -> Self {
        StringName::empty()
    }
}

impl std::fmt::Debug for StringName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "&{:?}", self.as_str())
    }
}

impl std::fmt::Display for StringName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// GString
// ============================================================================

/// Copy-on-write string.
///
/// Clones share storage; the first mutation of a shared instance copies it.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GString(Arc<String>);

impl GString {
    /// Create an empty string
    pub fn new() -> Self {
        Self::default()
    }

    /// Borrow the contents
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the string is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append text, copying the storage first if it is shared
    pub fn push_str(&mut self, s: &str) {
        Arc::make_mut(&mut self.0).push_str(s);
    }

    /// Mutable access to the contents (copies shared storage first)
    pub fn make_mut(&mut self) -> &mut String {
        Arc::make_mut(&mut self.0)
    }

    /// Whether two strings share the same backing storage
    pub fn ptr_eq(&self, other: &GString) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<&str> for GString {
    fn from(s: &str) -> Self {
        GString(Arc::new(s.to_string()))
    }
}

impl From<String> for GString {
    fn from(s: String) -> Self {
        GString(Arc::new(s))
    }
}

impl From<&StringName> for GString {
    fn from(s: &StringName) -> Self {
        GString::from(s.as_str())
    }
}

impl std::ops::Deref for GString {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for GString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.as_str())
    }
}

impl std::fmt::Display for GString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_interning_shares_storage() {
        let a = StringName::new("speak");
        let b = StringName::from("speak");
        assert!(Arc::ptr_eq(&a.0, &b.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_lookup_by_str() {
        let mut map = FxHashMap::default();
        map.insert(StringName::new("health"), 10);
        assert_eq!(map.get("health"), Some(&10));
        assert_eq!(map.get("mana"), None);
    }

    #[test]
    fn test_gstring_copy_on_write() {
        let a = GString::from("abc");
        let mut b = a.clone();
        assert!(a.ptr_eq(&b));

        b.push_str("def");
        assert_eq!(a.as_str(), "abc");
        assert_eq!(b.as_str(), "abcdef");
        assert!(!a.ptr_eq(&b));
    }
}
