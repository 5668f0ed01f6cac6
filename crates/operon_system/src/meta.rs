//! Metadata snapshot carried by every action instance.
//!
//! A [`Metadata`] value is a string-keyed mapping of JSON values that lives
//! on one [`Instance`](crate::action::Instance) for the duration of one
//! invocation. It is populated at construction with the action's type
//! identity (under [`TYPE_KEY`]) and the validated property values (under
//! [`PROPS_KEY`]); any hook or the core operation may add or overwrite keys
//! afterwards.
//!
//! Keys are only ever added or overwritten, never removed — there is no
//! removal API. The mapping has no internal synchronization: one instance
//! is driven by one invocation on one thread.
//!
//! # Example
//!
//! ```
//! use operon_system::meta::Metadata;
//!
//! let mut meta = Metadata::new();
//! meta.insert("started", true);
//! meta.insert("attempt", 1);
//!
//! assert_eq!(meta.get("started"), Some(&true.into()));
//! assert_eq!(meta.len(), 2);
//! ```

use serde::Serialize;
use serde_json::{Map, Value};

/// Metadata key holding the action's type identity.
pub const TYPE_KEY: &str = "type";

/// Metadata key holding the initial validated property values.
pub const PROPS_KEY: &str = "props";

/// A mutable, string-keyed mapping of JSON values attached to one instance.
///
/// Serializes transparently as a JSON object, so outcomes and log events can
/// carry it without conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Metadata {
    entries: Map<String, Value>,
}

impl Metadata {
    /// Creates an empty metadata mapping.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Map::new(),
        }
    }

    /// Inserts or overwrites an entry, returning the previous value if the
    /// key was already present.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    /// Returns a mutable reference to the value for `key`, if present.
    ///
    /// In-place mutation counts as an overwrite; entries still cannot be
    /// removed through this handle.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries.get_mut(key)
    }

    /// Returns true if `key` is present.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Overlays every entry of `other` onto this mapping, overwriting
    /// existing keys.
    pub fn merge(&mut self, other: Metadata) {
        for (key, value) in other.entries {
            self.entries.insert(key, value);
        }
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the mapping is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over entries in insertion-independent map order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.entries.iter()
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(entries: Map<String, Value>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn insert_and_get() {
        let mut meta = Metadata::new();
        assert!(meta.is_empty());

        meta.insert("key", "value");
        assert_eq!(meta.get("key"), Some(&json!("value")));
        assert!(meta.contains("key"));
        assert_eq!(meta.len(), 1);
    }

    #[test]
    fn insert_overwrites_and_returns_previous() {
        let mut meta = Metadata::new();
        assert_eq!(meta.insert("key", 1), None);
        assert_eq!(meta.insert("key", 2), Some(json!(1)));
        assert_eq!(meta.get("key"), Some(&json!(2)));
    }

    #[test]
    fn merge_overlays_entries() {
        let mut base = Metadata::new();
        base.insert("kept", "base");
        base.insert("replaced", "base");

        let mut overlay = Metadata::new();
        overlay.insert("replaced", "overlay");
        overlay.insert("added", "overlay");

        base.merge(overlay);

        assert_eq!(base.get("kept"), Some(&json!("base")));
        assert_eq!(base.get("replaced"), Some(&json!("overlay")));
        assert_eq!(base.get("added"), Some(&json!("overlay")));
        assert_eq!(base.len(), 3);
    }

    #[test]
    fn get_mut_allows_in_place_updates() {
        let mut meta = Metadata::new();
        meta.insert("trace", json!([]));

        if let Some(Value::Array(entries)) = meta.get_mut("trace") {
            entries.push(json!("step"));
        }

        assert_eq!(meta.get("trace"), Some(&json!(["step"])));
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut meta = Metadata::new();
        meta.insert("a", 1);

        let serialized = serde_json::to_value(&meta).unwrap();
        assert_eq!(serialized, json!({ "a": 1 }));
    }
}
