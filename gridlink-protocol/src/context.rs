//! Per-call transport metadata

use std::collections::HashMap;

/// Metadata key carrying the callback connection id on forward requests.
///
/// The value is the decimal string form of an unsigned 32-bit integer and
/// must appear exactly once.
pub const CALLBACK_ID_KEY: &str = "broker_requestId";

/// Transport-level metadata attached to one call.
///
/// Keys map to ordered lists of values, like gRPC metadata or HTTP headers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: HashMap<String, Vec<String>>,
}

impl Metadata {
    /// Create empty metadata.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all values under `key` with a single value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.insert(key.into(), vec![value.into()]);
    }

    /// Append a value under `key`, keeping existing ones.
    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// All values stored under `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(|v| v.as_slice())
    }

    /// The value under `key`, but only if the key holds exactly one value.
    pub fn get_exactly_one(&self, key: &str) -> Option<&str> {
        match self.entries.get(key) {
            Some(values) if values.len() == 1 => Some(values[0].as_str()),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Context for one inbound or outbound call.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    /// Transport metadata for this call.
    pub metadata: Metadata,
}

impl RequestContext {
    /// Create a context with empty metadata.
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exactly_one_requires_a_single_value() {
        let mut md = Metadata::new();
        assert_eq!(md.get_exactly_one(CALLBACK_ID_KEY), None);

        md.insert(CALLBACK_ID_KEY, "7");
        assert_eq!(md.get_exactly_one(CALLBACK_ID_KEY), Some("7"));

        md.append(CALLBACK_ID_KEY, "8");
        assert_eq!(md.get_exactly_one(CALLBACK_ID_KEY), None);
    }

    #[test]
    fn insert_replaces_previous_values() {
        let mut md = Metadata::new();
        md.append("trace", "a");
        md.append("trace", "b");
        assert_eq!(md.get("trace"), Some(&["a".to_string(), "b".to_string()][..]));

        md.insert("trace", "c");
        assert_eq!(md.get_exactly_one("trace"), Some("c"));
    }
}
