// * Key/value container shared by every KV extraction path.
// * A recurring key accumulates its values into a sequence instead of overwriting.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// A single value, or every value seen for a recurring key in arrival order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KvValue {
    Single(String),
    Many(Vec<String>),
}

impl KvValue {
    /// All values in arrival order
    pub fn values(&self) -> Vec<&str> {
        match self {
            KvValue::Single(v) => vec![v.as_str()],
            KvValue::Many(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    /// The first value seen for the key
    pub fn first(&self) -> Option<&str> {
        match self {
            KvValue::Single(v) => Some(v.as_str()),
            KvValue::Many(vs) => vs.first().map(String::as_str),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            KvValue::Single(existing) => {
                let first = std::mem::take(existing);
                *self = KvValue::Many(vec![first, value]);
            }
            KvValue::Many(vs) => vs.push(value),
        }
    }
}

impl From<&str> for KvValue {
    fn from(value: &str) -> Self {
        KvValue::Single(value.to_string())
    }
}

impl From<String> for KvValue {
    fn from(value: String) -> Self {
        KvValue::Single(value)
    }
}

impl From<Vec<&str>> for KvValue {
    fn from(values: Vec<&str>) -> Self {
        KvValue::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// Ordered key/value map with append-on-collision semantics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KvMap(IndexMap<String, KvValue>);

impl KvMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value; a recurring key turns into (or extends) a sequence
    pub fn accumulate(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        match self.0.entry(key.into()) {
            Entry::Occupied(mut existing) => existing.get_mut().push(value),
            Entry::Vacant(slot) => {
                slot.insert(KvValue::Single(value));
            }
        }
    }

    /// Appends every value of `value` under `key`, in order
    pub fn append(&mut self, key: impl Into<String>, value: KvValue) {
        let key = key.into();
        match value {
            KvValue::Single(v) => self.accumulate(key, v),
            KvValue::Many(vs) => {
                for v in vs {
                    self.accumulate(key.clone(), v);
                }
            }
        }
    }

    /// Folds another map in, appending on collision
    pub fn extend_appending(&mut self, other: KvMap) {
        for (key, value) in other.0 {
            self.append(key, value);
        }
    }

    /// Inserts only when the key is not present yet
    pub fn insert_if_absent(&mut self, key: impl Into<String>, value: KvValue) {
        self.0.entry(key.into()).or_insert(value);
    }

    pub fn get(&self, key: &str) -> Option<&KvValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &KvValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl IntoIterator for KvMap {
    type Item = (String, KvValue);
    type IntoIter = indexmap::map::IntoIter<String, KvValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
