//! Ordered string mappings shared by the query and header builders.
//!
//! # Design
//! `Params` keeps `(name, value)` pairs in insertion order so encoded output
//! is deterministic, while equality ignores order. A mapping never stores an
//! "absent" value: writes go through [`Params::merge`], which deletes a key
//! whenever the incoming value is absent instead of keeping a placeholder.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A value that may be absent. Absent values remove the key they are
/// written to.
pub trait MaybeValue {
    fn into_value(self) -> Option<String>;
}

impl MaybeValue for &str {
    fn into_value(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl MaybeValue for String {
    fn into_value(self) -> Option<String> {
        Some(self)
    }
}

impl MaybeValue for &String {
    fn into_value(self) -> Option<String> {
        Some(self.clone())
    }
}

impl MaybeValue for Option<&str> {
    fn into_value(self) -> Option<String> {
        self.map(str::to_string)
    }
}

impl MaybeValue for Option<String> {
    fn into_value(self) -> Option<String> {
        self
    }
}

/// Either a replacement value or a transform of the current one.
pub enum MaybeCallback<'a, T> {
    Replace(T),
    Transform(Box<dyn FnOnce(T) -> T + 'a>),
}

impl<'a, T> MaybeCallback<'a, T> {
    pub fn transform(f: impl FnOnce(T) -> T + 'a) -> Self {
        MaybeCallback::Transform(Box::new(f))
    }

    /// Produce the new value given the currently stored one.
    pub fn resolve(self, current: T) -> T {
        match self {
            MaybeCallback::Replace(value) => value,
            MaybeCallback::Transform(f) => f(current),
        }
    }
}

impl<T> From<T> for MaybeCallback<'_, T> {
    fn from(value: T) -> Self {
        MaybeCallback::Replace(value)
    }
}

impl<T: fmt::Debug> fmt::Debug for MaybeCallback<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaybeCallback::Replace(value) => f.debug_tuple("Replace").field(value).finish(),
            MaybeCallback::Transform(_) => f.write_str("Transform(..)"),
        }
    }
}

/// Insertion-ordered mapping of unique string keys to string values.
#[derive(Debug, Clone, Default)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the mapping and apply `entries` in order. Existing keys keep
    /// their position; absent values delete the key.
    #[must_use]
    pub fn merge<I, K, V>(&self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: MaybeValue,
    {
        let mut merged = self.0.clone();
        for (name, value) in entries {
            let name = name.into();
            match value.into_value() {
                Some(value) => match merged.iter_mut().find(|(key, _)| *key == name) {
                    Some(entry) => entry.1 = value,
                    None => merged.push((name, value)),
                },
                None => merged.retain(|(key, _)| *key != name),
            }
        }
        Self(merged)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(key, value)| (key.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PartialEq for Params {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(key, value)| other.get(key) == Some(value))
    }
}

impl Eq for Params {}

impl<K: Into<String>, V: MaybeValue> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Params::new().merge(iter)
    }
}

impl Serialize for Params {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

struct ParamsVisitor;

impl<'de> Visitor<'de> for ParamsVisitor {
    type Value = Params;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of string keys to string or null values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Params, A::Error> {
        let mut entries: Vec<(String, Option<String>)> = Vec::new();
        while let Some((key, value)) = access.next_entry::<String, Option<String>>()? {
            entries.push((key, value));
        }
        Ok(entries.into_iter().collect())
    }
}

impl<'de> Deserialize<'de> for Params {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ParamsVisitor)
    }
}
