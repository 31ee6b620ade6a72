//! Form arguments for POST bodies
//!
//! This module provides an insertion-ordered key/value collection that
//! serializes to `application/x-www-form-urlencoded`.

use std::fmt;
use url::form_urlencoded;

/// Content type of a serialized `FormArgs` body
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Form arguments
///
/// Pairs are kept in insertion order and serialized in that order.
/// Inserting an existing key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormArgs {
    pairs: Vec<(String, String)>,
}

impl FormArgs {
    /// Create an empty collection
    pub fn new() -> Self {
        FormArgs { pairs: Vec::new() }
    }

    /// Insert a key/value pair
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();

        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Get the value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Iterate over pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize to an `application/x-www-form-urlencoded` string
    pub fn encode(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }

    /// Parse a `key=value` argument, as given on the command line
    pub fn parse_pair(arg: &str) -> Option<(String, String)> {
        let (key, value) = arg.split_once('=')?;
        if key.is_empty() {
            return None;
        }
        Some((key.to_string(), value.to_string()))
    }
}

impl fmt::Display for FormArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormArgs {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut args = FormArgs::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}
