// Java-style property files: `key=value` lines after a `#<timestamp>` header

use crate::core::constants::TIMESTAMP_KEY;
use crate::core::error::{ForceFileError, Result};
use crate::core::timestamp::parse_header_timestamp;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::HashMap;
use tracing::warn;

/// Flat dotted-key map that keeps the order keys were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyMap {
    entries: Vec<(String, String)>,
    index: HashMap<String, usize>,
}

impl PropertyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites; an overwritten key keeps its original position.
    /// Returns the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&pos) => Some(std::mem::replace(&mut self.entries[pos].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.index
            .get(key)
            .map(|&pos| self.entries[pos].1.as_str())
    }

    /// Like `get`, but a missing key is a corrupted file.
    pub fn require(&self, key: &str) -> Result<&str> {
        self.get(key)
            .ok_or_else(|| ForceFileError::corrupted(key, "required property is missing"))
    }

    pub fn require_f64(&self, key: &str) -> Result<f64> {
        let raw = self.require(key)?;
        raw.trim().parse::<f64>().map_err(|e| {
            ForceFileError::corrupted(key, format!("{:?} is not a number: {}", raw, e))
        })
    }

    pub fn require_usize(&self, key: &str) -> Result<usize> {
        let raw = self.require(key)?;
        raw.trim().parse::<usize>().map_err(|e| {
            ForceFileError::corrupted(key, format!("{:?} is not a count: {}", raw, e))
        })
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The parsed header timestamp, if this map came from `parse`.
    pub fn timestamp(&self) -> Option<&str> {
        self.get(TIMESTAMP_KEY)
    }

    /// Merges `other` into `self`; `other` wins on collisions.
    pub fn merge(&mut self, other: &PropertyMap) {
        for (key, value) in other.iter() {
            self.insert(key, value);
        }
    }

    /// `key=value` lines, one per entry, in map order.
    pub fn to_lines(&self) -> Vec<String> {
        self.iter().map(|(k, v)| format!("{}={}", k, v)).collect()
    }
}

impl Serialize for PropertyMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Parses the lines of one property entry. Line 0 is the `#<date>` header,
/// stored under the reserved `timestamp` key.
pub fn parse<S: AsRef<str>>(lines: &[S]) -> Result<PropertyMap> {
    let (header, body) = lines
        .split_first()
        .ok_or_else(|| ForceFileError::corrupted(TIMESTAMP_KEY, "property file is empty"))?;

    let mut props = parse_pairs(body)?;
    let timestamp = parse_header_timestamp(header.as_ref().trim())?;
    props.insert(TIMESTAMP_KEY, timestamp);

    Ok(props)
}

/// Parses `key=value` lines without a header line. Blank lines are skipped.
pub fn parse_pairs<S: AsRef<str>>(lines: &[S]) -> Result<PropertyMap> {
    let mut props = PropertyMap::new();

    for line in lines {
        let line = line.as_ref();
        if line.trim().is_empty() {
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| ForceFileError::corrupted(line, "missing '=' separator"))?;
        if key.is_empty() {
            return Err(ForceFileError::corrupted(line, "empty key"));
        }

        if let Some(previous) = props.insert(key, value) {
            warn!("duplicate property {} overwritten (was {:?})", key, previous);
        }
    }

    Ok(props)
}
