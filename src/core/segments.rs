// Segment catalog: per-segment headers keyed by canonical name

use crate::core::archive::ForceArchive;
use crate::core::constants::*;
use crate::core::error::Result;
use crate::core::properties::PropertyMap;
use serde::Serialize;
use std::io::{Read, Seek};
use tracing::{debug, warn};

/// Vendor -> canonical segment naming rules.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentNaming {
    pub suffixes: Vec<String>,
    pub names: Vec<(String, String)>,
}

impl Default for SegmentNaming {
    fn default() -> Self {
        Self {
            suffixes: vec![DEFAULT_SEGMENT_SUFFIX.to_string()],
            names: DEFAULT_SEGMENT_NAMES
                .iter()
                .map(|(vendor, canonical)| (vendor.to_string(), canonical.to_string()))
                .collect(),
        }
    }
}

impl SegmentNaming {
    /// Removes device suffixes from a raw vendor name.
    pub fn strip(&self, raw: &str) -> String {
        self.suffixes
            .iter()
            .fold(raw.to_string(), |name, suffix| name.replace(suffix.as_str(), ""))
    }

    /// Unknown names (e.g. `retract`) pass through unchanged.
    pub fn canonical(&self, vendor: &str) -> String {
        self.names
            .iter()
            .find(|(from, _)| from == vendor)
            .map(|(_, to)| to.clone())
            .unwrap_or_else(|| vendor.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentRecord {
    pub name: String,
    pub vendor_name: String,
    pub number: usize,
    pub properties: PropertyMap,
}

/// Segments in the order their canonical names were first seen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct SegmentCatalog {
    records: Vec<SegmentRecord>,
}

impl SegmentCatalog {
    /// Reads `count` segment headers from the archive.
    pub fn enumerate<R: Read + Seek>(
        general: &PropertyMap,
        archive: &mut ForceArchive<R>,
        naming: &SegmentNaming,
    ) -> Result<Self> {
        let count = general.require_usize(SEGMENT_COUNT_KEY)?;
        let mut catalog = Self::default();

        for number in 0..count {
            let mut properties = archive.read_properties(&segment_header_path(number))?;
            let vendor_name = naming.strip(properties.require(SEGMENT_VENDOR_NAME_SOURCE)?);
            let name = naming.canonical(&vendor_name);
            debug!("segment {}: {} -> {}", number, vendor_name, name);

            properties.insert(SEGMENT_VENDOR_NAME_KEY, vendor_name.as_str());
            properties.insert(SEGMENT_NAME_KEY, name.as_str());
            properties.insert(SEGMENT_NUMBER_KEY, number.to_string());

            catalog.insert(SegmentRecord {
                name,
                vendor_name,
                number,
                properties,
            });
        }

        Ok(catalog)
    }

    /// Last write wins on a canonical-name collision.
    pub fn insert(&mut self, record: SegmentRecord) {
        match self.records.iter_mut().find(|r| r.name == record.name) {
            Some(existing) => {
                warn!(
                    "segment name {} used by segments {} and {}, keeping {}",
                    record.name, existing.number, record.number, record.number
                );
                *existing = record;
            }
            None => self.records.push(record),
        }
    }

    pub fn get(&self, name: &str) -> Option<&SegmentRecord> {
        self.records.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.iter().map(|r| r.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SegmentRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
