use serde::{Deserialize, Serialize};

use crate::core::constants::{DEFAULT_SEGMENT_NAMES, DEFAULT_SEGMENT_SUFFIX};
use crate::core::segments::SegmentNaming;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub step_threshold: f64,
    pub step_min_distance: usize,
    pub segment_suffixes: Vec<String>,
    pub segment_names: Vec<SegmentRename>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentRename {
    pub vendor: String,
    pub canonical: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            step_threshold: 0.3,
            step_min_distance: 50,
            segment_suffixes: vec![DEFAULT_SEGMENT_SUFFIX.to_string()],
            segment_names: DEFAULT_SEGMENT_NAMES
                .iter()
                .map(|(vendor, canonical)| SegmentRename {
                    vendor: vendor.to_string(),
                    canonical: canonical.to_string(),
                })
                .collect(),
        }
    }
}

impl AnalysisConfig {
    pub fn segment_naming(&self) -> SegmentNaming {
        SegmentNaming {
            suffixes: self.segment_suffixes.clone(),
            names: self
                .segment_names
                .iter()
                .map(|r| (r.vendor.clone(), r.canonical.clone()))
                .collect(),
        }
    }
}
