// Data structures handed to analysis and external layers

use crate::core::channels::Channel;
use crate::core::error::Result;
use crate::core::properties::PropertyMap;
use crate::core::calibration::Calibration;
use crate::core::channels::ChannelIndex;
use crate::core::segments::SegmentCatalog;
use serde::Serialize;

/// Everything extracted from the headers of one archive.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Properties {
    /// Root header merged with the shared header.
    pub general: PropertyMap,
    pub channels: ChannelIndex,
    pub calibration: Calibration,
    pub segments: SegmentCatalog,
}

impl Properties {
    pub fn timestamp(&self) -> Option<&str> {
        self.general.timestamp()
    }

    pub fn unit(&self, channel: Channel) -> Option<&str> {
        self.calibration.unit(channel)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Calibrated samples of one channel in one segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicalCurve {
    pub channel: Channel,
    pub unit: String,
    pub values: Vec<f64>,
}

impl PhysicalCurve {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Force and height of one segment, sample-aligned.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentCurves {
    pub segment: String,
    pub force: PhysicalCurve,
    pub height: PhysicalCurve,
}
