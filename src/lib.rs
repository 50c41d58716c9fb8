// JPK force file reader
// Main library entry point

pub mod core;
pub mod models;
pub mod processing;
pub mod utils;

// Re-export main types
pub use crate::core::archive::{EntryInfo, ForceArchive};
pub use crate::core::calibration::{Affine, Calibration, DeflectionFactors, HeightFactors};
pub use crate::core::channels::{Channel, ChannelIndex};
pub use crate::core::error::{ForceFileError, Result};
pub use crate::core::format::{PhysicalCurve, Properties, SegmentCurves};
pub use crate::core::properties::PropertyMap;
pub use crate::core::reader::ForceFile;
pub use crate::core::segments::{SegmentCatalog, SegmentNaming, SegmentRecord};
pub use crate::models::config_model::AnalysisConfig;
pub use crate::processing::curve_features::{global_minimum, CurvePoint};
pub use crate::processing::step_detection::{step_curve, StepDetector};
