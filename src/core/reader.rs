// Force file loader: owns the open archive and the parsed header data

use crate::core::archive::ForceArchive;
use crate::core::calibration::Calibration;
use crate::core::channels::{self, Channel};
use crate::core::constants::*;
use crate::core::error::{ForceFileError, Result};
use crate::core::format::{PhysicalCurve, Properties, SegmentCurves};
use crate::core::segments::{SegmentCatalog, SegmentNaming};
use crate::models::config_model::AnalysisConfig;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::info;

pub struct ForceFile<R: Read + Seek = BufReader<File>> {
    archive: ForceArchive<R>,
    properties: Properties,
}

impl ForceFile<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_archive(ForceArchive::open(path)?, &SegmentNaming::default())
    }

    pub fn open_with_config<P: AsRef<Path>>(path: P, config: &AnalysisConfig) -> Result<Self> {
        Self::from_archive(ForceArchive::open(path)?, &config.segment_naming())
    }
}

impl<R: Read + Seek> ForceFile<R> {
    /// Builds the header data; fails on the first missing piece.
    pub fn from_archive(mut archive: ForceArchive<R>, naming: &SegmentNaming) -> Result<Self> {
        let properties = load_properties(&mut archive, naming)?;
        Ok(Self {
            archive,
            properties,
        })
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn archive(&mut self) -> &mut ForceArchive<R> {
        &mut self.archive
    }

    /// Raw samples of `channel` in the segment at `position`.
    pub fn decode_segment(&mut self, position: usize, channel: Channel) -> Result<Vec<i32>> {
        self.archive
            .read_samples(&channel_data_path(position, channel.as_str()))
    }

    /// Raw (vDeflection, height) samples of a segment by canonical name.
    pub fn encoded_segment(&mut self, name: &str) -> Result<(Vec<i32>, Vec<i32>)> {
        let position = self.segment_position(name)?;
        let deflection = self.decode_segment(position, Channel::VDeflection)?;
        let height = self.decode_segment(position, Channel::Height)?;
        Ok((deflection, height))
    }

    pub fn convert(&self, channel: Channel, raw: &[i32]) -> Result<Vec<f64>> {
        self.properties.calibration.convert(channel, raw)
    }

    pub fn physical_curve(&mut self, name: &str, channel: Channel) -> Result<PhysicalCurve> {
        let position = self.segment_position(name)?;
        let raw = self.decode_segment(position, channel)?;
        let values = self.convert(channel, &raw)?;
        let unit = self.properties.unit(channel).unwrap_or_default().to_string();
        Ok(PhysicalCurve {
            channel,
            unit,
            values,
        })
    }

    /// Force (from vDeflection) and height of one segment.
    pub fn segment_curves(&mut self, name: &str) -> Result<SegmentCurves> {
        let force = self.physical_curve(name, Channel::VDeflection)?;
        let height = self.physical_curve(name, Channel::Height)?;
        Ok(SegmentCurves {
            segment: name.to_string(),
            force,
            height,
        })
    }

    /// Curves for every catalogued segment, in catalog order.
    pub fn load_curves(&mut self) -> Result<Vec<SegmentCurves>> {
        let names: Vec<String> = self.properties.segments.names().map(str::to_string).collect();
        names.iter().map(|name| self.segment_curves(name)).collect()
    }

    /// Closes the archive, keeping the header data.
    pub fn into_properties(self) -> Properties {
        self.properties
    }

    fn segment_position(&self, name: &str) -> Result<usize> {
        self.properties
            .segments
            .get(name)
            .map(|record| record.number)
            .ok_or_else(|| ForceFileError::SegmentNotFound(name.to_string()))
    }
}

/// Root + shared headers, channels, calibration and segments.
pub fn load_properties<R: Read + Seek>(
    archive: &mut ForceArchive<R>,
    naming: &SegmentNaming,
) -> Result<Properties> {
    let mut general = archive.read_properties(ROOT_HEADER)?;
    let shared = archive.read_properties(SHARED_HEADER)?;
    general.merge(&shared);

    let channels = channels::resolve(&general)?;
    let calibration = Calibration::extract(&general, &channels)?;
    let segments = SegmentCatalog::enumerate(&general, archive, naming)?;

    info!(
        "force file loaded: {} properties, {} segments, channels {:?}",
        general.len(),
        segments.len(),
        channels.iter().collect::<Vec<_>>()
    );

    Ok(Properties {
        general,
        channels,
        calibration,
        segments,
    })
}
