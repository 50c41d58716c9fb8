// In-memory force archives for tests

use crate::core::archive::ForceArchive;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub const HEADER_LINE: &str = "#Thu Jun 02 16:08:04 CEST 2016";
pub const SAMPLES_PER_SEGMENT: usize = 1000;
pub const FIRST_VDEFLECTION: i32 = -4454604;
pub const FIRST_HEIGHT: i32 = 468876141;

pub const ROOT_BODY: [&str; 4] = [
    "jpk-data-file=spm-forcefile",
    "file-format-version=0.12",
    "force-scan-series.force-segments.count=4",
    "force-scan-series.header.force-settings.type=relative-force-settings",
];

pub const SHARED_BODY: [&str; 26] = [
    "lcd-infos.count=4",
    "lcd-info.0.channel.name=height",
    "lcd-info.0.encoder.scaling.multiplier=1.0E-9",
    "lcd-info.0.encoder.scaling.offset=0.0",
    "lcd-info.0.conversion-set.conversion.nominal.scaling.multiplier=8.33549059078696E-5",
    "lcd-info.0.conversion-set.conversion.nominal.scaling.offset=0.0",
    "lcd-info.0.conversion-set.conversion.nominal.scaling.unit.unit=m",
    "lcd-info.1.channel.name=vDeflection",
    "lcd-info.1.encoder.scaling.multiplier=5.525411033343059E-9",
    "lcd-info.1.encoder.scaling.offset=-6.075877326676198E-4",
    "lcd-info.1.conversion-set.conversion.distance.scaling.multiplier=7.730641603896163E-8",
    "lcd-info.1.conversion-set.conversion.distance.scaling.offset=0.0",
    "lcd-info.1.conversion-set.conversion.distance.scaling.unit.unit=m",
    "lcd-info.1.conversion-set.conversion.force.scaling.multiplier=0.01529211140472191",
    "lcd-info.1.conversion-set.conversion.force.scaling.offset=0.0",
    "lcd-info.1.conversion-set.conversion.force.scaling.unit.unit=N",
    "lcd-info.2.channel.name=hDeflection",
    "lcd-info.2.encoder.scaling.multiplier=2.0E-9",
    "lcd-info.2.encoder.scaling.offset=0.0",
    "lcd-info.3.channel.name=capacitiveSensorHeight",
    "lcd-info.3.encoder.scaling.multiplier=3.0E-9",
    "lcd-info.3.encoder.scaling.offset=0.0",
    "force-scan-series.header.force-settings.type=shared-settings",
    "lcd-info.1.channel.label=vDeflection",
    "lcd-info.1.type=channel-info",
    "lcd-info.0.type=channel-info",
];

pub const SEGMENT_NAMES: [&str; 4] = [
    "extend-cellhesion200",
    "pause-at-end-cellhesion200",
    "retract-cellhesion200",
    "pause-at-start-cellhesion200",
];

pub struct FixtureSegment {
    pub header: Vec<String>,
    pub vdeflection: Vec<u8>,
    pub height: Vec<u8>,
}

pub struct FixtureBuilder {
    root: Vec<String>,
    shared: Vec<String>,
    segments: Vec<FixtureSegment>,
}

impl FixtureBuilder {
    /// The canonical four-segment fixture.
    pub fn new() -> Self {
        let segments = SEGMENT_NAMES
            .iter()
            .map(|name| FixtureSegment {
                header: vec![
                    format!("force-segment-header.name.name={}", name),
                    format!("force-segment-header.num-points={}", SAMPLES_PER_SEGMENT),
                ],
                vdeflection: encode(&ramp(FIRST_VDEFLECTION, 100)),
                height: encode(&ramp(FIRST_HEIGHT, -1000)),
            })
            .collect();

        Self {
            root: to_lines(&ROOT_BODY),
            shared: to_lines(&SHARED_BODY),
            segments,
        }
    }

    pub fn root_header(mut self, body: &[&str]) -> Self {
        self.root = to_lines(body);
        self
    }

    /// Drops shared-header lines whose key is exactly `key`.
    pub fn without_shared(mut self, key: &str) -> Self {
        self.shared
            .retain(|line| line.split_once('=').map(|(k, _)| k) != Some(key));
        self
    }

    pub fn with_shared(mut self, line: &str) -> Self {
        self.shared.push(line.to_string());
        self
    }

    pub fn segment_name(mut self, position: usize, name: &str) -> Self {
        self.segments[position].header[0] = format!("force-segment-header.name.name={}", name);
        self
    }

    pub fn raw_vdeflection(mut self, position: usize, bytes: Vec<u8>) -> Self {
        self.segments[position].vdeflection = bytes;
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        write_text(&mut zip, "header.properties", &self.root);
        write_text(&mut zip, "shared-data/header.properties", &self.shared);
        for (i, segment) in self.segments.iter().enumerate() {
            write_text(
                &mut zip,
                &format!("segments/{}/segment-header.properties", i),
                &segment.header,
            );
            write_bytes(
                &mut zip,
                &format!("segments/{}/channels/vDeflection.dat", i),
                &segment.vdeflection,
            );
            write_bytes(
                &mut zip,
                &format!("segments/{}/channels/height.dat", i),
                &segment.height,
            );
        }

        zip.finish().unwrap().into_inner()
    }
}

pub fn fixture_bytes() -> Vec<u8> {
    FixtureBuilder::new().build()
}

pub fn open_fixture() -> ForceArchive<Cursor<Vec<u8>>> {
    ForceArchive::from_reader(Cursor::new(fixture_bytes())).unwrap()
}

fn ramp(first: i32, step: i32) -> Vec<i32> {
    (0..SAMPLES_PER_SEGMENT as i32).map(|i| first + i * step).collect()
}

pub fn encode(samples: &[i32]) -> Vec<u8> {
    samples.iter().flat_map(|s| s.to_be_bytes()).collect()
}

fn to_lines(body: &[&str]) -> Vec<String> {
    body.iter().map(|s| s.to_string()).collect()
}

fn entry_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}

fn write_text(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    body: &[String],
) {
    zip.start_file(name, entry_options()).unwrap();
    writeln!(zip, "{}", HEADER_LINE).unwrap();
    for line in body {
        writeln!(zip, "{}", line).unwrap();
    }
}

fn write_bytes(
    zip: &mut ZipWriter<Cursor<Vec<u8>>>,
    name: &str,
    bytes: &[u8],
) {
    zip.start_file(name, entry_options()).unwrap();
    zip.write_all(bytes).unwrap();
}
