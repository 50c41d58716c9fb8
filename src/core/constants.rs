// Format constants for JPK force archives

pub const MAGIC_KEY: &str = "jpk-data-file";
pub const MAGIC: &str = "spm-forcefile";

// Archive layout
pub const ROOT_HEADER: &str = "header.properties";
pub const SHARED_HEADER: &str = "shared-data/header.properties";
pub const PROPERTY_EXT: &str = ".properties";
pub const DATA_EXT: &str = ".dat";

pub fn segment_header_path(position: usize) -> String {
    format!("segments/{}/segment-header.properties", position)
}

pub fn channel_data_path(position: usize, channel: &str) -> String {
    format!("segments/{}/channels/{}{}", position, channel, DATA_EXT)
}

// Reserved keys added by the parser / segment catalog
pub const TIMESTAMP_KEY: &str = "timestamp";
pub const SEGMENT_NAME_KEY: &str = "name";
pub const SEGMENT_VENDOR_NAME_KEY: &str = "vendor_name";
pub const SEGMENT_NUMBER_KEY: &str = "segment_number";

// Header keys
pub const SEGMENT_COUNT_KEY: &str = "force-scan-series.force-segments.count";
pub const SEGMENT_VENDOR_NAME_SOURCE: &str = "force-segment-header.name.name";

// Channel index position: lcd-info.<d>.channel.name
pub const CHANNEL_KEY_PREFIX: &str = "lcd-info.";
pub const CHANNEL_KEY_SUFFIX: &str = ".channel.name";

// Record format: big-endian i32 per sample
pub const SAMPLE_SIZE: usize = 4;

pub const DEFAULT_SEGMENT_SUFFIX: &str = "-cellhesion200";

// Vendor segment name -> canonical name
pub const DEFAULT_SEGMENT_NAMES: [(&str, &str); 3] = [
    ("extend", "approach"),
    ("pause-at-end", "contact"),
    ("pause-at-start", "pause"),
];

// Calibration key templates, `{i}` is the resolved channel index.
pub const RAW_MULTIPLIER: &str = "lcd-info.{i}.encoder.scaling.multiplier";
pub const RAW_OFFSET: &str = "lcd-info.{i}.encoder.scaling.offset";
pub const DISTANCE_MULTIPLIER: &str =
    "lcd-info.{i}.conversion-set.conversion.distance.scaling.multiplier";
pub const DISTANCE_OFFSET: &str = "lcd-info.{i}.conversion-set.conversion.distance.scaling.offset";
pub const FORCE_MULTIPLIER: &str = "lcd-info.{i}.conversion-set.conversion.force.scaling.multiplier";
pub const FORCE_OFFSET: &str = "lcd-info.{i}.conversion-set.conversion.force.scaling.offset";
pub const FORCE_UNIT: &str = "lcd-info.{i}.conversion-set.conversion.force.scaling.unit.unit";
pub const NOMINAL_MULTIPLIER: &str =
    "lcd-info.{i}.conversion-set.conversion.nominal.scaling.multiplier";
pub const NOMINAL_OFFSET: &str = "lcd-info.{i}.conversion-set.conversion.nominal.scaling.offset";
pub const NOMINAL_UNIT: &str = "lcd-info.{i}.conversion-set.conversion.nominal.scaling.unit.unit";

pub fn expand_key(template: &str, index: &str) -> String {
    template.replace("{i}", index)
}
