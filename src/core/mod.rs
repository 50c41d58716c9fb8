pub mod archive;
pub mod calibration;
pub mod channels;
pub mod constants;
pub mod error;
pub mod format;
pub mod properties;
pub mod reader;
pub mod segments;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod test_support;
