// Error handling for JPK force archives

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ForceFileError>;

#[derive(Error, Debug)]
pub enum ForceFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive entry error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("Not a valid force archive: {0}")]
    ArchiveFormat(String),

    #[error("Invalid magic property: expected {expected:?}, got {got:?}")]
    InvalidMagic { expected: String, got: Option<String> },

    #[error("Entry {path:?} is not a {expected} file")]
    EntryType { path: String, expected: &'static str },

    #[error("Property corrupted: {key:?}: {reason}")]
    PropertyCorruption { key: String, reason: String },

    #[error("Channel {channel:?} error: {reason}")]
    ChannelResolution { channel: String, reason: String },

    #[error("Segment not found: {0}")]
    SegmentNotFound(String),

    #[error("Invalid input samples: {0}")]
    InputType(String),

    #[error("Data entry {path:?} has {len} bytes, not a multiple of the sample size")]
    TruncatedData { path: String, len: usize },

    #[error("x and y differ in length: {x} != {y}")]
    ShapeMismatch { x: usize, y: usize },

    #[error("Empty curve: {0}")]
    EmptyCurve(String),

    #[error("Invalid UTF-8 string")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),
}

impl ForceFileError {
    pub(crate) fn corrupted(key: impl Into<String>, reason: impl Into<String>) -> Self {
        ForceFileError::PropertyCorruption {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn channel(channel: impl Into<String>, reason: impl Into<String>) -> Self {
        ForceFileError::ChannelResolution {
            channel: channel.into(),
            reason: reason.into(),
        }
    }

    /// Container is not a zip or carries the wrong format magic.
    pub fn is_archive_format(&self) -> bool {
        matches!(
            self,
            ForceFileError::ArchiveFormat(_) | ForceFileError::InvalidMagic { .. }
        )
    }

    pub fn is_entry_type(&self) -> bool {
        matches!(self, ForceFileError::EntryType { .. })
    }

    pub fn is_property_corruption(&self) -> bool {
        matches!(self, ForceFileError::PropertyCorruption { .. })
    }

    pub fn is_channel_resolution(&self) -> bool {
        matches!(self, ForceFileError::ChannelResolution { .. })
    }

    pub fn is_input_type(&self) -> bool {
        matches!(self, ForceFileError::InputType(_))
    }
}
