// Zip container access for force archives

use crate::core::constants::*;
use crate::core::error::{ForceFileError, Result};
use crate::core::properties::{self, PropertyMap};
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;
use tracing::{debug, info};
use zip::ZipArchive;

/// One entry of the archive listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub name: String,
    pub size: u64,
    pub compressed_size: u64,
}

pub struct ForceArchive<R: Read + Seek = BufReader<File>> {
    zip: ZipArchive<R>,
}

impl ForceArchive<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        info!("opening force archive {}", path.display());
        Self::from_reader(BufReader::new(file))
    }
}

impl<R: Read + Seek> ForceArchive<R> {
    /// Wraps any seekable source and checks the format magic up front.
    pub fn from_reader(reader: R) -> Result<Self> {
        let zip = ZipArchive::new(reader)
            .map_err(|e| ForceFileError::ArchiveFormat(format!("not a zip container: {}", e)))?;
        let mut archive = Self { zip };
        archive.check_magic()?;
        Ok(archive)
    }

    fn check_magic(&mut self) -> Result<()> {
        let lines = self.read_text_entry(ROOT_HEADER).map_err(|e| match e {
            ForceFileError::Zip(_) => {
                ForceFileError::ArchiveFormat(format!("missing {}", ROOT_HEADER))
            }
            other => other,
        })?;

        let got = lines
            .iter()
            .skip(1)
            .filter_map(|line| line.split_once('='))
            .filter(|(key, _)| *key == MAGIC_KEY)
            .map(|(_, value)| value.to_string())
            .last();

        if got.as_deref() != Some(MAGIC) {
            return Err(ForceFileError::InvalidMagic {
                expected: MAGIC.to_string(),
                got,
            });
        }
        Ok(())
    }

    /// Entries in archive order.
    pub fn list_entries(&mut self) -> Result<Vec<EntryInfo>> {
        let mut entries = Vec::with_capacity(self.zip.len());
        for i in 0..self.zip.len() {
            let file = self.zip.by_index(i)?;
            entries.push(EntryInfo {
                name: file.name().to_string(),
                size: file.size(),
                compressed_size: file.compressed_size(),
            });
        }
        Ok(entries)
    }

    /// Reads a `.properties` entry as UTF-8 lines without line terminators.
    pub fn read_text_entry(&mut self, path: &str) -> Result<Vec<String>> {
        if !path.ends_with(PROPERTY_EXT) {
            return Err(ForceFileError::EntryType {
                path: path.to_string(),
                expected: PROPERTY_EXT,
            });
        }

        let bytes = self.read_entry(path)?;
        let text = String::from_utf8(bytes)?;
        Ok(text.lines().map(str::to_string).collect())
    }

    /// Reads a `.dat` entry as raw bytes.
    pub fn read_binary_entry(&mut self, path: &str) -> Result<Vec<u8>> {
        if !path.ends_with(DATA_EXT) {
            return Err(ForceFileError::EntryType {
                path: path.to_string(),
                expected: DATA_EXT,
            });
        }
        self.read_entry(path)
    }

    /// Reads and parses a property entry.
    pub fn read_properties(&mut self, path: &str) -> Result<PropertyMap> {
        let lines = self.read_text_entry(path)?;
        properties::parse(&lines)
    }

    /// Decodes a data entry as big-endian i32 samples.
    pub fn read_samples(&mut self, path: &str) -> Result<Vec<i32>> {
        let bytes = self.read_binary_entry(path)?;
        decode_samples(path, &bytes)
    }

    fn read_entry(&mut self, path: &str) -> Result<Vec<u8>> {
        let mut file = self.zip.by_name(path)?;
        let mut buf = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut buf)?;
        debug!("read entry {} ({} bytes)", path, buf.len());
        Ok(buf)
    }

    /// Releases the underlying reader.
    pub fn into_inner(self) -> R {
        self.zip.into_inner()
    }
}

pub fn decode_samples(path: &str, bytes: &[u8]) -> Result<Vec<i32>> {
    if bytes.len() % SAMPLE_SIZE != 0 {
        return Err(ForceFileError::TruncatedData {
            path: path.to_string(),
            len: bytes.len(),
        });
    }

    Ok(bytes
        .chunks_exact(SAMPLE_SIZE)
        .map(|c| i32::from_be_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}
