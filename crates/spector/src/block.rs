use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{Error, Result};
use crate::pattern::BytePattern;

/// Where a block's offset is measured from
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    EnumString,
    Display,
)]
#[strum(ascii_case_insensitive)]
pub enum SeekMode {
    /// Forward from the start of the file
    #[default]
    Begin,
    /// Forward from the current read position
    Current,
    /// Backward from the end of the file
    End,
}

impl SeekMode {
    /// Absolute position for `offset` given the current position and file length.
    ///
    /// Returns `None` when the position would be negative or overflow. Range
    /// checking against the file length is left to the caller.
    pub fn resolve(self, offset: u64, current: u64, file_len: u64) -> Option<u64> {
        match self {
            Self::Begin => Some(offset),
            Self::Current => current.checked_add(offset),
            Self::End => file_len.checked_sub(offset),
        }
    }
}

/// One offset + pattern test within a signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "DataBlockRecord", into = "DataBlockRecord")]
pub struct DataBlock {
    name: String,
    offset: u64,
    seek: SeekMode,
    bytes: BytePattern,
}

impl DataBlock {
    /// Create a block, rejecting negative offsets and malformed patterns.
    pub fn new(name: impl Into<String>, offset: i64, seek: SeekMode, bytes: &str) -> Result<Self> {
        let name = name.into();
        let offset = u64::try_from(offset).map_err(|_| Error::InvalidOffset {
            block: name.clone(),
            offset,
        })?;

        Ok(Self {
            name,
            offset,
            seek,
            bytes: BytePattern::new(bytes)?,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn seek(&self) -> SeekMode {
        self.seek
    }

    pub fn pattern(&self) -> &BytePattern {
        &self.bytes
    }

    /// Number of bytes this block reads
    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    pub fn resolve_offset(&self, current: u64, file_len: u64) -> Option<u64> {
        self.seek.resolve(self.offset, current, file_len)
    }
}

/// Serialized form of a block
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DataBlockRecord {
    #[serde(default)]
    name: String,
    #[serde(default)]
    offset: i64,
    #[serde(default)]
    seek: SeekMode,
    bytes: String,
}

impl TryFrom<DataBlockRecord> for DataBlock {
    type Error = Error;

    fn try_from(record: DataBlockRecord) -> Result<Self> {
        Self::new(record.name, record.offset, record.seek, &record.bytes)
    }
}

impl From<DataBlock> for DataBlockRecord {
    fn from(block: DataBlock) -> Self {
        Self {
            name: block.name,
            offset: i64::try_from(block.offset).unwrap_or(i64::MAX),
            seek: block.seek,
            bytes: block.bytes.into(),
        }
    }
}
