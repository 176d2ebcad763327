// photometa/src/core/capabilities.rs
//! The narrow interfaces the aggregator talks to. Each has one default
//! implementation in `crate::processors`; tests and embedders can swap any
//! of them without touching the aggregation logic.
use super::{FieldValue, Result};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSummary {
    pub format: String,
    pub color_mode: String,
    pub width: u32,
    pub height: u32,
}

/// Opens an image far enough to report format, colour mode and dimensions.
pub trait Decoder {
    fn decode(&self, path: &Path) -> Result<ImageSummary>;
}

/// GPS IFD entries keyed by their numeric tag id.
pub type GpsBlock = BTreeMap<u16, FieldValue>;

#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Field(FieldValue),
    Gps(GpsBlock),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RawTag {
    pub tag: exif::Tag,
    pub value: RawValue,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExif {
    pub tags: Vec<RawTag>,
}

impl RawExif {
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }
}

/// Reads the primary-image EXIF tags. `Ok(None)` means the file carries no
/// EXIF block at all.
pub trait TagReader {
    fn read_tags(&self, path: &Path) -> Result<Option<RawExif>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContainerItem {
    pub kind: String,
    pub data: FieldValue,
}

/// Lists the metadata items stored in a container's own structure.
pub trait ContainerMetadataReader {
    fn read_items(&self, path: &Path) -> Result<Vec<ContainerItem>>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FileStat {
    /// Seconds since the Unix epoch.
    pub created: f64,
    pub modified: f64,
    pub accessed: f64,
    pub mode: u32,
    pub inode: u64,
}

pub trait Stat {
    fn stat(&self, path: &Path) -> Result<FileStat>;
}
