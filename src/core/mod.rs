// photometa/src/core/mod.rs
mod aggregator;
mod capabilities;
mod gps;
mod persist;
mod record;
mod render;

pub use aggregator::{MetadataAggregator, GPS_INFO_KEY};
pub use capabilities::{
    ContainerItem, ContainerMetadataReader, Decoder, FileStat, GpsBlock, ImageSummary, RawExif,
    RawTag, RawValue, Stat, TagReader,
};
pub use gps::{convert_to_degrees, extract_gps_info, GOOGLE_MAPS_LINK_KEY};
pub use persist::{to_json_value, write_json};
pub use record::{
    format_float, format_float_fixed, Category, CategoryPayload, FieldMap, FieldValue, MetadataRecord, ERROR_KEY,
    INFO_KEY,
};
pub use render::{emphasis_for, render_record, Emphasis};

use std::path::Path;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Appended to the input stem when deriving the default JSON path.
    pub json_suffix: String,
    /// Emphasise link and GPS fields with ANSI colours.
    pub color: bool,
    /// Lower-case extensions, without the dot, that engage the HEIF reader.
    pub heif_extensions: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            json_suffix: "_metadata".to_string(),
            color: true,
            heif_extensions: vec!["heic".to_string(), "heif".to_string()],
        }
    }
}

impl ExtractorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.json_suffix.is_empty() {
            return Err(MetaError::InvalidConfig(
                "JSON suffix must not be empty".to_string(),
            ));
        }

        if self.json_suffix.contains(['/', '\\']) {
            return Err(MetaError::InvalidConfig(format!(
                "JSON suffix must not contain path separators: {}",
                self.json_suffix
            )));
        }

        if self.heif_extensions.is_empty() {
            return Err(MetaError::InvalidConfig(
                "At least one HEIF extension is required".to_string(),
            ));
        }

        if let Some(ext) = self.heif_extensions.iter().find(|e| e.is_empty() || e.starts_with('.')) {
            return Err(MetaError::InvalidConfig(format!(
                "HEIF extensions are given without a leading dot: {:?}",
                ext
            )));
        }

        Ok(())
    }

    pub fn is_heif_path(&self, path: &Path) -> bool {
        crate::utils::has_extension(path, &self.heif_extensions)
    }
}

#[derive(Error, Debug)]
pub enum MetaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Tag resolution error: {0}")]
    TagResolution(String),

    #[error("Container metadata error: {0}")]
    ContainerMetadata(String),

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl From<image::ImageError> for MetaError {
    fn from(e: image::ImageError) -> Self {
        MetaError::Decode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MetaError>;
