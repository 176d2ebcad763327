// photometa/src/processors/mod.rs
mod filesystem;
mod heif;
mod loader;
mod metadata;

pub use filesystem::FsStat;
pub use heif::{HeifMetadataReader, EXIF_ITEM};
pub use loader::Loader;
pub use metadata::{collect_tags, convert_value, ExifTagReader};

pub mod prelude {
    pub use super::{ExifTagReader, FsStat, HeifMetadataReader, Loader};
}
