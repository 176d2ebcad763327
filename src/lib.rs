mod cli;
pub mod core;
pub mod processors;
pub mod utils;

pub use cli::{Cli, SaveChoice};
pub use crate::core::{
    convert_to_degrees, extract_gps_info, Category, CategoryPayload, ContainerItem,
    ContainerMetadataReader, Decoder, ExtractorConfig, FieldMap, FieldValue, FileStat,
    GpsBlock, ImageSummary, MetaError, MetadataAggregator, MetadataRecord, RawExif, RawTag,
    RawValue, Result, Stat, TagReader, ERROR_KEY, GOOGLE_MAPS_LINK_KEY, GPS_INFO_KEY, INFO_KEY,
};
pub use crate::processors::{ExifTagReader, FsStat, HeifMetadataReader, Loader};
pub use crate::utils::{default_json_path, strip_path_quotes};

pub mod prelude {
    pub use crate::{
        Category, ExtractorConfig, FieldValue, MetadataAggregator, MetadataRecord,
        ExifTagReader, FsStat, HeifMetadataReader, Loader,
    };
}
