// photometa/src/core/aggregator.rs
use super::{
    extract_gps_info, render_record, write_json, Category, CategoryPayload,
    ContainerMetadataReader, Decoder, ExtractorConfig, FieldMap, FieldValue, MetadataRecord,
    RawValue, Result, Stat, TagReader, INFO_KEY,
};
use crate::processors::{ExifTagReader, FsStat, HeifMetadataReader, Loader};
use crate::utils::{decode_utf8_dropping_invalid, default_json_path, tag_name};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Key the decoded GPS sub-block is stored under inside `EXIF_Data`.
pub const GPS_INFO_KEY: &str = "GPSInfo";

/// Collects every metadata category for one image file.
///
/// Each extraction step is isolated: a failure is stored as an
/// `{"Error": message}` payload for that category and the remaining steps
/// still run.
pub struct MetadataAggregator {
    path: PathBuf,
    config: ExtractorConfig,
    decoder: Box<dyn Decoder>,
    tag_reader: Box<dyn TagReader>,
    container_reader: Box<dyn ContainerMetadataReader>,
    stat: Box<dyn Stat>,
    metadata: MetadataRecord,
}

impl MetadataAggregator {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            config: ExtractorConfig::default(),
            decoder: Box::new(Loader::new()),
            tag_reader: Box::new(ExifTagReader::new()),
            container_reader: Box::new(HeifMetadataReader::new()),
            stat: Box::new(FsStat),
            metadata: MetadataRecord::new(),
        }
    }

    pub fn with_config(mut self, config: ExtractorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_decoder(mut self, decoder: impl Decoder + 'static) -> Self {
        self.decoder = Box::new(decoder);
        self
    }

    pub fn with_tag_reader(mut self, reader: impl TagReader + 'static) -> Self {
        self.tag_reader = Box::new(reader);
        self
    }

    pub fn with_container_reader(mut self, reader: impl ContainerMetadataReader + 'static) -> Self {
        self.container_reader = Box::new(reader);
        self
    }

    pub fn with_stat(mut self, stat: impl Stat + 'static) -> Self {
        self.stat = Box::new(stat);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    pub fn metadata(&self) -> &MetadataRecord {
        &self.metadata
    }

    pub fn extract_basic_info(&mut self) {
        let result = self.read_basic_info();
        self.store(Category::BasicInfo, result);
    }

    pub fn extract_exif_data(&mut self) {
        let result = self.read_exif_data();
        self.store(Category::ExifData, result);
    }

    /// Only runs for HEIF-family extensions; for anything else the category
    /// is left out of the record entirely.
    pub fn extract_heic_metadata(&mut self) {
        if !self.config.is_heif_path(&self.path) {
            log::debug!("Skipping HEIF metadata for {}", self.path.display());
            return;
        }
        let result = self.read_heic_metadata();
        self.store(Category::HeicMetadata, result);
    }

    pub fn extract_file_metadata(&mut self) {
        let result = self.read_file_metadata();
        self.store(Category::FileSystemData, result);
    }

    /// Runs every step in order, prints the report and returns the record.
    pub fn extract_all(&mut self) -> &MetadataRecord {
        println!("🔍 Processing file: {}", self.path.display());

        self.extract_basic_info();
        self.extract_exif_data();
        self.extract_heic_metadata();
        self.extract_file_metadata();

        self.display_metadata();
        &self.metadata
    }

    pub fn display_metadata(&self) {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = self.render_metadata(&mut out) {
            log::warn!("Failed to print metadata: {}", e);
        }
    }

    pub fn render_metadata<W: Write>(&self, out: &mut W) -> io::Result<()> {
        render_record(out, &self.path, &self.metadata, self.config.color)
    }

    /// Writes the record as JSON, to `output` or next to the input file.
    /// The outcome is reported on the console and returned.
    pub fn save_to_json(&self, output: Option<&Path>) -> Result<PathBuf> {
        let output = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_json_path());

        match write_json(&self.metadata, &output) {
            Ok(()) => {
                println!("\n✅ Metadata saved to: {}", output.display());
                Ok(output)
            }
            Err(e) => {
                println!("❌ Error saving JSON: {}", e);
                Err(e)
            }
        }
    }

    pub fn default_json_path(&self) -> PathBuf {
        default_json_path(&self.path, &self.config.json_suffix)
    }

    fn store(&mut self, category: Category, result: Result<FieldMap>) {
        let payload = match result {
            Ok(fields) => {
                log::debug!("{}: {} fields", category, fields.len());
                CategoryPayload::Fields(fields)
            }
            Err(e) => {
                log::warn!("{} extraction failed for {}: {}", category, self.path.display(), e);
                CategoryPayload::error(e)
            }
        };
        self.metadata.insert(category, payload);
    }

    fn read_basic_info(&self) -> Result<FieldMap> {
        let summary = self.decoder.decode(&self.path)?;
        let file_size = std::fs::metadata(&self.path)?.len();
        let filename = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut info = FieldMap::new();
        info.insert("Format", summary.format);
        info.insert("Mode", summary.color_mode);
        info.insert(
            "Size",
            FieldValue::List(vec![summary.width.into(), summary.height.into()]),
        );
        info.insert("Width", summary.width);
        info.insert("Height", summary.height);
        info.insert("Filename", filename);
        info.insert("File_Size", format!("{} bytes", file_size));
        Ok(info)
    }

    fn read_exif_data(&self) -> Result<FieldMap> {
        let raw = match self.tag_reader.read_tags(&self.path)? {
            Some(raw) if !raw.is_empty() => raw,
            _ => {
                let mut info = FieldMap::new();
                info.insert(INFO_KEY, "No EXIF data found");
                return Ok(info);
            }
        };

        let mut exif = FieldMap::new();
        for tag in raw.tags {
            match tag.value {
                RawValue::Gps(block) => {
                    exif.insert(GPS_INFO_KEY, extract_gps_info(&block));
                }
                RawValue::Field(FieldValue::Bytes(bytes)) => {
                    exif.insert(tag_name(tag.tag), decode_utf8_dropping_invalid(&bytes));
                }
                RawValue::Field(value) => {
                    exif.insert(tag_name(tag.tag), value);
                }
            }
        }
        Ok(exif)
    }

    fn read_heic_metadata(&self) -> Result<FieldMap> {
        let mut items = FieldMap::new();
        for item in self.container_reader.read_items(&self.path)? {
            items.insert(item.kind, item.data);
        }
        Ok(items)
    }

    fn read_file_metadata(&self) -> Result<FieldMap> {
        let stat = self.stat.stat(&self.path)?;

        let mut fields = FieldMap::new();
        fields.insert("Creation_Time", stat.created);
        fields.insert("Modification_Time", stat.modified);
        fields.insert("Access_Time", stat.accessed);
        fields.insert("File_Permissions", stat.mode);
        fields.insert("File_Inode", stat.inode);
        Ok(fields)
    }
}
