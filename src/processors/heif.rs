// photometa/src/processors/heif.rs
use crate::core::{ContainerItem, ContainerMetadataReader, FieldValue, MetaError, Result};
use exif::Reader;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

/// Item type under which the raw EXIF payload of a HEIF file is reported.
pub const EXIF_ITEM: &str = "Exif";

/// Metadata items of HEIF/HEIC containers. The ISOBMFF walk is done by
/// `kamadak-exif`; the reader only checks the `ftyp` box up front so
/// mislabelled files are reported instead of silently read as another
/// container type.
///
/// Only the `Exif` item is reported. XMP and other `mime` items are not
/// reachable through `kamadak-exif` and are skipped.
#[derive(Debug, Clone, Default)]
pub struct HeifMetadataReader;

impl HeifMetadataReader {
    pub fn new() -> Self {
        Self
    }

    fn check_ftyp<R: Read + Seek>(&self, reader: &mut R, path: &Path) -> Result<()> {
        let mut header = [0u8; 12];
        reader
            .read_exact(&mut header)
            .map_err(|e| MetaError::ContainerMetadata(format!("{}: {}", path.display(), e)))?;

        if &header[4..8] != b"ftyp" {
            return Err(MetaError::ContainerMetadata(format!(
                "{} is not a HEIF container",
                path.display()
            )));
        }

        reader.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

impl ContainerMetadataReader for HeifMetadataReader {
    fn read_items(&self, path: &Path) -> Result<Vec<ContainerItem>> {
        let file = File::open(path)
            .map_err(|e| MetaError::ContainerMetadata(format!("{}: {}", path.display(), e)))?;
        let mut reader = BufReader::new(file);

        self.check_ftyp(&mut reader, path)?;

        match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => {
                log::debug!("HEIF Exif item: {} bytes", exif.buf().len());
                Ok(vec![ContainerItem {
                    kind: EXIF_ITEM.to_string(),
                    data: FieldValue::Bytes(exif.buf().to_vec()),
                }])
            }
            Err(exif::Error::NotFound(_)) => {
                log::debug!("No metadata items in {}", path.display());
                Ok(Vec::new())
            }
            Err(e) => Err(MetaError::ContainerMetadata(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use exif::experimental::Writer;
    use exif::{Field, In, Tag, Value};
    use std::io::Cursor;

    fn boxed(kind: &[u8; 4], body: &[u8]) -> Vec<u8> {
        let mut out = ((8 + body.len()) as u32).to_be_bytes().to_vec();
        out.extend_from_slice(kind);
        out.extend_from_slice(body);
        out
    }

    fn full_box(kind: &[u8; 4], version: u8, body: &[u8]) -> Vec<u8> {
        let mut header = vec![version, 0, 0, 0];
        header.extend_from_slice(body);
        boxed(kind, &header)
    }

    fn item_info(item_id: u16, item_type: &[u8; 4]) -> Vec<u8> {
        let mut body = item_id.to_be_bytes().to_vec();
        body.extend_from_slice(&[0, 0]);
        body.extend_from_slice(item_type);
        body.push(0);
        full_box(b"infe", 2, &body)
    }

    fn tiff_block() -> Vec<u8> {
        let mut writer = Writer::new();
        let make = Field {
            tag: Tag::Make,
            ifd_num: In::PRIMARY,
            value: Value::Ascii(vec![b"HeifCam".to_vec()]),
        };
        writer.push_field(&make);
        let mut buf = Cursor::new(Vec::new());
        writer.write(&mut buf, true).unwrap();
        buf.into_inner()
    }

    /// `ftyp` plus a `meta` box holding an `hvc1` image item and, when
    /// given, an `Exif` item stored in `idat`.
    fn heif_file(exif: Option<&[u8]>) -> Vec<u8> {
        let mut ftyp = b"heic".to_vec();
        ftyp.extend_from_slice(&0u32.to_be_bytes());
        ftyp.extend_from_slice(b"mif1heic");

        let mut entries = item_info(1, b"hvc1");
        let mut count = 1u16;
        if exif.is_some() {
            entries.extend_from_slice(&item_info(2, b"Exif"));
            count += 1;
        }
        let mut iinf = count.to_be_bytes().to_vec();
        iinf.extend_from_slice(&entries);

        let mut meta = full_box(b"iinf", 0, &iinf);
        if let Some(tiff) = exif {
            // Exif data block: offset to the TIFF header, then the header.
            let mut idat = 0u32.to_be_bytes().to_vec();
            idat.extend_from_slice(tiff);

            let mut iloc = vec![0x44, 0x00];
            iloc.extend_from_slice(&1u16.to_be_bytes());
            iloc.extend_from_slice(&2u16.to_be_bytes());
            iloc.extend_from_slice(&[0x00, 0x01]);
            iloc.extend_from_slice(&0u16.to_be_bytes());
            iloc.extend_from_slice(&1u16.to_be_bytes());
            iloc.extend_from_slice(&0u32.to_be_bytes());
            iloc.extend_from_slice(&(idat.len() as u32).to_be_bytes());

            meta.extend_from_slice(&full_box(b"iloc", 1, &iloc));
            meta.extend_from_slice(&boxed(b"idat", &idat));
        }

        let mut file = boxed(b"ftyp", &ftyp);
        file.extend_from_slice(&full_box(b"meta", 0, &meta));
        file
    }

    #[test]
    fn heif_without_exif_item_has_no_items() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.heic");
        std::fs::write(&path, heif_file(None)).unwrap();

        let items = HeifMetadataReader::new().read_items(&path).unwrap();
        assert!(items.is_empty(), "{:?}", items);
    }

    #[test]
    fn reports_exif_item_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tagged.heic");
        let tiff = tiff_block();
        std::fs::write(&path, heif_file(Some(&tiff))).unwrap();

        let items = HeifMetadataReader::new().read_items(&path).unwrap();
        assert_eq!(
            items,
            vec![ContainerItem {
                kind: EXIF_ITEM.to_string(),
                data: FieldValue::Bytes(tiff),
            }]
        );
    }

    #[test]
    fn rejects_files_without_ftyp_box() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fake.heic");
        image::RgbImage::new(2, 2)
            .save_with_format(&path, image::ImageFormat::Png)
            .unwrap();

        let err = HeifMetadataReader::new().read_items(&path).unwrap_err();
        assert!(matches!(err, MetaError::ContainerMetadata(_)));
        assert!(err.to_string().contains("not a HEIF container"));
    }

    #[test]
    fn truncated_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("short.heif");
        std::fs::write(&path, b"\0\0\0").unwrap();

        assert!(HeifMetadataReader::new().read_items(&path).is_err());
    }
}
