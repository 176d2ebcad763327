// photometa/src/processors/metadata.rs
use crate::core::{FieldValue, GpsBlock, MetaError, RawExif, RawTag, RawValue, Result, TagReader};
use exif::{Context, Exif, In, Reader, Tag, Value};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF reader backed by `kamadak-exif`. Only the primary image IFDs are
/// reported; thumbnail tags are skipped.
#[derive(Debug, Clone, Default)]
pub struct ExifTagReader;

impl ExifTagReader {
    pub fn new() -> Self {
        Self
    }

    pub fn read_metadata(&self, path: &Path) -> Result<Option<Exif>> {
        let file = File::open(path)?;
        let mut bufreader = BufReader::new(&file);

        match Reader::new().read_from_container(&mut bufreader) {
            Ok(exif) => {
                log::debug!("Found EXIF data in {}", path.display());
                Ok(Some(exif))
            }
            Err(exif::Error::NotFound(_)) => {
                log::debug!("No EXIF data found in {}", path.display());
                Ok(None)
            }
            Err(e) => {
                log::debug!("Failed to read EXIF from {}: {}", path.display(), e);
                Err(MetaError::TagResolution(e.to_string()))
            }
        }
    }
}

impl TagReader for ExifTagReader {
    fn read_tags(&self, path: &Path) -> Result<Option<RawExif>> {
        Ok(self.read_metadata(path)?.map(|exif| collect_tags(&exif)))
    }
}

/// Flattens the primary IFDs into tag order. GPS entries are gathered into a
/// single block that sits where the GPS IFD started.
pub fn collect_tags(exif: &Exif) -> RawExif {
    let mut tags = Vec::new();
    let mut gps = GpsBlock::new();
    let mut gps_slot = None;

    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        let in_gps_ifd = field.tag.context() == Context::Gps;

        if in_gps_ifd || field.tag == Tag::GPSInfoIFDPointer {
            if gps_slot.is_none() {
                tags.push(RawTag {
                    tag: Tag::GPSInfoIFDPointer,
                    value: RawValue::Gps(GpsBlock::new()),
                });
                gps_slot = Some(tags.len() - 1);
            }
            if in_gps_ifd {
                gps.insert(field.tag.number(), convert_value(&field.value));
            }
            continue;
        }

        tags.push(RawTag {
            tag: field.tag,
            value: RawValue::Field(convert_value(&field.value)),
        });
    }

    if let Some(slot) = gps_slot {
        tags[slot].value = RawValue::Gps(gps);
    }

    RawExif { tags }
}

/// Single-element values become scalars, longer ones lists.
pub fn convert_value(value: &Value) -> FieldValue {
    match value {
        Value::Byte(bytes) => FieldValue::Bytes(bytes.clone()),
        Value::Undefined(bytes, _) => FieldValue::Bytes(bytes.clone()),
        Value::Ascii(strings) => collapse(
            strings
                .iter()
                .map(|s| FieldValue::Text(String::from_utf8_lossy(s).trim_end_matches('\0').to_string()))
                .collect(),
        ),
        Value::Short(v) => collapse(v.iter().map(|&x| FieldValue::Integer(x as i64)).collect()),
        Value::Long(v) => collapse(v.iter().map(|&x| FieldValue::Integer(x as i64)).collect()),
        Value::SByte(v) => collapse(v.iter().map(|&x| FieldValue::Integer(x as i64)).collect()),
        Value::SShort(v) => collapse(v.iter().map(|&x| FieldValue::Integer(x as i64)).collect()),
        Value::SLong(v) => collapse(v.iter().map(|&x| FieldValue::Integer(x as i64)).collect()),
        Value::Rational(v) => collapse(
            v.iter()
                .map(|r| FieldValue::Rational { num: r.num as i64, denom: r.denom as i64 })
                .collect(),
        ),
        Value::SRational(v) => collapse(
            v.iter()
                .map(|r| FieldValue::Rational { num: r.num as i64, denom: r.denom as i64 })
                .collect(),
        ),
        Value::Float(v) => collapse(v.iter().map(|&x| FieldValue::Float(x as f64)).collect()),
        Value::Double(v) => collapse(v.iter().map(|&x| FieldValue::Float(x)).collect()),
        Value::Unknown(typ, count, offset) => FieldValue::Text(format!(
            "unknown type {} (count {}, offset {})",
            typ, count, offset
        )),
        #[allow(unreachable_patterns)]
        other => FieldValue::Text(format!("{:?}", other)),
    }
}

fn collapse(mut items: Vec<FieldValue>) -> FieldValue {
    if items.len() == 1 {
        items.remove(0)
    } else {
        FieldValue::List(items)
    }
}
