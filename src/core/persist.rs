// photometa/src/core/persist.rs
use super::{CategoryPayload, MetadataRecord, Result};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// JSON projection of a record. Fields without a native JSON form are
/// written as their text representation; nothing else is affected.
pub fn to_json_value(record: &MetadataRecord) -> Value {
    let mut root = Map::new();

    for (category, payload) in record.iter() {
        let value = match payload {
            CategoryPayload::Fields(fields) => {
                let mut object = Map::new();
                for (key, field) in fields.iter() {
                    let json = field.to_json().unwrap_or_else(|e| {
                        log::debug!("{}.{} stored as text: {}", category, key, e);
                        Value::String(field.to_string())
                    });
                    object.insert(key.to_string(), json);
                }
                Value::Object(object)
            }
            CategoryPayload::Text(text) => Value::String(text.clone()),
        };
        root.insert(category.to_string(), value);
    }

    Value::Object(root)
}

/// Pretty-printed with two-space indentation; non-ASCII is written as-is.
pub fn write_json(record: &MetadataRecord, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, &to_json_value(record))?;
    writer.flush()?;

    log::info!("Wrote metadata JSON: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, FieldMap, FieldValue};
    use serde_json::json;

    fn record() -> MetadataRecord {
        let mut basic = FieldMap::new();
        basic.insert("Format", "JPEG");
        basic.insert("Width", 640u32);
        basic.insert("Size", FieldValue::List(vec![640u32.into(), 480u32.into()]));

        let mut heic = FieldMap::new();
        heic.insert("Exif", FieldValue::Bytes(vec![0x49, 0x49, 0x2a, 0x00]));
        heic.insert("Note", "caf\u{e9}");

        let mut record = MetadataRecord::new();
        record.insert(Category::BasicInfo, CategoryPayload::Fields(basic));
        record.insert(Category::HeicMetadata, CategoryPayload::Fields(heic));
        record.insert(Category::FileSystemData, CategoryPayload::Text("n/a".into()));
        record
    }

    #[test]
    fn falls_back_to_text_per_field() {
        let value = to_json_value(&record());

        assert_eq!(value["Basic_Info"]["Width"], json!(640));
        assert_eq!(value["Basic_Info"]["Size"], json!([640, 480]));
        assert_eq!(value["HEIC_Metadata"]["Exif"], json!("b\"II*\\x00\""));
        assert_eq!(value["HEIC_Metadata"]["Note"], json!("caf\u{e9}"));
        assert_eq!(value["File_System_Data"], json!("n/a"));
    }

    #[test]
    fn writes_pretty_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");

        write_json(&record(), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();

        assert!(text.starts_with("{\n  \"Basic_Info\": {\n    \"Format\": \"JPEG\","));
        assert!(text.contains("caf\u{e9}"));
        assert!(!text.contains("\\u00e9"));

        let parsed: Value = serde_json::from_str(&text).unwrap();
        let keys: Vec<&String> = parsed.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Basic_Info", "HEIC_Metadata", "File_System_Data"]);
        assert_eq!(parsed["HEIC_Metadata"]["Exif"], json!("b\"II*\\x00\""));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.json");
        assert!(write_json(&record(), &path).is_err());
    }
}
