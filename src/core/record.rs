// photometa/src/core/record.rs
use super::{MetaError, Result};
use serde_json::{Map, Number, Value};
use std::collections::HashMap;
use std::fmt;

/// Key used for error payloads, both at category and at GPS block level.
pub const ERROR_KEY: &str = "Error";
pub const INFO_KEY: &str = "Info";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    BasicInfo,
    ExifData,
    HeicMetadata,
    FileSystemData,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::BasicInfo,
        Category::ExifData,
        Category::HeicMetadata,
        Category::FileSystemData,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::BasicInfo => "Basic_Info",
            Category::ExifData => "EXIF_Data",
            Category::HeicMetadata => "HEIC_Metadata",
            Category::FileSystemData => "File_System_Data",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single extracted value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Rational { num: i64, denom: i64 },
    List(Vec<FieldValue>),
    Bytes(Vec<u8>),
    Map(FieldMap),
}

impl FieldValue {
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            FieldValue::Integer(i) => Some(i as f64),
            FieldValue::Float(f) => Some(f),
            FieldValue::Rational { num, denom } if denom != 0 => Some(num as f64 / denom as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&FieldMap> {
        match self {
            FieldValue::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Native JSON form of the value. Fails for values JSON cannot carry:
    /// raw bytes, non-finite floats and rationals with a zero denominator.
    pub fn to_json(&self) -> Result<Value> {
        match self {
            FieldValue::Text(s) => Ok(Value::String(s.clone())),
            FieldValue::Integer(i) => Ok(Value::Number((*i).into())),
            FieldValue::Float(f) => finite_number(*f),
            FieldValue::Rational { num, denom } => {
                if *denom == 0 {
                    return Err(MetaError::Serialization(format!(
                        "rational {}/{} has no numeric value",
                        num, denom
                    )));
                }
                finite_number(*num as f64 / *denom as f64)
            }
            FieldValue::List(items) => items
                .iter()
                .map(FieldValue::to_json)
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            FieldValue::Bytes(bytes) => Err(MetaError::Serialization(format!(
                "{} bytes of binary data are not JSON serializable",
                bytes.len()
            ))),
            FieldValue::Map(map) => {
                let mut object = Map::new();
                for (key, value) in map.iter() {
                    object.insert(key.to_string(), value.to_json()?);
                }
                Ok(Value::Object(object))
            }
        }
    }
}

fn finite_number(f: f64) -> Result<Value> {
    Number::from_f64(f)
        .map(Value::Number)
        .ok_or_else(|| MetaError::Serialization(format!("{:?} is not a finite number", f)))
}

/// Floats always carry a fractional part (`20.0`, `-10.5`).
pub fn format_float(f: f64) -> String {
    format!("{:?}", f)
}

/// Like [`format_float`], but never in exponent form (`0.0000025`).
pub fn format_float_fixed(f: f64) -> String {
    let debug = format_float(f);
    if debug.contains('e') {
        format!("{}", f)
    } else {
        debug
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Float(x) => f.write_str(&format_float(*x)),
            FieldValue::Rational { num, denom } => write!(f, "{}/{}", num, denom),
            FieldValue::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
            FieldValue::Bytes(bytes) => {
                f.write_str("b\"")?;
                for byte in bytes {
                    write!(f, "{}", std::ascii::escape_default(*byte))?;
                }
                f.write_str("\"")
            }
            FieldValue::Map(map) => {
                f.write_str("{")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}: {}", key, value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Integer(i as i64)
    }
}

impl From<u64> for FieldValue {
    fn from(i: u64) -> Self {
        i64::try_from(i)
            .map(FieldValue::Integer)
            .unwrap_or_else(|_| FieldValue::Text(i.to_string()))
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<FieldMap> for FieldValue {
    fn from(map: FieldMap) -> Self {
        FieldValue::Map(map)
    }
}

/// Insertion-ordered field name to value mapping. Re-inserting a key
/// replaces the value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    entries: Vec<(String, FieldValue)>,
    index: HashMap<String, usize>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// `{"Error": message}`
    pub fn error(message: impl fmt::Display) -> Self {
        let mut map = Self::new();
        map.insert(ERROR_KEY, message.to_string());
        map
    }

    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> Option<FieldValue> {
        let key = key.into();
        let value = value.into();
        match self.index.get(&key) {
            Some(&slot) => Some(std::mem::replace(&mut self.entries[slot].1, value)),
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
                None
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// What a category holds: a field mapping, or a bare line of text.
#[derive(Debug, Clone, PartialEq)]
pub enum CategoryPayload {
    Fields(FieldMap),
    Text(String),
}

impl CategoryPayload {
    pub fn error(message: impl fmt::Display) -> Self {
        CategoryPayload::Fields(FieldMap::error(message))
    }

    pub fn fields(&self) -> Option<&FieldMap> {
        match self {
            CategoryPayload::Fields(fields) => Some(fields),
            CategoryPayload::Text(_) => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.fields()
            .and_then(|fields| fields.get(ERROR_KEY))
            .and_then(FieldValue::as_text)
    }

    pub fn is_error(&self) -> bool {
        self.error_message().is_some()
    }
}

/// Everything extracted from one file, keyed by category in extraction order.
/// There are only four categories, so lookups scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetadataRecord {
    categories: Vec<(Category, CategoryPayload)>,
}

impl MetadataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, category: Category, payload: CategoryPayload) {
        match self.categories.iter_mut().find(|(c, _)| *c == category) {
            Some((_, slot)) => *slot = payload,
            None => self.categories.push((category, payload)),
        }
    }

    pub fn get(&self, category: Category) -> Option<&CategoryPayload> {
        self.categories
            .iter()
            .find(|(c, _)| *c == category)
            .map(|(_, p)| p)
    }

    pub fn fields(&self, category: Category) -> Option<&FieldMap> {
        self.get(category).and_then(CategoryPayload::fields)
    }

    pub fn contains(&self, category: Category) -> bool {
        self.get(category).is_some()
    }

    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.categories.iter().map(|(c, _)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, &CategoryPayload)> {
        self.categories.iter().map(|(c, p)| (*c, p))
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinserting_a_key_keeps_its_position() {
        let mut map = FieldMap::new();
        map.insert("Exif", FieldValue::Bytes(vec![1]));
        map.insert("xmp", "<x/>");
        let previous = map.insert("Exif", FieldValue::Bytes(vec![2]));

        assert_eq!(previous, Some(FieldValue::Bytes(vec![1])));
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["Exif", "xmp"]);
        assert_eq!(map.get("Exif"), Some(&FieldValue::Bytes(vec![2])));
    }

    #[test]
    fn many_fields_stay_ordered_and_addressable() {
        let map: FieldMap = (0..500).map(|i| (format!("Tag{}", i), i as i64)).collect();

        assert_eq!(map.len(), 500);
        assert_eq!(map.get("Tag321"), Some(&FieldValue::Integer(321)));
        assert_eq!(map.keys().nth(499), Some("Tag499"));
        assert!(!map.contains_key("Tag500"));
    }

    #[test]
    fn fixed_float_form_avoids_exponents() {
        assert_eq!(format_float(2.5e-6), "2.5e-6");
        assert_eq!(format_float_fixed(2.5e-6), "0.0000025");
        assert_eq!(format_float_fixed(-10.5), "-10.5");
        assert_eq!(format_float_fixed(20.0), "20.0");
    }

    #[test]
    fn bytes_and_broken_numbers_have_no_json_form() {
        assert!(FieldValue::Bytes(b"abc".to_vec()).to_json().is_err());
        assert!(FieldValue::Float(f64::NAN).to_json().is_err());
        assert!(FieldValue::Rational { num: 1, denom: 0 }.to_json().is_err());

        let nested = FieldValue::List(vec![FieldValue::Integer(1), FieldValue::Bytes(vec![0])]);
        assert!(nested.to_json().is_err());
    }

    #[test]
    fn numbers_keep_their_json_type() {
        assert_eq!(FieldValue::Integer(640).to_json().unwrap(), serde_json::json!(640));
        assert_eq!(
            FieldValue::Rational { num: 1, denom: 4 }.to_json().unwrap(),
            serde_json::json!(0.25)
        );
        assert_eq!(
            FieldValue::List(vec![FieldValue::Integer(4), FieldValue::Integer(3)])
                .to_json()
                .unwrap(),
            serde_json::json!([4, 3])
        );
    }

    #[test]
    fn display_forms() {
        assert_eq!(FieldValue::Float(20.0).to_string(), "20.0");
        assert_eq!(FieldValue::Rational { num: 1, denom: 250 }.to_string(), "1/250");
        assert_eq!(
            FieldValue::List(vec![FieldValue::Integer(4), FieldValue::Integer(3)]).to_string(),
            "(4, 3)"
        );
        assert_eq!(FieldValue::Bytes(vec![b'a', 0, 0xff]).to_string(), "b\"a\\x00\\xff\"");
    }

    #[test]
    fn error_payload_shape() {
        let payload = CategoryPayload::error("boom");
        assert_eq!(payload.error_message(), Some("boom"));
        assert_eq!(payload.fields().map(FieldMap::len), Some(1));
    }

    #[test]
    fn record_replaces_existing_category() {
        let mut record = MetadataRecord::new();
        record.insert(Category::ExifData, CategoryPayload::error("first"));
        record.insert(Category::BasicInfo, CategoryPayload::Text("x".into()));
        record.insert(Category::ExifData, CategoryPayload::error("second"));

        assert_eq!(record.len(), 2);
        assert_eq!(
            record.get(Category::ExifData).and_then(CategoryPayload::error_message),
            Some("second")
        );
        assert_eq!(
            record.categories().collect::<Vec<_>>(),
            vec![Category::ExifData, Category::BasicInfo]
        );
    }
}
