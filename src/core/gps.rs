// photometa/src/core/gps.rs
use super::{format_float, format_float_fixed, FieldMap, FieldValue, GpsBlock, MetaError, Result, ERROR_KEY};
use crate::utils::tag_name;
use exif::{Context, Tag};

pub const GOOGLE_MAPS_LINK_KEY: &str = "Google_Maps_Link";
const UNKNOWN_REF: &str = "Unknown";

/// Turns a raw GPS IFD into readable fields with decimal coordinates and,
/// when both coordinates are known, a maps link. A failure part way through
/// leaves the fields decoded so far plus an `Error` entry.
pub fn extract_gps_info(block: &GpsBlock) -> FieldMap {
    let mut gps = FieldMap::new();
    if let Err(e) = fill_gps_fields(block, &mut gps) {
        log::debug!("GPS block partially decoded: {}", e);
        gps.insert(ERROR_KEY, e.to_string());
    }
    gps
}

fn fill_gps_fields(block: &GpsBlock, gps: &mut FieldMap) -> Result<()> {
    for (&id, value) in block {
        let tag = Tag(Context::Gps, id);
        match tag {
            Tag::GPSLatitude => {
                gps.insert("Latitude", convert_to_degrees(value));
                gps.insert("LatitudeRef", reference(block, Tag::GPSLatitudeRef));
            }
            Tag::GPSLongitude => {
                gps.insert("Longitude", convert_to_degrees(value));
                gps.insert("LongitudeRef", reference(block, Tag::GPSLongitudeRef));
            }
            Tag::GPSAltitude => {
                let meters = value.as_f64().ok_or_else(|| {
                    MetaError::TagResolution(format!("GPSAltitude is not a number: {}", value))
                })?;
                gps.insert("Altitude", format!("{} meters", format_float(meters)));
            }
            Tag::GPSTimeStamp => {
                gps.insert("GPSTime", time_stamp(value));
            }
            _ => {
                gps.insert(tag_name(tag), value.clone());
            }
        }
    }

    let (Some(lat), Some(lon)) = (gps.get("Latitude").cloned(), gps.get("Longitude").cloned())
    else {
        return Ok(());
    };

    let lat = if has_ref(gps, "LatitudeRef", "S") { negate(&lat)? } else { lat };
    let lon = if has_ref(gps, "LongitudeRef", "W") { negate(&lon)? } else { lon };

    gps.insert(
        GOOGLE_MAPS_LINK_KEY,
        format!(
            "https://maps.google.com/?q={},{}",
            link_coordinate(&lat),
            link_coordinate(&lon)
        ),
    );
    Ok(())
}

fn link_coordinate(value: &FieldValue) -> String {
    match value {
        FieldValue::Float(f) => format_float_fixed(*f),
        other => other.to_string(),
    }
}

/// `(degrees, minutes, seconds)` to decimal degrees. Input that is not
/// exactly three numbers comes back as its text form instead.
pub fn convert_to_degrees(value: &FieldValue) -> FieldValue {
    if let FieldValue::List(parts) = value {
        if let [d, m, s] = parts.as_slice() {
            if let (Some(d), Some(m), Some(s)) = (d.as_f64(), m.as_f64(), s.as_f64()) {
                return FieldValue::Float(d + m / 60.0 + s / 3600.0);
            }
        }
    }
    FieldValue::Text(value.to_string())
}

fn reference(block: &GpsBlock, tag: Tag) -> FieldValue {
    block
        .get(&tag.number())
        .cloned()
        .unwrap_or_else(|| FieldValue::from(UNKNOWN_REF))
}

fn has_ref(gps: &FieldMap, key: &str, expected: &str) -> bool {
    gps.get(key).and_then(FieldValue::as_text) == Some(expected)
}

fn negate(value: &FieldValue) -> Result<FieldValue> {
    match *value {
        FieldValue::Float(f) => Ok(FieldValue::Float(-f)),
        FieldValue::Integer(i) => Ok(FieldValue::Integer(-i)),
        FieldValue::Rational { num, denom } => Ok(FieldValue::Rational { num: -num, denom }),
        _ => Err(MetaError::TagResolution(format!(
            "cannot apply hemisphere sign to {}",
            value
        ))),
    }
}

fn time_stamp(value: &FieldValue) -> String {
    match value {
        FieldValue::List(parts) => {
            let numbers: Option<Vec<f64>> = parts.iter().map(FieldValue::as_f64).collect();
            match numbers {
                Some(numbers) => format!(
                    "({})",
                    numbers
                        .into_iter()
                        .map(format_float)
                        .collect::<Vec<_>>()
                        .join(", ")
                ),
                None => value.to_string(),
            }
        }
        _ => value.to_string(),
    }
}
