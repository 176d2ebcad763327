// photometa/src/core/render.rs
use super::{CategoryPayload, MetadataRecord, GOOGLE_MAPS_LINK_KEY};
use std::io::{self, Write};
use std::path::Path;

const RULE_WIDTH: usize = 70;
const SECTION_WIDTH: usize = 40;

const LINK_COLOR: &str = "\x1b[94m";
const LOCATION_COLOR: &str = "\x1b[92m";
const RESET: &str = "\x1b[0m";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Link,
    Location,
    Plain,
}

impl Emphasis {
    fn color(self) -> Option<&'static str> {
        match self {
            Emphasis::Link => Some(LINK_COLOR),
            Emphasis::Location => Some(LOCATION_COLOR),
            Emphasis::Plain => None,
        }
    }
}

pub fn emphasis_for(key: &str) -> Emphasis {
    if key == GOOGLE_MAPS_LINK_KEY {
        Emphasis::Link
    } else if key.contains("GPS") || key.contains("Location") {
        Emphasis::Location
    } else {
        Emphasis::Plain
    }
}

pub fn render_record<W: Write>(
    out: &mut W,
    path: &Path,
    record: &MetadataRecord,
    color: bool,
) -> io::Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "{}", rule)?;
    writeln!(out, "METADATA FOR: {}", path.display())?;
    writeln!(out, "{}", rule)?;

    for (category, payload) in record.iter() {
        writeln!(out)?;
        writeln!(out, "{}:", category)?;
        writeln!(out, "{}", "-".repeat(SECTION_WIDTH))?;

        match payload {
            CategoryPayload::Fields(fields) => {
                for (key, value) in fields.iter() {
                    match emphasis_for(key).color().filter(|_| color) {
                        Some(code) => writeln!(out, "  {}: {}{}{}", key, code, value, RESET)?,
                        None => writeln!(out, "  {}: {}", key, value)?,
                    }
                }
            }
            CategoryPayload::Text(text) => writeln!(out, "  {}", text)?,
        }
    }

    Ok(())
}
