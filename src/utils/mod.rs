// photometa/src/utils/mod.rs
use image::{ColorType, ImageFormat};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// `dir/photo.jpg` + `_metadata` -> `dir/photo_metadata.json`
pub fn default_json_path(input_path: &Path, suffix: &str) -> PathBuf {
    let stem = input_path
        .file_stem()
        .unwrap_or_else(|| input_path.as_os_str());

    let mut file_name = OsString::from(stem);
    file_name.push(suffix);
    file_name.push(".json");

    input_path.with_file_name(file_name)
}

/// Trims whitespace and the quotes shells and file managers put around
/// pasted paths.
pub fn strip_path_quotes(input: &str) -> &str {
    input.trim().trim_matches(|c: char| c == '"' || c == '\'')
}

pub fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

/// UTF-8 decode that silently drops invalid sequences.
pub fn decode_utf8_dropping_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}

/// Human-readable name of an EXIF tag, or its numeric id for tags outside
/// the standard table.
pub fn tag_name(tag: exif::Tag) -> String {
    if tag.description().is_some() {
        tag.to_string()
    } else {
        tag.number().to_string()
    }
}

pub fn image_format_to_string(format: ImageFormat) -> String {
    match format {
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Ico => "ICO".to_string(),
        ImageFormat::Pnm => "PPM".to_string(),
        ImageFormat::OpenExr => "EXR".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

/// Conventional short names for pixel layouts (`L`, `RGB`, `RGBA;16`, ...).
pub fn color_mode_name(color: ColorType) -> String {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "I;16",
        ColorType::La16 => "LA;16",
        ColorType::Rgb16 => "RGB;16",
        ColorType::Rgba16 => "RGBA;16",
        ColorType::Rgb32F => "RGB;F32",
        ColorType::Rgba32F => "RGBA;F32",
        other => return format!("{:?}", other),
    }
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_path_replaces_extension() {
        assert_eq!(
            default_json_path(Path::new("photos/IMG_1.jpg"), "_metadata"),
            PathBuf::from("photos/IMG_1_metadata.json")
        );
        assert_eq!(
            default_json_path(Path::new("archive.tar.gz"), "_meta"),
            PathBuf::from("archive.tar_meta.json")
        );
        assert_eq!(
            default_json_path(Path::new("noext"), "_metadata"),
            PathBuf::from("noext_metadata.json")
        );
    }

    #[test]
    fn strips_quotes_and_whitespace() {
        assert_eq!(strip_path_quotes("  \"/tmp/a b.jpg\"\n"), "/tmp/a b.jpg");
        assert_eq!(strip_path_quotes("'x.png'"), "x.png");
        assert_eq!(strip_path_quotes("plain.jpg"), "plain.jpg");
    }

    #[test]
    fn drops_invalid_utf8() {
        assert_eq!(decode_utf8_dropping_invalid(b"0230"), "0230");
        assert_eq!(decode_utf8_dropping_invalid(b"ab\xffcd\xc3"), "abcd");
        assert_eq!(decode_utf8_dropping_invalid("caf\u{e9}".as_bytes()), "caf\u{e9}");
    }

    #[test]
    fn resolves_tag_names() {
        assert_eq!(tag_name(exif::Tag::Make), "Make");
        assert_eq!(tag_name(exif::Tag::GPSLatitude), "GPSLatitude");
        assert_eq!(tag_name(exif::Tag(exif::Context::Tiff, 0xfffe)), "65534");
    }

    #[test]
    fn names_formats_and_modes() {
        assert_eq!(image_format_to_string(ImageFormat::Jpeg), "JPEG");
        assert_eq!(image_format_to_string(ImageFormat::Qoi), "QOI");
        assert_eq!(color_mode_name(ColorType::Rgb8), "RGB");
        assert_eq!(color_mode_name(ColorType::L16), "I;16");
    }
}
