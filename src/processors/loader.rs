// photometa/src/processors/loader.rs
use crate::core::{Decoder, ImageSummary, MetaError, Result};
use crate::utils::{color_mode_name, image_format_to_string};
use image::{ImageDecoder, ImageReader};
use std::path::Path;

/// Reads format, colour type and dimensions from the image header without
/// decoding pixel data.
#[derive(Debug, Clone, Default)]
pub struct Loader;

impl Loader {
    pub fn new() -> Self {
        Self
    }
}

impl Decoder for Loader {
    fn decode(&self, path: &Path) -> Result<ImageSummary> {
        log::debug!("Reading image header from: {}", path.display());

        let reader = ImageReader::open(path)
            .map_err(|e| MetaError::Decode(format!("{}: {}", path.display(), e)))?
            .with_guessed_format()
            .map_err(|e| MetaError::Decode(format!("{}: {}", path.display(), e)))?;

        let format = reader.format().ok_or_else(|| {
            MetaError::Decode(format!("cannot identify image file {}", path.display()))
        })?;

        let decoder = reader.into_decoder()?;
        let (width, height) = decoder.dimensions();
        let color_mode = color_mode_name(decoder.color_type());

        log::debug!(
            "Image header: {:?} {}x{} {}",
            format, width, height, color_mode
        );

        Ok(ImageSummary {
            format: image_format_to_string(format),
            color_mode,
            width,
            height,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_png_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        image::GrayImage::new(5, 2).save(&path).unwrap();

        let summary = Loader::new().decode(&path).unwrap();
        assert_eq!(
            summary,
            ImageSummary {
                format: "PNG".to_string(),
                color_mode: "L".to_string(),
                width: 5,
                height: 2,
            }
        );
    }

    #[test]
    fn rejects_non_images() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.jpg");
        std::fs::write(&path, b"just some text, not pixels").unwrap();

        assert!(matches!(Loader::new().decode(&path), Err(MetaError::Decode(_))));
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let result = Loader::new().decode(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(MetaError::Decode(_))));
    }
}
