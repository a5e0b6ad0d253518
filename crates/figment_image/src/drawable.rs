//! Drawable parsing
//!
//! A [`Drawable`] is the renderable form of a layer's raw bytes. Parsing never
//! fails: undecodable content becomes [`Drawable::None`], and markup that
//! usvg rejects becomes a vector with no known size. Callers that need to
//! reject bad payloads up front (ingestion) use [`Drawable::decode`] instead.

use std::sync::Arc;

use figment_paint::{ImageKind, Size};

use crate::error::Result;

/// Knobs for byte sniffing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParseOptions {
    /// Treat `  \n<svg ...` as markup. Off by default: only a buffer whose
    /// very first byte is `<` is sniffed as vector content.
    pub allow_leading_whitespace: bool,
}

/// Parsed, renderable form of image bytes
#[derive(Debug, Clone, Default)]
pub enum Drawable {
    /// Decoded pixels with their intrinsic size
    Raster {
        image: Arc<image::DynamicImage>,
        size: Size,
    },
    /// Vector document. `tree` is absent when the markup could not be parsed;
    /// `size` is absent until known or explicitly assigned.
    Vector {
        tree: Option<Arc<usvg::Tree>>,
        size: Option<Size>,
    },
    /// Nothing renderable
    #[default]
    None,
}

impl Drawable {
    /// Parse bytes, degrading every failure to `None` or an unsized vector
    pub fn parse(bytes: &[u8], options: ParseOptions) -> Self {
        if is_markup(bytes, options) {
            return match decode_vector(bytes) {
                Ok(drawable) => drawable,
                Err(err) => {
                    tracing::debug!(%err, "markup did not parse as SVG; size unknown");
                    Drawable::Vector {
                        tree: None,
                        size: None,
                    }
                }
            };
        }

        match decode_raster(bytes) {
            Ok(drawable) => drawable,
            Err(err) => {
                tracing::debug!(%err, len = bytes.len(), "bytes are not a drawable image");
                Drawable::None
            }
        }
    }

    /// Strict variant of [`Drawable::parse`] that reports why decoding failed
    pub fn decode(bytes: &[u8], options: ParseOptions) -> Result<Self> {
        if is_markup(bytes, options) {
            decode_vector(bytes)
        } else {
            decode_raster(bytes)
        }
    }

    /// Intrinsic size, if known
    pub fn size(&self) -> Option<Size> {
        match self {
            Drawable::Raster { size, .. } => Some(*size),
            Drawable::Vector { size, .. } => *size,
            Drawable::None => None,
        }
    }

    /// How a backend should draw this, or `None` when there is nothing to draw
    pub fn kind(&self) -> Option<ImageKind> {
        match self {
            Drawable::Raster { .. } => Some(ImageKind::Raster),
            Drawable::Vector { .. } => Some(ImageKind::Vector),
            Drawable::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Drawable::None)
    }

    /// Assign a target size to a vector drawable
    ///
    /// Raster images keep their pixel size and `None` stays `None`.
    pub fn resized(&self, size: Size) -> Self {
        match self {
            Drawable::Vector { tree, .. } => Drawable::Vector {
                tree: tree.clone(),
                size: Some(size),
            },
            other => other.clone(),
        }
    }
}

fn is_markup(bytes: &[u8], options: ParseOptions) -> bool {
    let start = if options.allow_leading_whitespace {
        match bytes.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(index) => index,
            None => return false,
        }
    } else {
        0
    };

    bytes.get(start) == Some(&b'<') && std::str::from_utf8(bytes).is_ok()
}

fn decode_vector(bytes: &[u8]) -> Result<Drawable> {
    let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())?;
    let size = tree.size();
    Ok(Drawable::Vector {
        size: Some(Size::new(size.width(), size.height())),
        tree: Some(Arc::new(tree)),
    })
}

fn decode_raster(bytes: &[u8]) -> Result<Drawable> {
    let image = image::load_from_memory(bytes)?;
    let size = Size::new(image.width() as f32, image.height() as f32);
    Ok(Drawable::Raster {
        image: Arc::new(image),
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImageError;

    const SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="120" height="60"><rect width="120" height="60" fill="red"/></svg>"#;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba([10, 20, 30, 255]));
        let mut out = std::io::Cursor::new(Vec::new());
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        out.into_inner()
    }

    #[test]
    fn test_parse_raster() {
        let drawable = Drawable::parse(&png_bytes(4, 3), ParseOptions::default());
        assert!(matches!(drawable, Drawable::Raster { .. }));
        assert_eq!(drawable.size(), Some(Size::new(4.0, 3.0)));
        assert_eq!(drawable.kind(), Some(ImageKind::Raster));
    }

    #[test]
    fn test_parse_vector() {
        let drawable = Drawable::parse(SVG.as_bytes(), ParseOptions::default());
        assert!(matches!(drawable, Drawable::Vector { tree: Some(_), .. }));
        assert_eq!(drawable.size(), Some(Size::new(120.0, 60.0)));
    }

    #[test]
    fn test_broken_markup_is_unsized_vector() {
        let drawable = Drawable::parse(b"<html>not an svg</html>", ParseOptions::default());
        assert!(matches!(
            drawable,
            Drawable::Vector {
                tree: None,
                size: None
            }
        ));
        assert_eq!(drawable.kind(), Some(ImageKind::Vector));
    }

    #[test]
    fn test_garbage_is_none() {
        let drawable = Drawable::parse(&[0xde, 0xad, 0xbe, 0xef], ParseOptions::default());
        assert!(drawable.is_none());
        assert_eq!(drawable.size(), None);
        assert_eq!(Drawable::parse(&[], ParseOptions::default()).kind(), None);
    }

    #[test]
    fn test_leading_whitespace_is_a_config_point() {
        let padded = format!("\n  {SVG}");

        let strict = Drawable::parse(padded.as_bytes(), ParseOptions::default());
        assert!(strict.is_none());

        let lenient = Drawable::parse(
            padded.as_bytes(),
            ParseOptions {
                allow_leading_whitespace: true,
            },
        );
        assert_eq!(lenient.size(), Some(Size::new(120.0, 60.0)));
    }

    #[test]
    fn test_decode_reports_errors() {
        let options = ParseOptions::default();
        assert!(matches!(
            Drawable::decode(b"<html/>", options),
            Err(ImageError::Svg(_))
        ));
        assert!(matches!(
            Drawable::decode(b"plain text", options),
            Err(ImageError::Decode(_))
        ));
        assert!(Drawable::decode(&png_bytes(1, 1), options).is_ok());
    }

    #[test]
    fn test_resized_only_affects_vectors() {
        let unsized_vector = Drawable::Vector {
            tree: None,
            size: None,
        };
        let target = Size::new(50.0, 25.0);
        assert_eq!(unsized_vector.resized(target).size(), Some(target));

        let raster = Drawable::parse(&png_bytes(2, 2), ParseOptions::default());
        assert_eq!(raster.resized(target).size(), Some(Size::new(2.0, 2.0)));
        assert!(Drawable::None.resized(target).is_none());
    }
}
