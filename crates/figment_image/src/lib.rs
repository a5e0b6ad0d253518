//! Figment Image
//!
//! Image payload loading and parsing for the comparison canvas.
//!
//! # Features
//!
//! - Load payloads from file paths, base64 data and raw bytes
//! - Classify bytes as raster (PNG, JPEG, GIF, WebP, BMP), vector (SVG) or
//!   nothing renderable, without ever failing at render time
//! - Canvas sizing and per-layer fit geometry
//!
//! # Example
//!
//! ```ignore
//! use figment_image::{Drawable, ImageData, ImageSource, ParseOptions};
//!
//! let data = ImageData::load(ImageSource::file("before.png"))?;
//! let drawable = Drawable::parse(&data.bytes, ParseOptions::default());
//! println!("{:?}", drawable.size());
//! ```

mod drawable;
mod error;
mod geometry;
mod loader;
mod source;

pub use drawable::{Drawable, ParseOptions};
pub use error::{ImageError, Result};
pub use geometry::{cover_rect, fit_rect, preferred_canvas_size};
pub use loader::ImageData;
pub use source::ImageSource;
