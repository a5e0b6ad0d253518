//! Figment Paint API
//!
//! A small recording 2D drawing API. Nothing is rasterized here: every call
//! on a [`PaintContext`] appends a [`PaintCommand`] that a backend replays.
//!
//! # Features
//!
//! - Geometry primitives (point, size, rect, rounded rect)
//! - Image draws referencing decoded images by [`ImageId`]
//! - Fills and strokes, including dashed strokes
//! - A blend mode stack (difference, normal, ...)
//! - Clipping and shadows
//!
//! # Example
//!
//! ```rust
//! use figment_paint::{BlendMode, ImageId, ImageKind, PaintContext, Rect};
//!
//! let mut ctx = PaintContext::new();
//! ctx.push_blend_mode(BlendMode::Difference);
//! ctx.draw_image(ImageId(1), ImageKind::Raster, Rect::new(0.0, 0.0, 64.0, 64.0));
//! ctx.pop_blend_mode();
//!
//! assert_eq!(ctx.commands().len(), 3);
//! ```

pub mod blend;
pub mod color;
pub mod context;
pub mod primitives;

pub use blend::BlendMode;
pub use color::Color;
pub use context::{
    FillStyle, ImageId, ImageKind, PaintCommand, PaintContext, StrokeStyle, Symbol,
};
pub use primitives::*;
