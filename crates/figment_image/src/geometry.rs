//! Comparison-canvas geometry
//!
//! The comparison canvas sizes itself after the widest source image, and
//! every layer is then fitted into that canvas using a width-vs-height
//! overflow test (see [`fit_rect`]). This is not CSS `contain`: the branch is
//! picked by comparing absolute overflow, not scale ratios, and very
//! unbalanced inputs can overflow the canvas on the other axis.

use figment_paint::{Point, Rect, Size};

use crate::drawable::Drawable;

/// Preferred canvas size for a set of drawables
///
/// Tracks the drawable with the largest width (first one wins on ties) and
/// returns that width together with the height implied by its aspect ratio.
/// Returns `None` when no drawable has a known, non-zero width.
pub fn preferred_canvas_size<'a>(drawables: impl IntoIterator<Item = &'a Drawable>) -> Option<Size> {
    let mut widest: Option<Size> = None;

    for size in drawables.into_iter().filter_map(Drawable::size) {
        let current = widest.map_or(0.0, |w| w.width);
        if size.width > current {
            widest = Some(size);
        }
    }

    widest.map(|size| Size::new(size.width, size.width / size.aspect_ratio()))
}

/// Rect a drawable of `size` occupies on a `canvas`, translated by `offset`
///
/// If the width overflows the canvas by more than the height does, the image
/// is fitted by width; otherwise by height. The fitted rect is centered and
/// then moved by the layer offset.
pub fn fit_rect(size: Size, canvas: Size, offset: Point) -> Rect {
    let aspect_ratio = size.aspect_ratio();
    let drawn = if size.width - canvas.width > size.height - canvas.height {
        Size::new(canvas.width, canvas.width / aspect_ratio)
    } else {
        Size::new(canvas.height * aspect_ratio, canvas.height)
    };

    Rect::new(
        (canvas.width - drawn.width) / 2.0 + offset.x,
        (canvas.height - drawn.height) / 2.0 + offset.y,
        drawn.width,
        drawn.height,
    )
}

/// Rect that fills `container` completely while keeping aspect ratio
///
/// The result is centered and may extend past the container; callers clip.
pub fn cover_rect(size: Size, container: Rect) -> Rect {
    let scale = (container.width / size.width).max(container.height / size.height);
    let width = size.width * scale;
    let height = size.height * scale;

    Rect::new(
        container.x + (container.width - width) / 2.0,
        container.y + (container.height - height) / 2.0,
        width,
        height,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sized(width: f32, height: f32) -> Drawable {
        Drawable::Vector {
            tree: None,
            size: Some(Size::new(width, height)),
        }
    }

    #[test]
    fn test_preferred_size_follows_widest() {
        let drawables = [sized(100.0, 50.0), sized(300.0, 600.0), sized(200.0, 10.0)];
        assert_eq!(
            preferred_canvas_size(&drawables),
            Some(Size::new(300.0, 600.0))
        );
    }

    #[test]
    fn test_preferred_size_first_wins_ties() {
        let drawables = [sized(300.0, 100.0), sized(300.0, 900.0)];
        assert_eq!(
            preferred_canvas_size(&drawables),
            Some(Size::new(300.0, 100.0))
        );
    }

    #[test]
    fn test_preferred_size_ignores_unknown() {
        let drawables = [
            Drawable::None,
            Drawable::Vector {
                tree: None,
                size: None,
            },
        ];
        assert_eq!(preferred_canvas_size(&drawables), None);
        assert_eq!(preferred_canvas_size(std::iter::empty()), None);

        let mixed = [Drawable::None, sized(40.0, 20.0)];
        assert_eq!(preferred_canvas_size(&mixed), Some(Size::new(40.0, 20.0)));
    }

    #[test]
    fn test_fit_by_width() {
        // Width overflows by 200, height by 0
        let rect = fit_rect(
            Size::new(400.0, 100.0),
            Size::new(200.0, 100.0),
            Point::ZERO,
        );
        assert_eq!(rect, Rect::new(0.0, 25.0, 200.0, 50.0));
    }

    #[test]
    fn test_fit_by_height() {
        let rect = fit_rect(
            Size::new(100.0, 400.0),
            Size::new(200.0, 200.0),
            Point::ZERO,
        );
        assert_eq!(rect, Rect::new(75.0, 0.0, 50.0, 200.0));
    }

    #[test]
    fn test_fit_applies_offset_after_centering() {
        let rect = fit_rect(
            Size::new(100.0, 400.0),
            Size::new(200.0, 200.0),
            Point::new(-5.0, 12.0),
        );
        assert_eq!(rect, Rect::new(70.0, 12.0, 50.0, 200.0));
    }

    #[test]
    fn test_fit_keeps_overflow_heuristic() {
        // Width overflows by 990, height by 799, so the width branch wins even
        // though the result is 8 tall on a 1-pixel-tall canvas.
        let rect = fit_rect(
            Size::new(1000.0, 800.0),
            Size::new(10.0, 1.0),
            Point::ZERO,
        );
        assert_eq!(rect, Rect::new(0.0, -3.5, 10.0, 8.0));
    }

    #[test]
    fn test_fit_is_pure() {
        let args = (
            Size::new(640.0, 480.0),
            Size::new(320.0, 320.0),
            Point::new(3.0, -7.5),
        );
        assert_eq!(
            fit_rect(args.0, args.1, args.2),
            fit_rect(args.0, args.1, args.2)
        );
    }

    #[test]
    fn test_cover_rect() {
        // 100x50 image in a 200x200 box scales by 4
        let rect = cover_rect(Size::new(100.0, 50.0), Rect::new(10.0, 10.0, 200.0, 200.0));
        assert_eq!(rect, Rect::new(-90.0, 10.0, 400.0, 200.0));
    }
}
