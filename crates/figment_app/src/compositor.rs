//! Scenario compositor
//!
//! Turns a scenario into a [`Frame`] of recorded paint commands. Scenarios
//! with too few layers get the initial drop view; everything else is drawn
//! as the comparison ring, where every visible layer is stacked on one
//! canvas with the difference blend mode so identical pixels cancel out.

use std::sync::Arc;

use figment_core::{Layer, Scenario, Selection};
use figment_image::{cover_rect, fit_rect, preferred_canvas_size, Drawable};
use figment_paint::{
    BlendMode, Color, ImageId, PaintCommand, PaintContext, Rect, Shadow, Size, StrokeStyle, Symbol,
};
use serde::Serialize;

use crate::cache::DrawableCache;
use crate::config::{CompositorConfig, FigmentConfig};

// Initial drop view layout
const CONTAINER_SIZE: f32 = 200.0;
const CONTAINER_RADIUS: f32 = 20.0;
const BORDER_WIDTH: f32 = 12.0;
const BORDER_DASH: [f32; 2] = [50.0, 10.0];
const BORDER_DASH_PHASE: f32 = -10.0;
const HOVER_OPACITY: f32 = 0.2;
const PLACEHOLDER_INSET: f32 = 50.0;
const PREVIEW_INSET: f32 = 25.0;
const PREVIEW_PADDING: f32 = 40.0;
const PREVIEW_STACK_SPREAD: f32 = 15.0;
const PREVIEW_SHADOW_RADIUS: f32 = 30.0;
const PREVIEW_SHADOW_OPACITY: f32 = 0.3;
const HINT_GAP: f32 = 20.0;
const HINT_FONT_SIZE: f32 = 13.0;
const CHROME_COLOR: Color = Color::rgb(0.56, 0.56, 0.58);

/// Which view a frame shows
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameMode {
    Initial,
    Comparison,
}

/// One rendered frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Frame {
    pub mode: FrameMode,
    /// Size the comparison canvas asks for, if any layer has a known size
    pub preferred_size: Option<Size>,
    /// Size the layers were fitted into
    pub canvas: Size,
    pub commands: Vec<PaintCommand>,
}

impl Frame {
    /// Rects of every drawn image, in paint order
    pub fn image_rects(&self) -> Vec<(ImageId, Rect)> {
        self.commands
            .iter()
            .filter_map(|command| match command {
                PaintCommand::DrawImage { image, rect, .. } => Some((*image, *rect)),
                _ => None,
            })
            .collect()
    }
}

/// Transient view state that is not part of the model
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    /// A drag is hovering over the drop target
    pub drop_hovering: bool,
}

/// Image handle a backend uses to find the decoded pixels of a layer
pub fn image_id(layer: &Layer) -> ImageId {
    ImageId(layer.id().0)
}

#[derive(Debug)]
pub struct Compositor {
    cache: DrawableCache,
    config: CompositorConfig,
    min_layers: usize,
}

impl Compositor {
    pub fn new(config: &FigmentConfig) -> Self {
        Self {
            cache: DrawableCache::new(config.compositor.cache_capacity, config.parse_options()),
            config: config.compositor.clone(),
            min_layers: config.comparison.min_layers,
        }
    }

    pub fn cache(&self) -> &DrawableCache {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut DrawableCache {
        &mut self.cache
    }

    /// Whether a scenario has enough layers for the comparison ring
    ///
    /// Hidden layers count.
    pub fn is_comparing(&self, scenario: &Scenario) -> bool {
        scenario.len() >= self.min_layers
    }

    /// Render a scenario into a viewport
    pub fn render(
        &mut self,
        scenario: &Scenario,
        selection: &Selection,
        viewport: Size,
        view: ViewState,
    ) -> Frame {
        if self.is_comparing(scenario) {
            self.render_comparison(scenario, selection, viewport)
        } else {
            self.render_initial(scenario, viewport, view)
        }
    }

    /// Canvas size preferred by the comparison ring
    pub fn preferred_size(&mut self, scenario: &Scenario) -> Option<Size> {
        let drawables: Vec<Arc<Drawable>> = scenario
            .ordered_layers()
            .map(|layer| self.cache.get_or_parse(layer))
            .collect();
        preferred_canvas_size(drawables.iter().map(Arc::as_ref))
    }

    fn render_comparison(&mut self, scenario: &Scenario, selection: &Selection, viewport: Size) -> Frame {
        let preferred_size = self.preferred_size(scenario);
        let canvas = preferred_size.unwrap_or(viewport);

        let mut ctx = PaintContext::new();
        let mut outlines = Vec::new();

        ctx.push_blend_mode(BlendMode::Difference);
        for layer in scenario.ordered_layers() {
            if layer.hidden {
                continue;
            }
            let drawable = self.cache.get_or_parse(layer);
            let Some(kind) = drawable.kind() else {
                continue;
            };

            let size = drawable.size().unwrap_or(self.config.fallback_size);
            let mut rect = fit_rect(size, canvas, layer.offset.into());
            if self.config.snap_to_pixels {
                rect = rect.truncated();
            }

            ctx.draw_image(image_id(layer), kind, rect);
            if selection.contains(layer.id()) {
                outlines.push(rect);
            }
        }
        ctx.pop_blend_mode();

        if !outlines.is_empty() {
            let style = StrokeStyle::solid(
                self.config.selection_color,
                self.config.selection_stroke_width,
            )
            .dashed(&self.config.selection_dash, 0.0);

            ctx.push_blend_mode(BlendMode::Normal);
            for rect in outlines {
                ctx.stroke_rect(rect, style.clone());
            }
            ctx.pop_blend_mode();
        }

        tracing::trace!(
            scenario = %scenario.name,
            commands = ctx.commands().len(),
            "rendered comparison frame"
        );

        Frame {
            mode: FrameMode::Comparison,
            preferred_size,
            canvas,
            commands: ctx.take_commands(),
        }
    }

    fn render_initial(&mut self, scenario: &Scenario, viewport: Size, view: ViewState) -> Frame {
        let container = Rect::new(
            ((viewport.width - CONTAINER_SIZE) / 2.0).max(0.0),
            ((viewport.height - CONTAINER_SIZE) / 2.0).max(0.0),
            CONTAINER_SIZE,
            CONTAINER_SIZE,
        );

        let mut ctx = PaintContext::new();
        ctx.push_clip(container);

        if view.drop_hovering {
            ctx.fill_rounded_rect(
                container,
                CONTAINER_RADIUS,
                Color::BLACK.with_alpha(HOVER_OPACITY),
            );
        }

        if scenario.is_empty() {
            ctx.draw_symbol(
                Symbol::Photo,
                container.inset(PLACEHOLDER_INSET, PLACEHOLDER_INSET),
            );
        } else {
            self.paint_previews(&mut ctx, scenario, container.inset(PREVIEW_INSET, PREVIEW_INSET));
        }

        // The border is stroked inside the container
        let half = BORDER_WIDTH / 2.0;
        ctx.stroke_rounded_rect(
            container.inset(half, half),
            CONTAINER_RADIUS - half,
            StrokeStyle::solid(CHROME_COLOR, BORDER_WIDTH).dashed(&BORDER_DASH, BORDER_DASH_PHASE),
        );
        ctx.pop_clip();

        if let Some(hint) = hint_text(scenario.len(), self.min_layers) {
            ctx.draw_text(
                hint,
                container.center().x,
                container.y + container.height + HINT_GAP,
                HINT_FONT_SIZE,
                CHROME_COLOR,
            );
        }

        Frame {
            mode: FrameMode::Initial,
            preferred_size: None,
            canvas: viewport,
            commands: ctx.take_commands(),
        }
    }

    /// Stacked thumbnails of the layers dropped so far, in insertion order
    fn paint_previews(&mut self, ctx: &mut PaintContext, scenario: &Scenario, frame: Rect) {
        let count = scenario.len();
        for (index, layer) in scenario.layers().iter().enumerate() {
            if layer.hidden {
                continue;
            }

            let spread = -PREVIEW_STACK_SPREAD * (count - index - 1) as f32 / count as f32;
            let slot = frame
                .offset(0.0, spread)
                .inset(PREVIEW_PADDING, PREVIEW_PADDING);

            if index > 0 {
                ctx.draw_shadow(
                    slot,
                    Shadow::blur(
                        PREVIEW_SHADOW_RADIUS,
                        Color::BLACK.with_alpha(PREVIEW_SHADOW_OPACITY),
                    ),
                );
            }

            let drawable = self.cache.get_or_parse(layer);
            match drawable.kind() {
                Some(kind) => {
                    let size = drawable.size().unwrap_or(self.config.fallback_size);
                    ctx.push_clip(slot);
                    ctx.draw_image(image_id(layer), kind, cover_rect(size, slot));
                    ctx.pop_clip();
                }
                None => ctx.draw_symbol(Symbol::BrokenPhoto, slot),
            }
        }
    }
}

/// Text shown under the drop target
pub fn hint_text(layer_count: usize, min_layers: usize) -> Option<String> {
    if layer_count == 0 {
        Some("Drop here for comparison".to_string())
    } else if layer_count < min_layers {
        Some(format!("{} more to start", spell_out(min_layers - layer_count)))
    } else {
        None
    }
}

/// Capitalized English words for small counts, digits otherwise
pub fn spell_out(n: usize) -> String {
    const ONES: [&str; 20] = [
        "Zero", "One", "Two", "Three", "Four", "Five", "Six", "Seven", "Eight", "Nine", "Ten",
        "Eleven", "Twelve", "Thirteen", "Fourteen", "Fifteen", "Sixteen", "Seventeen", "Eighteen",
        "Nineteen",
    ];
    const TENS: [&str; 10] = [
        "", "", "Twenty", "Thirty", "Forty", "Fifty", "Sixty", "Seventy", "Eighty", "Ninety",
    ];

    match n {
        0..=19 => ONES[n].to_string(),
        20..=99 if n % 10 == 0 => TENS[n / 10].to_string(),
        20..=99 => format!("{}-{}", TENS[n / 10], ONES[n % 10]),
        _ => n.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spell_out() {
        assert_eq!(spell_out(1), "One");
        assert_eq!(spell_out(13), "Thirteen");
        assert_eq!(spell_out(40), "Forty");
        assert_eq!(spell_out(21), "Twenty-One");
        assert_eq!(spell_out(150), "150");
    }

    #[test]
    fn test_hint_text() {
        assert_eq!(hint_text(0, 2).as_deref(), Some("Drop here for comparison"));
        assert_eq!(hint_text(1, 2).as_deref(), Some("One more to start"));
        assert_eq!(hint_text(1, 4).as_deref(), Some("Three more to start"));
        assert_eq!(hint_text(2, 2), None);
    }

    #[test]
    fn test_empty_scenario_shows_placeholder() {
        let mut compositor = Compositor::new(&FigmentConfig::default());
        let scenario = Scenario::new("s", std::time::SystemTime::UNIX_EPOCH);
        let frame = compositor.render(
            &scenario,
            &Selection::new(),
            Size::new(400.0, 300.0),
            ViewState {
                drop_hovering: true,
            },
        );

        assert_eq!(frame.mode, FrameMode::Initial);
        assert_eq!(frame.canvas, Size::new(400.0, 300.0));
        assert!(frame.commands.contains(&PaintCommand::DrawSymbol {
            symbol: Symbol::Photo,
            rect: Rect::new(150.0, 100.0, 100.0, 100.0),
        }));
        assert!(matches!(frame.commands[1], PaintCommand::FillRoundedRect { .. }));
        assert!(matches!(
            frame.commands.last(),
            Some(PaintCommand::DrawText { text, .. }) if text == "Drop here for comparison"
        ));
    }

    #[test]
    fn test_container_border_is_dashed() {
        let mut compositor = Compositor::new(&FigmentConfig::default());
        let scenario = Scenario::new("s", std::time::SystemTime::UNIX_EPOCH);
        let frame = compositor.render(&scenario, &Selection::new(), Size::ZERO, ViewState::default());

        let border = frame.commands.iter().find_map(|command| match command {
            PaintCommand::StrokeRoundedRect { rect, style } => Some((rect, style)),
            _ => None,
        });
        let (rect, style) = border.expect("border");
        assert_eq!(rect.rect, Rect::new(6.0, 6.0, 188.0, 188.0));
        assert_eq!(style.width, 12.0);
        assert_eq!(style.dash.as_slice(), &[50.0, 10.0]);
        assert_eq!(style.dash_phase, -10.0);
    }
}
