//! Paint context - the main drawing API

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::blend::BlendMode;
use crate::color::Color;
use crate::primitives::*;

/// Handle to a decoded image owned by whoever replays the commands
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(pub u64);

/// How a backend should realize an image draw
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// Pixels sampled into the destination rect
    Raster,
    /// Rendered at the destination rect's size
    Vector,
}

/// Built-in placeholder glyphs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    /// Generic "drop a photo here" glyph
    Photo,
    /// Shown in place of an image that could not be decoded
    BrokenPhoto,
}

/// Fill style for shapes
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FillStyle {
    Color(Color),
}

impl From<Color> for FillStyle {
    fn from(color: Color) -> Self {
        FillStyle::Color(color)
    }
}

/// Stroke style
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    /// Alternating on/off lengths; empty means a solid line
    pub dash: SmallVec<[f32; 4]>,
    pub dash_phase: f32,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            dash: SmallVec::new(),
            dash_phase: 0.0,
        }
    }
}

impl StrokeStyle {
    pub fn solid(color: Color, width: f32) -> Self {
        Self {
            color,
            width,
            ..Default::default()
        }
    }

    pub fn dashed(mut self, pattern: &[f32], phase: f32) -> Self {
        self.dash = SmallVec::from_slice(pattern);
        self.dash_phase = phase;
        self
    }

    pub fn is_dashed(&self) -> bool {
        !self.dash.is_empty()
    }
}

/// A paint command for the renderer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum PaintCommand {
    FillRoundedRect {
        rect: RoundedRect,
        style: FillStyle,
    },
    StrokeRect {
        rect: Rect,
        style: StrokeStyle,
    },
    StrokeRoundedRect {
        rect: RoundedRect,
        style: StrokeStyle,
    },
    DrawImage {
        image: ImageId,
        kind: ImageKind,
        rect: Rect,
    },
    DrawSymbol {
        symbol: Symbol,
        rect: Rect,
    },
    DrawShadow {
        rect: Rect,
        shadow: Shadow,
    },
    DrawText {
        text: String,
        position: Point,
        size: f32,
        color: Color,
    },
    PushClip {
        rect: Rect,
    },
    PopClip,
    PushBlendMode {
        mode: BlendMode,
    },
    PopBlendMode,
}

/// The paint context used for recording draws
#[derive(Debug)]
pub struct PaintContext {
    commands: Vec<PaintCommand>,
    blend_mode_stack: Vec<BlendMode>,
    clip_stack: Vec<Rect>,
}

impl PaintContext {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            blend_mode_stack: vec![BlendMode::Normal],
            clip_stack: Vec::new(),
        }
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Blend mode that applies to the next draw
    pub fn current_blend_mode(&self) -> BlendMode {
        self.blend_mode_stack
            .last()
            .copied()
            .unwrap_or(BlendMode::Normal)
    }

    // === Shape drawing ===

    pub fn fill_rounded_rect(&mut self, rect: Rect, radius: f32, style: impl Into<FillStyle>) {
        self.commands.push(PaintCommand::FillRoundedRect {
            rect: RoundedRect::uniform(rect, radius),
            style: style.into(),
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, style: StrokeStyle) {
        self.commands.push(PaintCommand::StrokeRect { rect, style });
    }

    pub fn stroke_rounded_rect(&mut self, rect: Rect, radius: f32, style: StrokeStyle) {
        self.commands.push(PaintCommand::StrokeRoundedRect {
            rect: RoundedRect::uniform(rect, radius),
            style,
        });
    }

    // === Images ===

    pub fn draw_image(&mut self, image: ImageId, kind: ImageKind, rect: Rect) {
        self.commands
            .push(PaintCommand::DrawImage { image, kind, rect });
    }

    pub fn draw_symbol(&mut self, symbol: Symbol, rect: Rect) {
        self.commands.push(PaintCommand::DrawSymbol { symbol, rect });
    }

    // === Text ===

    pub fn draw_text(&mut self, text: impl Into<String>, x: f32, y: f32, size: f32, color: Color) {
        self.commands.push(PaintCommand::DrawText {
            text: text.into(),
            position: Point::new(x, y),
            size,
            color,
        });
    }

    // === Shadows ===

    pub fn draw_shadow(&mut self, rect: Rect, shadow: Shadow) {
        self.commands.push(PaintCommand::DrawShadow { rect, shadow });
    }

    // === Clipping ===

    pub fn push_clip(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
        self.commands.push(PaintCommand::PushClip { rect });
    }

    pub fn pop_clip(&mut self) {
        if self.clip_stack.pop().is_none() {
            tracing::warn!("pop_clip called with an empty clip stack");
            return;
        }
        self.commands.push(PaintCommand::PopClip);
    }

    // === Blending ===

    pub fn push_blend_mode(&mut self, mode: BlendMode) {
        self.blend_mode_stack.push(mode);
        self.commands.push(PaintCommand::PushBlendMode { mode });
    }

    pub fn pop_blend_mode(&mut self) {
        // The base Normal entry is never popped
        if self.blend_mode_stack.len() <= 1 {
            tracing::warn!("pop_blend_mode called without a matching push");
            return;
        }
        self.blend_mode_stack.pop();
        self.commands.push(PaintCommand::PopBlendMode);
    }
}

impl Default for PaintContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blend_mode_stack() {
        let mut ctx = PaintContext::new();
        assert_eq!(ctx.current_blend_mode(), BlendMode::Normal);

        ctx.push_blend_mode(BlendMode::Difference);
        ctx.push_blend_mode(BlendMode::Normal);
        assert_eq!(ctx.current_blend_mode(), BlendMode::Normal);

        ctx.pop_blend_mode();
        assert_eq!(ctx.current_blend_mode(), BlendMode::Difference);

        ctx.pop_blend_mode();
        // Unbalanced pop is ignored
        ctx.pop_blend_mode();
        assert_eq!(ctx.current_blend_mode(), BlendMode::Normal);
        assert_eq!(ctx.commands().len(), 4);
    }

    #[test]
    fn test_unbalanced_pop_clip_is_ignored() {
        let mut ctx = PaintContext::new();
        ctx.pop_clip();
        assert!(ctx.commands().is_empty());

        ctx.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        ctx.pop_clip();
        assert_eq!(ctx.take_commands().len(), 2);
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn test_dashed_stroke_style() {
        let style = StrokeStyle::solid(Color::BLACK, 2.0).dashed(&[6.0, 4.0], 0.0);
        assert!(style.is_dashed());
        assert_eq!(style.dash.as_slice(), &[6.0, 4.0]);
        assert!(!StrokeStyle::default().is_dashed());
    }

    #[test]
    fn test_commands_serialize_with_op_tag() {
        let mut ctx = PaintContext::new();
        ctx.draw_image(ImageId(7), ImageKind::Vector, Rect::new(1.0, 2.0, 3.0, 4.0));

        let json = serde_json::to_value(ctx.commands()).expect("serialize");
        assert_eq!(json[0]["op"], "draw_image");
        assert_eq!(json[0]["image"], 7);
        assert_eq!(json[0]["kind"], "vector");
    }
}
