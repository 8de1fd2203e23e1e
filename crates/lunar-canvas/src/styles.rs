//! Style Options
//!
//! Partial style application for the drawing surface. Every field is
//! optional; absent fields leave the corresponding context state untouched.

use crate::context2d::{Color, CompositeOperation, LineCap, LineJoin};

/// Style bundle for [`Canvas::set_styles`](crate::Canvas::set_styles)
#[derive(Debug, Clone, Default)]
pub struct Styles {
    /// Composite (blend) operation
    pub composite: Option<CompositeOperation>,
    /// Global alpha (0.0..=1.0)
    pub alpha: Option<f64>,
    pub fill: Option<FillStyle>,
    pub stroke: Option<StrokeStyle>,
    pub shadow: Option<ShadowStyle>,
}

/// Fill styling
#[derive(Debug, Clone, Default)]
pub struct FillStyle {
    pub color: Option<Color>,
}

/// Stroke styling
#[derive(Debug, Clone, Default)]
pub struct StrokeStyle {
    pub width: Option<f64>,
    pub cap: Option<LineCap>,
    pub join: Option<LineJoin>,
    pub color: Option<Color>,
    pub miter: Option<f64>,
}

/// Shadow styling
#[derive(Debug, Clone, Default)]
pub struct ShadowStyle {
    pub offset_x: Option<f64>,
    pub offset_y: Option<f64>,
    pub blur: Option<f64>,
    pub color: Option<Color>,
}

impl Styles {
    /// Shorthand for a fill-color-only style bundle
    pub fn fill_color(color: Color) -> Self {
        Self {
            fill: Some(FillStyle { color: Some(color) }),
            ..Self::default()
        }
    }

    /// Shorthand for a stroke-color-only style bundle
    pub fn stroke_color(color: Color) -> Self {
        Self {
            stroke: Some(StrokeStyle {
                color: Some(color),
                ..StrokeStyle::default()
            }),
            ..Self::default()
        }
    }
}
