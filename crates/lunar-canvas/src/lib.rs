//! lunar-canvas
//!
//! Fluent drawing surface over a software 2D context.
//!
//! Features:
//! - Create-once surface with configured size and context kind
//! - Chainable style, path, shape and transform operations
//! - Path protocol tracking (open/closed) with misuse surfaced as errors
//! - Pixel and data-URL image export/import
//!
//! ```
//! use lunar_canvas::{Canvas, CanvasSettings, EndPath, Segment};
//!
//! let mut canvas = Canvas::new(CanvasSettings::default());
//! canvas.create().unwrap();
//! canvas
//!     .start_path(Some((10.0, 10.0))).unwrap()
//!     .define_segments(&[Segment::Line { x: 50.0, y: 10.0 }, Segment::Line { x: 50.0, y: 50.0 }]).unwrap()
//!     .end_path(&EndPath::fill()).unwrap();
//! ```

pub mod canvas;
pub mod context2d;
pub mod encode;
pub mod image_data;
pub mod matrix;
pub mod path;
pub mod styles;

pub use canvas::{
    Canvas, CanvasSettings, CircleOptions, ContextKind, EndPath, ExportedImage,
    GetImage, ImageSource, PutImage, Rect, RectOptions, Segment, TransformOptions,
};
pub use context2d::{Color, CompositeOperation, Context2d, LineCap, LineJoin, State};
pub use encode::{from_data_url, to_data_url};
pub use image_data::ImageData;
pub use matrix::Matrix;
pub use path::{Path, PathCommand};
pub use styles::{FillStyle, ShadowStyle, StrokeStyle, Styles};

/// Drawing surface error
#[derive(Debug, thiserror::Error)]
pub enum CanvasError {
    #[error("surface has already been created")]
    AlreadyCreated,

    #[error("rendering context not supported: {0}")]
    UnsupportedContext(String),

    #[error("surface has not been created yet")]
    NotCreated,

    #[error("a path is already open; end it before starting a new one")]
    PathAlreadyOpen,

    #[error("no path has been started")]
    NoOpenPath,

    #[error("invalid image data: {0}")]
    InvalidImage(String),
}
