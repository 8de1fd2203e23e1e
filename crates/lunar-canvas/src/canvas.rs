//! Drawing Surface
//!
//! Fluent wrapper over the software 2D context: create-once surface
//! management, path protocol tracking, shape helpers and image I/O.
//!
//! Mutating operations return `Result<&mut Self, CanvasError>` so calls
//! chain with `?`.

use crate::context2d::Context2d;
use crate::encode;
use crate::image_data::ImageData;
use crate::styles::Styles;
use crate::CanvasError;

/// Surface configuration, fixed at construction
#[derive(Debug, Clone)]
pub struct CanvasSettings {
    /// Backing-store width in pixels
    pub width: u32,
    /// Backing-store height in pixels
    pub height: u32,
    /// Pin the CSS size to the backing-store size on create
    pub scale: bool,
    /// Rendering context to acquire
    pub kind: ContextKind,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self {
            width: 300,
            height: 150,
            scale: true,
            kind: ContextKind::TwoD,
        }
    }
}

/// Rendering context selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextKind {
    TwoD,
    /// Experimental WebGL; the software host cannot provide it
    WebGl,
}

/// Axis-aligned rectangle in user space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }
}

/// One path segment for [`Canvas::define_segments`]
#[derive(Debug, Clone, Copy)]
pub enum Segment {
    Line { x: f64, y: f64 },
    Arc { x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool },
    Rect(Rect),
    QuadraticCurve { cpx: f64, cpy: f64, x: f64, y: f64 },
    BezierCurve { cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64 },
}

/// How to finish an open path. The default closes without painting.
#[derive(Debug, Clone, Copy)]
pub struct EndPath {
    pub close: bool,
    pub fill: bool,
    pub stroke: bool,
}

impl Default for EndPath {
    fn default() -> Self {
        Self { close: true, fill: false, stroke: false }
    }
}

impl EndPath {
    /// Close and fill
    pub fn fill() -> Self {
        Self { fill: true, ..Self::default() }
    }

    /// Close and stroke
    pub fn stroke() -> Self {
        Self { stroke: true, ..Self::default() }
    }
}

/// Circle helper options
#[derive(Debug, Clone, Copy)]
pub struct CircleOptions {
    pub x: f64,
    pub y: f64,
    /// Radius
    pub size: f64,
    /// Start angle in radians; the arc always runs to a full turn
    pub angle: f64,
    pub clockwise: bool,
}

impl Default for CircleOptions {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, size: 10.0, angle: 0.0, clockwise: true }
    }
}

/// Rectangle helper mode: exactly one of the three should be set.
/// `path` requires an open path; `stroke`/`fill` paint immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct RectOptions {
    pub path: Option<Rect>,
    pub stroke: Option<Rect>,
    pub fill: Option<Rect>,
}

/// Transform helper options, applied translate → scale → rotate
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformOptions {
    pub translate: Option<(f64, f64)>,
    pub scale: Option<(f64, f64)>,
    /// Radians
    pub rotate: Option<f64>,
}

/// Export request for [`Canvas::get_image`]
#[derive(Debug, Clone, Copy)]
pub enum GetImage {
    /// Raw pixels over a region (`None` = full surface)
    Bitmap(Option<Rect>),
    /// Encoded data URL, optionally cropped/resized through an
    /// off-surface context first (`None` = full surface)
    DataUrl(Option<Rect>),
}

/// Exported surface representation
#[derive(Debug, Clone)]
pub enum ExportedImage {
    Bitmap(ImageData),
    DataUrl(String),
}

/// Import source for [`Canvas::put_image`]
#[derive(Debug, Clone)]
pub enum ImageSource {
    Bitmap(ImageData),
    DataUrl(String),
}

/// Import placement for [`Canvas::put_image`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PutImage {
    /// Destination offset
    pub x: f64,
    pub y: f64,
    /// Destination size (`None` = source size)
    pub width: Option<f64>,
    pub height: Option<f64>,
    /// Source crop (`None` = whole source); data-URL mode only
    pub source: Option<Rect>,
}

/// Fluent drawing surface
#[derive(Debug)]
pub struct Canvas {
    settings: CanvasSettings,
    context: Option<Context2d>,
    /// CSS pixel size, recorded when `scale` is set
    css_size: Option<(u32, u32)>,
    path_open: bool,
}

impl Canvas {
    /// Configure a surface. Nothing is allocated until [`create`](Self::create).
    pub fn new(settings: CanvasSettings) -> Self {
        Self {
            settings,
            context: None,
            css_size: None,
            path_open: false,
        }
    }

    /// Settings this surface was configured with
    pub fn settings(&self) -> &CanvasSettings {
        &self.settings
    }

    /// The backing context, once created
    pub fn context(&self) -> Option<&Context2d> {
        self.context.as_ref()
    }

    /// Mutable backing context for operations the wrapper does not cover
    pub fn context_mut(&mut self) -> Option<&mut Context2d> {
        self.context.as_mut()
    }

    /// CSS pixel size, when `scale` was requested
    pub fn css_size(&self) -> Option<(u32, u32)> {
        self.css_size
    }

    /// Create the surface and acquire its rendering context.
    ///
    /// Fails with [`CanvasError::AlreadyCreated`] on a second call and
    /// [`CanvasError::UnsupportedContext`] when the requested context kind
    /// cannot be provided.
    pub fn create(&mut self) -> Result<&mut Self, CanvasError> {
        if self.context.is_some() {
            return Err(CanvasError::AlreadyCreated);
        }
        match self.settings.kind {
            ContextKind::TwoD => {}
            ContextKind::WebGl => {
                return Err(CanvasError::UnsupportedContext("experimental-webgl".into()));
            }
        }

        self.context = Some(Context2d::new(self.settings.width, self.settings.height));
        if self.settings.scale {
            self.css_size = Some((self.settings.width, self.settings.height));
        }
        tracing::debug!(
            "created {}x{} drawing surface",
            self.settings.width,
            self.settings.height
        );
        Ok(self)
    }

    fn ctx(&mut self) -> Result<&mut Context2d, CanvasError> {
        self.context.as_mut().ok_or(CanvasError::NotCreated)
    }

    /// Clear a region (`None` = whole surface). With `preserve_transform`
    /// the clear happens under an identity transform, then the previous
    /// transform state is restored.
    pub fn clear(&mut self, preserve_transform: bool, region: Option<Rect>) -> Result<&mut Self, CanvasError> {
        let (width, height) = (self.settings.width as f64, self.settings.height as f64);
        let ctx = self.ctx()?;

        if preserve_transform {
            ctx.save();
            ctx.set_transform(crate::Matrix::identity());
        }
        match region {
            Some(r) => ctx.clear_rect(r.x, r.y, r.width, r.height),
            None => ctx.clear_rect(0.0, 0.0, width, height),
        }
        if preserve_transform {
            ctx.restore();
        }
        Ok(self)
    }

    /// Apply a partial style bundle; absent fields are left untouched
    pub fn set_styles(&mut self, styles: &Styles) -> Result<&mut Self, CanvasError> {
        let ctx = self.ctx()?;
        let state = ctx.state_mut();

        if let Some(composite) = styles.composite {
            state.composite = composite;
        }
        if let Some(alpha) = styles.alpha {
            state.global_alpha = alpha;
        }
        if let Some(fill) = &styles.fill {
            if let Some(color) = fill.color {
                state.fill_color = color;
            }
        }
        if let Some(stroke) = &styles.stroke {
            if let Some(width) = stroke.width {
                state.line_width = width;
            }
            if let Some(cap) = stroke.cap {
                state.line_cap = cap;
            }
            if let Some(join) = stroke.join {
                state.line_join = join;
            }
            if let Some(color) = stroke.color {
                state.stroke_color = color;
            }
            if let Some(miter) = stroke.miter {
                state.miter_limit = miter;
            }
        }
        if let Some(shadow) = &styles.shadow {
            if let Some(offset_x) = shadow.offset_x {
                state.shadow_offset_x = offset_x;
            }
            if let Some(offset_y) = shadow.offset_y {
                state.shadow_offset_y = offset_y;
            }
            if let Some(blur) = shadow.blur {
                state.shadow_blur = blur;
            }
            if let Some(color) = shadow.color {
                state.shadow_color = color;
            }
        }
        Ok(self)
    }

    /// Open a path, optionally moving the pen first.
    ///
    /// Fails with [`CanvasError::PathAlreadyOpen`] if a path is open.
    pub fn start_path(&mut self, at: Option<(f64, f64)>) -> Result<&mut Self, CanvasError> {
        if self.path_open {
            return Err(CanvasError::PathAlreadyOpen);
        }
        let ctx = self.ctx()?;
        ctx.begin_path();
        if let Some((x, y)) = at {
            ctx.move_to(x, y);
        }
        self.path_open = true;
        Ok(self)
    }

    /// Apply segments, in order, to the open path.
    ///
    /// Fails with [`CanvasError::NoOpenPath`] if no path is open.
    pub fn define_segments(&mut self, segments: &[Segment]) -> Result<&mut Self, CanvasError> {
        if !self.path_open {
            return Err(CanvasError::NoOpenPath);
        }
        let ctx = self.ctx()?;
        for segment in segments {
            match *segment {
                Segment::Line { x, y } => ctx.line_to(x, y),
                Segment::Arc { x, y, radius, start_angle, end_angle, counterclockwise } => {
                    ctx.arc(x, y, radius, start_angle, end_angle, counterclockwise)
                }
                Segment::Rect(r) => ctx.rect_path(r.x, r.y, r.width, r.height),
                Segment::QuadraticCurve { cpx, cpy, x, y } => {
                    ctx.quadratic_curve_to(cpx, cpy, x, y)
                }
                Segment::BezierCurve { cp1x, cp1y, cp2x, cp2y, x, y } => {
                    ctx.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y)
                }
            }
        }
        Ok(self)
    }

    /// Finish the open path. Each flag independently triggers its
    /// operation; the open-path flag always clears on success.
    ///
    /// Fails with [`CanvasError::NoOpenPath`] if no path is open.
    pub fn end_path(&mut self, options: &EndPath) -> Result<&mut Self, CanvasError> {
        if !self.path_open {
            return Err(CanvasError::NoOpenPath);
        }
        let ctx = self.ctx()?;
        if options.close {
            ctx.close_path();
        }
        if options.fill {
            ctx.fill();
        }
        if options.stroke {
            ctx.stroke();
        }
        self.path_open = false;
        Ok(self)
    }

    /// Raw arc pass-through
    pub fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        counterclockwise: bool,
    ) -> Result<&mut Self, CanvasError> {
        self.ctx()?.arc(x, y, radius, start_angle, end_angle, counterclockwise);
        Ok(self)
    }

    /// Full circle from [`CircleOptions`] defaults
    pub fn circle(&mut self, options: &CircleOptions) -> Result<&mut Self, CanvasError> {
        self.ctx()?.arc(
            options.x,
            options.y,
            options.size,
            options.angle,
            options.angle + std::f64::consts::TAU,
            !options.clockwise,
        );
        Ok(self)
    }

    /// Rectangle helper: path-segment, stroked or filled mode
    pub fn rect(&mut self, options: &RectOptions) -> Result<&mut Self, CanvasError> {
        if let Some(r) = options.path {
            self.define_segments(&[Segment::Rect(r)])?;
        } else if let Some(r) = options.stroke {
            self.ctx()?.stroke_rect(r.x, r.y, r.width, r.height);
        } else if let Some(r) = options.fill {
            self.ctx()?.fill_rect(r.x, r.y, r.width, r.height);
        }
        Ok(self)
    }

    /// Apply translate, then scale, then rotate; each optional
    pub fn transform(&mut self, options: &TransformOptions) -> Result<&mut Self, CanvasError> {
        let ctx = self.ctx()?;
        if let Some((tx, ty)) = options.translate {
            ctx.translate(tx, ty);
        }
        if let Some((sx, sy)) = options.scale {
            ctx.scale(sx, sy);
        }
        if let Some(angle) = options.rotate {
            ctx.rotate(angle);
        }
        Ok(self)
    }

    /// Move the pen
    pub fn move_to(&mut self, x: f64, y: f64) -> Result<&mut Self, CanvasError> {
        self.ctx()?.move_to(x, y);
        Ok(self)
    }

    /// Push the context state
    pub fn push_state(&mut self) -> Result<&mut Self, CanvasError> {
        self.ctx()?.save();
        Ok(self)
    }

    /// Pop the context state
    pub fn pop_state(&mut self) -> Result<&mut Self, CanvasError> {
        self.ctx()?.restore();
        Ok(self)
    }

    /// Clip painting to the current path
    pub fn clip(&mut self) -> Result<&mut Self, CanvasError> {
        self.ctx()?.clip();
        Ok(self)
    }

    /// Export the surface as raw pixels or a data URL
    pub fn get_image(&mut self, request: GetImage) -> Result<ExportedImage, CanvasError> {
        let (full_w, full_h) = (self.settings.width, self.settings.height);
        let ctx = self.ctx()?;

        match request {
            GetImage::Bitmap(region) => {
                let image = match region {
                    Some(r) => ctx.get_image_data(r.x as i64, r.y as i64, r.width as u32, r.height as u32),
                    None => ctx.get_image_data(0, 0, full_w, full_h),
                };
                Ok(ExportedImage::Bitmap(image))
            }
            GetImage::DataUrl(region) => {
                let url = match region {
                    Some(r) => {
                        // crop/resize through an off-surface context
                        let width = r.width as u32;
                        let height = r.height as u32;
                        let full = ctx.get_image_data(0, 0, full_w, full_h);
                        let mut temp = Context2d::new(width, height);
                        temp.draw_image(
                            &full,
                            r.x,
                            r.y,
                            r.width,
                            r.height,
                            0.0,
                            0.0,
                            r.width,
                            r.height,
                        );
                        encode::to_data_url(&temp.get_image_data(0, 0, width, height))
                    }
                    None => encode::to_data_url(&ctx.get_image_data(0, 0, full_w, full_h)),
                };
                Ok(ExportedImage::DataUrl(url))
            }
        }
    }

    /// Import pixels onto the surface. Bitmap sources are written raw at
    /// the destination offset; data-URL sources are decoded and drawn,
    /// honoring the optional source crop and destination size.
    pub fn put_image(&mut self, source: &ImageSource, options: &PutImage) -> Result<(), CanvasError> {
        match source {
            ImageSource::Bitmap(image) => {
                self.ctx()?.put_image_data(image, options.x as i64, options.y as i64);
                Ok(())
            }
            ImageSource::DataUrl(url) => {
                let image = encode::from_data_url(url)?;
                let src = options.source.unwrap_or(Rect::new(
                    0.0,
                    0.0,
                    image.width() as f64,
                    image.height() as f64,
                ));
                let dw = options.width.unwrap_or(src.width);
                let dh = options.height.unwrap_or(src.height);
                self.ctx()?.draw_image(
                    &image,
                    src.x,
                    src.y,
                    src.width,
                    src.height,
                    options.x,
                    options.y,
                    dw,
                    dh,
                );
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context2d::Color;

    fn created() -> Canvas {
        let mut canvas = Canvas::new(CanvasSettings::default());
        canvas.create().unwrap();
        canvas
    }

    #[test]
    fn test_create_twice_fails() {
        let mut canvas = created();
        assert!(matches!(canvas.create(), Err(CanvasError::AlreadyCreated)));
    }

    #[test]
    fn test_webgl_unsupported() {
        let mut canvas = Canvas::new(CanvasSettings {
            kind: ContextKind::WebGl,
            ..CanvasSettings::default()
        });
        assert!(matches!(canvas.create(), Err(CanvasError::UnsupportedContext(_))));
    }

    #[test]
    fn test_operations_before_create_fail() {
        let mut canvas = Canvas::new(CanvasSettings::default());
        assert!(matches!(canvas.clear(false, None), Err(CanvasError::NotCreated)));
        assert!(matches!(canvas.clip(), Err(CanvasError::NotCreated)));
    }

    #[test]
    fn test_scale_records_css_size() {
        let canvas = created();
        assert_eq!(canvas.css_size(), Some((300, 150)));

        let mut unscaled = Canvas::new(CanvasSettings {
            scale: false,
            ..CanvasSettings::default()
        });
        unscaled.create().unwrap();
        assert_eq!(unscaled.css_size(), None);
    }

    #[test]
    fn test_path_protocol() {
        let mut canvas = created();

        assert!(matches!(
            canvas.define_segments(&[Segment::Line { x: 1.0, y: 1.0 }]),
            Err(CanvasError::NoOpenPath)
        ));
        assert!(matches!(canvas.end_path(&EndPath::default()), Err(CanvasError::NoOpenPath)));

        canvas.start_path(Some((0.0, 0.0))).unwrap();
        assert!(matches!(canvas.start_path(None), Err(CanvasError::PathAlreadyOpen)));

        canvas
            .define_segments(&[Segment::Line { x: 10.0, y: 0.0 }, Segment::Line { x: 10.0, y: 10.0 }])
            .unwrap();
        canvas.end_path(&EndPath::fill()).unwrap();

        // flag cleared: a new path may open
        canvas.start_path(None).unwrap();
    }

    #[test]
    fn test_set_styles_partial_application() {
        let mut canvas = created();
        canvas
            .set_styles(&Styles {
                alpha: Some(0.5),
                ..Styles::default()
            })
            .unwrap();

        let state = canvas.context().unwrap().state();
        assert_eq!(state.global_alpha, 0.5);
        // untouched defaults survive
        assert_eq!(state.line_width, 1.0);
        assert_eq!(state.fill_color, Color::rgb(0, 0, 0));

        // an all-None bundle changes nothing
        canvas.set_styles(&Styles::default()).unwrap();
        assert_eq!(canvas.context().unwrap().state().global_alpha, 0.5);
    }

    #[test]
    fn test_rect_fill_mode_paints() {
        let mut canvas = created();
        canvas
            .set_styles(&Styles::fill_color(Color::rgb(255, 0, 0)))
            .unwrap()
            .rect(&RectOptions {
                fill: Some(Rect::new(0.0, 0.0, 20.0, 20.0)),
                ..RectOptions::default()
            })
            .unwrap();

        let ctx = canvas.context().unwrap();
        let idx = (10 * 300 + 10) * 4;
        assert_eq!(ctx.data()[idx], 255);
    }

    #[test]
    fn test_rect_path_mode_requires_open_path() {
        let mut canvas = created();
        let result = canvas.rect(&RectOptions {
            path: Some(Rect::new(0.0, 0.0, 5.0, 5.0)),
            ..RectOptions::default()
        });
        assert!(matches!(result, Err(CanvasError::NoOpenPath)));
    }

    #[test]
    fn test_clear_preserves_transform() {
        let mut canvas = created();
        canvas
            .transform(&TransformOptions {
                translate: Some((30.0, 30.0)),
                ..TransformOptions::default()
            })
            .unwrap()
            .set_styles(&Styles::fill_color(Color::rgb(9, 9, 9)))
            .unwrap()
            .rect(&RectOptions {
                fill: Some(Rect::new(0.0, 0.0, 10.0, 10.0)),
                ..RectOptions::default()
            })
            .unwrap()
            .clear(true, None)
            .unwrap();

        // surface wiped even though a translate was active
        assert!(canvas.context().unwrap().data().iter().all(|&b| b == 0));
        // transform still in effect afterwards
        assert!(!canvas.context().unwrap().transform().is_identity());
    }

    #[test]
    fn test_get_image_bitmap_full_surface() {
        let mut canvas = created();
        let ExportedImage::Bitmap(image) = canvas.get_image(GetImage::Bitmap(None)).unwrap() else {
            panic!("expected bitmap");
        };
        assert_eq!(image.width(), 300);
        assert_eq!(image.height(), 150);
    }

    #[test]
    fn test_put_image_round_trip() {
        let mut canvas = created();
        canvas
            .set_styles(&Styles::fill_color(Color::rgb(1, 2, 3)))
            .unwrap()
            .rect(&RectOptions {
                fill: Some(Rect::new(0.0, 0.0, 4.0, 4.0)),
                ..RectOptions::default()
            })
            .unwrap();

        let ExportedImage::Bitmap(image) =
            canvas.get_image(GetImage::Bitmap(Some(Rect::new(0.0, 0.0, 4.0, 4.0)))).unwrap()
        else {
            panic!("expected bitmap");
        };

        let mut other = created();
        other
            .put_image(&ImageSource::Bitmap(image), &PutImage { x: 10.0, y: 10.0, ..PutImage::default() })
            .unwrap();
        assert_eq!(other.context().unwrap().data()[((10 * 300 + 10) * 4) as usize], 1);
    }
}
