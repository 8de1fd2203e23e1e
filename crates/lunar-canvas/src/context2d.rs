//! 2D Rendering Context
//!
//! Software rendering context backing the drawing surface: RGBA pixel
//! buffer, state stack, path assembly and a scanline rasterizer.

use crate::image_data::ImageData;
use crate::matrix::Matrix;
use crate::path::Path;

/// Software 2D rendering context
#[derive(Debug)]
pub struct Context2d {
    /// Surface width
    width: u32,
    /// Surface height
    height: u32,
    /// Pixel data (RGBA)
    data: Vec<u8>,
    /// State stack
    states: Vec<State>,
    /// Current path
    current_path: Path,
}

/// Context state (for save/restore)
#[derive(Debug, Clone)]
pub struct State {
    pub transform: Matrix,
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub global_alpha: f64,
    pub composite: CompositeOperation,
    pub shadow_offset_x: f64,
    pub shadow_offset_y: f64,
    pub shadow_blur: f64,
    pub shadow_color: Color,
    /// Clip region as flattened device-space polygons
    pub clip: Option<Vec<Vec<(f64, f64)>>>,
}

/// Color (RGBA)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Line cap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Line join
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

/// Composite (blend) operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CompositeOperation {
    #[default]
    SourceOver,
    DestinationOver,
    SourceAtop,
    DestinationOut,
    Lighter,
    Copy,
    Xor,
}

impl Context2d {
    /// Create a new context with a transparent surface
    pub fn new(width: u32, height: u32) -> Self {
        let data = vec![0u8; (width * height * 4) as usize];
        Self {
            width,
            height,
            data,
            states: vec![State::default()],
            current_path: Path::new(),
        }
    }

    /// Surface width
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel data
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable pixel data
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    // State management

    /// Push the current state
    pub fn save(&mut self) {
        if let Some(state) = self.states.last() {
            self.states.push(state.clone());
        }
    }

    /// Pop back to the previous state. The bottom entry never pops.
    pub fn restore(&mut self) {
        if self.states.len() > 1 {
            self.states.pop();
        }
    }

    /// Current state
    pub fn state(&self) -> &State {
        self.states.last().expect("state stack is never empty")
    }

    /// Mutable current state
    pub fn state_mut(&mut self) -> &mut State {
        self.states.last_mut().expect("state stack is never empty")
    }

    // Transforms

    /// Compose a translation onto the current transform
    pub fn translate(&mut self, tx: f64, ty: f64) {
        let t = self.state().transform.multiply(&Matrix::translate(tx, ty));
        self.state_mut().transform = t;
    }

    /// Compose a scale onto the current transform
    pub fn scale(&mut self, sx: f64, sy: f64) {
        let t = self.state().transform.multiply(&Matrix::scale(sx, sy));
        self.state_mut().transform = t;
    }

    /// Compose a rotation onto the current transform (radians)
    pub fn rotate(&mut self, angle: f64) {
        let t = self.state().transform.multiply(&Matrix::rotate(angle));
        self.state_mut().transform = t;
    }

    /// Replace the current transform
    pub fn set_transform(&mut self, matrix: Matrix) {
        self.state_mut().transform = matrix;
    }

    /// Current transform
    pub fn transform(&self) -> Matrix {
        self.state().transform
    }

    // Path assembly

    /// Start a fresh path
    pub fn begin_path(&mut self) {
        self.current_path = Path::new();
    }

    /// Close the current subpath
    pub fn close_path(&mut self) {
        self.current_path.close_path();
    }

    /// Move the pen
    pub fn move_to(&mut self, x: f64, y: f64) {
        self.current_path.move_to(x, y);
    }

    /// Line segment
    pub fn line_to(&mut self, x: f64, y: f64) {
        self.current_path.line_to(x, y);
    }

    /// Quadratic curve segment
    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) {
        self.current_path.quadratic_curve_to(cpx, cpy, x, y);
    }

    /// Bezier curve segment
    pub fn bezier_curve_to(&mut self, cp1x: f64, cp1y: f64, cp2x: f64, cp2y: f64, x: f64, y: f64) {
        self.current_path.bezier_curve_to(cp1x, cp1y, cp2x, cp2y, x, y);
    }

    /// Arc segment
    pub fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64, counterclockwise: bool) {
        self.current_path.arc(x, y, radius, start_angle, end_angle, counterclockwise);
    }

    /// Rectangle subpath
    pub fn rect_path(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.current_path.rect(x, y, width, height);
    }

    // Painting

    /// Fill the current path (even-odd)
    pub fn fill(&mut self) {
        let polys = self.device_polygons();
        let color = self.state().fill_color;
        let alpha = self.state().global_alpha;
        self.fill_polygons(&polys, color, alpha, false);
    }

    /// Stroke the current path
    pub fn stroke(&mut self) {
        let polys = self.device_polygons();
        let color = self.state().stroke_color;
        let alpha = self.state().global_alpha;
        let width = self.state().line_width.max(1.0);
        for poly in &polys {
            for pair in poly.windows(2) {
                self.stamp_segment(pair[0], pair[1], width, color, alpha);
            }
        }
    }

    /// Clip subsequent painting to the current path
    pub fn clip(&mut self) {
        let polys = self.device_polygons();
        self.state_mut().clip = Some(polys);
    }

    /// Fill a rectangle with the fill color
    pub fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let quad = self.device_quad(x, y, width, height);
        let color = self.state().fill_color;
        let alpha = self.state().global_alpha;
        self.fill_polygons(&[quad], color, alpha, false);
    }

    /// Stroke a rectangle outline with the stroke color
    pub fn stroke_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let quad = self.device_quad(x, y, width, height);
        let color = self.state().stroke_color;
        let alpha = self.state().global_alpha;
        let line_width = self.state().line_width.max(1.0);
        for pair in quad.windows(2) {
            self.stamp_segment(pair[0], pair[1], line_width, color, alpha);
        }
    }

    /// Clear a rectangle back to transparent
    pub fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let quad = self.device_quad(x, y, width, height);
        self.fill_polygons(&[quad], Color::default(), 1.0, true);
    }

    // Pixel I/O

    /// Copy a region out as ImageData. Out-of-surface pixels stay transparent.
    pub fn get_image_data(&self, x: i64, y: i64, width: u32, height: u32) -> ImageData {
        let mut out = ImageData::new(width, height);
        for oy in 0..height {
            let sy = y + oy as i64;
            if sy < 0 || sy >= self.height as i64 {
                continue;
            }
            for ox in 0..width {
                let sx = x + ox as i64;
                if sx < 0 || sx >= self.width as i64 {
                    continue;
                }
                let src = ((sy as u32 * self.width + sx as u32) * 4) as usize;
                out.set_pixel(
                    ox,
                    oy,
                    self.data[src],
                    self.data[src + 1],
                    self.data[src + 2],
                    self.data[src + 3],
                );
            }
        }
        out
    }

    /// Write ImageData at (dx, dy), replacing destination pixels.
    /// Ignores the transform, alpha and clip, matching raw pixel writes.
    pub fn put_image_data(&mut self, image: &ImageData, dx: i64, dy: i64) {
        for sy in 0..image.height() {
            let ty = dy + sy as i64;
            if ty < 0 || ty >= self.height as i64 {
                continue;
            }
            for sx in 0..image.width() {
                let tx = dx + sx as i64;
                if tx < 0 || tx >= self.width as i64 {
                    continue;
                }
                if let Some((r, g, b, a)) = image.get_pixel(sx, sy) {
                    let idx = ((ty as u32 * self.width + tx as u32) * 4) as usize;
                    self.data[idx] = r;
                    self.data[idx + 1] = g;
                    self.data[idx + 2] = b;
                    self.data[idx + 3] = a;
                }
            }
        }
    }

    /// Draw a source image region onto a destination region, nearest
    /// sampling, composited source-over.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_image(
        &mut self,
        source: &ImageData,
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    ) {
        if sw <= 0.0 || sh <= 0.0 || dw <= 0.0 || dh <= 0.0 {
            return;
        }
        let alpha = self.state().global_alpha;
        let x0 = dx.floor().max(0.0) as u32;
        let y0 = dy.floor().max(0.0) as u32;
        let x1 = ((dx + dw).ceil() as i64).clamp(0, self.width as i64) as u32;
        let y1 = ((dy + dh).ceil() as i64).clamp(0, self.height as i64) as u32;

        for py in y0..y1 {
            for px in x0..x1 {
                let u = (px as f64 + 0.5 - dx) / dw;
                let v = (py as f64 + 0.5 - dy) / dh;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let src_x = (sx + u * sw) as i64;
                let src_y = (sy + v * sh) as i64;
                if src_x < 0 || src_y < 0 {
                    continue;
                }
                if let Some((r, g, b, a)) = source.get_pixel(src_x as u32, src_y as u32) {
                    self.blend_pixel(px, py, Color { r, g, b, a }, alpha, false);
                }
            }
        }
    }

    // Rasterizer internals

    /// Flatten the current path into device space
    fn device_polygons(&self) -> Vec<Vec<(f64, f64)>> {
        let transform = self.state().transform;
        self.current_path
            .flatten()
            .into_iter()
            .map(|poly| poly.into_iter().map(|(x, y)| transform.apply(x, y)).collect())
            .collect()
    }

    /// Rectangle corners mapped through the current transform
    fn device_quad(&self, x: f64, y: f64, width: f64, height: f64) -> Vec<(f64, f64)> {
        let t = self.state().transform;
        vec![
            t.apply(x, y),
            t.apply(x + width, y),
            t.apply(x + width, y + height),
            t.apply(x, y + height),
            t.apply(x, y),
        ]
    }

    /// Even-odd scanline fill over a polygon set
    fn fill_polygons(&mut self, polys: &[Vec<(f64, f64)>], color: Color, alpha: f64, replace: bool) {
        let mut min_y = f64::MAX;
        let mut max_y = f64::MIN;
        for poly in polys {
            for &(_, y) in poly {
                min_y = min_y.min(y);
                max_y = max_y.max(y);
            }
        }
        if min_y > max_y {
            return;
        }
        let y0 = min_y.floor().max(0.0) as u32;
        let y1 = (max_y.ceil() as i64).clamp(0, self.height as i64) as u32;

        let mut crossings: Vec<f64> = Vec::new();
        for py in y0..y1 {
            let sample_y = py as f64 + 0.5;
            crossings.clear();
            for poly in polys {
                for pair in poly.windows(2) {
                    let (x0p, y0p) = pair[0];
                    let (x1p, y1p) = pair[1];
                    if (y0p <= sample_y) != (y1p <= sample_y) {
                        let t = (sample_y - y0p) / (y1p - y0p);
                        crossings.push(x0p + t * (x1p - x0p));
                    }
                }
            }
            crossings.sort_by(|a, b| a.partial_cmp(b).expect("crossings are finite"));
            for span in crossings.chunks_exact(2) {
                let x_start = span[0].round().max(0.0) as u32;
                let x_end = (span[1].round() as i64).clamp(0, self.width as i64) as u32;
                for px in x_start..x_end {
                    self.blend_pixel(px, py, color, alpha, replace);
                }
            }
        }
    }

    /// Stamp squares along a device-space segment
    fn stamp_segment(&mut self, from: (f64, f64), to: (f64, f64), width: f64, color: Color, alpha: f64) {
        let (x0, y0) = from;
        let (x1, y1) = to;
        let length = ((x1 - x0).powi(2) + (y1 - y0).powi(2)).sqrt();
        let steps = (length * 2.0).ceil().max(1.0) as u32;
        let half = width / 2.0;

        for i in 0..=steps {
            let t = i as f64 / steps as f64;
            let cx = x0 + t * (x1 - x0);
            let cy = y0 + t * (y1 - y0);
            let px0 = (cx - half).round().max(0.0) as u32;
            let py0 = (cy - half).round().max(0.0) as u32;
            let px1 = ((cx + half).round() as i64).clamp(0, self.width as i64) as u32;
            let py1 = ((cy + half).round() as i64).clamp(0, self.height as i64) as u32;
            for py in py0..py1 {
                for px in px0..px1 {
                    self.blend_pixel(px, py, color, alpha, false);
                }
            }
        }
    }

    /// Source-over blend (or raw replace) of one pixel, honoring clip
    fn blend_pixel(&mut self, x: u32, y: u32, color: Color, alpha: f64, replace: bool) {
        if x >= self.width || y >= self.height {
            return;
        }
        if let Some(clip) = &self.state().clip {
            if !point_in_polygons(clip, x as f64 + 0.5, y as f64 + 0.5) {
                return;
            }
        }
        let idx = ((y * self.width + x) * 4) as usize;
        if replace {
            self.data[idx] = color.r;
            self.data[idx + 1] = color.g;
            self.data[idx + 2] = color.b;
            self.data[idx + 3] = color.a;
            return;
        }
        let src_a = (color.a as f64 / 255.0) * alpha.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst_a = self.data[idx + 3] as f64 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }
        let blend = |s: u8, d: u8| -> u8 {
            let s = s as f64 / 255.0;
            let d = d as f64 / 255.0;
            (((s * src_a + d * dst_a * (1.0 - src_a)) / out_a) * 255.0).round() as u8
        };
        self.data[idx] = blend(color.r, self.data[idx]);
        self.data[idx + 1] = blend(color.g, self.data[idx + 1]);
        self.data[idx + 2] = blend(color.b, self.data[idx + 2]);
        self.data[idx + 3] = (out_a * 255.0).round() as u8;
    }
}

/// Even-odd point-in-polygon test over a polygon set
fn point_in_polygons(polys: &[Vec<(f64, f64)>], x: f64, y: f64) -> bool {
    let mut inside = false;
    for poly in polys {
        for pair in poly.windows(2) {
            let (x0, y0) = pair[0];
            let (x1, y1) = pair[1];
            if (y0 <= y) != (y1 <= y) {
                let t = (y - y0) / (y1 - y0);
                if x0 + t * (x1 - x0) > x {
                    inside = !inside;
                }
            }
        }
    }
    inside
}

impl Color {
    pub fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

impl Default for State {
    fn default() -> Self {
        Self {
            transform: Matrix::identity(),
            fill_color: Color::rgb(0, 0, 0),
            stroke_color: Color::rgb(0, 0, 0),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            global_alpha: 1.0,
            composite: CompositeOperation::default(),
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            shadow_blur: 0.0,
            shadow_color: Color::default(),
            clip: None,
        }
    }
}
